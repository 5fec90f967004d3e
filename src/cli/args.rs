//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

/// Org hierarchy builder for employee directory snapshots
#[derive(Parser, Debug)]
#[command(name = "orgchart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Project directory holding a local .orgchart.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Expansion state file (overrides config)
    #[arg(long, global = true, env = "ORGCHART_STATE_FILE", value_hint = ValueHint::FilePath)]
    pub state_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Snapshot plus optional department filter, shared by tree commands.
#[derive(Args, Debug, Clone)]
pub struct ScopeArgs {
    /// Employee snapshot (JSON export)
    #[arg(value_hint = ValueHint::FilePath)]
    pub snapshot: PathBuf,

    /// Department to show ("all" for everyone; default from config)
    #[arg(short, long)]
    pub department: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the org chart as a collapsible tree
    Tree {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Ignore saved state and expand everything
        #[arg(long, conflicts_with = "collapse_all")]
        expand_all: bool,
        /// Ignore saved state and collapse everything
        #[arg(long)]
        collapse_all: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// List visible rows with indentation
    Rows {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Expand or collapse nodes by employee id
    Toggle {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Employee ids
        #[arg(short, long = "id", required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Expand every node in scope
    ExpandAll {
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Collapse every node (also resets a damaged state file)
    CollapseAll,

    /// Forget saved state for employees no longer in the snapshot
    Prune {
        /// Employee snapshot (JSON export)
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
    },

    /// Show directory counts (ignores department filter)
    Summary {
        /// Employee snapshot (JSON export)
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
    },

    /// List departments
    Departments {
        /// Employee snapshot (JSON export)
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
    },

    /// Report unresolved manager references
    Check {
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Re-key task/notification owners from employee ids to auth UIDs
    Rekey {
        /// Employee snapshot (JSON export)
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
        /// Owned records (JSON export of tasks/notifications)
        #[arg(value_hint = ValueHint::FilePath)]
        records: PathBuf,
        /// Write migrated records (default: show plan only)
        #[arg(long, requires = "output")]
        apply: bool,
        /// Output file for migrated records
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
