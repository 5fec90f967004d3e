//! Command dispatch: turns parsed arguments into service calls.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat, ScopeArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{
    build_hierarchy, render_tree, visible_rows, DepartmentSelection, ExpansionState,
};
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Run the parsed command; returns the process exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see 'orgchart --help'".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(exitcode::OK);
    }

    let project_dir = project_dir(cli)?;
    let mut settings = Settings::load(Some(project_dir.as_path()))?;
    if let Some(state_file) = &cli.state_file {
        settings.state_file = Some(state_file.clone());
    }
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Tree {
            scope,
            expand_all,
            collapse_all,
            format,
        } => cmd_tree(&container, scope, *expand_all, *collapse_all, *format),
        Commands::Rows { scope, format } => cmd_rows(&container, scope, *format),
        Commands::Toggle { scope, ids } => cmd_toggle(&container, scope, ids),
        Commands::ExpandAll { scope } => cmd_expand_all(&container, scope),
        Commands::CollapseAll => cmd_collapse_all(&container),
        Commands::Prune { snapshot } => cmd_prune(&container, snapshot),
        Commands::Summary { snapshot } => cmd_summary(&container, snapshot),
        Commands::Departments { snapshot } => cmd_departments(&container, snapshot),
        Commands::Check { scope } => cmd_check(&container, scope),
        Commands::Rekey {
            snapshot,
            records,
            apply,
            output,
        } => cmd_rekey(&container, snapshot, records, *apply, output.as_deref()),
        Commands::Config { command } => cmd_config(&container, command, &project_dir),
        Commands::Completion { .. } => Ok(exitcode::OK),
    }
}

fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("get current directory", e))),
    }
}

fn selection(container: &ServiceContainer, scope: &ScopeArgs) -> DepartmentSelection {
    scope
        .department
        .as_deref()
        .map(DepartmentSelection::from)
        .unwrap_or_else(|| container.settings.default_selection())
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Infra(InfraError::encode("render json", e)))?;
    output::info(&json);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(
    container: &ServiceContainer,
    scope: &ScopeArgs,
    expand_all: bool,
    collapse_all: bool,
    format: OutputFormat,
) -> CliResult<i32> {
    let selection = selection(container, scope);
    let view = container.directory.view(&scope.snapshot, &selection)?;
    let expansion = if expand_all {
        ExpansionState::all_expanded(view.forest.all_ids())
    } else if collapse_all {
        ExpansionState::all_collapsed()
    } else {
        container.expansion.load(&view.forest)?
    };
    debug!("tree: {} expanded ids", expansion.len());

    match format {
        OutputFormat::Json => print_json(&view.forest)?,
        OutputFormat::Text => {
            output::header(&format!(
                "{} of {} employees ({}), {} levels",
                view.forest.len(),
                view.summary.total,
                view.selection,
                view.forest.depth()
            ));
            print!("{}", render_tree(&view.forest, &expansion));
            for diagnostic in view.forest.diagnostics() {
                output::warning(diagnostic);
            }
        }
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_rows(container: &ServiceContainer, scope: &ScopeArgs, format: OutputFormat) -> CliResult<i32> {
    let view = container
        .directory
        .view(&scope.snapshot, &selection(container, scope))?;
    let expansion = container.expansion.load(&view.forest)?;
    let rows = visible_rows(&view.forest, &expansion);

    match format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Text => {
            for row in &rows {
                output::info(&format!(
                    "{}{} {} [{}] {}",
                    "  ".repeat(row.depth),
                    row.marker(),
                    row.name,
                    row.id,
                    row.role
                ));
            }
        }
    }
    Ok(exitcode::OK)
}

#[instrument(skip(container))]
fn cmd_toggle(container: &ServiceContainer, scope: &ScopeArgs, ids: &[String]) -> CliResult<i32> {
    let view = container
        .directory
        .view(&scope.snapshot, &selection(container, scope))?;
    for (id, expanded) in container.expansion.toggle(&view.forest, ids)? {
        output::action(if expanded { "Expanded" } else { "Collapsed" }, &id);
    }
    Ok(exitcode::OK)
}

fn cmd_expand_all(container: &ServiceContainer, scope: &ScopeArgs) -> CliResult<i32> {
    let view = container
        .directory
        .view(&scope.snapshot, &selection(container, scope))?;
    let state = container.expansion.expand_all(&view.forest)?;
    output::success(&format!("expanded {} nodes", state.len()));
    Ok(exitcode::OK)
}

fn cmd_collapse_all(container: &ServiceContainer) -> CliResult<i32> {
    container.expansion.collapse_all()?;
    output::success("collapsed all nodes");
    Ok(exitcode::OK)
}

fn cmd_prune(container: &ServiceContainer, snapshot: &Path) -> CliResult<i32> {
    let view = container.directory.view(snapshot, &DepartmentSelection::All)?;
    let dropped = container.expansion.prune(&view.forest)?;
    output::success(&format!(
        "dropped {} stale ids from {}",
        dropped,
        container.expansion.state_file().display()
    ));
    Ok(exitcode::OK)
}

fn cmd_summary(container: &ServiceContainer, snapshot: &Path) -> CliResult<i32> {
    let summary = container.directory.summary(snapshot)?;
    output::info(&summary);
    Ok(exitcode::OK)
}

fn cmd_departments(container: &ServiceContainer, snapshot: &Path) -> CliResult<i32> {
    for department in container.directory.departments(snapshot)? {
        output::info(&department);
    }
    Ok(exitcode::OK)
}

/// Report lenient roots regardless of strict mode.
#[instrument(skip(container))]
fn cmd_check(container: &ServiceContainer, scope: &ScopeArgs) -> CliResult<i32> {
    let snapshot = container.directory.load_snapshot(&scope.snapshot)?;
    let forest = build_hierarchy(&snapshot, &selection(container, scope))
        .map_err(ApplicationError::from)?;
    if forest.diagnostics().is_empty() {
        output::success(&format!("{} employees, all manager references resolve", forest.len()));
        return Ok(exitcode::OK);
    }
    output::header(&format!("{} unresolved manager references", forest.diagnostics().len()));
    for diagnostic in forest.diagnostics() {
        output::failure(diagnostic);
    }
    Ok(exitcode::DATAERR)
}

#[instrument(skip(container))]
fn cmd_rekey(
    container: &ServiceContainer,
    snapshot: &Path,
    records: &Path,
    apply: bool,
    out: Option<&Path>,
) -> CliResult<i32> {
    let plan = match (apply, out) {
        (true, Some(out)) => {
            let plan = container.migration.apply(snapshot, records, out)?;
            output::success(&format!(
                "re-keyed {} records into {}",
                plan.rekeys.len(),
                out.display()
            ));
            plan
        }
        (true, None) => {
            return Err(CliError::InvalidArgs("--apply requires --output".to_string()))
        }
        (false, _) => container.migration.plan(snapshot, records)?.0,
    };

    output::header("Re-key plan");
    for rekey in &plan.rekeys {
        output::detail(&format!(
            "{}/{}: {} -> {}",
            rekey.collection, rekey.record_id, rekey.from, rekey.to
        ));
    }
    output::detail(&format!("already migrated: {}", plan.already_migrated));
    for id in &plan.unresolved {
        output::warning(&format!("record {id}: owner matches no employee"));
    }
    for id in &plan.missing_uid {
        output::warning(&format!("employee {id}: no auth uid yet"));
    }
    Ok(exitcode::OK)
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    project_dir: &Path,
) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::action("global", &p.display()),
                None => output::action("global", &"<unavailable>"),
            }
            output::action("local", &local_config_path(project_dir).display());
            output::action("state", &container.settings.state_file().display());
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(project_dir)
            };
            if container.fs.exists(&path) && !force {
                return Err(CliError::Usage(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .and_then(|_| container.fs.write(&path, &Settings::template()))
                .map_err(|e| CliError::Infra(InfraError::io(format!("write {}", path.display()), e)))?;
            output::success(&format!("created {}", path.display()));
        }
    }
    Ok(exitcode::OK)
}
