//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgchart/orgchart.toml`
//! 3. Local config: `<project_dir>/.orgchart.toml`
//! 4. Environment variables: `ORGCHART_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DepartmentSelection;

/// Unified configuration for orgchart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base directory for orgchart state (default: ~/.orgchart)
    pub base_dir: PathBuf,
    /// Expansion state file (default: base_dir/expansion.json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
    /// Department used when none is given on the command line ("all" = no filter)
    pub default_department: String,
    /// Start with every node expanded when no state has been saved yet
    pub expand_by_default: bool,
    /// Treat dangling, self and cyclic manager references as errors
    pub strict_manager_refs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: dirs_default_base_dir(),
            state_file: None,
            default_department: DepartmentSelection::ALL_SENTINEL.to_string(),
            expand_by_default: false,
            strict_manager_refs: false,
        }
    }
}

/// Raw settings for intermediate parsing.
///
/// `None` means "not specified in this layer, inherit".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub base_dir: Option<PathBuf>,
    pub state_file: Option<PathBuf>,
    pub default_department: Option<String>,
    pub expand_by_default: Option<bool>,
    pub strict_manager_refs: Option<bool>,
}

/// Get the default base directory (~/.orgchart).
fn dirs_default_base_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".orgchart"))
        .unwrap_or_else(|| PathBuf::from("~/.orgchart"))
}

/// Get the XDG config directory for orgchart.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgchart").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgchart.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".orgchart.toml")
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Effective expansion state file.
    pub fn state_file(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| self.base_dir.join("expansion.json"))
    }

    pub fn default_selection(&self) -> DepartmentSelection {
        DepartmentSelection::from(self.default_department.as_str())
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.base_dir.to_string_lossy().as_ref());
        self.base_dir = PathBuf::from(expanded);

        if let Some(state_file) = &self.state_file {
            self.state_file = Some(PathBuf::from(expand_env_vars(
                state_file.to_string_lossy().as_ref(),
            )));
        }
    }

    /// Overlay a config layer: values the layer specifies win.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            base_dir: overlay
                .base_dir
                .clone()
                .unwrap_or_else(|| self.base_dir.clone()),
            state_file: overlay.state_file.clone().or_else(|| self.state_file.clone()),
            default_department: overlay
                .default_department
                .clone()
                .unwrap_or_else(|| self.default_department.clone()),
            expand_by_default: overlay.expand_by_default.unwrap_or(self.expand_by_default),
            strict_manager_refs: overlay
                .strict_manager_refs
                .unwrap_or(self.strict_manager_refs),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.orgchart.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply ORGCHART_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ORGCHART")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("base_dir") {
            settings.base_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("state_file") {
            settings.state_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("default_department") {
            settings.default_department = val;
        }
        if let Ok(val) = config.get_bool("expand_by_default") {
            settings.expand_by_default = val;
        }
        if let Ok(val) = config.get_bool("strict_manager_refs") {
            settings.strict_manager_refs = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# orgchart configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/orgchart/orgchart.toml
#   Local:  <project_dir>/.orgchart.toml
#   Env:    ORGCHART_* environment variables

# Base directory for saved state
# base_dir = "~/.orgchart"

# Expansion state file (default: <base_dir>/expansion.json)
# state_file = "~/.orgchart/expansion.json"

# Department shown when --department is not given ("all" shows everyone)
# default_department = "all"

# Expand every node the first time a tree is shown
# expand_by_default = false

# Fail on dangling, self or cyclic manager references instead of
# promoting those employees to roots
# strict_manager_refs = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load(None).expect("load defaults");
        assert!(settings.base_dir.to_string_lossy().contains(".orgchart"));
        assert_eq!(settings.default_selection(), DepartmentSelection::All);
        assert!(settings.state_file().ends_with("expansion.json"));
    }

    #[test]
    fn given_tilde_in_base_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            base_dir: PathBuf::from("~/.orgchart"),
            state_file: Some(PathBuf::from("$HOME/state.json")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.base_dir.to_string_lossy().starts_with(&home));
        assert!(!settings.base_dir.to_string_lossy().contains('~'));
        assert_eq!(
            settings.state_file(),
            PathBuf::from(format!("{home}/state.json"))
        );
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_inherit() {
        let base = Settings {
            default_department: "Eng".into(),
            ..Settings::default()
        };
        let overlay = RawSettings {
            strict_manager_refs: Some(true),
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert!(merged.strict_manager_refs);
        assert_eq!(merged.default_department, "Eng");
        assert_eq!(merged.base_dir, base.base_dir);
    }

    #[test]
    fn given_settings_when_serialized_then_template_keys_match() {
        let toml = Settings::default().to_toml().unwrap();
        for key in ["base_dir", "default_department", "expand_by_default", "strict_manager_refs"] {
            assert!(toml.contains(key), "missing {key}");
            assert!(Settings::template().contains(key));
        }
    }
}
