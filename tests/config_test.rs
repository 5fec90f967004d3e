//! Integration tests for Settings config loading.
//!
//! These tests only write local `.orgchart.toml` files in temp directories;
//! a local layer overrides whatever the global layer set.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use orgchart::application::ApplicationError;
use orgchart::config::{local_config_path, Settings};
use orgchart::domain::DepartmentSelection;

#[test]
fn given_local_config_when_load_then_local_values_win() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        r#"
default_department = "Eng"
strict_manager_refs = true
expand_by_default = true
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(
        settings.default_selection(),
        DepartmentSelection::Exact("Eng".into())
    );
    assert!(settings.strict_manager_refs);
    assert!(settings.expand_by_default);
}

#[test]
fn given_local_state_file_with_home_var_when_load_then_expanded() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        r#"state_file = "$HOME/orgchart-state.json""#,
    )
    .unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    let home = std::env::var("HOME").expect("HOME should be set");
    assert_eq!(
        settings.state_file(),
        PathBuf::from(format!("{home}/orgchart-state.json"))
    );
}

#[test]
fn given_local_base_dir_without_state_file_when_load_then_state_under_base_dir() {
    let project = TempDir::new().unwrap();
    let base = project.path().join("state");
    fs::write(
        local_config_path(project.path()),
        format!("base_dir = {:?}\n", base.to_string_lossy()),
    )
    .unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(settings.state_file(), base.join("expansion.json"));
}

#[test]
fn given_malformed_local_config_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), "strict_manager_refs = \"maybe\"").unwrap();

    let result = Settings::load(Some(project.path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_template_when_parsed_then_yields_defaults() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), Settings::template()).unwrap();

    let from_template = Settings::load(Some(project.path())).expect("load settings");
    let baseline = Settings::load(None).expect("load settings");

    assert_eq!(from_template, baseline);
}
