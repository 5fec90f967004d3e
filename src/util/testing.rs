use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{EmployeeRecord, Role};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let noisy_modules = ["config::"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Small mixed-department directory.
///
/// ```text
/// Alice (admin, Eng)
/// ├── Bob (manager, Eng)
/// │   └── Dave (employee, Eng)
/// └── Carol (employee, Sales)
/// ```
pub fn sample_directory() -> Vec<EmployeeRecord> {
    vec![
        EmployeeRecord::new("e1", "Alice", "Eng", Role::Admin).with_uid("uid-alice"),
        EmployeeRecord::new("e2", "Bob", "Eng", Role::Manager)
            .with_manager("e1")
            .with_uid("uid-bob"),
        EmployeeRecord::new("e3", "Carol", "Sales", Role::Employee).with_manager("e1"),
        EmployeeRecord::new("e4", "Dave", "Eng", Role::Employee)
            .with_manager("e2")
            .with_uid("uid-dave"),
    ]
}

/// Write `employees` as a `{"employees": [...]}` export under `dir`.
pub fn write_snapshot(dir: &Path, name: &str, employees: &[EmployeeRecord]) -> PathBuf {
    let path = dir.join(name);
    let json = serde_json::json!({ "employees": employees });
    fs::write(&path, json.to_string()).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
    path
}
