//! Tests for DirectoryService

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use orgchart::application::services::DirectoryService;
use orgchart::application::ApplicationError;
use orgchart::domain::{DepartmentSelection, DomainError, EmployeeRecord, Role};
use orgchart::infrastructure::traits::RealFileSystem;
use orgchart::util::testing::{init_test_setup, sample_directory, write_snapshot};

fn service(strict: bool) -> DirectoryService {
    init_test_setup();
    DirectoryService::new(Arc::new(RealFileSystem), strict)
}

#[test]
fn given_wrapped_export_when_loading_then_returns_employees() {
    let temp = TempDir::new().unwrap();
    let path = write_snapshot(temp.path(), "snapshot.json", &sample_directory());

    let employees = service(false).load_snapshot(&path).unwrap();

    assert_eq!(employees, sample_directory());
}

#[test]
fn given_bare_array_with_optional_fields_missing_when_loading_then_defaults_apply() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bare.json");
    std::fs::write(
        &path,
        r#"[
  {"id": "a", "name": "Ann", "role": "admin", "email": "ann@example.com"},
  {"id": "b", "name": "Ben", "department": "Ops", "role": "employee", "managerId": "a"}
]"#,
    )
    .unwrap();

    let employees = service(false).load_snapshot(&path).unwrap();

    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0].department, "");
    assert_eq!(employees[0].email.as_deref(), Some("ann@example.com"));
    assert_eq!(employees[1].manager_ref(), Some("a"));
}

#[test]
fn given_missing_file_when_loading_then_snapshot_not_found() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nope.json");

    let result = service(false).load_snapshot(&path);

    assert!(matches!(result, Err(ApplicationError::SnapshotNotFound(p)) if p == path));
}

#[test]
fn given_unknown_role_when_loading_then_snapshot_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.json");
    std::fs::write(&path, r#"[{"id": "a", "name": "Ann", "role": "ceo"}]"#).unwrap();

    let result = service(false).load_snapshot(&path);

    assert!(matches!(result, Err(ApplicationError::Snapshot { .. })));
}

#[test]
fn given_object_without_employees_key_when_loading_then_snapshot_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("other.json");
    std::fs::write(&path, r#"{"staff": []}"#).unwrap();

    let err = service(false).load_snapshot(&path).unwrap_err();

    assert!(err.to_string().contains("missing 'employees' array"));
}

#[test]
fn given_snapshot_when_viewing_department_then_summary_covers_whole_directory() {
    let temp = TempDir::new().unwrap();
    let path = write_snapshot(temp.path(), "snapshot.json", &sample_directory());

    let view = service(false)
        .view(&path, &DepartmentSelection::from("Eng"))
        .unwrap();

    assert_eq!(view.forest.len(), 3);
    assert_eq!(view.summary.total, 4);
    assert_eq!(view.selection, DepartmentSelection::Exact("Eng".into()));
}

#[test]
fn given_dangling_manager_when_lenient_then_root_with_diagnostic() {
    let employees = vec![
        EmployeeRecord::new("a", "Ann", "Ops", Role::Employee).with_manager("gone"),
    ];

    let forest = service(false)
        .hierarchy(&employees, &DepartmentSelection::All)
        .unwrap();

    assert_eq!(forest.roots().len(), 1);
    assert_eq!(forest.diagnostics().len(), 1);
}

/// Counts WARN events so tests can check what reaches the default log level.
struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[test]
fn given_lenient_roots_when_building_then_no_warn_logged_and_caller_reports() {
    let warnings = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));
    let employees = vec![
        EmployeeRecord::new("a", "Ann", "Ops", Role::Employee).with_manager("gone"),
        EmployeeRecord::new("b", "Bea", "Ops", Role::Employee).with_manager("b"),
    ];
    let svc = DirectoryService::new(Arc::new(RealFileSystem), false);

    let forest = tracing::subscriber::with_default(subscriber, || {
        svc.hierarchy(&employees, &DepartmentSelection::All)
    })
    .unwrap();

    assert_eq!(forest.diagnostics().len(), 2);
    assert_eq!(warnings.load(Ordering::SeqCst), 0);
}

#[test]
fn given_dangling_manager_when_strict_then_error() {
    let employees = vec![
        EmployeeRecord::new("a", "Ann", "Ops", Role::Employee).with_manager("gone"),
        EmployeeRecord::new("b", "Bea", "Ops", Role::Employee).with_manager("b"),
    ];

    let result = service(true).hierarchy(&employees, &DepartmentSelection::All);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::StrictHierarchy { count: 2, .. }))
    ));
}

#[test]
fn given_snapshot_when_listing_departments_then_sorted_and_distinct() {
    let temp = TempDir::new().unwrap();
    let path = write_snapshot(temp.path(), "snapshot.json", &sample_directory());

    let departments = service(false).departments(&path).unwrap();

    assert_eq!(departments, vec!["Eng".to_string(), "Sales".to_string()]);
}

#[test]
fn given_snapshot_when_summarizing_then_counts_roles() {
    let temp = TempDir::new().unwrap();
    let path = write_snapshot(temp.path(), "snapshot.json", &sample_directory());

    let summary = service(false).summary(&path).unwrap();

    assert_eq!(summary.total, 4);
    assert_eq!(summary.admins, 1);
    assert_eq!(summary.managers, 1);
    assert_eq!(summary.employees, 2);
    assert_eq!(summary.departments, 2);
}
