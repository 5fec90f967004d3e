//! Employee directory service
//!
//! Loads exported snapshots and builds hierarchy views from them.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::error_ext::{IoResultExt, JsonResultExt};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    build_hierarchy, departments, DepartmentSelection, DirectorySummary, DomainError,
    EmployeeRecord, Forest, OwnedRecord,
};
use crate::infrastructure::traits::FileSystem;

/// Everything the tree view needs for one render pass.
#[derive(Debug, Clone)]
pub struct DirectoryView {
    pub selection: DepartmentSelection,
    pub forest: Forest,
    /// Counts over the unfiltered snapshot.
    pub summary: DirectorySummary,
}

/// Service for loading snapshots and building hierarchies.
pub struct DirectoryService {
    fs: Arc<dyn FileSystem>,
    strict_manager_refs: bool,
}

impl DirectoryService {
    pub fn new(fs: Arc<dyn FileSystem>, strict_manager_refs: bool) -> Self {
        Self {
            fs,
            strict_manager_refs,
        }
    }

    /// Load employees from a JSON export.
    ///
    /// Accepts a bare array or an object with an `employees` array.
    #[instrument(level = "debug", skip(self))]
    pub fn load_snapshot(&self, path: &Path) -> ApplicationResult<Vec<EmployeeRecord>> {
        let employees: Vec<EmployeeRecord> = self.load_collection(path, "employees")?;
        debug!("load_snapshot: {} employees", employees.len());
        Ok(employees)
    }

    /// Load task/notification owner records from a JSON export.
    #[instrument(level = "debug", skip(self))]
    pub fn load_owned_records(&self, path: &Path) -> ApplicationResult<Vec<OwnedRecord>> {
        let records: Vec<OwnedRecord> = self.load_collection(path, "records")?;
        debug!("load_owned_records: {} records", records.len());
        Ok(records)
    }

    fn load_collection<T: DeserializeOwned>(&self, path: &Path, key: &str) -> ApplicationResult<Vec<T>> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::SnapshotNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read snapshot", path)?;
        let value: Value = serde_json::from_str(&content).with_snapshot_context(path)?;
        let items = match value {
            Value::Array(_) => value,
            Value::Object(mut map) => map.remove(key).ok_or_else(|| ApplicationError::Snapshot {
                path: path.to_path_buf(),
                message: format!("missing '{key}' array"),
            })?,
            _ => {
                return Err(ApplicationError::Snapshot {
                    path: path.to_path_buf(),
                    message: format!("expected an array or an object with '{key}'"),
                })
            }
        };
        serde_json::from_value(items).with_snapshot_context(path)
    }

    /// Build the forest for one department selection.
    ///
    /// In strict mode any lenient root (dangling, self or cyclic manager)
    /// is an error.
    pub fn hierarchy(
        &self,
        snapshot: &[EmployeeRecord],
        selection: &DepartmentSelection,
    ) -> ApplicationResult<Forest> {
        let forest = build_hierarchy(snapshot, selection)?;
        for diagnostic in forest.diagnostics() {
            debug!("hierarchy: {}", diagnostic);
        }
        if self.strict_manager_refs {
            if let Some(first) = forest.diagnostics().first() {
                return Err(DomainError::StrictHierarchy {
                    count: forest.diagnostics().len(),
                    first: first.to_string(),
                }
                .into());
            }
        }
        Ok(forest)
    }

    /// Load a snapshot and build the view for `selection`.
    #[instrument(level = "debug", skip(self))]
    pub fn view(&self, path: &Path, selection: &DepartmentSelection) -> ApplicationResult<DirectoryView> {
        let snapshot = self.load_snapshot(path)?;
        let forest = self.hierarchy(&snapshot, selection)?;
        Ok(DirectoryView {
            selection: selection.clone(),
            forest,
            summary: DirectorySummary::from_snapshot(&snapshot),
        })
    }

    pub fn summary(&self, path: &Path) -> ApplicationResult<DirectorySummary> {
        let snapshot = self.load_snapshot(path)?;
        Ok(DirectorySummary::from_snapshot(&snapshot))
    }

    pub fn departments(&self, path: &Path) -> ApplicationResult<Vec<String>> {
        let snapshot = self.load_snapshot(path)?;
        Ok(departments(&snapshot))
    }
}
