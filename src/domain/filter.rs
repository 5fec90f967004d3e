//! Department filter over an employee snapshot.

use itertools::Itertools;

use crate::domain::entities::{DepartmentSelection, EmployeeRecord};

/// Records whose department equals the selection, in input order.
///
/// `DepartmentSelection::All` returns the snapshot unchanged.
pub fn filter_by_department(
    employees: &[EmployeeRecord],
    selection: &DepartmentSelection,
) -> Vec<EmployeeRecord> {
    employees
        .iter()
        .filter(|e| selection.matches(&e.department))
        .cloned()
        .collect()
}

/// Sorted distinct department names present in the snapshot.
pub fn departments(employees: &[EmployeeRecord]) -> Vec<String> {
    employees
        .iter()
        .map(|e| e.department.as_str())
        .filter(|d| !d.is_empty())
        .unique()
        .sorted()
        .map(str::to_string)
        .collect()
}
