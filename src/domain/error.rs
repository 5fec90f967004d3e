//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violated preconditions on directory data.
/// Lenient manager references are not errors; see `HierarchyDiagnostic`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate employee id: {0}")]
    DuplicateEmployeeId(String),

    #[error("unknown employee: {0}")]
    UnknownEmployee(String),

    #[error("invalid employee record{}: {message}", .id.as_ref().map(|i| format!(" {i}")).unwrap_or_default())]
    InvalidRecord { id: Option<String>, message: String },

    #[error("hierarchy has {count} unresolved manager reference(s), first: {first}")]
    StrictHierarchy { count: usize, first: String },
}
