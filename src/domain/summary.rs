//! Directory-wide counts.
//!
//! Always computed from the unfiltered snapshot so they do not move when the
//! department filter changes.

use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::domain::entities::{EmployeeRecord, Role};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectorySummary {
    pub total: usize,
    pub admins: usize,
    pub managers: usize,
    pub employees: usize,
    pub departments: usize,
}

impl DirectorySummary {
    pub fn from_snapshot(snapshot: &[EmployeeRecord]) -> Self {
        let by_role = snapshot.iter().map(|e| e.role).counts();
        let count = |role: Role| by_role.get(&role).copied().unwrap_or(0);
        Self {
            total: snapshot.len(),
            admins: count(Role::Admin),
            managers: count(Role::Manager),
            employees: count(Role::Employee),
            departments: snapshot
                .iter()
                .map(|e| e.department.as_str())
                .filter(|d| !d.is_empty())
                .unique()
                .count(),
        }
    }
}

impl fmt::Display for DirectorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total:       {}", self.total)?;
        writeln!(f, "admins:      {}", self.admins)?;
        writeln!(f, "managers:    {}", self.managers)?;
        writeln!(f, "employees:   {}", self.employees)?;
        write!(f, "departments: {}", self.departments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_snapshot_when_summarising_then_counts_roles_and_departments() {
        let snapshot = vec![
            EmployeeRecord::new("a", "Alice", "Eng", Role::Admin),
            EmployeeRecord::new("b", "Bob", "Eng", Role::Manager),
            EmployeeRecord::new("c", "Carol", "Sales", Role::Employee),
            EmployeeRecord::new("d", "Dave", "Sales", Role::Employee),
        ];
        let summary = DirectorySummary::from_snapshot(&snapshot);
        assert_eq!(
            summary,
            DirectorySummary {
                total: 4,
                admins: 1,
                managers: 1,
                employees: 2,
                departments: 2,
            }
        );
    }

    #[test]
    fn given_empty_snapshot_when_summarising_then_all_zero() {
        assert_eq!(DirectorySummary::from_snapshot(&[]), DirectorySummary::default());
    }
}
