//! Domain entities: core data structures

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::collate::collate_names;
use crate::domain::error::DomainError;

/// Access role of an employee.
///
/// The declaration order is the sibling ordering priority: admins first,
/// then managers, then employees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::Employee];

    /// Ordinal priority used for sibling ordering (admin=0, manager=1, employee=2).
    pub fn priority(self) -> u8 {
        match self {
            Role::Admin => 0,
            Role::Manager => 1,
            Role::Employee => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "employee" => Ok(Role::Employee),
            other => Err(DomainError::InvalidRecord {
                id: None,
                message: format!("unknown role '{other}'"),
            }),
        }
    }
}

/// One employee as exported from the directory.
///
/// Keys are camelCase on the wire to match the document store export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub department: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Authentication UID, once the employee has signed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl EmployeeRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            department: department.into(),
            role,
            manager_id: None,
            email: None,
            position: None,
            uid: None,
        }
    }

    pub fn with_manager(mut self, manager_id: impl Into<String>) -> Self {
        self.manager_id = Some(manager_id.into());
        self
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Manager reference, with empty strings treated as unset.
    pub fn manager_ref(&self) -> Option<&str> {
        self.manager_id.as_deref().filter(|m| !m.is_empty())
    }

    /// Sibling ordering: role priority, then name, then id.
    pub fn sibling_cmp(&self, other: &Self) -> Ordering {
        self.role
            .priority()
            .cmp(&other.role.priority())
            .then_with(|| collate_names(&self.name, &other.name))
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Check record-level invariants (non-empty id and name).
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidRecord {
                id: None,
                message: format!("employee '{}' has an empty id", self.name),
            });
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidRecord {
                id: Some(self.id.clone()),
                message: "empty name".to_string(),
            });
        }
        Ok(())
    }
}

/// Department filter value: the "all" sentinel or an exact department.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DepartmentSelection {
    #[default]
    All,
    Exact(String),
}

impl DepartmentSelection {
    pub const ALL_SENTINEL: &'static str = "all";

    pub fn matches(&self, department: &str) -> bool {
        match self {
            DepartmentSelection::All => true,
            DepartmentSelection::Exact(d) => d == department,
        }
    }
}

impl From<&str> for DepartmentSelection {
    fn from(value: &str) -> Self {
        if value == Self::ALL_SENTINEL {
            DepartmentSelection::All
        } else {
            DepartmentSelection::Exact(value.to_string())
        }
    }
}

impl From<Option<&str>> for DepartmentSelection {
    fn from(value: Option<&str>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }
}

impl fmt::Display for DepartmentSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepartmentSelection::All => f.write_str(Self::ALL_SENTINEL),
            DepartmentSelection::Exact(d) => f.write_str(d),
        }
    }
}

/// A task or notification whose owner reference may need re-keying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedRecord {
    pub id: String,
    /// Source collection, e.g. "tasks" or "notifications".
    pub collection: String,
    pub owner_id: String,
}
