//! orgchart: org hierarchy builder for employee directory snapshots.
//!
//! Layers, innermost first:
//! - `domain`: records, department filter, hierarchy builder, expansion state
//! - `application`: snapshot loading, persisted state, re-key migration
//! - `infrastructure`: filesystem boundary and service wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{
    build_hierarchy, filter_by_department, DepartmentSelection, EmployeeRecord, ExpansionState,
    Forest, HierarchyNode, Role,
};
