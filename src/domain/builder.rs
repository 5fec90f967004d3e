//! Hierarchy builder: turns a flat employee snapshot into a reporting forest.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::arena::HierarchyArena;
use crate::domain::entities::{DepartmentSelection, EmployeeRecord};
use crate::domain::error::DomainError;
use crate::domain::filter::filter_by_department;
use crate::domain::forest::{Forest, HierarchyDiagnostic};

/// Result type for hierarchy operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Build the forest for `employees` restricted to `selection`.
pub fn build_hierarchy(
    employees: &[EmployeeRecord],
    selection: &DepartmentSelection,
) -> TreeResult<Forest> {
    HierarchyBuilder::new()
        .with_department(selection.clone())
        .build(employees)
}

/// Constructs reporting hierarchies from employee records.
///
/// Each call builds from scratch; the builder holds only the filter.
#[derive(Debug, Clone, Default)]
pub struct HierarchyBuilder {
    selection: DepartmentSelection,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_department(mut self, selection: DepartmentSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Build the forest.
    ///
    /// Roots are records without a manager, with a manager outside the
    /// filtered set, managing themselves, or sitting on a reporting cycle.
    /// Every filtered record appears exactly once.
    ///
    /// # Errors
    /// * `DuplicateEmployeeId` if two filtered records share an id.
    /// * `InvalidRecord` if a record has an empty id or name.
    #[instrument(level = "debug", skip(self, employees), fields(selection = %self.selection, input = employees.len()))]
    pub fn build(&self, employees: &[EmployeeRecord]) -> TreeResult<Forest> {
        let filtered = filter_by_department(employees, &self.selection);
        debug!("build: {} records after filter", filtered.len());

        let mut lookup: HashMap<&str, usize> = HashMap::with_capacity(filtered.len());
        for (pos, record) in filtered.iter().enumerate() {
            record.validate()?;
            if lookup.insert(record.id.as_str(), pos).is_some() {
                return Err(DomainError::DuplicateEmployeeId(record.id.clone()));
            }
        }

        let mut diagnostics = Vec::new();
        let mut parent_of: Vec<Option<usize>> = Vec::with_capacity(filtered.len());
        for (pos, record) in filtered.iter().enumerate() {
            let parent = match record.manager_ref() {
                None => None,
                Some(manager) => match lookup.get(manager) {
                    Some(&p) if p == pos => {
                        diagnostics.push(HierarchyDiagnostic::SelfManaged {
                            id: record.id.clone(),
                        });
                        None
                    }
                    Some(&p) => Some(p),
                    None => {
                        diagnostics.push(HierarchyDiagnostic::DanglingManager {
                            id: record.id.clone(),
                            manager_id: manager.to_string(),
                        });
                        None
                    }
                },
            };
            parent_of.push(parent);
        }

        let on_cycle = find_cycle_members(&parent_of);

        let mut arena = HierarchyArena::with_capacity(filtered.len());
        let indices: Vec<_> = filtered.iter().map(|r| arena.insert(r.clone())).collect();

        for (pos, record) in filtered.iter().enumerate() {
            match parent_of[pos] {
                Some(manager_pos) if on_cycle[pos] => {
                    diagnostics.push(HierarchyDiagnostic::CycleMember {
                        id: record.id.clone(),
                        manager_id: filtered[manager_pos].id.clone(),
                    });
                    arena.mark_root(indices[pos]);
                }
                Some(manager_pos) => arena.attach(indices[pos], indices[manager_pos]),
                None => arena.mark_root(indices[pos]),
            }
        }

        arena.sort();
        let roots = arena.freeze();
        debug!(
            "build: {} roots, {} diagnostics",
            roots.len(),
            diagnostics.len()
        );
        Ok(Forest::new(roots, diagnostics))
    }
}

/// Mark every position whose parent chain returns to itself.
///
/// `parent_of` is a functional graph (at most one parent each), so each walk
/// either ends at a root, joins an already finished walk, or closes a loop on
/// the current path. Linear in the number of records.
fn find_cycle_members(parent_of: &[Option<usize>]) -> Vec<bool> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; parent_of.len()];
    let mut on_cycle = vec![false; parent_of.len()];
    let mut path = Vec::new();

    for start in 0..parent_of.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        path.clear();
        let mut current = Some(start);
        while let Some(pos) = current {
            match marks[pos] {
                Mark::Unvisited => {
                    marks[pos] = Mark::OnPath;
                    path.push(pos);
                    current = parent_of[pos];
                }
                Mark::OnPath => {
                    if let Some(from) = path.iter().position(|&p| p == pos) {
                        for &member in &path[from..] {
                            on_cycle[member] = true;
                        }
                    }
                    break;
                }
                Mark::Done => break,
            }
        }
        for &pos in &path {
            marks[pos] = Mark::Done;
        }
    }
    on_cycle
}
