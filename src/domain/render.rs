//! Rendering walk over a forest, honouring expansion state.
//!
//! The forest is already in sibling order; nothing here re-sorts.

use serde::Serialize;
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::Role;
use crate::domain::expansion::ExpansionState;
use crate::domain::forest::{Forest, HierarchyNode};

/// One line of the collapsible tree view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRow {
    pub depth: usize,
    pub id: String,
    pub name: String,
    pub role: Role,
    pub department: String,
    pub has_children: bool,
    pub expanded: bool,
}

impl VisibleRow {
    fn from_node(depth: usize, node: &HierarchyNode, expansion: &ExpansionState) -> Self {
        Self {
            depth,
            id: node.record.id.clone(),
            name: node.record.name.clone(),
            role: node.record.role,
            department: node.record.department.clone(),
            has_children: !node.is_leaf(),
            expanded: expansion.is_expanded(&node.record.id),
        }
    }

    /// Marker shown before the name: `-` expanded, `+` collapsed, blank for leaves.
    pub fn marker(&self) -> char {
        match (self.has_children, self.expanded) {
            (false, _) => ' ',
            (true, true) => '-',
            (true, false) => '+',
        }
    }
}

/// Rows a depth-first renderer would draw.
///
/// Children are emitted only below nodes whose id is expanded.
#[instrument(level = "debug", skip_all)]
pub fn visible_rows(forest: &Forest, expansion: &ExpansionState) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<(usize, &HierarchyNode)> = forest.roots().iter().rev().map(|r| (0, r)).collect();
    while let Some((depth, node)) = stack.pop() {
        let row = VisibleRow::from_node(depth, node, expansion);
        if row.expanded {
            for child in node.children.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        rows.push(row);
    }
    rows
}

pub trait TreeRender {
    fn to_tree_string(&self, expansion: &ExpansionState) -> Tree<String>;
}

fn node_label(node: &HierarchyNode, expansion: &ExpansionState) -> String {
    let record = &node.record;
    let mut label = format!("{} ({}", record.name, record.role);
    if !record.department.is_empty() {
        label.push_str(", ");
        label.push_str(&record.department);
    }
    label.push(')');
    if !node.is_leaf() {
        label.push_str(if expansion.is_expanded(&record.id) {
            " [-]"
        } else {
            " [+]"
        });
    }
    label
}

impl TreeRender for HierarchyNode {
    fn to_tree_string(&self, expansion: &ExpansionState) -> Tree<String> {
        let root = Tree::new(node_label(self, expansion));
        if !expansion.is_expanded(&self.record.id) {
            return root;
        }
        let leaves: Vec<_> = self
            .children
            .iter()
            .map(|c| c.to_tree_string(expansion))
            .collect();
        root.with_leaves(leaves)
    }
}

/// Render every tree of the forest, one after another.
pub fn render_tree(forest: &Forest, expansion: &ExpansionState) -> String {
    forest
        .roots()
        .iter()
        .map(|root| root.to_tree_string(expansion).to_string())
        .collect::<Vec<_>>()
        .concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::build_hierarchy;
    use crate::domain::entities::{DepartmentSelection, EmployeeRecord};

    fn forest() -> Forest {
        let employees = vec![
            EmployeeRecord::new("a", "Alice", "Eng", Role::Admin),
            EmployeeRecord::new("b", "Bob", "Eng", Role::Manager).with_manager("a"),
            EmployeeRecord::new("c", "Carol", "Eng", Role::Employee).with_manager("b"),
            EmployeeRecord::new("d", "Dave", "Eng", Role::Employee).with_manager("a"),
        ];
        build_hierarchy(&employees, &DepartmentSelection::All).unwrap()
    }

    #[test]
    fn given_collapsed_state_when_listing_rows_then_only_roots() {
        let rows = visible_rows(&forest(), &ExpansionState::all_collapsed());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "a");
        assert_eq!(rows[0].marker(), '+');
    }

    #[test]
    fn given_root_expanded_when_listing_rows_then_direct_reports_in_order() {
        let rows = visible_rows(&forest(), &ExpansionState::all_expanded(["a"]));
        let ids: Vec<_> = rows.iter().map(|r| (r.depth, r.id.as_str())).collect();
        assert_eq!(ids, vec![(0, "a"), (1, "b"), (1, "d")]);
    }

    #[test]
    fn given_all_expanded_when_listing_rows_then_depth_first() {
        let f = forest();
        let rows = visible_rows(&f, &ExpansionState::all_expanded(f.all_ids()));
        let ids: Vec<_> = rows.iter().map(|r| (r.depth, r.id.as_str())).collect();
        assert_eq!(ids, vec![(0, "a"), (1, "b"), (2, "c"), (1, "d")]);
        assert_eq!(rows[2].marker(), ' ');
    }

    #[test]
    fn given_collapsed_child_when_rendering_then_marks_it() {
        let text = render_tree(&forest(), &ExpansionState::all_expanded(["a"]));
        assert!(text.contains("Alice (admin, Eng) [-]"));
        assert!(text.contains("Bob (manager, Eng) [+]"));
        assert!(!text.contains("Carol"));
    }
}
