//! Frozen hierarchy output: nodes, forest and diagnostics.

use std::fmt;

use serde::Serialize;

use crate::domain::entities::EmployeeRecord;

/// An employee together with their direct reports, in sibling order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
    #[serde(flatten)]
    pub record: EmployeeRecord,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Why a record ended up as a root despite naming a manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HierarchyDiagnostic {
    /// Manager unknown, or outside the current department filter.
    #[serde(rename_all = "camelCase")]
    DanglingManager { id: String, manager_id: String },
    /// Record names itself as manager.
    SelfManaged { id: String },
    /// Record's manager chain leads back to itself.
    #[serde(rename_all = "camelCase")]
    CycleMember { id: String, manager_id: String },
}

impl HierarchyDiagnostic {
    pub fn id(&self) -> &str {
        match self {
            HierarchyDiagnostic::DanglingManager { id, .. }
            | HierarchyDiagnostic::SelfManaged { id }
            | HierarchyDiagnostic::CycleMember { id, .. } => id,
        }
    }
}

impl fmt::Display for HierarchyDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HierarchyDiagnostic::DanglingManager { id, manager_id } => {
                write!(f, "{id}: manager '{manager_id}' not in scope")
            }
            HierarchyDiagnostic::SelfManaged { id } => write!(f, "{id}: manages itself"),
            HierarchyDiagnostic::CycleMember { id, manager_id } => {
                write!(f, "{id}: manager '{manager_id}' closes a reporting cycle")
            }
        }
    }
}

/// Ordered roots of one hierarchy build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Forest {
    roots: Vec<HierarchyNode>,
    diagnostics: Vec<HierarchyDiagnostic>,
}

impl Forest {
    pub(crate) fn new(roots: Vec<HierarchyNode>, diagnostics: Vec<HierarchyDiagnostic>) -> Self {
        Self { roots, diagnostics }
    }

    pub fn roots(&self) -> &[HierarchyNode] {
        &self.roots
    }

    pub fn diagnostics(&self) -> &[HierarchyDiagnostic] {
        &self.diagnostics
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Ids of every node, depth-first pre-order.
    pub fn all_ids(&self) -> Vec<String> {
        self.iter().map(|(_, n)| n.record.id.clone()).collect()
    }

    pub fn find(&self, id: &str) -> Option<&HierarchyNode> {
        self.iter().map(|(_, n)| n).find(|n| n.record.id == id)
    }

    /// Number of levels in the deepest tree, 0 for an empty forest.
    pub fn depth(&self) -> usize {
        self.iter().map(|(d, _)| d + 1).max().unwrap_or(0)
    }

    /// Depth-first pre-order walk yielding `(depth, node)`, roots at depth 0.
    pub fn iter(&self) -> ForestIterator<'_> {
        ForestIterator::new(&self.roots)
    }
}

pub struct ForestIterator<'a> {
    stack: Vec<(usize, &'a HierarchyNode)>,
}

impl<'a> ForestIterator<'a> {
    fn new(roots: &'a [HierarchyNode]) -> Self {
        Self {
            stack: roots.iter().rev().map(|r| (0, r)).collect(),
        }
    }
}

impl<'a> Iterator for ForestIterator<'a> {
    type Item = (usize, &'a HierarchyNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}
