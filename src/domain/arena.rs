use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::EmployeeRecord;
use crate::domain::forest::HierarchyNode;

/// Node in the build-time arena.
#[derive(Debug)]
pub(crate) struct ArenaNode {
    pub record: EmployeeRecord,
    /// Index of the manager node, None for roots
    pub parent: Option<Index>,
    pub children: Vec<Index>,
}

/// Arena holding one hierarchy while it is being assembled.
///
/// Nodes reference each other by generational index, so parent/child links
/// never alias owned data. Once linked and sorted the arena is consumed by
/// `freeze`, which hands out owned `HierarchyNode` trees. Nothing outside the
/// builder ever sees an arena.
#[derive(Debug, Default)]
pub(crate) struct HierarchyArena {
    arena: Arena<ArenaNode>,
    roots: Vec<Index>,
}

impl HierarchyArena {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            arena: Arena::with_capacity(n),
            roots: Vec::new(),
        }
    }

    pub fn insert(&mut self, record: EmployeeRecord) -> Index {
        self.arena.insert(ArenaNode {
            record,
            parent: None,
            children: Vec::new(),
        })
    }

    #[cfg(test)]
    pub fn get(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub fn mark_root(&mut self, idx: Index) {
        self.roots.push(idx);
    }

    /// Append `child` to `parent`'s children.
    ///
    /// A node is never used as its own container, and is claimed at most once.
    pub fn attach(&mut self, child: Index, parent: Index) {
        if child == parent {
            self.roots.push(child);
            return;
        }
        match self.arena.get_mut(child) {
            Some(node) if node.parent.is_none() => node.parent = Some(parent),
            _ => return,
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
    }

    /// Sort the root list and every node's children by sibling order.
    #[instrument(level = "trace", skip(self))]
    pub fn sort(&mut self) {
        let indices: Vec<Index> = self.arena.iter().map(|(idx, _)| idx).collect();
        for idx in indices {
            let mut children = match self.arena.get_mut(idx) {
                Some(node) if node.children.len() > 1 => std::mem::take(&mut node.children),
                _ => continue,
            };
            self.sort_indices(&mut children);
            if let Some(node) = self.arena.get_mut(idx) {
                node.children = children;
            }
        }
        let mut roots = std::mem::take(&mut self.roots);
        self.sort_indices(&mut roots);
        self.roots = roots;
    }

    fn sort_indices(&self, indices: &mut [Index]) {
        indices.sort_by(|a, b| match (self.arena.get(*a), self.arena.get(*b)) {
            (Some(a), Some(b)) => a.record.sibling_cmp(&b.record),
            _ => std::cmp::Ordering::Equal,
        });
    }

    /// Indices in post-order (children before parents, siblings in order).
    fn postorder(&self) -> Vec<Index> {
        let mut order = Vec::with_capacity(self.arena.len());
        let mut stack: Vec<(Index, bool)> = self.roots.iter().rev().map(|&r| (r, false)).collect();
        while let Some((idx, visited)) = stack.pop() {
            if visited {
                order.push(idx);
                continue;
            }
            if let Some(node) = self.arena.get(idx) {
                stack.push((idx, true));
                for &child in node.children.iter().rev() {
                    stack.push((child, false));
                }
            }
        }
        order
    }

    /// Consume the arena into owned trees, one per root, in root order.
    ///
    /// Iterative so that long reporting chains cannot exhaust the stack.
    #[instrument(level = "trace", skip(self))]
    pub fn freeze(mut self) -> Vec<HierarchyNode> {
        let mut built: HashMap<Index, HierarchyNode> = HashMap::with_capacity(self.arena.len());
        for idx in self.postorder() {
            if let Some(node) = self.arena.remove(idx) {
                let children = node
                    .children
                    .iter()
                    .filter_map(|c| built.remove(c))
                    .collect();
                built.insert(
                    idx,
                    HierarchyNode {
                        record: node.record,
                        children,
                    },
                );
            }
        }
        self.roots
            .iter()
            .filter_map(|r| built.remove(r))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;

    #[test]
    fn given_linked_nodes_when_frozen_then_children_are_sorted() {
        let mut arena = HierarchyArena::default();
        let boss = arena.insert(EmployeeRecord::new("a", "Alice", "Eng", Role::Admin));
        let e = arena.insert(EmployeeRecord::new("d", "Dave", "Eng", Role::Employee));
        let m = arena.insert(EmployeeRecord::new("b", "Bob", "Eng", Role::Manager));
        arena.mark_root(boss);
        arena.attach(e, boss);
        arena.attach(m, boss);
        arena.sort();

        let roots = arena.freeze();
        assert_eq!(roots.len(), 1);
        let names: Vec<_> = roots[0].children.iter().map(|c| c.record.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Dave"]);
    }

    #[test]
    fn given_self_attach_when_linking_then_node_becomes_root() {
        let mut arena = HierarchyArena::default();
        let x = arena.insert(EmployeeRecord::new("x", "Xena", "Ops", Role::Manager));
        arena.attach(x, x);
        assert!(arena.get(x).map(|n| n.children.is_empty()).unwrap_or(false));
        let roots = arena.freeze();
        assert_eq!(roots.len(), 1);
        assert!(roots[0].children.is_empty());
    }

    #[test]
    fn given_deep_chain_when_frozen_then_does_not_recurse() {
        let mut arena = HierarchyArena::default();
        let mut prev = arena.insert(EmployeeRecord::new("0", "n0", "Eng", Role::Employee));
        arena.mark_root(prev);
        for i in 1..2_000 {
            let idx = arena.insert(EmployeeRecord::new(i.to_string(), format!("n{i}"), "Eng", Role::Employee));
            arena.attach(idx, prev);
            prev = idx;
        }
        let roots = arena.freeze();
        assert_eq!(roots.len(), 1);
        let mut depth = 1;
        let mut cur = &roots[0];
        while let Some(next) = cur.children.first() {
            depth += 1;
            cur = next;
        }
        assert_eq!(depth, 2_000);
    }
}
