//! Expand/collapse state of the tree view.
//!
//! Keyed by employee id, never by node identity, so the state survives a
//! rebuild of the forest.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

/// Set of employee ids whose children are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionState {
    #[serde(default)]
    expanded: BTreeSet<String>,
}

impl ExpansionState {
    pub fn all_collapsed() -> Self {
        Self::default()
    }

    pub fn all_expanded<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expanded: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Flip membership of `id`. Returns the new expanded flag.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    /// Replace the set with exactly `ids`.
    pub fn expand_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expanded = ids.into_iter().map(Into::into).collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Drop ids for which `known` returns false; returns how many were dropped.
    pub fn retain_known(&mut self, known: impl Fn(&str) -> bool) -> usize {
        let before = self.expanded.len();
        self.expanded.retain(|id| known(id));
        before - self.expanded.len()
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }
}

/// Expansion state shared between threads.
///
/// Mutations are read-modify-write, so every operation takes the lock.
#[derive(Debug, Clone, Default)]
pub struct SharedExpansionState {
    inner: Arc<Mutex<ExpansionState>>,
}

impl SharedExpansionState {
    pub fn new(state: ExpansionState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    // A poisoned lock still holds a consistent set: every mutation is a
    // single set operation.
    fn lock(&self) -> MutexGuard<'_, ExpansionState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn toggle(&self, id: &str) -> bool {
        self.lock().toggle(id)
    }

    pub fn expand_all<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().expand_all(ids)
    }

    pub fn collapse_all(&self) {
        self.lock().collapse_all()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.lock().is_expanded(id)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ExpansionState {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_collapsed_when_toggled_twice_then_collapsed_again() {
        let mut state = ExpansionState::all_collapsed();
        assert!(state.toggle("e7"));
        assert!(state.is_expanded("e7"));
        assert!(!state.toggle("e7"));
        assert!(!state.is_expanded("e7"));
    }

    #[test]
    fn given_expanded_set_when_expand_all_then_replaced_exactly() {
        let mut state = ExpansionState::all_expanded(["a", "b"]);
        state.expand_all(["c"]);
        assert!(!state.is_expanded("a"));
        assert!(state.is_expanded("c"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn given_expanded_set_when_collapse_all_then_empty() {
        let mut state = ExpansionState::all_expanded(["a", "b"]);
        state.collapse_all();
        assert!(state.is_empty());
    }

    #[test]
    fn given_unknown_ids_when_retain_known_then_dropped() {
        let mut state = ExpansionState::all_expanded(["a", "gone"]);
        let dropped = state.retain_known(|id| id == "a");
        assert_eq!(dropped, 1);
        assert_eq!(state.iter().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn given_shared_state_when_toggled_from_threads_then_all_applied() {
        let shared = SharedExpansionState::default();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let s = shared.clone();
                std::thread::spawn(move || {
                    s.toggle(&format!("e{i}"));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(shared.snapshot().len(), 8);
        assert!(shared.is_expanded("e3"));
    }
}
