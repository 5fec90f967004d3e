//! Persisted expansion state
//!
//! The tree view's expand/collapse set lives in a small JSON file so that it
//! survives rebuilds across CLI invocations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::error_ext::{IoResultExt, JsonResultExt};
use crate::application::ApplicationResult;
use crate::domain::{DomainError, ExpansionState, Forest};
use crate::infrastructure::traits::FileSystem;

pub struct ExpansionService {
    fs: Arc<dyn FileSystem>,
    state_file: PathBuf,
    expand_by_default: bool,
}

impl ExpansionService {
    pub fn new(fs: Arc<dyn FileSystem>, state_file: PathBuf, expand_by_default: bool) -> Self {
        Self {
            fs,
            state_file,
            expand_by_default,
        }
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Load the saved state, or the configured initial state if none is saved.
    #[instrument(level = "debug", skip(self, forest))]
    pub fn load(&self, forest: &Forest) -> ApplicationResult<ExpansionState> {
        if !self.fs.exists(&self.state_file) {
            debug!("load: no state file, expand_by_default={}", self.expand_by_default);
            return Ok(if self.expand_by_default {
                ExpansionState::all_expanded(forest.all_ids())
            } else {
                ExpansionState::all_collapsed()
            });
        }
        let content = self
            .fs
            .read_to_string(&self.state_file)
            .with_path_context("read expansion state", &self.state_file)?;
        serde_json::from_str(&content).with_snapshot_context(&self.state_file)
    }

    pub fn save(&self, state: &ExpansionState) -> ApplicationResult<()> {
        let json = serde_json::to_string_pretty(state).with_snapshot_context(&self.state_file)?;
        self.fs
            .write_atomic(&self.state_file, &json)
            .with_path_context("write expansion state", &self.state_file)?;
        debug!("save: {} expanded ids", state.len());
        Ok(())
    }

    /// Toggle each id; ids must exist in the forest.
    ///
    /// Returns the new expanded flag per id.
    pub fn toggle(&self, forest: &Forest, ids: &[String]) -> ApplicationResult<Vec<(String, bool)>> {
        if let Some(unknown) = ids.iter().find(|id| forest.find(id).is_none()) {
            return Err(DomainError::UnknownEmployee(unknown.clone()).into());
        }
        let mut state = self.load(forest)?;
        let flipped = ids
            .iter()
            .map(|id| (id.clone(), state.toggle(id)))
            .collect();
        self.save(&state)?;
        Ok(flipped)
    }

    /// Overwrite the saved state without reading it, so a corrupt file is reset.
    pub fn expand_all(&self, forest: &Forest) -> ApplicationResult<ExpansionState> {
        let state = ExpansionState::all_expanded(forest.all_ids());
        self.save(&state)?;
        Ok(state)
    }

    pub fn collapse_all(&self) -> ApplicationResult<()> {
        self.save(&ExpansionState::all_collapsed())
    }

    /// Forget ids that are no longer in the forest. Returns how many were dropped.
    pub fn prune(&self, forest: &Forest) -> ApplicationResult<usize> {
        let mut state = self.load(forest)?;
        let dropped = state.retain_known(|id| forest.find(id).is_some());
        if dropped > 0 {
            self.save(&state)?;
        }
        Ok(dropped)
    }
}
