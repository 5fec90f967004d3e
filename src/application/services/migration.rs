//! Owner re-key migration service.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::error_ext::{IoResultExt, JsonResultExt};
use crate::application::services::DirectoryService;
use crate::application::ApplicationResult;
use crate::domain::{apply_plan, plan_owner_rekey, OwnedRecord, RekeyPlan};
use crate::infrastructure::traits::FileSystem;

pub struct MigrationService {
    fs: Arc<dyn FileSystem>,
    directory: Arc<DirectoryService>,
}

impl MigrationService {
    pub fn new(fs: Arc<dyn FileSystem>, directory: Arc<DirectoryService>) -> Self {
        Self { fs, directory }
    }

    /// Plan the re-key for `records` against the employees in `snapshot`.
    #[instrument(level = "debug", skip(self))]
    pub fn plan(
        &self,
        snapshot: &Path,
        records: &Path,
    ) -> ApplicationResult<(RekeyPlan, Vec<OwnedRecord>)> {
        let employees = self.directory.load_snapshot(snapshot)?;
        let owned = self.directory.load_owned_records(records)?;
        let plan = plan_owner_rekey(&employees, &owned);
        info!(
            "plan: {} to re-key, {} already migrated, {} unresolved",
            plan.rekeys.len(),
            plan.already_migrated,
            plan.unresolved.len()
        );
        Ok((plan, owned))
    }

    /// Apply the plan and write the updated records to `output`.
    pub fn apply(
        &self,
        snapshot: &Path,
        records: &Path,
        output: &Path,
    ) -> ApplicationResult<RekeyPlan> {
        let (plan, owned) = self.plan(snapshot, records)?;
        let migrated = apply_plan(&owned, &plan);
        let json = serde_json::to_string_pretty(&migrated).with_snapshot_context(output)?;
        self.fs
            .write_atomic(output, &json)
            .with_path_context("write migrated records", output)?;
        Ok(plan)
    }
}
