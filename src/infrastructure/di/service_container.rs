//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{DirectoryService, ExpansionService, MigrationService};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub directory: Arc<DirectoryService>,
    pub expansion: ExpansionService,
    pub migration: MigrationService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let directory = Arc::new(DirectoryService::new(
            fs.clone(),
            settings.strict_manager_refs,
        ));
        let expansion = ExpansionService::new(
            fs.clone(),
            settings.state_file(),
            settings.expand_by_default,
        );
        let migration = MigrationService::new(fs.clone(), directory.clone());

        Self {
            settings,
            fs,
            directory,
            expansion,
            migration,
        }
    }
}
