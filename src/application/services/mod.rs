//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem)
//! but are themselves concrete structs, not traits.

mod directory;
mod expansion;
mod migration;

pub use directory::{DirectoryService, DirectoryView};
pub use expansion::ExpansionService;
pub use migration::MigrationService;
