//! Domain layer: entities and hierarchy logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub(crate) mod arena;
pub mod builder;
pub mod collate;
pub mod entities;
pub mod error;
pub mod expansion;
pub mod filter;
pub mod forest;
pub mod rekey;
pub mod render;
pub mod summary;

pub use builder::{build_hierarchy, HierarchyBuilder, TreeResult};
pub use collate::collate_names;
pub use entities::*;
pub use error::DomainError;
pub use expansion::{ExpansionState, SharedExpansionState};
pub use filter::{departments, filter_by_department};
pub use forest::{Forest, HierarchyDiagnostic, HierarchyNode};
pub use rekey::{apply_plan, plan_owner_rekey, Rekey, RekeyPlan};
pub use render::{render_tree, visible_rows, TreeRender, VisibleRow};
pub use summary::DirectorySummary;
