// Plantuner: planner-time index visibility overrides

pub mod catalog;
pub mod common;
pub mod config;
pub mod query;
pub mod tuner;

// Re-export key items for convenient access
pub use catalog::{Catalog, CatalogAccess, CatalogError, NameResolver, RelationStats};
pub use common::types::{ObjectId, RelKind, INVALID_OBJECT_ID};
pub use config::{SettingError, SettingsRegistry, TunerConfig};
pub use query::planner::{get_relation_info, HookChain, PlanError, RelOptInfo, RelationInfoHook};
pub use tuner::{IndexFilter, PlanTuner, ReferenceSet};
