// Query Planner Module
//
// This module holds the relation-level planning metadata and the hook chain
// through which extensions adjust it.

pub mod hooks;
pub mod plancat;
pub mod rel_info;

// Export key types
pub use self::hooks::{HookChain, PlanError, PlanResult, RelationInfoHook};
pub use self::plancat::get_relation_info;
pub use self::rel_info::{IndexOptInfo, RelOptInfo};
