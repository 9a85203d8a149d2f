// Query Processing Module
//
// This module contains identifier parsing and the relation-level planner
// extension point.

pub mod parser;
pub mod planner;

// Export key public interfaces
pub use planner::{HookChain, RelOptInfo, RelationInfoHook};
