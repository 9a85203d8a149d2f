// Size Override Rule
//
// Forces zero page and row estimates for ordinary tables that occupy no
// storage, when the override flag is on.

use log::debug;

use crate::common::types::{BlockNumber, RelKind};
use crate::query::planner::RelOptInfo;

/// What the rule did to a relation's estimates in one planning pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeEstimate {
    Untouched,
    Overridden,
}

/// Apply the rule. Estimates are zeroed iff the flag is set, the relation is
/// an ordinary table and it has no blocks.
pub fn apply_size_override(
    enabled: bool,
    kind: RelKind,
    blocks: BlockNumber,
    rel: &mut RelOptInfo,
) -> SizeEstimate {
    if !(enabled && kind.is_ordinary_table() && blocks == 0) {
        return SizeEstimate::Untouched;
    }

    debug!("relation {} is empty, zeroing size estimates", rel.rel_id);
    rel.pages = 0;
    rel.tuples = 0.0;
    SizeEstimate::Overridden
}
