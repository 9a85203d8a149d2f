// Index Filter
//
// The relation-info hook that drops disabled indexes from a table's
// candidate list and applies the empty-table size override.

use std::sync::Arc;

use log::debug;

use crate::catalog::{CatalogAccess, CatalogError};
use crate::common::types::ObjectId;
use crate::query::planner::{PlanResult, RelOptInfo, RelationInfoHook};
use super::reference_set::ReferenceSet;
use super::size_override::apply_size_override;
use super::state::TunerState;

/// Hook name reported in logs and by `HookChain::names`
pub const INDEX_FILTER_HOOK_NAME: &str = "plantuner";

/// Remove every candidate index that is disabled and not re-enabled.
/// Returns the number of candidates removed.
pub fn filter_indexes(disabled: &ReferenceSet, enabled: &ReferenceSet, rel: &mut RelOptInfo) -> usize {
    let mut removed = 0;
    for index_id in disabled.iter() {
        if !rel.has_index(index_id) || enabled.contains(index_id) {
            continue;
        }
        if rel.remove_index(index_id) {
            debug!("index {} disabled for relation {}", index_id, rel.rel_id);
            removed += 1;
        }
    }
    removed
}

/// Relation-info hook applying the tuner state
pub struct IndexFilter {
    state: Arc<TunerState>,
    catalog: Arc<dyn CatalogAccess>,
}

impl IndexFilter {
    pub fn new(state: Arc<TunerState>, catalog: Arc<dyn CatalogAccess>) -> Self {
        IndexFilter { state, catalog }
    }
}

impl RelationInfoHook for IndexFilter {
    fn name(&self) -> &str {
        INDEX_FILTER_HOOK_NAME
    }

    fn get_relation_info(&self, relation: ObjectId, _inhparent: bool, rel: &mut RelOptInfo) -> PlanResult<()> {
        let kind = self.catalog.object_kind(relation)
            .ok_or(CatalogError::RelationNotFound(relation))?;
        if !kind.is_ordinary_table() {
            return Ok(());
        }

        if self.state.fix_empty_table() {
            let blocks = self.catalog.block_count(relation)?;
            apply_size_override(true, kind, blocks, rel);
        }

        let disabled = self.state.disabled.snapshot();
        let enabled = self.state.enabled.snapshot();
        filter_indexes(&disabled, &enabled, rel);
        Ok(())
    }
}
