// Relation Metadata Gathering
//
// This module builds the planning metadata for a relation from the catalog
// and hands it to the installed relation-info hooks.

use crate::catalog::{Catalog, CatalogError, NameResolver, RelationStats};
use crate::common::types::{ObjectId, RelKind};
use super::hooks::{HookChain, PlanResult};
use super::rel_info::RelOptInfo;

/// Gather candidate indexes and size estimates for a relation, then run the
/// hook chain over them.
pub fn get_relation_info(
    catalog: &Catalog,
    hooks: &HookChain,
    relation: ObjectId,
    inhparent: bool,
) -> PlanResult<RelOptInfo> {
    let kind = catalog.object_kind(relation).ok_or(CatalogError::RelationNotFound(relation))?;

    let mut rel = RelOptInfo::new(relation);
    if kind == RelKind::Table {
        let blocks = catalog.block_count(relation)?;
        rel = rel.with_indexes(&catalog.indexes_of(relation)).with_estimates(blocks);
    }

    hooks.run(relation, inhparent, &mut rel)?;
    Ok(rel)
}
