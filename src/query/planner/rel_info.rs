// Relation Planning Metadata
//
// This module defines the mutable per-relation metadata the optimizer builds
// before plan search: the candidate index list and the size estimates.

use crate::common::types::{BlockNumber, ObjectId};

/// Pages assumed for a table that has never had storage allocated
pub const EMPTY_TABLE_PAGE_GUESS: BlockNumber = 10;

/// Rough tuple density used to turn pages into a row estimate
pub const DEFAULT_TUPLES_PER_PAGE: f64 = 100.0;

/// A candidate index for a relation
#[derive(Debug, Clone, PartialEq)]
pub struct IndexOptInfo {
    /// Identifier of the index relation
    pub index_id: ObjectId,
    /// Identifier of the table the index belongs to
    pub rel_id: ObjectId,
}

/// Optimizer metadata for one relation in one planning pass
#[derive(Debug, Clone, PartialEq)]
pub struct RelOptInfo {
    pub rel_id: ObjectId,
    /// Indexes the optimizer may consider for this relation
    pub index_list: Vec<IndexOptInfo>,
    /// Estimated number of pages
    pub pages: BlockNumber,
    /// Estimated number of rows
    pub tuples: f64,
}

impl RelOptInfo {
    /// Create metadata with no candidate indexes and zero estimates
    pub fn new(rel_id: ObjectId) -> Self {
        RelOptInfo {
            rel_id,
            index_list: Vec::new(),
            pages: 0,
            tuples: 0.0,
        }
    }

    /// Add candidate indexes by identifier
    pub fn with_indexes(mut self, indexes: &[ObjectId]) -> Self {
        let rel_id = self.rel_id;
        self.index_list.extend(indexes.iter().map(|&index_id| IndexOptInfo { index_id, rel_id }));
        self
    }

    /// Fill the size estimates from the physical block count
    pub fn with_estimates(mut self, blocks: BlockNumber) -> Self {
        let (pages, tuples) = estimate_rel_size(blocks);
        self.pages = pages;
        self.tuples = tuples;
        self
    }

    /// Identifiers of the remaining candidate indexes, in list order
    pub fn index_ids(&self) -> Vec<ObjectId> {
        self.index_list.iter().map(|i| i.index_id).collect()
    }

    pub fn has_index(&self, index_id: ObjectId) -> bool {
        self.index_list.iter().any(|i| i.index_id == index_id)
    }

    /// Remove the first candidate with this identifier; returns whether one was removed
    pub fn remove_index(&mut self, index_id: ObjectId) -> bool {
        match self.index_list.iter().position(|i| i.index_id == index_id) {
            Some(pos) => {
                self.index_list.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// Estimate pages and rows from the physical size.
///
/// A table with no blocks is assumed to be about to grow, so it is costed as
/// if it had a handful of pages rather than none.
pub fn estimate_rel_size(blocks: BlockNumber) -> (BlockNumber, f64) {
    let pages = if blocks == 0 { EMPTY_TABLE_PAGE_GUESS } else { blocks };
    (pages, pages as f64 * DEFAULT_TUPLES_PER_PAGE)
}
