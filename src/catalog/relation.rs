//! Relation Entry Module
//!
//! This module defines the catalog entry kept for every relation: tables,
//! indexes and views.

use crate::common::types::{BlockNumber, ObjectId, RelKind};

/// A relation known to the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// Object identifier (unique within the catalog)
    id: ObjectId,
    /// Relation name, without schema
    name: String,
    /// Name of the owning schema
    schema: String,
    kind: RelKind,
    /// Number of storage blocks currently allocated
    block_count: BlockNumber,
    /// For indexes, the table the index is defined on
    indexed_table: Option<ObjectId>,
}

impl Relation {
    /// Create a new relation entry
    pub fn new(id: ObjectId, schema: String, name: String, kind: RelKind) -> Self {
        Relation {
            id,
            name,
            schema,
            kind,
            block_count: 0,
            indexed_table: None,
        }
    }

    /// Create an index entry on the given table
    pub fn new_index(id: ObjectId, schema: String, name: String, table: ObjectId) -> Self {
        Relation {
            indexed_table: Some(table),
            ..Relation::new(id, schema, name, RelKind::Index)
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn kind(&self) -> RelKind {
        self.kind
    }

    pub fn block_count(&self) -> BlockNumber {
        self.block_count
    }

    /// Update the storage size; views never occupy blocks
    pub(crate) fn set_block_count(&mut self, blocks: BlockNumber) {
        if self.kind != RelKind::View {
            self.block_count = blocks;
        }
    }

    /// Table this index belongs to, if this is an index
    pub fn indexed_table(&self) -> Option<ObjectId> {
        self.indexed_table
    }
}
