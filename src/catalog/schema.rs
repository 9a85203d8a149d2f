// Schema Management Module
//
// This module defines the Schema type: a namespace mapping relation names to
// object identifiers.

use std::collections::HashMap;

use crate::common::types::ObjectId;

/// Represents a database schema, which is a namespace of relations
#[derive(Debug, Clone)]
pub struct Schema {
    /// Relations in this schema, by name
    relations: HashMap<String, ObjectId>,
}

impl Schema {
    /// Create a new, empty schema
    pub(crate) fn new() -> Self {
        Schema {
            relations: HashMap::new(),
        }
    }

    /// Register a relation name; returns false if the name is taken
    pub(crate) fn add_relation(&mut self, name: &str, id: ObjectId) -> bool {
        if self.relations.contains_key(name) {
            return false;
        }
        self.relations.insert(name.to_string(), id);
        true
    }

    /// Look up a relation by name
    pub fn get_relation(&self, name: &str) -> Option<ObjectId> {
        self.relations.get(name).copied()
    }

    pub(crate) fn remove_relation(&mut self, name: &str) {
        self.relations.remove(name);
    }
}
