//! Catalog Module
//!
//! This module defines how the planner tuner talks to the host catalog: the
//! `NameResolver` and `RelationStats` traits, plus an in-memory `Catalog`
//! implementing both.

pub mod catalog;
pub mod error;
pub mod relation;
pub mod schema;

// Re-export key types
pub use self::catalog::{Catalog, DEFAULT_DATABASE, DEFAULT_SCHEMA};
pub use self::error::{CatalogError, CatalogResult};
pub use self::relation::Relation;
pub use self::schema::Schema;

use crate::common::types::{BlockNumber, ObjectId, RelKind};
use crate::query::parser::QualifiedName;

/// Maps qualified names to object identifiers and back
pub trait NameResolver {
    /// Resolve a possibly qualified name; `None` if nothing by that name is visible
    fn resolve_qualified_name(&self, name: &QualifiedName) -> Option<ObjectId>;

    /// Kind of the object, or `None` if the identifier is unknown
    fn object_kind(&self, id: ObjectId) -> Option<RelKind>;

    /// Fully qualified name of the object, or `None` if it is gone
    fn reverse_resolve(&self, id: ObjectId) -> Option<QualifiedName>;
}

/// Physical size information for relations being planned
pub trait RelationStats {
    fn block_count(&self, id: ObjectId) -> CatalogResult<BlockNumber>;
}

/// Everything the tuner needs from the host catalog
pub trait CatalogAccess: NameResolver + RelationStats + Send + Sync {}

impl<T: NameResolver + RelationStats + Send + Sync> CatalogAccess for T {}
