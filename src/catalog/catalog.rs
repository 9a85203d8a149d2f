use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::common::types::{BlockNumber, ObjectId, RelKind, FIRST_NORMAL_OBJECT_ID};
use crate::query::parser::QualifiedName;
use super::error::{CatalogError, CatalogResult};
use super::relation::Relation;
use super::schema::Schema;
use super::{NameResolver, RelationStats};

/// Name of the schema every catalog starts with
pub const DEFAULT_SCHEMA: &str = "public";

/// Name of the database a catalog describes unless told otherwise
pub const DEFAULT_DATABASE: &str = "main";

// Global catalog instance using a thread-safe lazy initialization
static CATALOG_INSTANCE: Lazy<Arc<Catalog>> = Lazy::new(|| Arc::new(Catalog::new()));

#[derive(Debug)]
struct CatalogState {
    schemas: HashMap<String, Schema>,
    relations: HashMap<ObjectId, Relation>,
    search_path: Vec<String>,
}

/// The Catalog is the central repository for relation metadata.
///
/// It resolves qualified names to object identifiers, reports relation kinds
/// and storage sizes, and maps identifiers back to qualified names.
#[derive(Debug)]
pub struct Catalog {
    database: String,
    state: RwLock<CatalogState>,
    /// Counter for assigning unique object IDs
    object_id_counter: AtomicU32,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Get the global catalog instance
    pub fn instance() -> Arc<Catalog> {
        CATALOG_INSTANCE.clone()
    }

    /// Create a new catalog containing only the default schema
    pub fn new() -> Self {
        Self::with_database(DEFAULT_DATABASE)
    }

    /// Create a new catalog for a named database
    pub fn with_database(database: &str) -> Self {
        let mut schemas = HashMap::new();
        schemas.insert(DEFAULT_SCHEMA.to_string(), Schema::new());

        Catalog {
            database: database.to_string(),
            state: RwLock::new(CatalogState {
                schemas,
                relations: HashMap::new(),
                search_path: vec![DEFAULT_SCHEMA.to_string()],
            }),
            object_id_counter: AtomicU32::new(FIRST_NORMAL_OBJECT_ID),
        }
    }

    /// Name of the database this catalog describes
    pub fn database_name(&self) -> &str {
        &self.database
    }

    /// Create a new schema
    pub fn create_schema(&self, name: &str) -> CatalogResult<()> {
        let mut state = self.state.write();
        if state.schemas.contains_key(name) {
            return Err(CatalogError::SchemaAlreadyExists(name.to_string()));
        }
        state.schemas.insert(name.to_string(), Schema::new());
        Ok(())
    }

    /// Replace the schema search path used for unqualified names.
    /// Schemas that do not exist are kept and silently ignored during lookup.
    pub fn set_search_path(&self, path: Vec<String>) {
        self.state.write().search_path = path;
    }

    pub fn search_path(&self) -> Vec<String> {
        self.state.read().search_path.clone()
    }

    /// Create an ordinary table. Without a schema the table goes into the
    /// first existing schema on the search path.
    pub fn create_table(&self, schema: Option<&str>, name: &str) -> CatalogResult<ObjectId> {
        self.create_relation(schema, name, RelKind::Table)
    }

    pub fn create_view(&self, schema: Option<&str>, name: &str) -> CatalogResult<ObjectId> {
        self.create_relation(schema, name, RelKind::View)
    }

    /// Create an index on a table. The index lives in the table's schema.
    pub fn create_index(&self, name: &str, table: ObjectId) -> CatalogResult<ObjectId> {
        let mut state = self.state.write();
        let (schema_name, table_name) = match state.relations.get(&table) {
            Some(rel) if rel.kind() == RelKind::Table => (rel.schema().to_string(), rel.name().to_string()),
            Some(rel) => return Err(CatalogError::NotATable(rel.name().to_string())),
            None => return Err(CatalogError::RelationNotFound(table)),
        };

        let id = self.object_id_counter.fetch_add(1, Ordering::SeqCst);
        let schema = state.schemas.get_mut(&schema_name)
            .ok_or_else(|| CatalogError::SchemaNotFound(schema_name.clone()))?;
        if !schema.add_relation(name, id) {
            return Err(CatalogError::RelationAlreadyExists(name.to_string()));
        }
        state.relations.insert(id, Relation::new_index(id, schema_name, name.to_string(), table));
        log::debug!("created index {} ({}) on {}", name, id, table_name);
        Ok(id)
    }

    fn create_relation(&self, schema: Option<&str>, name: &str, kind: RelKind) -> CatalogResult<ObjectId> {
        let mut state = self.state.write();
        let schema_name = match schema {
            Some(s) => s.to_string(),
            None => state.search_path.iter()
                .find(|s| state.schemas.contains_key(*s))
                .cloned()
                .ok_or(CatalogError::NoCreationSchema)?,
        };

        let id = self.object_id_counter.fetch_add(1, Ordering::SeqCst);
        let schema = state.schemas.get_mut(&schema_name)
            .ok_or_else(|| CatalogError::SchemaNotFound(schema_name.clone()))?;
        if !schema.add_relation(name, id) {
            return Err(CatalogError::RelationAlreadyExists(name.to_string()));
        }
        state.relations.insert(id, Relation::new(id, schema_name, name.to_string(), kind));
        log::debug!("created {} {} ({})", kind, name, id);
        Ok(id)
    }

    /// Drop a relation. Dropping a table drops its indexes too.
    pub fn drop_relation(&self, id: ObjectId) -> CatalogResult<()> {
        let mut state = self.state.write();
        let rel = state.relations.remove(&id).ok_or(CatalogError::RelationNotFound(id))?;
        if let Some(schema) = state.schemas.get_mut(rel.schema()) {
            schema.remove_relation(rel.name());
        }

        if rel.kind() == RelKind::Table {
            let dependents: Vec<Relation> = state.relations.values()
                .filter(|r| r.indexed_table() == Some(id))
                .cloned()
                .collect();
            for index in dependents {
                state.relations.remove(&index.id());
                if let Some(schema) = state.schemas.get_mut(index.schema()) {
                    schema.remove_relation(index.name());
                }
            }
        }
        Ok(())
    }

    /// Record the number of storage blocks a relation occupies
    pub fn set_block_count(&self, id: ObjectId, blocks: BlockNumber) -> CatalogResult<()> {
        let mut state = self.state.write();
        let rel = state.relations.get_mut(&id).ok_or(CatalogError::RelationNotFound(id))?;
        rel.set_block_count(blocks);
        Ok(())
    }

    /// Indexes defined on a table, in creation order
    pub fn indexes_of(&self, table: ObjectId) -> Vec<ObjectId> {
        let state = self.state.read();
        let mut ids: Vec<ObjectId> = state.relations.values()
            .filter(|r| r.indexed_table() == Some(table))
            .map(|r| r.id())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Look up a relation by possibly qualified name
    pub fn lookup(&self, name: &QualifiedName) -> Option<ObjectId> {
        if let Some(database) = &name.catalog {
            if database != &self.database {
                log::debug!("cross-database reference {} does not resolve", name);
                return None;
            }
        }

        let state = self.state.read();
        match &name.schema {
            Some(schema) => state.schemas.get(schema)?.get_relation(&name.name),
            None => state.search_path.iter()
                .filter_map(|s| state.schemas.get(s))
                .find_map(|s| s.get_relation(&name.name)),
        }
    }
}

impl NameResolver for Catalog {
    fn resolve_qualified_name(&self, name: &QualifiedName) -> Option<ObjectId> {
        self.lookup(name)
    }

    fn object_kind(&self, id: ObjectId) -> Option<RelKind> {
        self.state.read().relations.get(&id).map(|r| r.kind())
    }

    fn reverse_resolve(&self, id: ObjectId) -> Option<QualifiedName> {
        let state = self.state.read();
        let rel = state.relations.get(&id)?;
        Some(QualifiedName::qualified(rel.schema(), rel.name()))
    }
}

impl RelationStats for Catalog {
    fn block_count(&self, id: ObjectId) -> CatalogResult<BlockNumber> {
        self.state.read().relations.get(&id)
            .map(|r| r.block_count())
            .ok_or(CatalogError::RelationNotFound(id))
    }
}
