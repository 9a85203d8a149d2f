// Index List Binder
//
// This module binds one textual index-list setting to its committed
// reference set: validate without side effects, commit by swapping the set,
// and show the committed set as text.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::RwLock;

use crate::catalog::CatalogAccess;
use crate::query::parser::{quote_qualified_identifier, IdentifierResult};
use super::reference_set::{parse_reference_set, Notice, ReferenceSet};

/// Which of the two index lists a binder maintains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexListKind {
    Disabled,
    Enabled,
}

impl fmt::Display for IndexListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexListKind::Disabled => write!(f, "disabled"),
            IndexListKind::Enabled => write!(f, "enabled"),
        }
    }
}

/// Owner of one committed reference set
pub struct IndexListBinder {
    kind: IndexListKind,
    catalog: Arc<dyn CatalogAccess>,
    current: RwLock<Arc<ReferenceSet>>,
}

impl IndexListBinder {
    /// Create a binder with an empty committed set
    pub fn new(kind: IndexListKind, catalog: Arc<dyn CatalogAccess>) -> Self {
        IndexListBinder {
            kind,
            catalog,
            current: RwLock::new(Arc::new(ReferenceSet::empty())),
        }
    }

    /// Check a proposed value without touching the committed set.
    ///
    /// Names that do not resolve to an index are logged as warnings and
    /// returned; they do not reject the value. Only malformed text does.
    pub fn validate(&self, text: &str) -> IdentifierResult<Vec<Notice>> {
        let parsed = parse_reference_set(text, self.catalog.as_ref())?;
        for notice in &parsed.notices {
            warn!("{}", notice);
        }
        Ok(parsed.notices)
    }

    /// Resolve `text` and install the result as the committed set.
    ///
    /// Skipped names were already reported by `validate` and are not logged
    /// again. On malformed text the previous set stays in effect.
    pub fn commit(&self, text: &str) -> IdentifierResult<()> {
        let parsed = parse_reference_set(text, self.catalog.as_ref())?;
        debug!("committing {} index list with {} entries", self.kind, parsed.set.len());
        *self.current.write() = Arc::new(parsed.set);
        Ok(())
    }

    /// The committed set. Later commits do not affect the returned snapshot.
    pub fn snapshot(&self) -> Arc<ReferenceSet> {
        self.current.read().clone()
    }

    /// Render the committed set as `schema.name` entries joined by `, `.
    /// Entries whose names can no longer be found are left out.
    pub fn show(&self) -> String {
        let set = self.snapshot();
        set.iter()
            .filter_map(|id| self.catalog.reverse_resolve(id))
            .map(|name| match &name.schema {
                Some(schema) => quote_qualified_identifier(schema, &name.name),
                None => name.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
