// Reference Set
//
// This module turns a comma-separated list of index names into the set of
// index identifiers it denotes.

use std::fmt;

use crate::catalog::NameResolver;
use crate::common::types::{is_valid_object_id, ObjectId, RelKind};
use crate::query::parser::{split_qualified_name_list, IdentifierResult, QualifiedName};

/// Resolved index identifiers, in the order their names appeared.
///
/// Only names that resolved to an index are kept, so the set never holds the
/// invalid identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    ids: Vec<ObjectId>,
}

impl ReferenceSet {
    /// An empty set
    pub fn empty() -> Self {
        ReferenceSet { ids: Vec::new() }
    }

    /// Build a set from identifiers, dropping invalid ones
    pub fn from_ids(ids: impl IntoIterator<Item = ObjectId>) -> Self {
        ReferenceSet {
            ids: ids.into_iter().filter(|&id| is_valid_object_id(id)).collect(),
        }
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[ObjectId] {
        &self.ids
    }
}

/// A name in the list that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Nothing by that name is visible
    NotFound(QualifiedName),
    /// The name resolved, but not to an index
    NotAnIndex(QualifiedName, RelKind),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NotFound(name) => write!(f, "'{}' does not exist", name),
            Notice::NotAnIndex(name, kind) => write!(f, "'{}' is not an index (it is a {})", name, kind),
        }
    }
}

/// Outcome of parsing a list: the resolved set plus the names that were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReferences {
    pub set: ReferenceSet,
    pub notices: Vec<Notice>,
}

/// Parse and resolve a comma-separated list of index names.
///
/// Malformed text fails as a whole. Names that do not resolve, or resolve to
/// something other than an index, are skipped and reported as notices.
pub fn parse_reference_set<R: NameResolver + ?Sized>(text: &str, resolver: &R) -> IdentifierResult<ParsedReferences> {
    let names = split_qualified_name_list(text)?;

    let mut ids = Vec::with_capacity(names.len());
    let mut notices = Vec::new();

    for name in names {
        let Some(id) = resolver.resolve_qualified_name(&name) else {
            notices.push(Notice::NotFound(name));
            continue;
        };

        match resolver.object_kind(id) {
            Some(RelKind::Index) => ids.push(id),
            Some(kind) => notices.push(Notice::NotAnIndex(name, kind)),
            None => notices.push(Notice::NotFound(name)),
        }
    }

    Ok(ParsedReferences {
        set: ReferenceSet::from_ids(ids),
        notices,
    })
}
