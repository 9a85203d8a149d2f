use std::fmt;

/// Catalog object identifier
pub type ObjectId = u32;

/// The invalid object identifier; never assigned to a catalog object
pub const INVALID_OBJECT_ID: ObjectId = 0;

/// First identifier handed out to user-created objects
pub const FIRST_NORMAL_OBJECT_ID: ObjectId = 16384;

/// Block number type
pub type BlockNumber = u64;

/// Maximum identifier length in bytes; longer identifiers are truncated
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Returns true if the identifier refers to a real object
pub fn is_valid_object_id(id: ObjectId) -> bool {
    id != INVALID_OBJECT_ID
}

/// Kind of relation stored in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelKind {
    /// Ordinary table backed by storage blocks
    Table,
    Index,
    View,
}

impl RelKind {
    /// Only ordinary tables are subject to index filtering and size correction
    pub fn is_ordinary_table(&self) -> bool {
        matches!(self, RelKind::Table)
    }
}

impl fmt::Display for RelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelKind::Table => write!(f, "table"),
            RelKind::Index => write!(f, "index"),
            RelKind::View => write!(f, "view"),
        }
    }
}
