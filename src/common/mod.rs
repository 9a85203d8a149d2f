// Shared identifier and relation-kind types

pub mod types;

pub use self::types::{ObjectId, RelKind, BlockNumber, INVALID_OBJECT_ID};
