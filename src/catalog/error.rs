use thiserror::Error;

use crate::common::types::ObjectId;

/// Errors raised by catalog lookups and DDL
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("schema \"{0}\" does not exist")]
    SchemaNotFound(String),
    #[error("schema \"{0}\" already exists")]
    SchemaAlreadyExists(String),
    #[error("relation \"{0}\" already exists")]
    RelationAlreadyExists(String),
    #[error("could not open relation with id {0}")]
    RelationNotFound(ObjectId),
    #[error("\"{0}\" is not a table")]
    NotATable(String),
    #[error("no schema has been selected to create in")]
    NoCreationSchema,
}

/// Catalog result type
pub type CatalogResult<T> = Result<T, CatalogError>;
