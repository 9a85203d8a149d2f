// Identifier Parsing Module
//
// This module turns configuration text into lists of qualified object names
// and renders qualified names back into display form.

pub mod identifier;

// Export key types
pub use self::identifier::{
    IdentifierError, IdentifierResult, QualifiedName, split_qualified_name_list,
    quote_identifier, quote_qualified_identifier,
};
