// Identifier List Parsing
//
// This module tokenizes comma-separated lists of possibly schema-qualified,
// possibly double-quoted identifiers, and quotes identifiers for display.

use std::collections::HashSet;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use log::debug;
use once_cell::sync::Lazy;
use thiserror::Error;

use crate::common::types::MAX_IDENTIFIER_LEN;

/// Keywords reserved in every position
const RESERVED_KEYWORDS: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc",
    "asymmetric", "both", "case", "cast", "check", "collate", "column",
    "constraint", "create", "current_catalog", "current_date", "current_role",
    "current_time", "current_timestamp", "current_user", "default",
    "deferrable", "desc", "distinct", "do", "else", "end", "except", "false",
    "fetch", "for", "foreign", "from", "grant", "group", "having", "in",
    "initially", "intersect", "into", "lateral", "leading", "limit",
    "localtime", "localtimestamp", "not", "null", "offset", "on", "only",
    "or", "order", "placing", "primary", "references", "returning",
    "select", "session_user", "some", "symmetric", "system_user", "table",
    "then", "to", "trailing", "true", "union", "unique", "user", "using",
    "variadic", "when", "where", "window", "with",
];

/// Keywords usable as column names but not as function or type names
const COL_NAME_KEYWORDS: &[&str] = &[
    "between", "bigint", "bit", "boolean", "char", "character", "coalesce",
    "dec", "decimal", "exists", "extract", "float", "greatest", "grouping",
    "inout", "int", "integer", "interval", "json", "json_array",
    "json_arrayagg", "json_object", "json_objectagg", "least", "national",
    "nchar", "none", "normalize", "numeric", "out", "overlay", "position",
    "precision", "real", "row", "setof", "smallint", "substring", "time",
    "timestamp", "treat", "trim", "values", "varchar", "xmlattributes",
    "xmlconcat", "xmlelement", "xmlexists", "xmlforest", "xmlnamespaces",
    "xmlparse", "xmlpi", "xmlroot", "xmlserialize", "xmltable",
];

/// Keywords usable as function or type names but not as column names
const TYPE_FUNC_NAME_KEYWORDS: &[&str] = &[
    "authorization", "binary", "collation", "concurrently", "cross",
    "current_schema", "freeze", "full", "ilike", "inner", "is", "isnull",
    "join", "left", "like", "natural", "notnull", "outer", "overlaps",
    "right", "similar", "tablesample", "verbose",
];

/// Every keyword that must be quoted to be read back as an identifier
static QUOTED_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    RESERVED_KEYWORDS.iter()
        .chain(COL_NAME_KEYWORDS)
        .chain(TYPE_FUNC_NAME_KEYWORDS)
        .copied()
        .collect()
});

/// Errors raised while tokenizing an identifier list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("unterminated quoted identifier starting at position {position}")]
    UnterminatedQuote { position: usize },

    #[error("zero-length identifier at position {position}")]
    EmptyIdentifier { position: usize },

    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("improper qualified name (too many dotted names): {name}")]
    TooManyDots { name: String },
}

/// Result type for identifier parsing
pub type IdentifierResult<T> = Result<T, IdentifierError>;

/// A possibly qualified object name: `[[catalog.]schema.]name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
}

impl QualifiedName {
    /// An unqualified name, resolved through the search path
    pub fn unqualified(name: impl Into<String>) -> Self {
        QualifiedName { catalog: None, schema: None, name: name.into() }
    }

    /// A schema-qualified name
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        QualifiedName { catalog: None, schema: Some(schema.into()), name: name.into() }
    }

    /// Build a qualified name from its dotted parts
    pub fn from_parts(mut parts: Vec<String>) -> IdentifierResult<Self> {
        match parts.len() {
            1 => Ok(QualifiedName::unqualified(parts.remove(0))),
            2 => {
                let name = parts.remove(1);
                Ok(QualifiedName::qualified(parts.remove(0), name))
            }
            3 => {
                let name = parts.remove(2);
                let schema = parts.remove(1);
                Ok(QualifiedName {
                    catalog: Some(parts.remove(0)),
                    schema: Some(schema),
                    name,
                })
            }
            _ => Err(IdentifierError::TooManyDots { name: parts.join(".") }),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(catalog) = &self.catalog {
            write!(f, "{}.", quote_identifier(catalog))?;
        }
        if let Some(schema) = &self.schema {
            write!(f, "{}.", quote_identifier(schema))?;
        }
        write!(f, "{}", quote_identifier(&self.name))
    }
}

/// Scanner over a comma-separated list of qualified names
struct IdentifierScanner<'a> {
    input: Peekable<CharIndices<'a>>,
    len: usize,
}

impl<'a> IdentifierScanner<'a> {
    fn new(input: &'a str) -> Self {
        IdentifierScanner {
            input: input.char_indices().peekable(),
            len: input.len(),
        }
    }

    fn position(&mut self) -> usize {
        self.input.peek().map(|(pos, _)| *pos).unwrap_or(self.len)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.input.peek(), Some((_, c)) if c.is_whitespace()) {
            self.input.next();
        }
    }

    fn at_end(&mut self) -> bool {
        self.input.peek().is_none()
    }

    /// Read a single identifier, quoted or not
    fn read_identifier(&mut self) -> IdentifierResult<String> {
        let start = self.position();
        let ident = match self.input.peek() {
            Some((_, '"')) => {
                self.input.next();
                let mut ident = String::new();
                loop {
                    match self.input.next() {
                        Some((_, '"')) => {
                            // A doubled quote is an escaped literal quote
                            if matches!(self.input.peek(), Some((_, '"'))) {
                                self.input.next();
                                ident.push('"');
                            } else {
                                break;
                            }
                        }
                        Some((_, c)) => ident.push(c),
                        None => return Err(IdentifierError::UnterminatedQuote { position: start }),
                    }
                }
                if ident.is_empty() {
                    return Err(IdentifierError::EmptyIdentifier { position: start });
                }
                ident
            }
            _ => {
                let mut ident = String::new();
                while let Some((_, c)) = self.input.peek() {
                    if c.is_whitespace() || *c == ',' || *c == '.' {
                        break;
                    }
                    ident.push(c.to_ascii_lowercase());
                    self.input.next();
                }
                if ident.is_empty() {
                    return Err(IdentifierError::EmptyIdentifier { position: start });
                }
                ident
            }
        };
        Ok(truncate_identifier(ident))
    }

    /// Read one dotted name: `ident [. ident]*`
    fn read_qualified_name(&mut self) -> IdentifierResult<QualifiedName> {
        let mut parts = vec![self.read_identifier()?];
        loop {
            self.skip_whitespace();
            if matches!(self.input.peek(), Some((_, '.'))) {
                self.input.next();
                self.skip_whitespace();
                parts.push(self.read_identifier()?);
            } else {
                break;
            }
        }
        QualifiedName::from_parts(parts)
    }
}

/// Truncate an identifier to the maximum identifier length on a char boundary
fn truncate_identifier(mut ident: String) -> String {
    if ident.len() > MAX_IDENTIFIER_LEN {
        let mut cut = MAX_IDENTIFIER_LEN;
        while !ident.is_char_boundary(cut) {
            cut -= 1;
        }
        debug!("identifier \"{}\" will be truncated to \"{}\"", ident, &ident[..cut]);
        ident.truncate(cut);
    }
    ident
}

/// Split a comma-separated list of qualified names.
///
/// Empty or all-whitespace input yields an empty list. Any structural problem
/// fails the whole list; no partial result is returned.
pub fn split_qualified_name_list(input: &str) -> IdentifierResult<Vec<QualifiedName>> {
    let mut scanner = IdentifierScanner::new(input);
    let mut names = Vec::new();

    scanner.skip_whitespace();
    if scanner.at_end() {
        return Ok(names);
    }

    loop {
        scanner.skip_whitespace();
        names.push(scanner.read_qualified_name()?);
        scanner.skip_whitespace();
        match scanner.input.next() {
            None => break,
            Some((_, ',')) => continue,
            Some((position, ch)) => {
                return Err(IdentifierError::UnexpectedCharacter { ch, position });
            }
        }
    }

    Ok(names)
}

/// Quote an identifier if it would not survive a round trip unquoted
pub fn quote_identifier(ident: &str) -> String {
    let mut chars = ident.chars();
    let safe_start = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_');
    let safe_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$');

    if safe_start && safe_rest && !QUOTED_KEYWORDS.contains(ident) {
        ident.to_string()
    } else {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }
}

/// Quote and join a schema and object name
pub fn quote_qualified_identifier(schema: &str, name: &str) -> String {
    format!("{}.{}", quote_identifier(schema), quote_identifier(name))
}
