//! Bind values for dynamically assembled queries.

use uuid::Uuid;

/// A positional parameter for a dynamically built WHERE clause. Every
/// predicate binds through this, whatever its type; filter values are
/// never spliced into the query text.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
    Uuid(Uuid),
}
