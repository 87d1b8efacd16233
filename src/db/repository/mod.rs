//! Repository layer: table-scoped database operations.
//!
//! `rusqlite::Connection` also implements the repair store traits, so a
//! local database can be audited the same way as the hosted one.

mod family_connection;
mod profile;

use uuid::Uuid;

use super::DatabaseError;

pub use family_connection::*;
pub use profile::*;

/// Ids are stored as hyphenated text.
pub(crate) fn parse_uuid(field: &str, value: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value).map_err(|_| DatabaseError::InvalidId {
        field: field.to_string(),
        value: value.to_string(),
    })
}
