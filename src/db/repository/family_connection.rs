use rusqlite::{params, Connection};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::{DisplayNameUpdate, FamilyConnection};
use crate::repair::{ConnectionStore, RepairError};

pub fn insert_family_connection(
    conn: &Connection,
    connection: &FamilyConnection,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO family_connections (id, user_id, connected_user_id,
         sender_display_name, receiver_display_name)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            connection.id.to_string(),
            connection.user_id.to_string(),
            connection.connected_user_id.to_string(),
            connection.sender_display_name,
            connection.receiver_display_name,
        ],
    )?;
    Ok(())
}

pub fn list_family_connections(conn: &Connection) -> Result<Vec<FamilyConnection>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, connected_user_id, sender_display_name, receiver_display_name
         FROM family_connections ORDER BY created_at, id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, user_id, connected_user_id, sender, receiver)| {
            Ok(FamilyConnection {
                id: parse_uuid("family_connections.id", &id)?,
                user_id: parse_uuid("family_connections.user_id", &user_id)?,
                connected_user_id: parse_uuid(
                    "family_connections.connected_user_id",
                    &connected_user_id,
                )?,
                sender_display_name: sender,
                receiver_display_name: receiver,
            })
        })
        .collect()
}

/// Overwrite both display-name columns. Fails with `NotFound` if no row has
/// this id.
pub fn update_connection_display_names(
    conn: &Connection,
    id: &Uuid,
    update: &DisplayNameUpdate,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE family_connections
         SET sender_display_name = ?1, receiver_display_name = ?2
         WHERE id = ?3",
        params![
            update.sender_display_name,
            update.receiver_display_name,
            id.to_string(),
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "family_connection".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

impl ConnectionStore for Connection {
    fn list_connections(&self) -> Result<Vec<FamilyConnection>, RepairError> {
        Ok(list_family_connections(self)?)
    }

    fn update_display_names(
        &self,
        id: &Uuid,
        update: &DisplayNameUpdate,
    ) -> Result<(), RepairError> {
        Ok(update_connection_display_names(self, id, update)?)
    }
}
