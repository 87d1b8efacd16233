use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::Profile;
use crate::repair::{ProfileStore, RepairError};

pub fn insert_profile(conn: &Connection, profile: &Profile) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO profiles (id, full_name, profile_name) VALUES (?1, ?2, ?3)",
        params![profile.id.to_string(), profile.full_name, profile.profile_name],
    )?;
    Ok(())
}

pub fn get_profile(conn: &Connection, id: &Uuid) -> Result<Option<Profile>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, full_name, profile_name FROM profiles WHERE id = ?1",
            params![id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            },
        )
        .optional()?;

    row.map(|(id, full_name, profile_name)| {
        Ok(Profile {
            id: parse_uuid("profiles.id", &id)?,
            full_name,
            profile_name,
        })
    })
    .transpose()
}

impl ProfileStore for Connection {
    fn get_profile(&self, id: &Uuid) -> Result<Option<Profile>, RepairError> {
        Ok(get_profile(self, id)?)
    }
}
