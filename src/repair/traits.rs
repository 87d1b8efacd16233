//! Store boundaries for the repair pass.
//!
//! The auditor never builds its own clients. Callers hand it a SQLite
//! connection, a Supabase client, or a test fake.

use uuid::Uuid;

use super::RepairError;
use crate::models::{DisplayNameUpdate, FamilyConnection, Profile};

/// Read/write access to `family_connections`.
pub trait ConnectionStore {
    /// Every connection row. The table is small; no pagination.
    fn list_connections(&self) -> Result<Vec<FamilyConnection>, RepairError>;

    /// Overwrite both display-name columns of one row.
    fn update_display_names(
        &self,
        id: &Uuid,
        update: &DisplayNameUpdate,
    ) -> Result<(), RepairError>;
}

/// Read access to `profiles`.
pub trait ProfileStore {
    fn get_profile(&self, id: &Uuid) -> Result<Option<Profile>, RepairError>;
}
