//! Family-connection display-name repair.
//!
//! A one-shot maintenance pass over `family_connections`. Earlier app
//! versions wrote the sender's own name into `sender_display_name` and left
//! `receiver_display_name` empty, so the sender saw themselves and the
//! receiver saw nobody. The auditor finds those rows and rewrites them.

pub mod auditor;
pub mod detection;
pub mod traits;

pub use auditor::*;
pub use detection::*;
pub use traits::*;

use thiserror::Error;

use crate::db::DatabaseError;
use crate::supabase::SupabaseError;

/// Fatal store failures. A missing profile is not an error; it is reported
/// as a skipped record in the audit report.
#[derive(Error, Debug)]
pub enum RepairError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Supabase error: {0}")]
    Supabase(#[from] SupabaseError),

    #[error("Store error: {0}")]
    Store(String),
}
