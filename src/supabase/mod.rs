//! Supabase PostgREST access with the service-role key.

pub mod client;

pub use client::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupabaseError {
    #[error("Supabase is not reachable at {0}")]
    Connection(String),

    #[error("Supabase returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("No row in {table} with id {id}")]
    RowNotFound { table: String, id: String },
}
