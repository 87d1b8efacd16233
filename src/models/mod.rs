pub mod connection;
pub mod profile;

pub use connection::*;
pub use profile::*;
