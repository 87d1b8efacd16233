//! MediBot: answers questions about one extracted lab report via Groq.

pub mod context;
pub mod prompt;
pub mod safety;
pub mod service;

pub use context::*;
pub use prompt::*;
pub use safety::*;
pub use service::*;
