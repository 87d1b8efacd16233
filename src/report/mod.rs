//! Lab-report image analysis and report Q&A via Gemini.

pub mod prompt;
pub mod service;
pub mod types;

pub use prompt::*;
pub use service::*;
pub use types::*;
