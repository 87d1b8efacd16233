pub mod config;
pub mod models;
pub mod db;
pub mod supabase; // Hosted PostgREST store
pub mod repair; // family_connections display-name audit
pub mod llm; // Groq + Gemini clients
pub mod chatbot; // MediBot report Q&A
pub mod report; // Lab-report image analysis

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
