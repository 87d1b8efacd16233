use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "MediGuide";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Where the connection audit reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite(PathBuf),
    Supabase { url: String, service_key: String },
}

/// Runtime settings, read from the process environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store: Option<StoreBackend>,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub dry_run: bool,
    pub http_timeout_secs: u64,
}

impl Settings {
    /// Read settings from the environment. Call `dotenvy::dotenv()` first if
    /// a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = if let Some(path) = get("MEDIGUIDE_SQLITE_PATH") {
            Some(StoreBackend::Sqlite(PathBuf::from(path)))
        } else {
            match (get("SUPABASE_URL"), get("SUPABASE_SERVICE_ROLE_KEY")) {
                (Some(url), Some(service_key)) => Some(StoreBackend::Supabase { url, service_key }),
                (Some(_), None) => return Err(ConfigError::MissingVar("SUPABASE_SERVICE_ROLE_KEY")),
                (None, Some(_)) => return Err(ConfigError::MissingVar("SUPABASE_URL")),
                (None, None) => None,
            }
        };

        let dry_run = match get("FIX_CONNECTIONS_DRY_RUN") {
            Some(value) => parse_flag("FIX_CONNECTIONS_DRY_RUN", &value)?,
            None => false,
        };

        let http_timeout_secs = match get("MEDIGUIDE_HTTP_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: "MEDIGUIDE_HTTP_TIMEOUT_SECS",
                value,
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            store,
            groq_api_key: get("GROQ_API_KEY"),
            groq_model: get("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            google_api_key: get("GOOGLE_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            dry_run,
            http_timeout_secs,
        })
    }

    /// The configured store, or an error naming what to set.
    pub fn require_store(&self) -> Result<&StoreBackend, ConfigError> {
        self.store
            .as_ref()
            .ok_or(ConfigError::MissingVar("SUPABASE_URL"))
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}
