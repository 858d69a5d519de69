//! Runtime settings resolved once at startup.

use std::fmt;

use crate::error::RunError;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default base URL of the chat completions API.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Environment variable supplying the API key when `--api-key` is absent.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the model.
pub const MODEL_ENV: &str = "SCRIBE_MODEL";

/// Environment variable overriding the API base URL.
pub const API_BASE_ENV: &str = "SCRIBE_API_BASE";

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "SCRIBE_LOG";

/// Settings for the text-generation endpoint.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl Settings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

// Keep the key out of debug logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Which files a run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// One file, as given on the command line.
    Single(String),
    /// Every staged file.
    Recursive,
}

impl RunMode {
    /// Pick the mode from the positional file and `-r` flag.
    ///
    /// The recursive flag wins; the file argument is then ignored.
    pub fn from_args(file: Option<String>, recursive: bool) -> Result<Self, RunError> {
        match (file, recursive) {
            (_, true) => Ok(RunMode::Recursive),
            (Some(file), false) if !file.trim().is_empty() => Ok(RunMode::Single(file)),
            _ => Err(RunError::NoTarget),
        }
    }
}
