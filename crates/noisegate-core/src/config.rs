//! Runtime configuration.
//!
//! Everything has a default; the environment supplies the Gemini API key
//! and may override the model. Front ends layer their own flags on top.

use std::{path::PathBuf, time::Duration};

use crate::{
    error::{GateError, Result},
    time_codec::DEFAULT_FOCUS_SECONDS,
};

/// Primary environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Fallback environment variable for the API key.
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";
/// Environment variable overriding the Gemini model.
pub const MODEL_ENV: &str = "GEMINI_MODEL";

/// Settings for the Gemini decomposition service.
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    /// API key; requests fail without one
    pub api_key: Option<String>,
    /// Model name, e.g. `gemini-2.5-flash`
    pub model: String,
    /// Base URL of the Generative Language API
    pub endpoint: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Per-request timeout
    pub timeout: Duration,
    /// Language the plan should be written in
    pub language: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            temperature: 0.4,
            timeout: Duration::from_secs(30),
            language: "English".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Database file; `None` means the XDG data location
    pub database_path: Option<PathBuf>,
    /// Countdown every new step starts with, in seconds
    pub focus_seconds: u32,
    /// Decomposition service settings
    pub gemini: GeminiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            focus_seconds: DEFAULT_FOCUS_SECONDS,
            gemini: GeminiConfig::default(),
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = Self::default();
        config.gemini.api_key = non_empty(API_KEY_ENV).or_else(|| non_empty(FALLBACK_API_KEY_ENV));
        if let Some(model) = non_empty(MODEL_ENV) {
            config.gemini.model = model;
        }
        config
    }

    /// Sets the focus duration from whole minutes.
    ///
    /// # Errors
    ///
    /// Returns `GateError::InvalidInput` for zero minutes.
    pub fn set_focus_minutes(&mut self, minutes: u32) -> Result<()> {
        if minutes == 0 {
            return Err(GateError::invalid_input("focus_minutes").with_reason("must be at least 1"));
        }
        self.focus_seconds = minutes.saturating_mul(60);
        Ok(())
    }

    /// The database file to use, resolving the XDG default.
    ///
    /// The default is `$XDG_DATA_HOME/noisegate/noisegate.db`, usually
    /// `~/.local/share/noisegate/noisegate.db`.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => default_database_path(),
        }
    }
}

fn default_database_path() -> Result<PathBuf> {
    xdg::BaseDirectories::with_prefix("noisegate")
        .place_data_file("noisegate.db")
        .map_err(|e| GateError::XdgDirectory(e.to_string()))
}
