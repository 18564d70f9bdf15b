//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::preferences::{Language, Theme, Units};

/// Default backend base URL when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_url: Option<String>,
    pub theme: Option<String>,
    pub language: Option<String>,
    pub units: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_url: Some(DEFAULT_API_URL.to_string()),
            theme: Some(Theme::default().to_string()),
            language: Some(Language::default().to_string()),
            units: Some(Units::default().to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_url: other.api_url.or(self.api_url),
            theme: other.theme.or(self.theme),
            language: other.language.or(self.language),
            units: other.units.or(self.units),
        }
    }

    /// Get the backend base URL, or the default if not set
    pub fn api_url_or_default(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Get theme as parsed Theme, or default if not set/invalid
    pub fn theme_or_default(&self) -> Theme {
        self.theme
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get language as parsed Language, or default if not set/invalid
    pub fn language_or_default(&self) -> Language {
        self.language
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get units as parsed Units, or default if not set/invalid
    pub fn units_or_default(&self) -> Units {
        self.units
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}
