//! Application context
//!
//! One explicit object carrying the credential store, merged configuration,
//! and preference values. Built once at startup and passed into whatever
//! constructs the HTTP client and the voice session, instead of module-level
//! mutable state.

use std::env;
use std::sync::Arc;

use crate::domain::config::AppConfig;
use crate::domain::preferences::{Language, Theme, Units};

use super::ports::{ConfigStore, CredentialStore};
use super::preferences::Preference;

/// Environment variable overriding the backend base URL
pub const API_URL_ENV: &str = "REPVOX_API_URL";

/// Explicit application context
pub struct AppContext {
    pub config: AppConfig,
    pub credentials: Arc<dyn CredentialStore>,
    pub theme: Preference<Theme>,
    pub language: Preference<Language>,
    pub units: Preference<Units>,
}

impl AppContext {
    /// Build the context: merge configuration (defaults < file < env < cli)
    /// and seed the preference values from the result.
    pub async fn init(
        credentials: Arc<dyn CredentialStore>,
        config_store: &dyn ConfigStore,
        cli_config: AppConfig,
    ) -> Self {
        let file_config = config_store
            .load()
            .await
            .unwrap_or_else(|_| AppConfig::empty());

        let env_config = AppConfig {
            api_url: env::var(API_URL_ENV).ok().filter(|s| !s.is_empty()),
            ..Default::default()
        };

        let config = AppConfig::defaults()
            .merge(file_config)
            .merge(env_config)
            .merge(cli_config);

        let theme = Preference::new(config.theme_or_default());
        let language = Preference::new(config.language_or_default());
        let units = Preference::new(config.units_or_default());

        Self {
            config,
            credentials,
            theme,
            language,
            units,
        }
    }

    /// Backend base URL for this run
    pub fn api_url(&self) -> &str {
        self.config.api_url_or_default()
    }
}
