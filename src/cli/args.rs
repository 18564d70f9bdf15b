//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// Repvox - voice commands for your workout tracker
#[derive(Parser, Debug)]
#[command(name = "repvox")]
#[command(version)]
#[command(about = "Record voice commands and send them to your workout tracking backend")]
#[command(long_about = None)]
pub struct Cli {
    /// Backend API base URL (overrides config file and REPVOX_API_URL)
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a voice command and send it to the backend
    Listen {
        /// Stop automatically after this many seconds instead of waiting for Enter
        #[arg(long, value_name = "SECONDS")]
        hold: Option<u64>,

        /// Do not play the synthesized reply
        #[arg(long)]
        mute: bool,
    },
    /// Store a backend access token
    Login {
        /// Token value; read from stdin when omitted
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,
    },
    /// Discard the stored access token
    Logout,
    /// Show authentication and preference status
    Status,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed listen options
#[derive(Debug, Clone)]
pub struct ListenOptions {
    /// Auto-stop after this many seconds; None waits for Enter
    pub hold_secs: Option<u64>,
    /// Skip response playback
    pub mute: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["api_url", "theme", "language", "units"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
