//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, and the main
//! application runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;

// Re-export commonly used types
pub use app::{run_listen, run_login, run_logout, run_status, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, ListenOptions};
pub use config_cmd::handle_config_command;
pub use presenter::Presenter;
