//! Repvox CLI entry point

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use repvox::application::AppContext;
use repvox::cli::{
    app::{run_listen, run_login, run_logout, run_status, EXIT_ERROR},
    args::{Cli, Commands, ListenOptions},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use repvox::domain::config::AppConfig;
use repvox::infrastructure::{FileCredentialStore, XdgConfigStore};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    match cli.command {
        // Config never needs the full context
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            match handle_config_command(action, &store, &presenter).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    presenter.error(&e.to_string());
                    ExitCode::from(EXIT_ERROR)
                }
            }
        }
        command => {
            // Build CLI config from args
            let cli_config = AppConfig {
                api_url: cli.api_url.clone(),
                ..Default::default()
            };

            let credentials = Arc::new(FileCredentialStore::new());
            let config_store = XdgConfigStore::new();
            let ctx = AppContext::init(credentials, &config_store, cli_config).await;

            match command {
                Commands::Listen { hold, mute } => {
                    let options = ListenOptions {
                        hold_secs: hold,
                        mute,
                    };
                    run_listen(options, &ctx).await
                }
                Commands::Login { token } => run_login(token, &ctx).await,
                Commands::Logout => run_logout(&ctx).await,
                Commands::Status => run_status(&ctx).await,
                Commands::Config { .. } => unreachable!(), // Handled above
            }
        }
    }
}
