//! `oauth` command line entry point.

use clap::Parser;
use oauth_cli::cli::Cli;
use oauth_cli::commands;
use rust_common::{TracingConfig, init_tracing};
use std::process::ExitCode;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    init_tracing(
        &TracingConfig::default()
            .with_service_name("oauth-cli")
            .with_log_level(cli.log_level.as_str()),
    );

    let mut stdout = std::io::stdout().lock();
    let result = commands::run(&cli, &mut stdout, chrono::Utc::now())
        .await
        .map_err(anyhow::Error::from);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = ?e, "Command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
