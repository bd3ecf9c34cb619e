//! Command execution.
//!
//! Each command loads the configuration fresh, talks to the provider at most
//! once and writes its result to the given writer.

use crate::assertion::create_and_sign_jwt;
use crate::cli::{Cli, Commands, IntrospectArgs, ServiceTokenArgs, UserTokenArgs};
use crate::client::OAuthClient;
use crate::config::{ConfigStore, Configuration};
use crate::error::OAuthError;
use crate::key::read_key_file;
use crate::output::{OutputMode, render};
use chrono::{DateTime, Utc};
use clap::CommandFactory;
use rust_common::HttpConfig;
use std::io::Write;
use tracing::debug;

/// Version reported by `oauth --version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the command described by `cli`, writing its output to `out`.
///
/// `now` is the instant JWT-bearer assertions are issued at. `out` is
/// flushed before returning, so a closed pipe surfaces as an error.
///
/// # Errors
///
/// Returns the first error of the pipeline; nothing is retried.
pub async fn run<W: Write>(cli: &Cli, out: &mut W, now: DateTime<Utc>) -> Result<(), OAuthError> {
    dispatch(cli, out, now).await?;
    out.flush()?;
    Ok(())
}

async fn dispatch<W: Write>(cli: &Cli, out: &mut W, now: DateTime<Utc>) -> Result<(), OAuthError> {
    let store = match &cli.config {
        Some(path) => ConfigStore::at(path),
        None => ConfigStore::default_location()?,
    };
    store.ensure_exists()?;

    let Some(command) = &cli.command else {
        return run_root(cli, &store, out);
    };

    let configuration = store.load()?;
    let http = http_config(cli);

    match command {
        Commands::ServiceToken(args) => service_token(args, configuration, &http, out, now).await,
        Commands::UserToken(args) => user_token(args, configuration, &http, out).await,
        Commands::Introspect(args) => introspect(args, configuration, &http, out).await,
    }
}

fn http_config(cli: &Cli) -> HttpConfig {
    let config =
        HttpConfig::default().with_user_agent(concat!("oauth-cli/", env!("CARGO_PKG_VERSION")));
    match cli.http_timeout() {
        Some(timeout) => config.with_timeout(timeout),
        None => config,
    }
}

fn run_root<W: Write>(cli: &Cli, store: &ConfigStore, out: &mut W) -> Result<(), OAuthError> {
    if cli.version {
        writeln!(out, "Version:  {VERSION}")?;
        return Ok(());
    }

    if cli.show_config {
        let configuration = store.load()?;
        write_provider(&configuration, out)?;
        return Ok(());
    }

    Cli::command().write_help(out)?;
    Ok(())
}

fn write_provider<W: Write>(configuration: &Configuration, out: &mut W) -> std::io::Result<()> {
    let provider = &configuration.provider;
    writeln!(out, "Configured IDP: {}", provider.name)?;
    writeln!(out, "Token-Url: {}", provider.token_url)?;
    writeln!(out, "Introspect Url: {}", provider.introspect_url)?;
    writeln!(out, "ClientId: {}", provider.client_id)
}

async fn service_token<W: Write>(
    args: &ServiceTokenArgs,
    configuration: Configuration,
    http: &HttpConfig,
    out: &mut W,
    now: DateTime<Utc>,
) -> Result<(), OAuthError> {
    let key_pem = read_key_file(&args.private_key_file)?;
    let jwt = create_and_sign_jwt(&args.service_id, &key_pem, &configuration.provider, now)?;

    if args.jwt {
        debug!("Printing assertion without exchange");
        writeln!(out, "{jwt}")?;
        return Ok(());
    }

    let client = OAuthClient::new(configuration.provider, http)?;
    let response = client.exchange_jwt(&jwt).await?;
    write_response(&response, OutputMode::from_access_token_flag(args.access_token), out)
}

async fn user_token<W: Write>(
    args: &UserTokenArgs,
    configuration: Configuration,
    http: &HttpConfig,
    out: &mut W,
) -> Result<(), OAuthError> {
    let client = OAuthClient::new(configuration.provider, http)?;
    let response = client.password_token(&args.username, &args.password).await?;
    write_response(&response, OutputMode::from_access_token_flag(args.access_token), out)
}

async fn introspect<W: Write>(
    args: &IntrospectArgs,
    configuration: Configuration,
    http: &HttpConfig,
    out: &mut W,
) -> Result<(), OAuthError> {
    let client = OAuthClient::new(configuration.provider, http)?;
    let response = client.introspect(&args.token).await?;
    write_response(&response, OutputMode::Full, out)
}

fn write_response<W: Write>(
    response: &serde_json::Value,
    mode: OutputMode,
    out: &mut W,
) -> Result<(), OAuthError> {
    let rendered = render(response, mode).map_err(OAuthError::Decode)?;
    writeln!(out, "{rendered}")?;
    Ok(())
}
