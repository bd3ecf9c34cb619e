//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Generate and inspect OAuth2 tokens
#[derive(Parser, Debug)]
#[command(
    name = "oauth",
    about = "Can be used to generate and inspect oauth2 tokens",
    long_about = "Generic oauth2-compliant cli which can be used to generate user tokens using \
                  the resource owner password flow and generate tokens based on your service \
                  account details.",
    disable_version_flag = true
)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Show current version of CLI
    #[arg(long, short = 'v')]
    pub version: bool,

    /// Show current configuration
    #[arg(long = "show-config", short = 'c')]
    pub show_config: bool,

    /// Configuration file (default: ~/.oauth/providers.yaml)
    #[arg(long, global = true, env = "OAUTH_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// HTTP timeout in seconds (default: wait indefinitely)
    #[arg(long, global = true, env = "OAUTH_HTTP_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, global = true, env = "OAUTH_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// HTTP timeout, if one was requested.
    #[must_use]
    pub fn http_timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Get token using service account details
    #[command(name = "servicetoken")]
    ServiceToken(ServiceTokenArgs),

    /// Get token using user credentials
    #[command(name = "usertoken")]
    UserToken(UserTokenArgs),

    /// Get introspection details for a token
    Introspect(IntrospectArgs),
}

/// Arguments of `servicetoken`
#[derive(Args, Debug)]
pub struct ServiceTokenArgs {
    /// Service ID
    #[arg(long = "serviceId", short = 's')]
    pub service_id: String,

    /// Path to the service's private key (PKCS1 or PKCS8 PEM)
    #[arg(long = "private-key-file", value_name = "PATH")]
    pub private_key_file: PathBuf,

    /// Print only the signed JWT, without exchanging it
    #[arg(long, short = 'j')]
    pub jwt: bool,

    /// Print only the access token
    #[arg(long = "access-token", short = 'a')]
    pub access_token: bool,
}

/// Arguments of `usertoken`
#[derive(Args, Debug)]
pub struct UserTokenArgs {
    /// Username
    #[arg(long, short = 'u')]
    pub username: String,

    /// Password
    #[arg(long, short = 'p')]
    pub password: String,

    /// Print only the access token
    #[arg(long = "access-token", short = 'a')]
    pub access_token: bool,
}

/// Arguments of `introspect`
#[derive(Args, Debug)]
pub struct IntrospectArgs {
    /// Access token to introspect
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_servicetoken() {
        let cli = Cli::try_parse_from([
            "oauth",
            "servicetoken",
            "-s",
            "svc-1",
            "--private-key-file",
            "/tmp/key.pem",
            "-j",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::ServiceToken(args)) => {
                assert_eq!(args.service_id, "svc-1");
                assert_eq!(args.private_key_file, PathBuf::from("/tmp/key.pem"));
                assert!(args.jwt);
                assert!(!args.access_token);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_servicetoken_long_service_id() {
        let cli = Cli::try_parse_from([
            "oauth",
            "servicetoken",
            "--serviceId",
            "svc-2",
            "--private-key-file",
            "k.pem",
            "--access-token",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Some(Commands::ServiceToken(ServiceTokenArgs { access_token: true, .. }))
        ));
    }

    #[test]
    fn test_servicetoken_requires_key_file() {
        let result = Cli::try_parse_from(["oauth", "servicetoken", "-s", "svc-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_root_flags_and_global_options() {
        let cli = Cli::try_parse_from(["oauth", "-v", "--timeout", "30"]).unwrap();
        assert!(cli.version);
        assert!(!cli.show_config);
        assert!(cli.command.is_none());
        assert_eq!(cli.http_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_introspect_requires_token() {
        assert!(Cli::try_parse_from(["oauth", "introspect"]).is_err());
        let cli = Cli::try_parse_from(["oauth", "introspect", "tok123"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Introspect(IntrospectArgs { token })) if token == "tok123"));
    }
}
