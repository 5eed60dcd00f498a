//! Endpoint Auth Config
//!
//! Prints the identity and endpoint configuration built from the environment,
//! or the authorization headers an endpoint would attach.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand};
use endpoint_auth_config::{
    build_root_config,
    config::{DotenvFile, EnvSource, ProcessEnv},
    session::{IdToken, IdTokenClaims, Session, SessionProvider, StaticSessionProvider},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Endpoint Auth Config
///
/// Cognito identity and REST endpoint configuration tool.
#[derive(Parser, Debug)]
#[command(name = "endpoint-auth-config")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level: trace, debug, info, warn, error (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug)]
struct Source {
    /// Read values from this .env file instead of the process environment
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the client configuration as JSON
    Config {
        #[command(flatten)]
        source: Source,
    },

    /// Print the headers an endpoint attaches to its requests
    Headers {
        /// Endpoint name, e.g. rest-api
        #[arg(long)]
        api: String,

        /// ID token of the signed-in user; without it nobody is signed in
        #[arg(long)]
        id_token: Option<String>,

        #[command(flatten)]
        source: Source,
    },
}

impl Source {
    fn load(&self) -> Result<Box<dyn EnvSource>> {
        let env: Box<dyn EnvSource> = match &self.env_file {
            Some(path) => Box::new(DotenvFile::load(path)?),
            None => Box::new(ProcessEnv::load()),
        };
        Ok(env)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level);

    let output = run(args.command).await?;
    println!("{}", output);

    Ok(())
}

/// Execute a subcommand and return what it prints
async fn run(command: Command) -> Result<String> {
    match command {
        Command::Config { source } => {
            let env = source.load()?;
            let config =
                build_root_config(env.as_ref(), Arc::new(StaticSessionProvider::signed_out()));
            Ok(serde_json::to_string_pretty(&config)?)
        }
        Command::Headers {
            api,
            id_token,
            source,
        } => {
            let env = source.load()?;

            let session = id_token.map(|token| Session::new(IdToken::new(token)));
            if let Some(session) = &session {
                inspect_session(session, Utc::now());
            }
            let sessions: Arc<dyn SessionProvider> = Arc::new(StaticSessionProvider::new(session));
            let config = build_root_config(env.as_ref(), sessions);

            let endpoint = config
                .endpoint(&api)
                .with_context(|| format!("No API named '{}' is configured", api))?;
            let headers = endpoint
                .custom_header()
                .headers()
                .await
                .with_context(|| format!("Failed to build headers for '{}'", api))?;

            Ok(serde_json::to_string_pretty(&headers)?)
        }
    }
}

/// Log who the token belongs to and whether it is still valid
///
/// The token is used either way; an expired or opaque token only earns a
/// warning.
fn inspect_session(session: &Session, now: DateTime<Utc>) -> Option<IdTokenClaims> {
    let id_token = session.id_token();
    match id_token.decode_payload() {
        Ok(claims) => {
            let valid = session.is_valid(now);
            tracing::debug!(
                sub = %claims.sub,
                username = ?claims.username,
                expires_at = ?id_token.expiration(),
                valid,
                "Using ID token"
            );
            if !valid {
                tracing::warn!(token = %id_token.preview(), "ID token is expired");
            }
            Some(claims)
        }
        Err(err) => {
            tracing::warn!(
                token = %id_token.preview(),
                error = %err,
                "ID token claims are not readable"
            );
            None
        }
    }
}

/// Initialize tracing subscriber with the specified log level
fn init_tracing(log_level: &str) {
    // Build filter from RUST_LOG env var or use provided log level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    // Logs go to stderr so stdout stays valid JSON
    let console_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry().with(console_layer).init();
}
