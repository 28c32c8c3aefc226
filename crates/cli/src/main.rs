//! Farmaweb CLI - Headless driver for the storefront coordinator.
//!
//! # Usage
//!
//! ```bash
//! # Replay a JSON-lines interaction script against the local store
//! fw-cli replay session.jsonl
//!
//! # Show the stored cart and badge count
//! fw-cli cart
//!
//! # Show the stored session and its UI role
//! fw-cli session
//!
//! # Write a session directly, the way an external login module would
//! fw-cli login ana --name "Ana Pérez"
//!
//! # Remove the session
//! fw-cli logout
//! ```
//!
//! # Commands
//!
//! - `replay` - Feed recorded clicks and submissions through the dispatcher
//! - `cart` - Print the stored cart
//! - `session` - Print the stored session identity
//! - `login` / `logout` - Write or remove the session key

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use farmaweb_storefront::config::CoordinatorConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "fw-cli")]
#[command(author, version, about = "Farmaweb storefront coordinator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines interaction script
    Replay {
        /// Script file, one click or submit event per line
        path: PathBuf,
    },
    /// Print the stored cart
    Cart,
    /// Print the stored session identity and its UI role
    Session,
    /// Store a session identity directly
    Login {
        /// Login name
        username: String,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Role marker (e.g. `admin`)
        #[arg(short, long)]
        role: Option<String>,
    },
    /// Remove the stored session identity
    Logout,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CoordinatorConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CoordinatorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "farmaweb_storefront=info,fw_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: CoordinatorConfig) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Replay { path } => commands::replay::run(config, &path).await?,
        Commands::Cart => commands::inspect::cart(config)?,
        Commands::Session => commands::inspect::session(config)?,
        Commands::Login {
            username,
            name,
            role,
        } => commands::session::login(config, &username, name, role)?,
        Commands::Logout => commands::session::logout(config)?,
    }
    Ok(())
}
