//! shelter-admin - command-line admin console for the Charity Shelter backend.
//!
//! Every protected command first passes the auth guard: the stored token is
//! verified with the server, and a rejected session ends the run with a
//! pointer to `shelter-admin login`.

mod cli;
mod commands;

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shelter_admin_core::{ApiClient, AuthGuard, Config, GuardDecision, SessionStore};

use cli::{Cli, Commands};

/// Log file name prefix inside the log directory
const LOG_FILE_PREFIX: &str = "shelter-admin.log";

/// Initialize the tracing subscriber for logging.
///
/// Warnings and above go to stderr unless `RUST_LOG` says otherwise. When a
/// log directory is available, the same events are also written to a daily
/// rolling file there. The returned guard must live until exit so buffered
/// lines are flushed.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(url) = cli.base_url.clone() {
        config.base_url = url;
    }

    let log_dir = config.log_dir().ok();
    let _log_guard = init_tracing(log_dir.as_deref());
    info!(base_url = %config.base_url, storage = ?config.storage, "shelter-admin starting");

    let storage_dir = config.cache_dir()?;
    let storage = config.storage.open(&storage_dir);
    let session = Arc::new(SessionStore::new(storage));
    session.init_auth();

    let client = ApiClient::new(&config, Arc::clone(&session))
        .context("Failed to create HTTP client")?;

    if cli.command.needs_session() {
        let mut guard = AuthGuard::mount(Arc::clone(&session));
        if let GuardDecision::Redirect(redirect) = guard.check(&client).await {
            info!(location = %redirect.location, "Session rejected");
            bail!("Not signed in or session expired. Run `shelter-admin login`.");
        }
    }

    run(&client, &config, cli.command).await
}

async fn run(client: &ApiClient, config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email } => commands::login(client, email).await,
        Commands::Logout => commands::logout(client).await,
        Commands::Whoami => commands::whoami(client),
        Commands::Verify => commands::verify(client).await,
        Commands::Users { action } => commands::users(client, action).await,
        Commands::Posts { action } => commands::posts(client, action).await,
        Commands::Orgs { action } => commands::organizations(client, action).await,
        Commands::Branches { action } => commands::branches(client, action).await,
        Commands::Locations { action } => commands::locations(client, action).await,
        Commands::Keys { action } => commands::keys(client, action).await,
        Commands::Dashboard {
            watch,
            interval,
            count,
            legacy,
        } => commands::dashboard(client, watch, interval, count, legacy).await,
        Commands::Settings { action } => commands::settings(client, action).await,
        Commands::UploadPicture { path } => commands::upload_picture(client, &path).await,
        Commands::Config { action } => commands::config(config, action),
    }
}
