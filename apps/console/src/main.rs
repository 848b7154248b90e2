mod app;
mod config;
mod controller;
mod ui;

use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use session_core::{CommandResolver, ConnectionPool, DispatchEngine, Session};
use ssh_transport::SshConnector;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{load_settings, parse_login_file, Settings};

/// Runs each typed command on every SSH host in the login file, or on the
/// one currently shown.
#[derive(Parser, Debug)]
#[command(name = "fanshell")]
struct Args {
    /// One `<credential-file-path> <host>[:port] <username>` per line.
    login_file: PathBuf,
    /// Settings file. Defaults to `fanshell.toml` when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where to write logs. The terminal itself is taken by the UI.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_tracing(settings: &Settings) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_context(|| format!("failed to open log file {}", settings.log_file.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }
    init_tracing(&settings)?;

    let targets = parse_login_file(&args.login_file, settings.ssh_port).inspect_err(|error| {
        error!(login_file = %args.login_file.display(), %error, "startup: login file rejected")
    })?;
    info!(targets = targets.len(), "startup: connecting");

    let connector = SshConnector::new(settings.ssh_options());
    let connections = connector
        .connect_all(&targets)
        .await
        .inspect_err(|error| error!(%error, "startup: connection failed"))?;

    let session = Session::new(ConnectionPool::new(connections))?;
    let resolver = match &settings.command_dir {
        Some(dir) => CommandResolver::with_base_dir(dir.clone()),
        None => CommandResolver::new(),
    };
    let mut engine = DispatchEngine::new(session, resolver);
    info!(
        connections = engine.session().pool().size(),
        "startup: all connections established"
    );

    let outcome = app::run(&mut engine, settings.scroll_step).await;
    engine.shutdown().await;
    if let Err(error) = &outcome {
        error!(error = %error, "console: exited with error");
    } else {
        info!("console: exited");
    }
    outcome
}
