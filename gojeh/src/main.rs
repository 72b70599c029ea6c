use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::net::UnixListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod catalog;
mod config;
mod display;
mod engine;
mod ipc;
mod notify;
mod timer;

#[cfg(test)]
mod test_support;

use catalog::SessionCatalog;
use config::load_config;
use engine::{Engine, EngineHandle};
use notify::DesktopNotifier;

#[derive(Parser)]
#[command(name = "gojeh")]
#[command(about = "Pomodoro timer daemon controlled over a unix socket", long_about = None)]
struct Cli {
    /// Config file to use instead of the one in the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Socket to listen on, overriding the config file
    #[arg(short, long)]
    socket: Option<PathBuf>,
    /// Log at debug level (GOJEH_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("GOJEH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // stdout carries the status lines, so logs go to stderr.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let catalog = SessionCatalog::from_config(&config.phases)?;
    let socket_path = cli.socket.unwrap_or(config.socket_path);

    let listener = ipc::server::bind(&socket_path)?;

    let (engine, handle) = Engine::new(
        catalog,
        Box::new(DesktopNotifier::new(config.notification)),
        Box::new(std::io::stdout()),
    );
    run_daemon(engine, listener, handle).await
}

/// Drive the engine and the accept loop together. Neither is expected to
/// finish; if the engine does, there is nothing left to serve.
async fn run_daemon(engine: Engine, listener: UnixListener, handle: EngineHandle) -> Result<()> {
    let engine_task = tokio::spawn(engine.run());

    tokio::select! {
        joined = engine_task => {
            joined.context("timer engine crashed")?;
            bail!("timer engine stopped")
        }
        () = ipc::server::serve(listener, handle) => Ok(()),
    }
}
