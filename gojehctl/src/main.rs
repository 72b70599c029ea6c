use anyhow::Result;
use clap::{Parser, Subcommand};
use gojeh_ipc::{client, Command, SOCKET_PATH};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gojehctl")]
#[command(about = "Control the gojeh timer", long_about = None)]
struct Cli {
    /// Socket the daemon is listening on
    #[arg(long, default_value = SOCKET_PATH)]
    socket: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the timer, or pause it if it is running
    Toggle,
    /// Skip to the next phase (leaves the timer paused)
    Next,
    /// Send a raw line to the daemon
    Send { line: String },
}

impl Commands {
    fn into_command(self) -> Command {
        match self {
            Commands::Toggle => Command::Toggle,
            Commands::Next => Command::Advance,
            Commands::Send { line } => Command::parse(&line),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.into_command();

    if let Some(reply) = client::send(&cli.socket, &command).await? {
        println!("{}", reply);
    }

    Ok(())
}
