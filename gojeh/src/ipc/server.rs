//! Unix domain socket server for IPC

use crate::engine::EngineHandle;
use anyhow::{Context, Result};
use gojeh_ipc::{Command, IpcError, MAX_LINE_BYTES, UNKNOWN_COMMAND_RESPONSE};
use std::io::ErrorKind;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, info, warn};

/// Remove whatever is left at `path` from a previous run and listen there.
pub fn bind(path: &Path) -> Result<UnixListener> {
    remove_stale(path)
        .with_context(|| format!("Failed to remove stale socket at {}", path.display()))?;

    let listener = UnixListener::bind(path)
        .with_context(|| format!("Failed to listen on {}", path.display()))?;
    info!("IPC server listening on {}", path.display());
    Ok(listener)
}

fn remove_stale(path: &Path) -> std::io::Result<()> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    if metadata.is_dir() {
        std::fs::remove_dir_all(path)?;
    } else {
        std::fs::remove_file(path)?;
    }
    debug!("Removed stale socket at {}", path.display());
    Ok(())
}

/// Accept connections forever, one task per client.
pub async fn serve(listener: UnixListener, engine: EngineHandle) {
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let engine = engine.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_client(stream, engine).await {
                        warn!("Error handling client: {:#}", e);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {}", e);
            }
        }
    }
}

async fn handle_client(stream: UnixStream, engine: EngineHandle) -> Result<()> {
    let (reader, mut writer) = stream.into_split();

    match read_command(reader).await? {
        Command::Toggle => {
            info!("Received toggle command");
            engine.toggle().await?;
        }
        Command::Advance => {
            info!("Received next command");
            engine.advance().await?;
        }
        Command::Unrecognized(text) => {
            warn!("Received unknown command: {}", text);
            writer.write_all(UNKNOWN_COMMAND_RESPONSE.as_bytes()).await?;
        }
    }

    Ok(())
}

/// Read up to and including the first newline and decode it. A peer that
/// hangs up before sending one has not issued a command.
///
/// Only the first [`MAX_LINE_BYTES`] are kept; a longer line is consumed to
/// its newline and always decodes as unrecognized. Invalid UTF-8 is replaced
/// rather than rejected.
async fn read_command<R>(reader: R) -> Result<Command, IpcError>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    let mut truncated = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Err(IpcError::Incomplete);
        }

        let (used, done) = match available.iter().position(|&b| b == b'\n') {
            Some(pos) => (pos + 1, true),
            None => (available.len(), false),
        };
        let room = MAX_LINE_BYTES.saturating_sub(line.len());
        if used > room {
            truncated = true;
        }
        line.extend_from_slice(&available[..used.min(room)]);
        reader.consume(used);

        if done {
            break;
        }
    }

    let text = String::from_utf8_lossy(&line);
    if truncated {
        Ok(Command::Unrecognized(text.trim().to_string()))
    } else {
        Ok(Command::parse(&text))
    }
}
