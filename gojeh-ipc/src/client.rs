//! One-shot client: connect, send a line, read whatever comes back.

use crate::{Command, IpcError};
use std::io::ErrorKind;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

/// Send `command` to the daemon listening on `socket_path`.
///
/// Returns the daemon's reply with surrounding whitespace trimmed, or `None`
/// when the daemon closed the connection without writing anything (which is
/// what it does for every command it understands).
pub async fn send(
    socket_path: impl AsRef<Path>,
    command: &Command,
) -> Result<Option<String>, IpcError> {
    let mut stream = UnixStream::connect(socket_path.as_ref())
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::ConnectionRefused => IpcError::ConnectionRefused,
            _ => IpcError::Io(e),
        })?;

    stream.write_all(command.as_str().as_bytes()).await?;
    stream.write_all(b"\n").await?;
    stream.shutdown().await?;

    let mut reply = String::new();
    stream.read_to_string(&mut reply).await?;

    let reply = reply.trim();
    if reply.is_empty() {
        Ok(None)
    } else {
        Ok(Some(reply.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::UnixListener;

    #[tokio::test]
    async fn missing_socket_is_connection_refused() {
        let dir = tempfile::tempdir().unwrap();
        let err = send(dir.path().join("absent.sock"), &Command::Toggle)
            .await
            .unwrap_err();
        assert!(matches!(err, IpcError::ConnectionRefused));
    }

    #[tokio::test]
    async fn sends_line_and_returns_reply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gojeh.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (reader, mut writer) = stream.into_split();
            let mut line = String::new();
            BufReader::new(reader).read_line(&mut line).await.unwrap();
            writer.write_all(b"  pong \n").await.unwrap();
            line
        });

        let reply = send(&path, &Command::Unrecognized("ping".into()))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("pong"));
        assert_eq!(server.await.unwrap(), "ping\n");
    }

    #[tokio::test]
    async fn silent_close_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gojeh.sock");
        let listener = UnixListener::bind(&path).unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut line = String::new();
            BufReader::new(stream).read_line(&mut line).await.unwrap();
        });

        let reply = send(&path, &Command::Toggle).await.unwrap();
        assert_eq!(reply, None);
    }
}
