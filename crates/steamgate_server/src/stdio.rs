//! Line-delimited stdio transport.
//!
//! Reads one JSON message per line and writes one response per line.
//! Requests are served concurrently on the current task: the reader keeps
//! accepting lines while earlier calls await upstream, and each response
//! is written as soon as it is ready. On EOF, calls in flight are drained
//! before returning. A line that is not UTF-8 is answered with a parse
//! error like any other malformed message.

use crate::handler::McpHandler;
use crate::protocol::{JsonRpcError, JsonRpcResponse};
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Transport failure
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Reading or writing the channel failed
    #[error("stdio channel: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be encoded
    #[error("encoding response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Serve until the reader reaches EOF and every call has been answered
///
/// # Errors
///
/// Returns error if the channel fails or a response cannot be encoded
pub async fn serve<R, W>(handler: Arc<McpHandler>, mut reader: R, mut writer: W) -> Result<(), ProtocolError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    // partial reads stay in `buf` if the other branch wins the select
    let mut buf = Vec::new();
    let mut in_flight = FuturesUnordered::new();
    let mut reading = true;

    loop {
        tokio::select! {
            read = reader.read_until(b'\n', &mut buf), if reading => {
                if read? == 0 {
                    tracing::debug!(pending = in_flight.len(), "input closed, draining");
                    reading = false;
                    continue;
                }
                match decode_line(std::mem::take(&mut buf)) {
                    Ok(line) if line.trim().is_empty() => {}
                    Ok(line) => {
                        let handler = Arc::clone(&handler);
                        in_flight.push(async move { handler.handle_line(&line).await });
                    }
                    Err(err) => {
                        tracing::debug!(error = %err, "input line is not UTF-8");
                        let response = JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error(err));
                        write_message(&mut writer, &response).await?;
                    }
                }
            },
            Some(response) = in_flight.next(), if !in_flight.is_empty() => {
                if let Some(response) = response {
                    write_message(&mut writer, &response).await?;
                }
            },
            else => break,
        }
    }

    writer.flush().await?;
    Ok(())
}

/// One input line without its terminator
fn decode_line(mut raw: Vec<u8>) -> Result<String, std::string::FromUtf8Error> {
    if raw.last() == Some(&b'\n') {
        raw.pop();
    }
    if raw.last() == Some(&b'\r') {
        raw.pop();
    }
    String::from_utf8(raw)
}

async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, response: &JsonRpcResponse) -> Result<(), ProtocolError> {
    let mut bytes = serde_json::to_vec(response)?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}
