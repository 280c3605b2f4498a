//! Newline-delimited JSON over TCP

use super::wire::{decode_line, encode_line, OutboundEvent};
use super::ChannelError;
use crate::runtime::{EventChannel, SessionInput};
use async_trait::async_trait;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// Event channel over one TCP connection
///
/// Outbound events are written from the session runtime; a background reader
/// task forwards every inbound line into the runtime's input queue.
pub struct TcpEventChannel {
    writer: Mutex<OwnedWriteHalf>,
    peer: SocketAddr,
    reader: JoinHandle<()>,
}

impl TcpEventChannel {
    pub async fn connect(
        addr: impl ToSocketAddrs,
        inbound: mpsc::Sender<SessionInput>,
    ) -> Result<Self, ChannelError> {
        let stream = TcpStream::connect(addr).await?;
        Self::from_stream(stream, inbound)
    }

    pub fn from_stream(
        stream: TcpStream,
        inbound: mpsc::Sender<SessionInput>,
    ) -> Result<Self, ChannelError> {
        let peer = stream.peer_addr()?;
        stream.set_nodelay(true)?;
        let (read_half, write_half) = stream.into_split();
        let reader = tokio::spawn(read_loop(read_half, inbound, peer));
        tracing::info!(%peer, "Connected to interviewer service");

        Ok(Self {
            writer: Mutex::new(write_half),
            peer,
            reader,
        })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl Drop for TcpEventChannel {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[async_trait]
impl EventChannel for TcpEventChannel {
    async fn send(&self, event: &OutboundEvent) -> Result<(), ChannelError> {
        // The reader stops once the service hangs up
        if self.reader.is_finished() {
            return Err(ChannelError::Closed);
        }
        let line = encode_line(event).map_err(|source| ChannelError::Encode {
            event: event.name(),
            source,
        })?;
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        tracing::debug!(peer = %self.peer, event = event.name(), bytes = line.len(), "Wrote event");
        Ok(())
    }
}

async fn read_loop(
    read_half: OwnedReadHalf,
    inbound: mpsc::Sender<SessionInput>,
    peer: SocketAddr,
) {
    let mut lines = BufReader::new(read_half).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                let named = match decode_line(&line) {
                    Ok(named) => named,
                    Err(e) => {
                        tracing::warn!(%peer, error = %e, "Skipping malformed inbound line");
                        continue;
                    }
                };
                tracing::debug!(%peer, event = %named.event, "Received event");
                if inbound.send(SessionInput::Inbound(named)).await.is_err() {
                    tracing::debug!(%peer, "Session runtime gone, stopping reader");
                    break;
                }
            }
            Ok(None) => {
                tracing::info!(%peer, "Interviewer service closed the connection");
                break;
            }
            Err(e) => {
                tracing::error!(%peer, error = %e, "Failed to read from interviewer service");
                break;
            }
        }
    }
}
