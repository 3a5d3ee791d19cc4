use crate::{error::SocketError, profile::unix_time_ns};
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use std::{fmt::Debug, sync::Arc, time::Duration};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, connect_async,
    tungstenite::{client::IntoClientRequest, error::ProtocolError},
};
use tracing::debug;

/// Convenient type alias for a tungstenite `WebSocketStream`.
pub type WebSocket = tokio_tungstenite::WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Communicative type alias for a tungstenite [`WebSocket`] `Message`.
pub type WsMessage = tokio_tungstenite::tungstenite::Message;

/// Communicative type alias for a tungstenite [`WebSocket`] `Error`.
pub type WsError = tokio_tungstenite::tungstenite::Error;

/// Interval between [`StreamHandler::check_timers`] service ticks.
pub const SERVICE_TICK: Duration = Duration::from_millis(100);

/// Callback contract a connector implements to consume a [`WsSession`].
///
/// All callbacks run on the session's read task. [`StreamHandler::on_close`] fires exactly once
/// per successful connection, after the remote stream ends for any reason.
pub trait StreamHandler: Send + Sync + 'static {
    /// A data frame arrived, stamped with the network receive timestamp in nanoseconds.
    fn on_data(&self, payload: Bytes, recv_time_ns: u64);

    /// Periodic service tick for keep-alive and timeout housekeeping.
    fn check_timers(&self, now_ns: u64) {
        let _ = now_ns;
    }

    /// The connection ended.
    fn on_close(&self) {}
}

/// Duplex WebSocket session: a persistent subscription stream plus queued frame writes.
///
/// [`WsSession::connect`] resolves once the handshake completes (or fails), after which a read
/// task delivers inbound frames and service ticks to the [`StreamHandler`]. Writes are queued
/// on an unbounded channel and flushed by a dedicated write task.
#[derive(Debug, Clone)]
pub struct WsSession {
    write_tx: mpsc::UnboundedSender<WsMessage>,
}

impl WsSession {
    /// Connect asynchronously, resolving at handshake completion.
    pub async fn connect<R>(request: R, handler: Arc<dyn StreamHandler>) -> Result<Self, SocketError>
    where
        R: IntoClientRequest + Unpin + Debug,
    {
        debug!(?request, "attempting to establish WebSocket connection");
        let (websocket, _) = connect_async(request).await?;
        let (mut sink, mut stream) = websocket.split();

        let (write_tx, mut write_rx) = mpsc::unbounded_channel::<WsMessage>();

        tokio::spawn(async move {
            while let Some(message) = write_rx.recv().await {
                if let Err(error) = sink.send(message).await {
                    debug!(%error, "failed to send WebSocket message, closing write task");
                    break;
                }
            }
        });

        tokio::spawn(async move {
            let mut service_tick = tokio::time::interval(SERVICE_TICK);
            service_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = service_tick.tick() => handler.check_timers(unix_time_ns()),
                    frame = stream.next() => match frame {
                        Some(Ok(WsMessage::Text(payload))) => {
                            handler.on_data(Bytes::from(payload.as_bytes().to_vec()), unix_time_ns());
                        }
                        Some(Ok(WsMessage::Binary(payload))) => {
                            handler.on_data(payload, unix_time_ns());
                        }
                        Some(Ok(WsMessage::Ping(payload) | WsMessage::Pong(payload))) => {
                            debug!(?payload, "received control WebSocket message");
                        }
                        Some(Ok(WsMessage::Close(close_frame))) => {
                            debug!(?close_frame, "received CloseFrame WebSocket message");
                            break;
                        }
                        Some(Ok(WsMessage::Frame(frame))) => {
                            debug!(?frame, "received unexpected Frame WebSocket message");
                        }
                        Some(Err(error)) => {
                            debug!(%error, "WebSocket stream error");
                            break;
                        }
                        None => break,
                    }
                }
            }

            handler.on_close();
        });

        Ok(Self { write_tx })
    }

    /// Queue a frame for transmission.
    pub fn write(&self, message: WsMessage) -> Result<(), SocketError> {
        self.write_tx.send(message).map_err(|_| SocketError::Sink)
    }

    /// Queue a text frame for transmission.
    pub fn write_text(&self, payload: String) -> Result<(), SocketError> {
        self.write(WsMessage::text(payload))
    }

    /// Queue a close frame, tearing the connection down remotely.
    pub fn close(&self) {
        let _ = self.write(WsMessage::Close(None));
    }
}

/// Determine whether a [`WsError`] indicates the [`WebSocket`] has disconnected.
pub fn is_websocket_disconnected(error: &WsError) -> bool {
    matches!(
        error,
        WsError::ConnectionClosed
            | WsError::AlreadyClosed
            | WsError::Io(_)
            | WsError::Protocol(ProtocolError::SendAfterClosing)
    )
}
