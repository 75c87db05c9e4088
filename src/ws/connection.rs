//! WebSocket connection state machine.
//!
//! Handles the read/reply loop for a single WebSocket connection: every
//! payload frame is handed to the console queue and answered with
//! [`REPLY`] before the next frame is read.

use std::sync::Arc;

use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, close_code};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::watch;
use tracing::Instrument;

use super::messages::{Frame, REPLY, reply};
use crate::app_state::AppState;
use crate::console::ConsoleHandle;
use crate::domain::{ConnectionEntry, ConnectionId, ConnectionRegistry};
use crate::error::ConnectionError;

/// Lifecycle of a connection. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Receiving and replying.
    #[default]
    Open,
    /// Peer closed, transport failed, or server shut down.
    Closed,
}

/// What the loop does with one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Show the text and send the reply.
    Display(String),
    /// Nothing to do; read the next frame.
    Ignore,
    /// Stop the loop.
    Close,
}

impl ConnectionState {
    /// Applies one inbound frame and returns the action to take.
    pub fn on_frame(&mut self, frame: Frame) -> Step {
        match (*self, frame) {
            (Self::Closed, _) => Step::Close,
            (Self::Open, Frame::Payload(text)) => Step::Display(text),
            (Self::Open, Frame::Control) => Step::Ignore,
            (Self::Open, Frame::Close) => {
                self.close();
                Step::Close
            }
        }
    }

    /// Moves to `Closed`.
    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    /// Returns `true` while the connection is open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Everything a connection task needs from the server.
#[derive(Debug)]
pub struct ConnectionContext {
    /// Identifier used in the registry and logs.
    pub id: ConnectionId,
    /// Path the client upgraded on.
    pub path: String,
    /// Producer side of the display queue.
    pub console: ConsoleHandle,
    /// Registry of open connections.
    pub registry: Arc<ConnectionRegistry>,
    /// Flips to `true` (or closes) when the server is shutting down.
    pub shutdown: watch::Receiver<bool>,
}

impl ConnectionContext {
    /// Builds a context for a new connection on `path`.
    #[must_use]
    pub fn new(path: impl Into<String>, state: &AppState) -> Self {
        Self {
            id: ConnectionId::new(),
            path: path.into(),
            console: state.console.clone(),
            registry: Arc::clone(&state.registry),
            shutdown: state.shutdown.clone(),
        }
    }
}

/// Runs the read/reply loop for a single WebSocket connection.
///
/// Registers the connection for its lifetime. Errors end this connection
/// only and are logged, never returned.
pub async fn run_connection(socket: WebSocket, ctx: ConnectionContext) {
    let span = tracing::info_span!("ws_connection", id = %ctx.id, path = %ctx.path);
    async move {
        let id = ctx.id;
        let registry = Arc::clone(&ctx.registry);
        registry
            .insert(ConnectionEntry::new(id, ctx.path.clone()))
            .await;
        tracing::debug!("ws connection opened");

        match message_loop(socket, ctx).await {
            Ok(()) => tracing::debug!("ws connection closed by server shutdown"),
            Err(e) if e.is_closed() => tracing::debug!("ws connection closed by peer"),
            Err(e) => tracing::debug!(error = %e, "ws connection failed"),
        }

        let messages = registry.remove(id).await.map_or(0, |entry| entry.messages);
        tracing::debug!(messages, "ws connection closed");
    }
    .instrument(span)
    .await;
}

/// Returns `Ok(())` when stopped by shutdown, otherwise the reason the
/// peer side ended.
async fn message_loop(socket: WebSocket, ctx: ConnectionContext) -> Result<(), ConnectionError> {
    let ConnectionContext {
        id,
        console,
        registry,
        mut shutdown,
        ..
    } = ctx;
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut state = ConnectionState::Open;

    if *shutdown.borrow_and_update() {
        state.close();
        return going_away(&mut ws_tx).await;
    }

    while state.is_open() {
        tokio::select! {
            // Incoming frame from client
            msg = ws_rx.next() => {
                let frame = match msg {
                    Some(Ok(msg)) => Frame::from(msg),
                    Some(Err(e)) => {
                        state.close();
                        return Err(ConnectionError::Transport(e));
                    }
                    None => Frame::Close,
                };
                match state.on_frame(frame) {
                    Step::Display(text) => {
                        if !console.show(text) {
                            tracing::warn!("console queue closed; message not displayed");
                        }
                        registry.record_message(id).await;
                        ws_tx.send(reply()).await?;
                        tracing::trace!(reply = REPLY, "acknowledged message");
                    }
                    Step::Ignore => {}
                    Step::Close => return Err(ConnectionError::Closed),
                }
            }
            // Server shutdown
            _ = shutdown.changed() => {
                state.close();
                return going_away(&mut ws_tx).await;
            }
        }
    }

    Err(ConnectionError::Closed)
}

async fn going_away(ws_tx: &mut SplitSink<WebSocket, Message>) -> Result<(), ConnectionError> {
    let frame = CloseFrame {
        code: close_code::AWAY,
        reason: Utf8Bytes::from_static("server shutting down"),
    };
    ws_tx.send(Message::Close(Some(frame))).await?;
    Ok(())
}
