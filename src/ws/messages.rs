//! Inbound frame classification and the fixed reply.

use axum::extract::ws::Message;

/// The acknowledgement sent back for every displayed message.
pub const REPLY: &str = "Done";

/// What an inbound WebSocket frame means to the message loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A message to display and acknowledge.
    Payload(String),
    /// Ping/pong traffic. The WebSocket layer answers pings itself.
    Control,
    /// The peer closed the connection or the stream ended.
    Close,
}

impl From<Message> for Frame {
    fn from(msg: Message) -> Self {
        match msg {
            Message::Text(text) => Self::Payload(text.as_str().to_owned()),
            // Binary payloads are shown as (lossy) UTF-8 and acknowledged
            // the same way as text.
            Message::Binary(bytes) => Self::Payload(String::from_utf8_lossy(&bytes).into_owned()),
            Message::Ping(_) | Message::Pong(_) => Self::Control,
            Message::Close(_) => Self::Close,
        }
    }
}

/// Builds the reply frame.
#[must_use]
pub fn reply() -> Message {
    Message::text(REPLY)
}
