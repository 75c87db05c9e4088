//! # console-echo
//!
//! WebSocket server that shows every inbound message on its own terminal
//! and acknowledges it with `"Done"`.
//!
//! For each message a connection receives, the server clears its terminal,
//! prints the message, and replies `"Done"` on the same connection. Every
//! path accepts the upgrade. Connections are independent; one failing or
//! closing never affects another.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, any path)
//!     │
//!     ├── Upgrade handler (ws/handler)
//!     ├── Connection loop (ws/connection) ── one task per connection
//!     │       │
//!     │       ├── ConnectionRegistry (domain/)
//!     │       └── ConsoleHandle ──► ConsoleQueue ──► ConsoleSink (console/)
//!     │
//!     └── Server lifecycle (server) ── bind, serve, drain, flush
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod console;
pub mod domain;
pub mod error;
pub mod server;
pub mod ws;
