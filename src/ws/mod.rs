//! WebSocket layer: upgrade handling, frame classification, and the
//! per-connection read/reply loop.
//!
//! Every path accepts the upgrade; there is no routing.

pub mod connection;
pub mod handler;
pub mod messages;
