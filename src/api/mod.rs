//! Plain HTTP surface. Only the health report lives here; every other
//! request is a WebSocket upgrade handled by [`crate::ws`].

pub mod system;
