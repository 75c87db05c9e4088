//! Domain layer: connection identity and the registry of open connections.

pub mod connection_entry;
pub mod connection_id;
pub mod connection_registry;

pub use connection_entry::ConnectionEntry;
pub use connection_id::ConnectionId;
pub use connection_registry::ConnectionRegistry;
