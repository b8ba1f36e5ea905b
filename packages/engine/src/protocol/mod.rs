//! Wire-facing message shapes.
//!
//! The transport layer deserializes `GameRequest` objects from clients,
//! applies them to the engine, and pushes `GameNotification`s back out.
//! These types carry enough to reconstruct identical action/event objects
//! on both sides; sockets and sessions stay outside the engine.

mod messages;

pub use messages::{ErrorCode, GameNotification, GameRequest, PROTOCOL_VERSION};
