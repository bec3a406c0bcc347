//! Shared types for the dine-in ordering platform
//!
//! Types used by both the server and clients: the real-time event
//! protocol, order domain enums and views, and small utilities.

pub mod message;
pub mod order;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Event protocol re-exports (for convenient access)
pub use message::{Audience, ClientMessage, EventFrame, OrderEvent, order_room};
