//! Relay actuation (runs on the relay node)
//!
//! The engine owns every relay output. A channel closes only in response
//! to an `Ignite` command while armed, and every closed channel is released
//! once its close period has passed, whatever else the link is doing.

pub mod channel;
pub mod engine;

pub use channel::RelayChannel;
pub use engine::{IgniteOutcome, RelayEngine};
