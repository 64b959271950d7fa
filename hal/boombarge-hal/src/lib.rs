//! BoomBarge Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the board-agnostic
//! core is written against. Chip-specific firmware crates wrap their GPIO
//! types in small adapters that implement these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Firmware (boombarge-relay-fw, console-fw)   │
//! └──────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌──────────────────────────────────────────────┐
//! │  boombarge-core (relay engine, console UX)   │
//! └──────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌──────────────────────────────────────────────┐
//! │  boombarge-hal (this crate - traits)         │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`gpio::ActiveLevel`] - Which logic level means "asserted"

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

// Re-export key traits at crate root for convenience
pub use gpio::{ActiveLevel, InputPin, OutputPin};
