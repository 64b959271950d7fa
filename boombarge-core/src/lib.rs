//! Board-agnostic core logic for the ignition rig firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Relay actuation engine with bounded close periods (relay node)
//! - Arm-code challenge and hold-to-trigger guard (console)
//! - Link liveness tracking, notifications and the sequencer (console)
//! - Configuration types and the `rig.toml` parser
//! - Input and render abstraction traits
//!
//! Every state machine here is polled with the current time in
//! milliseconds. Time comes from a free-running `u32` counter and all
//! comparisons tolerate wraparound (see [`timing`]).

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod console;
pub mod input;
pub mod relay;
pub mod timing;
pub mod traits;

#[cfg(test)]
mod test_util;
