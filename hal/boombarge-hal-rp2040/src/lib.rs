//! RP2040-specific HAL for the ignition rig firmware
//!
//! Implements the shared `boombarge-hal` pin traits on top of embassy-rp
//! GPIO drivers, and provides the pin macros both firmwares use to hand
//! numbered pins to those drivers.

#![no_std]

pub mod gpio;
pub mod pins;

pub use gpio::{RpInput, RpOutput};

// Re-export shared traits from boombarge-hal for convenience
pub use boombarge_hal::{ActiveLevel, InputPin, OutputPin};
