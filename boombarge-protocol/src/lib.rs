//! BoomBarge Console/Relay Protocol
//!
//! This crate defines the serial protocol between the handheld console and
//! the relay-driver nodes. The message set is fixed and small: the console
//! pings, queries and sets the arm flag, and requests ignition of a channel.
//!
//! # Protocol Overview
//!
//! Every message is a flat record behind a one-byte tag, COBS-encoded and
//! terminated by a zero byte on the wire:
//! ```text
//! ┌──────────────────────────────┬──────┐
//! │ COBS( TAG │ PAYLOAD 0–4B )   │ 0x00 │
//! └──────────────────────────────┴──────┘
//! ```
//!
//! The relay node never trusts the console to release a relay: every close
//! is bounded locally. See `boombarge-core::relay`.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{encode_packet, FrameError, Packet, PacketParser, MAX_PACKET_SIZE};
pub use messages::{Command, DecodeError, MessageBuf, Reply, MAX_MESSAGE_SIZE, RELAY_COUNT};
