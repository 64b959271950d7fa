//! Inter-task communication channels
//!
//! The relay engine is owned by the relay task alone; the UART tasks only
//! move whole packets and replies in and out of it.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use portable_atomic::AtomicU32;

use boombarge_protocol::{Packet, Reply};

/// Channel capacity for received packets
const PACKET_CHANNEL_SIZE: usize = 4;

/// Channel capacity for outgoing replies
const REPLY_CHANNEL_SIZE: usize = 8;

/// De-framed packets from the console, oldest first
pub static PACKET_CHANNEL: Channel<CriticalSectionRawMutex, Packet, PACKET_CHANNEL_SIZE> =
    Channel::new();

/// Replies waiting to be framed and sent
pub static REPLY_CHANNEL: Channel<CriticalSectionRawMutex, Reply, REPLY_CHANNEL_SIZE> =
    Channel::new();

/// Frames dropped since boot (framing errors, decode errors, full channels)
pub static DROPPED_FRAMES: AtomicU32 = AtomicU32::new(0);
