//! Inter-task communication channels

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use portable_atomic::AtomicU32;

use boombarge_core::console::{Outgoing, OUTBOX_CAPACITY};
use boombarge_protocol::Packet;

/// Channel capacity for received packets
const PACKET_CHANNEL_SIZE: usize = 8;

/// De-framed packets from the relay node
pub static PACKET_CHANNEL: Channel<CriticalSectionRawMutex, Packet, PACKET_CHANNEL_SIZE> =
    Channel::new();

/// Commands produced by the console, in dispatch order
///
/// Sized so one full poll (a whole sequence at once) always fits.
pub static OUTGOING_CHANNEL: Channel<CriticalSectionRawMutex, Outgoing, OUTBOX_CAPACITY> =
    Channel::new();

/// Receive errors since the last good packet
pub static RX_ERROR_STREAK: AtomicU32 = AtomicU32::new(0);
