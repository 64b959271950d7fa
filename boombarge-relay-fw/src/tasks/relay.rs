//! Relay bank task
//!
//! Runs every millisecond whether or not packets arrive, so a closed relay
//! is released on time even when the console link is dead.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use boombarge_core::relay::RelayEngine;
use boombarge_hal_rp2040::RpOutput;
use boombarge_protocol::RELAY_COUNT;

use crate::channels::{DROPPED_FRAMES, PACKET_CHANNEL, REPLY_CHANNEL};

/// Relays driven by this board
pub const RELAY_CHANNELS: usize = RELAY_COUNT as usize;

/// Relay loop period
const RELAY_TICK_MS: u64 = 1;

/// Wrapping millisecond clock shared with the core timing helpers
fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Relay task - sweeps expired closures and executes queued commands
#[embassy_executor::task]
pub async fn relay_task(mut engine: RelayEngine<RpOutput, RELAY_CHANNELS>) {
    info!("Relay task started");

    let mut ticker = Ticker::every(Duration::from_millis(RELAY_TICK_MS));

    loop {
        let now = now_ms();

        let released = engine.sweep(now);
        if released > 0 {
            debug!("Released {} relay(s)", released);
        }

        while let Ok(packet) = PACKET_CHANNEL.try_receive() {
            let was_armed = engine.is_armed();
            let reply = match engine.handle_packet(&packet, now) {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("Dropping undecodable packet: {:?}", e);
                    DROPPED_FRAMES.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
            };

            if engine.is_armed() != was_armed {
                info!(
                    "Relay bank {}",
                    if engine.is_armed() { "ARMED" } else { "disarmed" }
                );
            }

            if let Some(reply) = reply {
                trace!("TX queued: {:?}", reply);
                if REPLY_CHANNEL.try_send(reply).is_err() {
                    warn!("Reply channel full, dropping {:?}", reply);
                }
            }
        }

        ticker.next().await;
    }
}
