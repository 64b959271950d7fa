//! UX task
//!
//! Owns the console state. Every tick it samples the controls, runs one
//! console poll, queues the resulting commands and renders the view.
//! Packets from the relay node are applied as soon as they arrive.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::clocks::RoscRng;
use embassy_time::{Duration, Instant, Ticker};

use boombarge_core::console::Console;
use boombarge_core::traits::{InputSource, RenderSurface};

use crate::channels::{OUTGOING_CHANNEL, PACKET_CHANNEL, RX_ERROR_STREAK};
use crate::input::GpioControls;
use crate::render::DefmtRenderer;

/// Relay nodes reachable from this board
pub const NODE_COUNT: usize = 1;

/// UX loop period
const UX_TICK_MS: u64 = 10;

/// Consecutive receive errors before the link is reported as faulty
const RX_FAULT_THRESHOLD: u32 = 8;

/// Wrapping millisecond clock shared with the core timing helpers
fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// UX task - console poll loop
#[embassy_executor::task]
pub async fn ux_task(
    mut console: Console<NODE_COUNT>,
    mut controls: GpioControls,
    mut rng: RoscRng,
) {
    info!("UX task started");

    let mut renderer = DefmtRenderer::new();
    let mut ticker = Ticker::every(Duration::from_millis(UX_TICK_MS));
    let mut rx_fault_reported = false;

    loop {
        match select(PACKET_CHANNEL.receive(), ticker.next()).await {
            Either::First(packet) => match console.handle_packet(0, &packet, now_ms()) {
                Ok(reply) => trace!("RX: {:?}", reply),
                Err(e) => warn!("Dropping undecodable reply: {:?}", e),
            },
            Either::Second(()) => {
                let now = now_ms();

                let streak = RX_ERROR_STREAK.load(Ordering::Relaxed);
                if streak >= RX_FAULT_THRESHOLD && !rx_fault_reported {
                    console.report_fault("relay link: repeated receive errors", now);
                    rx_fault_reported = true;
                } else if streak == 0 {
                    rx_fault_reported = false;
                }

                let input = controls.sample();
                for outgoing in console.poll(now, &input, &mut rng) {
                    debug!("TX queued: {:?}", outgoing);
                    if OUTGOING_CHANNEL.try_send(outgoing).is_err() {
                        warn!("Outgoing channel full, dropping {:?}", outgoing);
                    }
                }

                renderer.render(&console.view(now));
            }
        }
    }
}
