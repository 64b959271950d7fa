//! Relay link UART receive task

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use boombarge_protocol::PacketParser;

use crate::channels::{PACKET_CHANNEL, RX_ERROR_STREAK};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Serial RX task - receives and de-frames packets from the relay node
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut parser = PacketParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(packet)) => {
                            RX_ERROR_STREAK.store(0, Ordering::Relaxed);
                            if PACKET_CHANNEL.try_send(packet).is_err() {
                                warn!("Packet channel full, dropping packet");
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Frame error: {:?}", e);
                            RX_ERROR_STREAK.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
                RX_ERROR_STREAK.fetch_add(1, Ordering::Relaxed);
                parser.reset();
            }
        }
    }
}
