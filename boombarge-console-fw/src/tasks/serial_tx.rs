//! Relay link UART transmit task

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use boombarge_core::console::{Destination, Outgoing};
use boombarge_protocol::{encode_packet, MAX_PACKET_SIZE};

use crate::channels::OUTGOING_CHANNEL;

/// Serial TX task - frames console commands onto the relay link
///
/// This board has a single link, wired to node 0.
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    info!("Serial TX task started");

    let mut buf = [0u8; MAX_PACKET_SIZE];

    loop {
        let Outgoing {
            destination,
            command,
        } = OUTGOING_CHANNEL.receive().await;

        if let Destination::Node(node) = destination {
            if node != 0 {
                warn!("No link to node {}, dropping {:?}", node, command);
                continue;
            }
        }

        let message = command.encode();
        let len = match encode_packet(&message, &mut buf) {
            Ok(len) => len,
            Err(e) => {
                error!("Failed to frame {:?}: {:?}", command, e);
                continue;
            }
        };

        if let Err(e) = tx.write_all(&buf[..len]).await {
            warn!("Failed to send {:?}: {:?}", command, e);
        } else {
            trace!("TX: {:?}", command);
        }
    }
}
