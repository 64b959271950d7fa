//! Console UART transmit task

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use boombarge_protocol::{encode_packet, MAX_PACKET_SIZE};

use crate::channels::REPLY_CHANNEL;

/// Serial TX task - frames replies and writes them to the console link
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    info!("Serial TX task started");

    let mut buf = [0u8; MAX_PACKET_SIZE];

    loop {
        let reply = REPLY_CHANNEL.receive().await;
        let message = reply.encode();

        let len = match encode_packet(&message, &mut buf) {
            Ok(len) => len,
            Err(e) => {
                error!("Failed to frame reply {:?}: {:?}", reply, e);
                continue;
            }
        };

        if let Err(e) = tx.write_all(&buf[..len]).await {
            warn!("Failed to send reply: {:?}", e);
        } else {
            trace!("TX: {:?}", reply);
        }
    }
}
