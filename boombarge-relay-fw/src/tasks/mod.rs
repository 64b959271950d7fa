//! Embassy async tasks
//!
//! The relay task owns the relay bank; the serial tasks only shuttle bytes.

pub mod relay;
pub mod serial_rx;
pub mod serial_tx;

pub use relay::{relay_task, RELAY_CHANNELS};
pub use serial_rx::serial_rx_task;
pub use serial_tx::serial_tx_task;
