//! Embassy async tasks
//!
//! The UX task owns the console state; the serial tasks only shuttle bytes.

pub mod serial_rx;
pub mod serial_tx;
pub mod ux;

pub use serial_rx::serial_rx_task;
pub use serial_tx::serial_tx_task;
pub use ux::{ux_task, NODE_COUNT};
