//! BoomBarge - Arming Console Firmware
//!
//! Handheld console that arms the relay node and plays ignition sequences.
//! Every command the operator can send is gated behind the arm-code
//! challenge or the hold-to-trigger guard; the relay node is reached over
//! UART0 as a COBS-framed link.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use boombarge_core::console::Console;
use boombarge_hal_rp2040::{take_pin, RpInput};

mod channels;
mod config;
mod input;
mod render;
mod tasks;

use input::GpioControls;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("BoomBarge console starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());

    let rig = config::load();
    info!(
        "{} sequence(s), arm timeout {} ms, trigger hold {} ms",
        rig.sequences.len(),
        rig.console.arm_timeout_ms,
        rig.console.trigger_hold_ms
    );

    // Buttons switch to ground: GPIO2..=GPIO13 in `Button` order, d-pad on GPIO14..=GPIO17
    let controls = GpioControls::new(
        [
            RpInput::pull_up(take_pin!(p, 2)),
            RpInput::pull_up(take_pin!(p, 3)),
            RpInput::pull_up(take_pin!(p, 4)),
            RpInput::pull_up(take_pin!(p, 5)),
            RpInput::pull_up(take_pin!(p, 6)),
            RpInput::pull_up(take_pin!(p, 7)),
            RpInput::pull_up(take_pin!(p, 8)),
            RpInput::pull_up(take_pin!(p, 9)),
            RpInput::pull_up(take_pin!(p, 10)),
            RpInput::pull_up(take_pin!(p, 11)),
            RpInput::pull_up(take_pin!(p, 12)),
            RpInput::pull_up(take_pin!(p, 13)),
        ],
        [
            RpInput::pull_up(take_pin!(p, 14)),
            RpInput::pull_up(take_pin!(p, 15)),
            RpInput::pull_up(take_pin!(p, 16)),
            RpInput::pull_up(take_pin!(p, 17)),
        ],
    );

    let console = Console::<{ tasks::NODE_COUNT }>::from_rig(&rig);

    // Setup UART for the relay link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = rig.console.baud_rate;

    let tx_buf = TX_BUF.init([0u8; 512]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", rig.console.baud_rate);

    spawner.spawn(unwrap!(tasks::serial_rx_task(rx)));
    spawner.spawn(unwrap!(tasks::serial_tx_task(tx)));
    spawner.spawn(unwrap!(tasks::ux_task(console, controls, RoscRng)));

    info!("All tasks spawned");
}
