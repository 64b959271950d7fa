//! BoomBarge - Relay Node Firmware
//!
//! Drives the ignitor relay bank of one barge. Commands arrive from the
//! console over UART0 as COBS frames; every closed relay is released by the
//! relay loop after the configured close period, link or no link.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use boombarge_core::relay::RelayEngine;
use boombarge_hal_rp2040::{take_pin, RpOutput};

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("BoomBarge relay node starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());

    let relay_config = config::load();
    let level = relay_config.close_level;

    // Relay bank: GPIO2..=GPIO17. Each pin is latched open before it becomes an output.
    let pins: [RpOutput; tasks::RELAY_CHANNELS] = [
        RpOutput::new_released(take_pin!(p, 2), level),
        RpOutput::new_released(take_pin!(p, 3), level),
        RpOutput::new_released(take_pin!(p, 4), level),
        RpOutput::new_released(take_pin!(p, 5), level),
        RpOutput::new_released(take_pin!(p, 6), level),
        RpOutput::new_released(take_pin!(p, 7), level),
        RpOutput::new_released(take_pin!(p, 8), level),
        RpOutput::new_released(take_pin!(p, 9), level),
        RpOutput::new_released(take_pin!(p, 10), level),
        RpOutput::new_released(take_pin!(p, 11), level),
        RpOutput::new_released(take_pin!(p, 12), level),
        RpOutput::new_released(take_pin!(p, 13), level),
        RpOutput::new_released(take_pin!(p, 14), level),
        RpOutput::new_released(take_pin!(p, 15), level),
        RpOutput::new_released(take_pin!(p, 16), level),
        RpOutput::new_released(take_pin!(p, 17), level),
    ];
    let engine = RelayEngine::new(pins, &relay_config);
    info!(
        "Relay bank ready: {} channels, close period {} ms, close level {:?}",
        tasks::RELAY_CHANNELS,
        relay_config.close_period_ms,
        level
    );

    // Setup UART for the console link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = relay_config.baud_rate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 512]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", relay_config.baud_rate);

    spawner.spawn(unwrap!(tasks::relay_task(engine)));
    spawner.spawn(unwrap!(tasks::serial_rx_task(rx)));
    spawner.spawn(unwrap!(tasks::serial_tx_task(tx)));

    info!("All tasks spawned");
}
