//! GPIO wrappers implementing the shared pin traits

use boombarge_hal::{ActiveLevel, InputPin, OutputPin};
use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use embassy_rp::Peri;

/// Push-pull output driving a relay coil or indicator
pub struct RpOutput {
    pin: Output<'static>,
}

impl RpOutput {
    /// Configure `pin` as an output that starts at the released level
    ///
    /// The level is latched before the pad is switched to output, so the
    /// pin never glitches to the asserted level during boot.
    pub fn new_released(pin: Peri<'static, AnyPin>, active: ActiveLevel) -> Self {
        let initial = Level::from(active.pin_state(false));
        Self {
            pin: Output::new(pin, initial),
        }
    }
}

impl OutputPin for RpOutput {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

/// Digital input with internal pull
pub struct RpInput {
    pin: Input<'static>,
}

impl RpInput {
    /// Input for a switch to ground, idle HIGH
    pub fn pull_up(pin: Peri<'static, AnyPin>) -> Self {
        Self {
            pin: Input::new(pin, Pull::Up),
        }
    }
}

impl InputPin for RpInput {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}
