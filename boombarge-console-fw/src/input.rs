//! GPIO-backed console controls

use boombarge_core::input::{Axis, Button, ButtonMask, DPad, InputState};
use boombarge_core::traits::InputSource;
use boombarge_hal_rp2040::{ActiveLevel, RpInput};

const BUTTON_COUNT: usize = Button::ALL.len();

/// Push buttons and a four-switch d-pad, all switching to ground
///
/// The console has no analog sticks; their axes always read centered.
pub struct GpioControls {
    buttons: [RpInput; BUTTON_COUNT],
    /// Up, right, down, left
    dpad: [RpInput; 4],
}

impl GpioControls {
    /// `buttons` are in [`Button::ALL`] order
    pub fn new(buttons: [RpInput; BUTTON_COUNT], dpad: [RpInput; 4]) -> Self {
        Self { buttons, dpad }
    }

    fn pressed(pin: &RpInput) -> bool {
        ActiveLevel::Low.is_asserted(pin)
    }
}

impl InputSource for GpioControls {
    fn sample(&mut self) -> InputState {
        let buttons = Button::ALL
            .iter()
            .zip(&self.buttons)
            .filter(|(_, pin)| Self::pressed(pin))
            .fold(ButtonMask::NONE, |mask, (&button, _)| mask.with(button));

        let [up, right, down, left] = &self.dpad;
        let dpad = DPad::from_switches(
            Self::pressed(up),
            Self::pressed(right),
            Self::pressed(down),
            Self::pressed(left),
        );

        let mut state = InputState {
            buttons,
            ..InputState::default()
        };
        state.axes[Axis::DPad as usize] = dpad.to_raw();
        state
    }
}
