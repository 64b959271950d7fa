//! Gamepad-style console input
//!
//! The console hardware reports a button bitmask and five axis bytes each
//! poll. Components never look at raw levels for actions; they run each
//! button through a [`ButtonLatch`] and act on edges.

/// Number of axes reported per sample
pub const AXIS_COUNT: usize = 5;

/// Resting value of an analog stick axis
pub const AXIS_CENTER: u8 = 128;

/// Console buttons, numbered by their bit in [`ButtonMask`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Button {
    Face1 = 0,
    Face2 = 1,
    Face3 = 2,
    Face4 = 3,
    LeftBumper = 4,
    RightBumper = 5,
    LeftTrigger = 6,
    RightTrigger = 7,
    Menu1 = 8,
    Menu2 = 9,
    LeftThumb = 10,
    RightThumb = 11,
}

impl Button {
    /// All buttons in bit order
    pub const ALL: [Button; 12] = [
        Button::Face1,
        Button::Face2,
        Button::Face3,
        Button::Face4,
        Button::LeftBumper,
        Button::RightBumper,
        Button::LeftTrigger,
        Button::RightTrigger,
        Button::Menu1,
        Button::Menu2,
        Button::LeftThumb,
        Button::RightThumb,
    ];

    /// The four face buttons, in arm-code digit order
    pub const FACE: [Button; 4] = [Button::Face1, Button::Face2, Button::Face3, Button::Face4];

    /// Bit for this button in a [`ButtonMask`]
    pub const fn bit(self) -> u32 {
        1 << (self as u8)
    }
}

/// Set of pressed buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonMask(pub u32);

impl ButtonMask {
    pub const NONE: ButtonMask = ButtonMask(0);

    /// Mask with exactly the given buttons pressed
    pub fn from_buttons(buttons: &[Button]) -> Self {
        buttons.iter().fold(Self::NONE, |mask, &b| mask.with(b))
    }

    pub fn is_pressed(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn with(self, button: Button) -> Self {
        ButtonMask(self.0 | button.bit())
    }

    pub fn without(self, button: Button) -> Self {
        ButtonMask(self.0 & !button.bit())
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Axis slots in [`InputState::axes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    LeftStickX = 0,
    LeftStickY = 1,
    RightStickX = 2,
    RightStickY = 3,
    /// Hat switch position, see [`DPad`]
    DPad = 4,
}

/// D-pad (hat switch) position
///
/// Raw values 0..=7 run clockwise from up; anything else is centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DPad {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    Center,
}

impl DPad {
    /// Raw axis value reported when no direction is held
    pub const RAW_CENTER: u8 = 8;

    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => DPad::Up,
            1 => DPad::UpRight,
            2 => DPad::Right,
            3 => DPad::DownRight,
            4 => DPad::Down,
            5 => DPad::DownLeft,
            6 => DPad::Left,
            7 => DPad::UpLeft,
            _ => DPad::Center,
        }
    }

    /// Combine four direction switches; opposing switches cancel out
    pub fn from_switches(up: bool, right: bool, down: bool, left: bool) -> Self {
        let vertical = up as i8 - down as i8;
        let horizontal = right as i8 - left as i8;
        match (vertical, horizontal) {
            (1, 0) => DPad::Up,
            (1, 1) => DPad::UpRight,
            (0, 1) => DPad::Right,
            (-1, 1) => DPad::DownRight,
            (-1, 0) => DPad::Down,
            (-1, -1) => DPad::DownLeft,
            (0, -1) => DPad::Left,
            (1, -1) => DPad::UpLeft,
            _ => DPad::Center,
        }
    }

    pub fn to_raw(self) -> u8 {
        match self {
            DPad::Up => 0,
            DPad::UpRight => 1,
            DPad::Right => 2,
            DPad::DownRight => 3,
            DPad::Down => 4,
            DPad::DownLeft => 5,
            DPad::Left => 6,
            DPad::UpLeft => 7,
            DPad::Center => Self::RAW_CENTER,
        }
    }
}

/// One sample of the console controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputState {
    pub buttons: ButtonMask,
    pub axes: [u8; AXIS_COUNT],
}

impl Default for InputState {
    /// Nothing pressed, sticks centered, d-pad released
    fn default() -> Self {
        Self {
            buttons: ButtonMask::NONE,
            axes: [
                AXIS_CENTER,
                AXIS_CENTER,
                AXIS_CENTER,
                AXIS_CENTER,
                DPad::RAW_CENTER,
            ],
        }
    }
}

impl InputState {
    /// Sample with the given buttons held and everything else at rest
    pub fn with_buttons(buttons: &[Button]) -> Self {
        Self {
            buttons: ButtonMask::from_buttons(buttons),
            ..Self::default()
        }
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.buttons.is_pressed(button)
    }

    pub fn axis(&self, axis: Axis) -> u8 {
        self.axes[axis as usize]
    }

    pub fn dpad(&self) -> DPad {
        DPad::from_raw(self.axis(Axis::DPad))
    }
}

/// Edge reported by a [`ButtonLatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    None,
    Pressed,
    Released,
}

/// Per-button edge detector
///
/// Remembers the level seen on the previous poll so a held button produces
/// exactly one `Pressed` and one `Released`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonLatch {
    was_pressed: bool,
}

impl ButtonLatch {
    pub const fn new() -> Self {
        Self { was_pressed: false }
    }

    /// Feed the current level and get the edge since the last call
    pub fn update(&mut self, pressed: bool) -> Edge {
        let edge = match (self.was_pressed, pressed) {
            (false, true) => Edge::Pressed,
            (true, false) => Edge::Released,
            _ => Edge::None,
        };
        self.was_pressed = pressed;
        edge
    }

    pub fn is_held(&self) -> bool {
        self.was_pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_bits_match_wire_layout() {
        assert_eq!(Button::Face1.bit(), 0x001);
        assert_eq!(Button::Face4.bit(), 0x008);
        assert_eq!(Button::RightTrigger.bit(), 0x080);
        assert_eq!(Button::Menu2.bit(), 0x200);
    }

    #[test]
    fn test_mask_from_buttons() {
        let mask = ButtonMask::from_buttons(&[Button::LeftTrigger, Button::RightTrigger]);
        assert!(mask.is_pressed(Button::LeftTrigger));
        assert!(mask.is_pressed(Button::RightTrigger));
        assert!(!mask.is_pressed(Button::Face1));
        assert!(mask.without(Button::LeftTrigger).without(Button::RightTrigger).is_empty());
    }

    #[test]
    fn test_default_state_is_at_rest() {
        let state = InputState::default();
        assert!(state.buttons.is_empty());
        assert_eq!(state.axis(Axis::LeftStickX), AXIS_CENTER);
        assert_eq!(state.dpad(), DPad::Center);
    }

    #[test]
    fn test_dpad_raw_values() {
        assert_eq!(DPad::from_raw(0), DPad::Up);
        assert_eq!(DPad::from_raw(2), DPad::Right);
        assert_eq!(DPad::from_raw(6), DPad::Left);
        assert_eq!(DPad::from_raw(8), DPad::Center);
        assert_eq!(DPad::from_raw(200), DPad::Center);
        for raw in 0..=8 {
            assert_eq!(DPad::from_raw(raw).to_raw(), raw);
        }
    }

    #[test]
    fn test_dpad_from_switches() {
        assert_eq!(DPad::from_switches(false, false, false, false), DPad::Center);
        assert_eq!(DPad::from_switches(true, false, false, false), DPad::Up);
        assert_eq!(DPad::from_switches(false, false, false, true), DPad::Left);
        assert_eq!(DPad::from_switches(false, true, true, false), DPad::DownRight);
        // Opposing switches cancel
        assert_eq!(DPad::from_switches(true, false, true, false), DPad::Center);
        assert_eq!(DPad::from_switches(true, true, false, true), DPad::Up);
    }

    #[test]
    fn test_latch_edges() {
        let mut latch = ButtonLatch::new();
        assert_eq!(latch.update(false), Edge::None);
        assert_eq!(latch.update(true), Edge::Pressed);
        assert_eq!(latch.update(true), Edge::None);
        assert!(latch.is_held());
        assert_eq!(latch.update(false), Edge::Released);
        assert_eq!(latch.update(false), Edge::None);
    }
}
