//! Console control sampling

use crate::input::InputState;

/// Source of console input samples
///
/// Implementations read whatever hardware backs the controls (GPIO
/// buttons, a USB gamepad, a test script) and report one snapshot per call.
/// A source with nothing connected reports [`InputState::default`].
pub trait InputSource {
    /// Sample the controls now
    fn sample(&mut self) -> InputState;
}
