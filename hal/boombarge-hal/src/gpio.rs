//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins that can be implemented
//! by chip-specific wrappers.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Logic level at which a signal counts as asserted
///
/// For relay outputs the asserted level is the one that energizes the coil.
/// Many opto-isolated relay boards are active-low, so a pin driven LOW
/// closes the relay. Getting this backwards fires every channel at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActiveLevel {
    /// Asserted when the pin is HIGH
    High,
    /// Asserted when the pin is LOW
    #[default]
    Low,
}

impl ActiveLevel {
    /// Pin state (`true` = HIGH) that corresponds to the logical state
    pub fn pin_state(self, asserted: bool) -> bool {
        match self {
            ActiveLevel::High => asserted,
            ActiveLevel::Low => !asserted,
        }
    }

    /// Drive `pin` to the asserted or released level
    pub fn drive<P: OutputPin>(self, pin: &mut P, asserted: bool) {
        pin.set_state(self.pin_state(asserted));
    }

    /// Interpret a raw input reading
    pub fn is_asserted<P: InputPin>(self, pin: &P) -> bool {
        pin.is_high() == self.pin_state(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestPin {
        high: bool,
    }

    impl OutputPin for TestPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    impl InputPin for TestPin {
        fn is_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_low_drive() {
        let mut pin = TestPin { high: true };
        ActiveLevel::Low.drive(&mut pin, true);
        assert!(pin.is_set_low());
        ActiveLevel::Low.drive(&mut pin, false);
        assert!(pin.is_set_high());
    }

    #[test]
    fn test_active_high_drive() {
        let mut pin = TestPin { high: false };
        ActiveLevel::High.drive(&mut pin, true);
        assert!(pin.is_set_high());
        ActiveLevel::High.drive(&mut pin, false);
        assert!(pin.is_set_low());
    }

    #[test]
    fn test_is_asserted() {
        let pin = TestPin { high: false };
        assert!(ActiveLevel::Low.is_asserted(&pin));
        assert!(!ActiveLevel::High.is_asserted(&pin));
    }

    #[test]
    fn test_default_is_active_low() {
        assert_eq!(ActiveLevel::default(), ActiveLevel::Low);
    }
}
