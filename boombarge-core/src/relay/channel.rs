//! A single relay output with its release deadline

use boombarge_hal::{ActiveLevel, OutputPin};

use crate::timing::deadline_reached;

/// One relay coil driver
///
/// `close_deadline` is `Some` exactly while the coil is energized.
#[derive(Debug)]
pub struct RelayChannel<P> {
    pin: P,
    close_level: ActiveLevel,
    close_deadline: Option<u32>,
}

impl<P: OutputPin> RelayChannel<P> {
    /// Take ownership of `pin` and drive it to the open level
    pub fn new(mut pin: P, close_level: ActiveLevel) -> Self {
        close_level.drive(&mut pin, false);
        Self {
            pin,
            close_level,
            close_deadline: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.close_deadline.is_some()
    }

    pub fn close_deadline(&self) -> Option<u32> {
        self.close_deadline
    }

    /// Energize the coil until `now + period_ms`
    ///
    /// Closing an already closed channel moves its deadline.
    pub fn close(&mut self, now: u32, period_ms: u32) {
        self.close_deadline = Some(now.wrapping_add(period_ms));
        self.close_level.drive(&mut self.pin, true);
    }

    /// Open the coil if its deadline has passed; returns whether it opened
    pub fn release_if_due(&mut self, now: u32) -> bool {
        match self.close_deadline {
            Some(deadline) if deadline_reached(now, deadline) => {
                self.close_level.drive(&mut self.pin, false);
                self.close_deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}
