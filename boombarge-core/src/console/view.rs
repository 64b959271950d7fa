//! Declarative snapshot handed to the render surface

use super::arm::CODE_DIGITS;
use super::menu::Menu;
use super::notify::NotificationKind;
use super::status::SystemStatus;
use crate::input::AXIS_COUNT;

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsoleView<'a> {
    pub menu: Menu,
    pub cycle_left_held: bool,
    pub cycle_right_held: bool,
    pub notification: Option<NotificationKind>,
    /// Code on offer while the arm challenge is showing
    pub arm_code: Option<[u8; CODE_DIGITS]>,
    pub arm_digits_confirmed: u8,
    /// Age of the newest reply from any node
    pub ms_since_reply: Option<u32>,
    pub selected_sequence: Option<&'a str>,
    pub axes: [u8; AXIS_COUNT],
    pub status: &'a SystemStatus,
}

impl ConsoleView<'_> {
    pub fn notification_text(&self) -> Option<&'static str> {
        self.notification.map(NotificationKind::text)
    }

    pub fn fault_text(&self) -> Option<&str> {
        self.status.fault.as_deref()
    }
}
