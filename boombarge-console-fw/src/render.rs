//! Log-based render surface
//!
//! The console has no screen of its own yet; this surface reports what a
//! display would show by logging each visible change over defmt.

use defmt::*;

use boombarge_core::console::{ConsoleView, Menu, NotificationKind, SequenceStatus};
use boombarge_core::traits::RenderSurface;

/// The parts of a view an operator would notice changing
#[derive(Clone, Copy, PartialEq, Eq)]
struct Digest {
    menu: Menu,
    notification: Option<NotificationKind>,
    arm_code: Option<[u8; 4]>,
    arm_digits_confirmed: u8,
    connected: bool,
    armed: bool,
    visual_test: bool,
    last_ack_channel: Option<u8>,
    sequence: SequenceStatus,
    has_fault: bool,
}

impl Digest {
    fn of(view: &ConsoleView<'_>) -> Self {
        Self {
            menu: view.menu,
            notification: view.notification,
            arm_code: view.arm_code,
            arm_digits_confirmed: view.arm_digits_confirmed,
            connected: view.status.is_connected,
            armed: view.status.is_armed,
            visual_test: view.status.visual_test,
            last_ack_channel: view.status.last_ack_channel,
            sequence: view.status.sequence,
            has_fault: view.status.fault.is_some(),
        }
    }
}

/// Render surface that logs view changes
pub struct DefmtRenderer {
    last: Option<Digest>,
}

impl DefmtRenderer {
    pub const fn new() -> Self {
        Self { last: None }
    }
}

impl RenderSurface for DefmtRenderer {
    fn render(&mut self, view: &ConsoleView<'_>) {
        let next = Digest::of(view);
        let Some(last) = self.last.replace(next) else {
            info!("[{}] {:?}", view.menu.title(), view.status);
            return;
        };
        if last == next {
            return;
        }

        if next.menu != last.menu {
            info!("Menu: {}", next.menu.title());
        }
        if next.notification != last.notification {
            match view.notification_text() {
                Some(text) => info!("Notice: {}", text),
                None => debug!("Notice cleared"),
            }
        }
        if next.arm_code != last.arm_code {
            match next.arm_code {
                Some(code) => info!("Arm code: {}", code),
                None => debug!("Arm code hidden"),
            }
        }
        if next.arm_digits_confirmed != last.arm_digits_confirmed {
            info!("Arm code progress: {}/4", next.arm_digits_confirmed);
        }
        if next.connected != last.connected {
            info!(
                "Link: {} ({:?} ms since reply)",
                if next.connected { "up" } else { "down" },
                view.ms_since_reply
            );
        }
        if next.armed != last.armed {
            info!("Relay: {}", if next.armed { "ARMED" } else { "safe" });
        }
        if next.visual_test != last.visual_test {
            info!("Visual test: {}", next.visual_test);
        }
        if next.last_ack_channel != last.last_ack_channel {
            if let Some(channel) = next.last_ack_channel {
                info!("Ignite acknowledged on channel {}", channel);
            }
        }
        if next.sequence != last.sequence {
            info!(
                "Sequence {:?}: {}/{} frames",
                view.selected_sequence, next.sequence.frame, next.sequence.frame_count
            );
        }
        if next.has_fault && !last.has_fault {
            if let Some(text) = view.fault_text() {
                error!("Fault: {}", text);
            }
        }
    }
}
