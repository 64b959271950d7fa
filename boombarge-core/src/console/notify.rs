//! Time-boxed notification overlay

use crate::timing::has_elapsed;

/// Everything the console can pop up over the current menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NotificationKind {
    Connected,
    ConnectionLost,
    Armed,
    Disarmed,
    /// Shown while both trigger buttons are held; never times out
    HoldToTrigger,
    SequenceTriggered,
    SequenceAborted,
    SequenceComplete,
    NotArmed,
    Fault,
}

impl NotificationKind {
    pub fn text(self) -> &'static str {
        match self {
            NotificationKind::Connected => "Connected",
            NotificationKind::ConnectionLost => "Connection lost",
            NotificationKind::Armed => "System armed",
            NotificationKind::Disarmed => "System disarmed",
            NotificationKind::HoldToTrigger => "Hold to trigger",
            NotificationKind::SequenceTriggered => "Sequence triggered",
            NotificationKind::SequenceAborted => "Sequence aborted",
            NotificationKind::SequenceComplete => "Sequence complete",
            NotificationKind::NotArmed => "Not armed",
            NotificationKind::Fault => "Fault",
        }
    }

    /// Whether the display timeout clears this kind
    pub fn expires(self) -> bool {
        !matches!(self, NotificationKind::HoldToTrigger)
    }
}

/// A notification and when it was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Notification {
    pub kind: NotificationKind,
    pub started_at: u32,
}

/// Holds at most one notification; a new one replaces the old
#[derive(Debug, Clone)]
pub struct Notifier {
    active: Option<Notification>,
    timeout_ms: u32,
}

impl Notifier {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            active: None,
            timeout_ms,
        }
    }

    pub fn active(&self) -> Option<Notification> {
        self.active
    }

    pub fn show(&mut self, kind: NotificationKind, now: u32) {
        self.active = Some(Notification {
            kind,
            started_at: now,
        });
    }

    /// Clear the hold-to-trigger prompt if it is showing
    pub fn clear_hold_to_trigger(&mut self) -> bool {
        match self.active {
            Some(n) if n.kind == NotificationKind::HoldToTrigger => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    /// Drop an expiring notification once it has been shown long enough
    pub fn expire(&mut self, now: u32) -> bool {
        match self.active {
            Some(n) if n.kind.expires() && has_elapsed(now, n.started_at, self.timeout_ms) => {
                self.active = None;
                true
            }
            _ => false,
        }
    }
}
