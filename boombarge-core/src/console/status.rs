//! Console-wide status snapshot

use heapless::String;

use super::notify::Notification;

/// Maximum stored fault text
pub const FAULT_TEXT_LEN: usize = 64;

/// Sequencer fields as shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceStatus {
    pub count: u8,
    pub selected: u8,
    /// Steps emitted in the current run
    pub frame: u8,
    pub frame_count: u8,
    pub running: bool,
    pub aborted: bool,
}

/// Everything the console knows, in one place
///
/// Each field has exactly one writer inside [`super::Console`]. The request
/// flags are how input handlers hand intent to the dispatcher; they are set
/// during a poll and consumed before it returns.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemStatus {
    // Requests
    pub arm_requested: bool,
    pub disarm_requested: bool,
    pub trigger_requested: bool,
    pub abort_requested: bool,

    // Link
    pub is_connected: bool,
    pub is_connection_lost: bool,
    pub ping_iteration: u32,
    pub last_roundtrip_ms: Option<u32>,

    // Relay
    /// Every relay node reports armed
    pub is_armed: bool,
    pub last_ack_channel: Option<u8>,

    pub visual_test: bool,
    pub sequence: SequenceStatus,
    pub notification: Option<Notification>,
    pub fault: Option<String<FAULT_TEXT_LEN>>,
}

impl SystemStatus {
    /// Store `text`, cut at a character boundary to fit
    pub fn set_fault(&mut self, text: &str) {
        let mut fault = String::new();
        for c in text.chars() {
            if fault.push(c).is_err() {
                break;
            }
        }
        self.fault = Some(fault);
    }
}
