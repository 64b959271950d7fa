//! Console node logic
//!
//! Everything between the operator's buttons and the commands sent to the
//! relay nodes: the arm-code challenge, the hold-to-trigger guard, link
//! tracking, notifications, the sequencer and the menus.

pub mod arm;
pub mod controller;
pub mod link;
pub mod menu;
pub mod notify;
pub mod sequencer;
pub mod status;
pub mod trigger;
pub mod view;

pub use arm::{ArmChallenge, ArmEvent, ArmGate, ArmSession, CODE_DIGITS, DISARM_BUTTON};
pub use controller::{Console, Destination, Outbox, Outgoing, OUTBOX_CAPACITY};
pub use link::{ConnectionTracker, LinkChange, LinkMonitor, LinkState, Pinger};
pub use menu::{Menu, MenuNavigator};
pub use notify::{Notification, NotificationKind, Notifier};
pub use sequencer::{SequenceEvent, Sequencer};
pub use status::{SequenceStatus, SystemStatus, FAULT_TEXT_LEN};
pub use trigger::{TriggerEvent, TriggerGuard, TriggerIntent, TriggerSession};
pub use view::ConsoleView;
