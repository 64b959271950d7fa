//! The console: input handling, request dispatch and reply handling
//!
//! `Console::poll` runs once per UX tick. Input handlers only raise request
//! flags in [`SystemStatus`]; the dispatcher turns those into commands for
//! the relay nodes in the same poll. Replies come back through
//! [`Console::handle_reply`].

use heapless::Vec;
use rand_core::RngCore;

use boombarge_protocol::{Command, DecodeError, Reply};

use super::arm::{ArmChallenge, ArmEvent, ArmGate};
use super::link::{ConnectionTracker, LinkChange, Pinger};
use super::menu::{Menu, MenuNavigator};
use super::notify::{NotificationKind, Notifier};
use super::sequencer::{SequenceEvent, Sequencer};
use super::status::{SequenceStatus, SystemStatus};
use super::trigger::{TriggerEvent, TriggerGuard};
use super::view::ConsoleView;
use crate::config::{ConsoleConfig, RigConfig, SequenceConfig, MAX_STEPS_PER_SEQUENCE};
use crate::input::{Button, ButtonLatch, DPad, Edge, InputState, AXIS_COUNT};
use crate::timing::elapsed_ms;

/// Commands one poll can produce at most: arm, disarm and ping pairs plus a full sequence
pub const OUTBOX_CAPACITY: usize = MAX_STEPS_PER_SEQUENCE + 8;

/// Which relay node a command is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Destination {
    All,
    Node(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Outgoing {
    pub destination: Destination,
    pub command: Command,
}

pub type Outbox = Vec<Outgoing, OUTBOX_CAPACITY>;

/// Console state for a rig with `N` relay nodes
pub struct Console<const N: usize> {
    status: SystemStatus,
    menus: MenuNavigator,
    arm: ArmChallenge,
    trigger: TriggerGuard,
    tracker: ConnectionTracker<N>,
    pinger: Pinger,
    notifier: Notifier,
    sequencer: Sequencer,
    node_armed: [Option<bool>; N],
    dpad_left: ButtonLatch,
    dpad_right: ButtonLatch,
    visual_toggle: ButtonLatch,
    axes: [u8; AXIS_COUNT],
}

impl<const N: usize> Console<N> {
    pub fn new(config: &ConsoleConfig, sequences: &[SequenceConfig]) -> Self {
        let mut console = Self {
            status: SystemStatus::default(),
            menus: MenuNavigator::new(),
            arm: ArmChallenge::new(config.arm_timeout_ms),
            trigger: TriggerGuard::new(config.trigger_hold_ms),
            tracker: ConnectionTracker::new(config.liveness_window_ms),
            pinger: Pinger::new(config.ping_interval_ms),
            notifier: Notifier::new(config.notification_timeout_ms),
            sequencer: Sequencer::new(sequences),
            node_armed: [None; N],
            dpad_left: ButtonLatch::new(),
            dpad_right: ButtonLatch::new(),
            visual_toggle: ButtonLatch::new(),
            axes: InputState::default().axes,
        };
        console.refresh_status();
        console
    }

    pub fn from_rig(rig: &RigConfig) -> Self {
        Self::new(&rig.console, &rig.sequences)
    }

    pub fn status(&self) -> &SystemStatus {
        &self.status
    }

    pub fn menu(&self) -> Menu {
        self.menus.current()
    }

    pub fn tracker(&self) -> &ConnectionTracker<N> {
        &self.tracker
    }

    /// Run one UX tick and return the commands to send
    pub fn poll<R: RngCore>(&mut self, now: u32, input: &InputState, rng: &mut R) -> Outbox {
        let mut outbox = Outbox::new();
        self.axes = input.axes;

        self.update_link(now);
        self.update_menus(input);
        self.update_arm(now, input, rng);
        self.update_trigger(now, input);

        self.dispatch_requests(now, &mut outbox);
        self.run_sequencer(now, &mut outbox);
        self.run_pinger(now, &mut outbox);

        self.notifier.expire(now);
        self.refresh_status();
        outbox
    }

    /// Apply a reply from relay node `node`
    pub fn handle_reply(&mut self, node: usize, reply: Reply, now: u32) {
        if node >= N {
            return;
        }
        if self.tracker.reply_received(node, now) == Some(LinkChange::Connected) {
            self.notifier.show(NotificationKind::Connected, now);
        }

        match reply {
            Reply::PingReply { iteration } => {
                self.pinger.reply_received(iteration, now);
            }
            Reply::ArmedReply { armed } => {
                let before = self.all_armed();
                self.node_armed[node] = Some(armed);
                let after = self.all_armed();
                if before != after {
                    let kind = if after {
                        NotificationKind::Armed
                    } else {
                        NotificationKind::Disarmed
                    };
                    self.notifier.show(kind, now);
                }
            }
            Reply::IgniteAck { channel_id } => {
                self.status.last_ack_channel = Some(channel_id);
            }
        }
        self.refresh_status();
    }

    /// Decode and apply a de-framed packet from `node`
    pub fn handle_packet(&mut self, node: usize, packet: &[u8], now: u32) -> Result<Reply, DecodeError> {
        let reply = Reply::decode(packet)?;
        self.handle_reply(node, reply, now);
        Ok(reply)
    }

    /// Show externally detected fault text
    pub fn report_fault(&mut self, text: &str, now: u32) {
        self.status.set_fault(text);
        self.notifier.show(NotificationKind::Fault, now);
        self.refresh_status();
    }

    pub fn view(&self, now: u32) -> ConsoleView<'_> {
        let session = self.arm.session();
        ConsoleView {
            menu: self.menus.current(),
            cycle_left_held: self.menus.cycle_left_held(),
            cycle_right_held: self.menus.cycle_right_held(),
            notification: self.notifier.active().map(|n| n.kind),
            arm_code: session.map(|s| s.digits()),
            arm_digits_confirmed: session.map_or(0, |s| s.digits_confirmed()),
            ms_since_reply: self.tracker.last_reply_at(now).map(|at| elapsed_ms(now, at)),
            selected_sequence: self.sequencer.selected().map(|s| s.label.as_str()),
            axes: self.axes,
            status: &self.status,
        }
    }

    fn all_armed(&self) -> bool {
        N > 0 && self.node_armed.iter().all(|a| *a == Some(true))
    }

    fn any_armed(&self) -> bool {
        self.node_armed.contains(&Some(true))
    }

    fn update_link(&mut self, now: u32) {
        if self.tracker.update(now) == Some(LinkChange::Lost) {
            self.notifier.show(NotificationKind::ConnectionLost, now);
        }
    }

    fn update_menus(&mut self, input: &InputState) {
        self.menus.update(input);

        let left = self.dpad_left.update(input.dpad() == DPad::Left);
        let right = self.dpad_right.update(input.dpad() == DPad::Right);
        let face = self.visual_toggle.update(input.is_pressed(Button::Face1));

        match self.menus.current() {
            Menu::Sequence => {
                if left == Edge::Released {
                    self.sequencer.select_prev();
                } else if right == Edge::Released {
                    self.sequencer.select_next();
                }
            }
            Menu::VisualTest => {
                if face == Edge::Released {
                    self.status.visual_test = !self.status.visual_test;
                }
            }
            Menu::Status | Menu::Joysticks | Menu::Ignitors | Menu::Fault | Menu::ArmSystem => {}
        }
    }

    fn update_arm<R: RngCore>(&mut self, now: u32, input: &InputState, rng: &mut R) {
        // One armed node is enough to offer disarm
        let gate = if self.any_armed() {
            ArmGate::Armed
        } else if self.menus.current() == Menu::ArmSystem && self.tracker.is_connected() {
            ArmGate::Unlocked
        } else {
            ArmGate::Locked
        };

        match self.arm.poll(now, input, gate, rng) {
            Some(ArmEvent::ArmRequested) => self.status.arm_requested = true,
            Some(ArmEvent::DisarmRequested) => self.status.disarm_requested = true,
            Some(ArmEvent::DigitConfirmed(_)) | Some(ArmEvent::Reset) | None => {}
        }
    }

    fn update_trigger(&mut self, now: u32, input: &InputState) {
        let connected = self.tracker.is_connected();
        let running = self.sequencer.is_running();

        match self.trigger.poll(now, input, connected, running) {
            Some(TriggerEvent::HoldStarted) => {
                self.notifier.show(NotificationKind::HoldToTrigger, now);
            }
            Some(TriggerEvent::HoldCancelled) => {
                self.notifier.clear_hold_to_trigger();
            }
            Some(TriggerEvent::TriggerRequested) => {
                self.notifier.clear_hold_to_trigger();
                self.status.trigger_requested = true;
            }
            Some(TriggerEvent::AbortRequested) => self.status.abort_requested = true,
            None => {}
        }
    }

    fn dispatch_requests(&mut self, now: u32, outbox: &mut Outbox) {
        if core::mem::take(&mut self.status.arm_requested) {
            queue(outbox, Destination::All, Command::SetArmed { armed: true });
            queue(outbox, Destination::All, Command::GetArmed);
        }
        if core::mem::take(&mut self.status.disarm_requested) {
            queue(outbox, Destination::All, Command::SetArmed { armed: false });
            queue(outbox, Destination::All, Command::GetArmed);
        }
        if core::mem::take(&mut self.status.abort_requested) && self.sequencer.abort() {
            self.notifier.show(NotificationKind::SequenceAborted, now);
        }
        if core::mem::take(&mut self.status.trigger_requested) {
            if !self.tracker.is_connected() || !self.all_armed() {
                self.notifier.show(NotificationKind::NotArmed, now);
            } else if self.sequencer.start(now) {
                self.notifier.show(NotificationKind::SequenceTriggered, now);
            }
        }
    }

    fn run_sequencer(&mut self, now: u32, outbox: &mut Outbox) {
        while !outbox.is_full() {
            match self.sequencer.poll(now) {
                Some(SequenceEvent::Step(step)) => queue(
                    outbox,
                    Destination::Node(step.node),
                    Command::Ignite {
                        channel_id: step.channel,
                    },
                ),
                Some(SequenceEvent::Finished) => {
                    self.notifier.show(NotificationKind::SequenceComplete, now);
                }
                None => break,
            }
        }
    }

    fn run_pinger(&mut self, now: u32, outbox: &mut Outbox) {
        if let Some(iteration) = self.pinger.poll(now) {
            queue(outbox, Destination::All, Command::Ping { iteration });
            queue(outbox, Destination::All, Command::GetArmed);
        }
    }

    fn refresh_status(&mut self) {
        let seq = &self.sequencer;
        self.status.sequence = SequenceStatus {
            count: seq.count() as u8,
            selected: seq.selected_index() as u8,
            frame: seq.frame() as u8,
            frame_count: seq.frame_count() as u8,
            running: seq.is_running(),
            aborted: seq.was_aborted(),
        };
        self.status.is_connected = self.tracker.is_connected();
        self.status.is_connection_lost = self.tracker.is_lost();
        self.status.is_armed = self.all_armed();
        self.status.ping_iteration = self.pinger.iteration();
        self.status.last_roundtrip_ms = self.pinger.last_roundtrip_ms();
        self.status.notification = self.notifier.active();
    }
}

fn queue(outbox: &mut Outbox, destination: Destination, command: Command) {
    // OUTBOX_CAPACITY covers the worst case of a single poll
    let _ = outbox.push(Outgoing {
        destination,
        command,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RelayConfig, SequenceStep};
    use crate::input::Axis;
    use crate::relay::RelayEngine;
    use crate::test_util::{MockPin, ScriptedRng};

    const TICK: u32 = 10;

    // Digits 2, 0, 3, 1: Face3, Face1, Face4, Face2
    const CODE: u32 = 0b01_11_00_10;
    const CODE_BUTTONS: [Button; 4] = [Button::Face3, Button::Face1, Button::Face4, Button::Face2];

    fn sequence(label: &str, steps: &[(u32, u8)]) -> SequenceConfig {
        let mut seq = SequenceConfig {
            label: label.try_into().unwrap(),
            ..SequenceConfig::default()
        };
        for &(at_ms, channel) in steps {
            seq.steps
                .push(SequenceStep { at_ms, channel, node: 0 })
                .unwrap();
        }
        seq
    }

    fn idle() -> InputState {
        InputState::default()
    }

    fn both_triggers() -> InputState {
        InputState::with_buttons(&[Button::LeftTrigger, Button::RightTrigger])
    }

    fn dpad(direction: DPad) -> InputState {
        let mut input = InputState::default();
        input.axes[Axis::DPad as usize] = direction.to_raw();
        input
    }

    /// A console wired to a simulated relay node over an ideal link
    struct Rig {
        console: Console<1>,
        relay: RelayEngine<MockPin, 16>,
        rng: ScriptedRng,
        now: u32,
        link_up: bool,
        ignites_sent: std::vec::Vec<u8>,
    }

    impl Rig {
        fn new() -> Self {
            let sequences = [sequence("show", &[(0, 1), (500, 2)]), sequence("finale", &[(0, 9)])];
            Self {
                console: Console::new(&ConsoleConfig::default(), &sequences),
                relay: RelayEngine::new(
                    core::array::from_fn(|_| MockPin::default()),
                    &RelayConfig::default(),
                ),
                rng: ScriptedRng::new(&[CODE]),
                now: 0,
                link_up: true,
                ignites_sent: std::vec::Vec::new(),
            }
        }

        fn step(&mut self, input: &InputState) -> Outbox {
            let outbox = self.console.poll(self.now, input, &mut self.rng);
            self.relay.sweep(self.now);
            if self.link_up {
                for out in &outbox {
                    if let Command::Ignite { channel_id } = out.command {
                        self.ignites_sent.push(channel_id);
                    }
                    let packet = out.command.encode();
                    if let Some(reply) = self.relay.handle_packet(&packet, self.now).unwrap() {
                        let bytes = reply.encode();
                        self.console.handle_packet(0, &bytes, self.now).unwrap();
                    }
                }
            }
            self.now += TICK;
            outbox
        }

        fn hold(&mut self, input: &InputState, ms: u32) {
            for _ in 0..ms / TICK {
                self.step(input);
            }
        }

        fn tap(&mut self, button: Button) {
            self.step(&InputState::with_buttons(&[button]));
            self.step(&idle());
        }

        fn notification(&self) -> Option<NotificationKind> {
            self.console.status().notification.map(|n| n.kind)
        }

        /// Connect, open the arm menu and key in the code
        fn arm(&mut self) {
            self.step(&idle());
            self.tap(Button::LeftBumper);
            assert_eq!(self.console.menu(), Menu::ArmSystem);
            for button in CODE_BUTTONS {
                self.tap(button);
            }
        }

        /// Hold both triggers just long enough to start the selected sequence
        fn trigger(&mut self) {
            self.hold(&both_triggers(), 3000 + TICK);
            self.step(&idle());
        }
    }

    #[test]
    fn test_first_poll_pings() {
        let mut console = Console::<1>::new(&ConsoleConfig::default(), &[]);
        let mut rng = ScriptedRng::new(&[0]);
        let outbox = console.poll(0, &idle(), &mut rng);
        let commands: std::vec::Vec<_> = outbox.iter().map(|o| o.command).collect();
        assert_eq!(commands, [Command::Ping { iteration: 1 }, Command::GetArmed]);
        assert!(outbox.iter().all(|o| o.destination == Destination::All));
        assert!(console.poll(100, &idle(), &mut rng).is_empty());
    }

    #[test]
    fn test_disarm_with_one_node_armed() {
        let mut console = Console::<2>::new(&ConsoleConfig::default(), &[]);
        let mut rng = ScriptedRng::new(&[CODE]);
        console.poll(0, &idle(), &mut rng);
        console.handle_reply(0, Reply::ArmedReply { armed: true }, 10);
        console.handle_reply(1, Reply::ArmedReply { armed: false }, 10);
        assert!(!console.status().is_armed);

        let outbox = console.poll(20, &InputState::with_buttons(&[Button::Menu2]), &mut rng);
        let commands: std::vec::Vec<_> = outbox.iter().map(|o| o.command).collect();
        assert_eq!(commands, [Command::SetArmed { armed: false }, Command::GetArmed]);
        assert!(outbox.iter().all(|o| o.destination == Destination::All));
    }

    #[test]
    fn test_first_reply_connects() {
        let mut rig = Rig::new();
        assert!(!rig.console.status().is_connected);
        rig.step(&idle());
        let status = rig.console.status();
        assert!(status.is_connected);
        assert!(!status.is_armed);
        assert_eq!(status.last_roundtrip_ms, Some(0));
        assert_eq!(rig.notification(), Some(NotificationKind::Connected));
    }

    #[test]
    fn test_arm_code_arms_relay() {
        let mut rig = Rig::new();
        rig.arm();
        assert!(rig.relay.is_armed());
        assert!(rig.console.status().is_armed);
        assert_eq!(rig.notification(), Some(NotificationKind::Armed));
        // Challenge is gone once armed
        assert_eq!(rig.console.view(rig.now).arm_code, None);
    }

    #[test]
    fn test_arm_challenge_locked_off_arm_menu() {
        let mut rig = Rig::new();
        rig.step(&idle());
        assert_eq!(rig.console.view(rig.now).arm_code, None);
        for button in CODE_BUTTONS {
            rig.tap(button);
        }
        assert!(!rig.relay.is_armed());
    }

    #[test]
    fn test_arm_challenge_locked_without_link() {
        let mut rig = Rig::new();
        rig.link_up = false;
        rig.tap(Button::LeftBumper);
        assert_eq!(rig.console.menu(), Menu::ArmSystem);
        assert_eq!(rig.console.view(rig.now).arm_code, None);
    }

    #[test]
    fn test_arm_menu_shows_code_progress() {
        let mut rig = Rig::new();
        rig.step(&idle());
        rig.tap(Button::LeftBumper);
        rig.tap(Button::Face3);
        let view = rig.console.view(rig.now);
        assert_eq!(view.arm_code, Some([2, 0, 3, 1]));
        assert_eq!(view.arm_digits_confirmed, 1);
    }

    #[test]
    fn test_trigger_while_disarmed_shows_not_armed() {
        let mut rig = Rig::new();
        rig.step(&idle());
        rig.trigger();
        assert_eq!(rig.notification(), Some(NotificationKind::NotArmed));
        assert!(rig.ignites_sent.is_empty());
        assert!(!rig.console.status().sequence.running);
    }

    #[test]
    fn test_sequence_plays_end_to_end() {
        let mut rig = Rig::new();
        rig.arm();
        rig.trigger();
        assert!(rig.console.status().sequence.running);
        assert_eq!(rig.ignites_sent, [1]);
        assert!(rig.relay.channel(1).unwrap().is_closed());

        rig.hold(&idle(), 600);
        assert_eq!(rig.ignites_sent, [1, 2]);
        let status = rig.console.status();
        assert!(!status.sequence.running);
        assert_eq!(status.sequence.frame_count, 2);
        assert_eq!(status.last_ack_channel, Some(2));
        assert_eq!(rig.notification(), Some(NotificationKind::SequenceComplete));

        // Relays release on their own
        rig.hold(&idle(), 800);
        assert_eq!(rig.relay.closed_count(), 0);
    }

    #[test]
    fn test_hold_prompt_shows_and_clears() {
        let mut rig = Rig::new();
        rig.arm();
        rig.step(&both_triggers());
        assert_eq!(rig.notification(), Some(NotificationKind::HoldToTrigger));
        // Still up long after the normal display timeout
        rig.hold(&both_triggers(), 2500);
        assert_eq!(rig.notification(), Some(NotificationKind::HoldToTrigger));
        rig.step(&idle());
        assert_eq!(rig.notification(), None);
        assert!(rig.ignites_sent.is_empty());
    }

    #[test]
    fn test_abort_running_sequence() {
        let mut rig = Rig::new();
        rig.arm();
        rig.trigger();
        assert_eq!(rig.ignites_sent, [1]);

        rig.step(&both_triggers());
        assert_eq!(rig.notification(), Some(NotificationKind::SequenceAborted));
        let status = rig.console.status();
        assert!(!status.sequence.running);
        assert!(status.sequence.aborted);

        rig.hold(&idle(), 1000);
        assert_eq!(rig.ignites_sent, [1]);
    }

    #[test]
    fn test_disarm_from_any_menu() {
        let mut rig = Rig::new();
        rig.arm();
        rig.tap(Button::Menu1);
        assert_eq!(rig.console.menu(), Menu::Status);

        rig.tap(Button::Menu2);
        assert!(!rig.relay.is_armed());
        assert!(!rig.console.status().is_armed);
        assert_eq!(rig.notification(), Some(NotificationKind::Disarmed));
    }

    #[test]
    fn test_link_loss_and_recovery() {
        let mut rig = Rig::new();
        rig.step(&idle());
        rig.link_up = false;
        rig.hold(&idle(), 1600);
        let status = rig.console.status();
        assert!(!status.is_connected);
        assert!(status.is_connection_lost);
        assert_eq!(rig.notification(), Some(NotificationKind::ConnectionLost));
        assert!(rig.console.view(rig.now).ms_since_reply.unwrap() > 1500);

        rig.link_up = true;
        rig.hold(&idle(), 500);
        assert!(rig.console.status().is_connected);
        assert!(!rig.console.status().is_connection_lost);
        assert_eq!(rig.notification(), Some(NotificationKind::Connected));
    }

    #[test]
    fn test_notification_expires() {
        let mut rig = Rig::new();
        rig.step(&idle());
        assert_eq!(rig.notification(), Some(NotificationKind::Connected));
        rig.hold(&idle(), 2000);
        assert_eq!(rig.notification(), None);
    }

    #[test]
    fn test_menu_actions() {
        let mut rig = Rig::new();
        rig.step(&idle());

        rig.tap(Button::RightBumper);
        assert_eq!(rig.console.menu(), Menu::VisualTest);
        rig.tap(Button::Face1);
        assert!(rig.console.status().visual_test);

        rig.tap(Button::RightBumper);
        assert_eq!(rig.console.menu(), Menu::Sequence);
        assert_eq!(rig.console.view(rig.now).selected_sequence, Some("show"));
        rig.step(&dpad(DPad::Right));
        rig.step(&idle());
        assert_eq!(rig.console.view(rig.now).selected_sequence, Some("finale"));
        assert_eq!(rig.console.status().sequence.selected, 1);

        // Face1 does nothing outside the visual test menu
        rig.tap(Button::Face1);
        assert!(rig.console.status().visual_test);
    }

    #[test]
    fn test_report_fault() {
        let mut rig = Rig::new();
        rig.console.report_fault("uart framing error", 42);
        assert_eq!(rig.notification(), Some(NotificationKind::Fault));
        let view = rig.console.view(42);
        assert_eq!(view.fault_text(), Some("uart framing error"));
        assert_eq!(view.notification_text(), Some("Fault"));
    }

    #[test]
    fn test_replies_from_unknown_node_ignored() {
        let mut console = Console::<1>::new(&ConsoleConfig::default(), &[]);
        console.handle_reply(4, Reply::ArmedReply { armed: true }, 0);
        assert!(!console.status().is_connected);
        assert!(!console.status().is_armed);
    }

    #[test]
    fn test_malformed_reply_rejected() {
        let mut console = Console::<1>::new(&ConsoleConfig::default(), &[]);
        assert_eq!(console.handle_packet(0, &[0x82, 0x05], 0), Err(DecodeError::Malformed));
        assert!(!console.status().is_connected);
    }
}
