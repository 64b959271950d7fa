//! Arm-code challenge
//!
//! Arming asks the operator to key in a random four-digit code on the face
//! buttons. Each digit is two bits of an 8-bit random draw, least
//! significant pair first, and names the face button to press. A digit
//! counts on the *release* of the expected button, so a stuck or bouncing
//! contact cannot walk through the code.

use rand_core::RngCore;

use crate::input::{Button, ButtonLatch, Edge, InputState};
use crate::timing::has_elapsed;

/// Digits in an arm code
pub const CODE_DIGITS: usize = 4;

/// Button that disarms from any menu
pub const DISARM_BUTTON: Button = Button::Menu2;

/// Whether the challenge may run this poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArmGate {
    /// Not on the arm screen, or no link
    Locked,
    /// On the arm screen, connected and disarmed
    Unlocked,
    /// Relay reports armed; only disarm is possible
    Armed,
}

/// Result of a challenge poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArmEvent {
    /// A digit was confirmed; carries the new confirmed count
    DigitConfirmed(u8),
    /// Progress was discarded (wrong button or idle)
    Reset,
    ArmRequested,
    DisarmRequested,
}

/// One drawn code and the operator's progress through it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ArmSession {
    code: u8,
    digits_confirmed: u8,
    last_digit_at: u32,
    pending: bool,
}

impl ArmSession {
    pub fn new(code: u8) -> Self {
        Self {
            code,
            digits_confirmed: 0,
            last_digit_at: 0,
            pending: false,
        }
    }

    /// Digit `index` of the code (0..=3)
    pub fn digit(&self, index: usize) -> u8 {
        (self.code >> (2 * index)) & 0b11
    }

    pub fn digits(&self) -> [u8; CODE_DIGITS] {
        core::array::from_fn(|i| self.digit(i))
    }

    pub fn digits_confirmed(&self) -> u8 {
        self.digits_confirmed
    }

    fn expected_button(&self) -> Button {
        Button::FACE[self.digit(self.digits_confirmed as usize) as usize]
    }

    fn reset(&mut self) -> bool {
        let had_progress = self.digits_confirmed > 0 || self.pending;
        self.digits_confirmed = 0;
        self.pending = false;
        had_progress
    }
}

/// The challenge state machine with its button latches
#[derive(Debug, Clone)]
pub struct ArmChallenge {
    session: Option<ArmSession>,
    timeout_ms: u32,
    code_latches: [ButtonLatch; CODE_DIGITS],
    disarm_latch: ButtonLatch,
}

impl ArmChallenge {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            session: None,
            timeout_ms,
            code_latches: [ButtonLatch::new(); CODE_DIGITS],
            disarm_latch: ButtonLatch::new(),
        }
    }

    /// The code currently on offer, if the challenge is showing
    pub fn session(&self) -> Option<&ArmSession> {
        self.session.as_ref()
    }

    pub fn poll<R: RngCore>(
        &mut self,
        now: u32,
        input: &InputState,
        gate: ArmGate,
        rng: &mut R,
    ) -> Option<ArmEvent> {
        // Latches track every poll so a button held across an unlock is not a fresh press
        let mut edges = [Edge::None; CODE_DIGITS];
        for (edge, (latch, button)) in edges
            .iter_mut()
            .zip(self.code_latches.iter_mut().zip(Button::FACE))
        {
            *edge = latch.update(input.is_pressed(button));
        }
        let disarm_edge = self.disarm_latch.update(input.is_pressed(DISARM_BUTTON));

        match gate {
            ArmGate::Locked => {
                self.session = None;
                None
            }
            ArmGate::Armed => {
                self.session = None;
                (disarm_edge == Edge::Pressed).then_some(ArmEvent::DisarmRequested)
            }
            ArmGate::Unlocked => {
                let session = self
                    .session
                    .get_or_insert_with(|| ArmSession::new(rng.next_u32() as u8));
                let event = Self::advance(session, now, input, &edges, self.timeout_ms);
                if event == Some(ArmEvent::ArmRequested) {
                    // Spent; the next showing draws a fresh code
                    self.session = None;
                }
                event
            }
        }
    }

    fn advance(
        session: &mut ArmSession,
        now: u32,
        input: &InputState,
        edges: &[Edge; CODE_DIGITS],
        timeout_ms: u32,
    ) -> Option<ArmEvent> {
        // A held digit does not keep a partial entry alive
        let timed_out = session.digits_confirmed > 0
            && has_elapsed(now, session.last_digit_at, timeout_ms)
            && session.reset();

        let expected = session.expected_button();
        let expected_index = expected as usize;

        if session.pending {
            if edges[expected_index] == Edge::Released {
                session.pending = false;
                session.digits_confirmed += 1;
                session.last_digit_at = now;
                if session.digits_confirmed as usize == CODE_DIGITS {
                    return Some(ArmEvent::ArmRequested);
                }
                return Some(ArmEvent::DigitConfirmed(session.digits_confirmed));
            }
            return None;
        }

        let wrong = Button::FACE
            .iter()
            .any(|&b| b != expected && input.is_pressed(b));
        if wrong {
            return (session.reset() || timed_out).then_some(ArmEvent::Reset);
        }

        if edges[expected_index] == Edge::Pressed {
            session.pending = true;
        }
        timed_out.then_some(ArmEvent::Reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::ScriptedRng;

    // Digits (LSB first): 2, 0, 3, 1
    const CODE: u32 = 0b01_11_00_10;

    fn idle() -> InputState {
        InputState::default()
    }

    fn press(button: Button) -> InputState {
        InputState::with_buttons(&[button])
    }

    /// Press and release `button`, returning the event from the release poll
    fn tap(
        arm: &mut ArmChallenge,
        rng: &mut ScriptedRng,
        now: &mut u32,
        button: Button,
    ) -> Option<ArmEvent> {
        *now += 50;
        assert_eq!(arm.poll(*now, &press(button), ArmGate::Unlocked, rng), None);
        *now += 50;
        arm.poll(*now, &idle(), ArmGate::Unlocked, rng)
    }

    #[test]
    fn test_session_digits_from_draw() {
        let session = ArmSession::new(CODE as u8);
        assert_eq!(session.digits(), [2, 0, 3, 1]);
    }

    #[test]
    fn test_correct_code_arms_exactly_once() {
        let mut rng = ScriptedRng::new(&[CODE]);
        let mut arm = ArmChallenge::new(1500);
        let mut now = 0;
        assert_eq!(arm.poll(now, &idle(), ArmGate::Unlocked, &mut rng), None);
        assert_eq!(arm.session().unwrap().digits(), [2, 0, 3, 1]);

        let mut events = std::vec::Vec::new();
        for button in [Button::Face3, Button::Face1, Button::Face4, Button::Face2] {
            events.extend(tap(&mut arm, &mut rng, &mut now, button));
        }
        assert_eq!(
            events,
            [
                ArmEvent::DigitConfirmed(1),
                ArmEvent::DigitConfirmed(2),
                ArmEvent::DigitConfirmed(3),
                ArmEvent::ArmRequested,
            ]
        );
        assert!(arm.session().is_none());

        // Idle polls afterwards never repeat the request
        for _ in 0..10 {
            now += 100;
            assert_ne!(
                arm.poll(now, &idle(), ArmGate::Unlocked, &mut rng),
                Some(ArmEvent::ArmRequested)
            );
        }
    }

    #[test]
    fn test_digit_counts_on_release_only() {
        let mut rng = ScriptedRng::new(&[CODE]);
        let mut arm = ArmChallenge::new(1500);
        arm.poll(0, &idle(), ArmGate::Unlocked, &mut rng);
        for t in 1..20 {
            assert_eq!(arm.poll(t, &press(Button::Face3), ArmGate::Unlocked, &mut rng), None);
        }
        assert_eq!(arm.session().unwrap().digits_confirmed(), 0);
        assert_eq!(
            arm.poll(20, &idle(), ArmGate::Unlocked, &mut rng),
            Some(ArmEvent::DigitConfirmed(1))
        );
    }

    #[test]
    fn test_wrong_digit_resets() {
        let mut rng = ScriptedRng::new(&[CODE]);
        let mut arm = ArmChallenge::new(1500);
        let mut now = 0;
        arm.poll(now, &idle(), ArmGate::Unlocked, &mut rng);
        assert_eq!(
            tap(&mut arm, &mut rng, &mut now, Button::Face3),
            Some(ArmEvent::DigitConfirmed(1))
        );

        // Expected Face1, pressing Face2 discards progress
        now += 50;
        assert_eq!(
            arm.poll(now, &press(Button::Face2), ArmGate::Unlocked, &mut rng),
            Some(ArmEvent::Reset)
        );
        assert_eq!(arm.session().unwrap().digits_confirmed(), 0);
        // Same code stays on offer
        assert_eq!(arm.session().unwrap().digits(), [2, 0, 3, 1]);
    }

    #[test]
    fn test_idle_timeout_resets() {
        let mut rng = ScriptedRng::new(&[CODE]);
        let mut arm = ArmChallenge::new(1500);
        let mut now = 0;
        arm.poll(now, &idle(), ArmGate::Unlocked, &mut rng);
        tap(&mut arm, &mut rng, &mut now, Button::Face3);
        let confirmed_at = now;

        assert_eq!(
            arm.poll(confirmed_at + 1499, &idle(), ArmGate::Unlocked, &mut rng),
            None
        );
        assert_eq!(
            arm.poll(confirmed_at + 1500, &idle(), ArmGate::Unlocked, &mut rng),
            Some(ArmEvent::Reset)
        );
        assert_eq!(arm.session().unwrap().digits_confirmed(), 0);
    }

    #[test]
    fn test_held_digit_does_not_outlive_timeout() {
        let mut rng = ScriptedRng::new(&[CODE]);
        let mut arm = ArmChallenge::new(1500);
        let mut now = 0;
        arm.poll(now, &idle(), ArmGate::Unlocked, &mut rng);
        tap(&mut arm, &mut rng, &mut now, Button::Face3);
        let confirmed_at = now;

        // Next digit pressed in time, then held far past the timeout
        assert_eq!(
            arm.poll(confirmed_at + 100, &press(Button::Face1), ArmGate::Unlocked, &mut rng),
            None
        );
        assert_eq!(
            arm.poll(confirmed_at + 1500, &press(Button::Face1), ArmGate::Unlocked, &mut rng),
            Some(ArmEvent::Reset)
        );
        for t in (confirmed_at + 1600..confirmed_at + 9900).step_by(100) {
            assert_eq!(arm.poll(t, &press(Button::Face1), ArmGate::Unlocked, &mut rng), None);
        }
        // The late release is not a digit
        assert_eq!(
            arm.poll(confirmed_at + 9950, &idle(), ArmGate::Unlocked, &mut rng),
            None
        );
        assert_eq!(arm.session().unwrap().digits_confirmed(), 0);
    }

    #[test]
    fn test_press_on_timeout_poll_starts_new_entry() {
        let mut rng = ScriptedRng::new(&[CODE]);
        let mut arm = ArmChallenge::new(1500);
        let mut now = 0;
        arm.poll(now, &idle(), ArmGate::Unlocked, &mut rng);
        tap(&mut arm, &mut rng, &mut now, Button::Face3);

        // First digit pressed on the very poll that times out the entry
        now += 1500;
        assert_eq!(
            arm.poll(now, &press(Button::Face3), ArmGate::Unlocked, &mut rng),
            Some(ArmEvent::Reset)
        );
        now += 50;
        assert_eq!(
            arm.poll(now, &idle(), ArmGate::Unlocked, &mut rng),
            Some(ArmEvent::DigitConfirmed(1))
        );
    }

    #[test]
    fn test_locked_gate_discards_session() {
        let mut rng = ScriptedRng::new(&[CODE, 0b00_00_00_11]);
        let mut arm = ArmChallenge::new(1500);
        arm.poll(0, &idle(), ArmGate::Unlocked, &mut rng);
        assert!(arm.session().is_some());

        assert_eq!(arm.poll(10, &press(Button::Face3), ArmGate::Locked, &mut rng), None);
        assert!(arm.session().is_none());

        // Fresh code on the next showing; the held button is not a new press
        arm.poll(20, &press(Button::Face3), ArmGate::Unlocked, &mut rng);
        let session = arm.session().unwrap();
        assert_eq!(session.digits(), [3, 0, 0, 0]);
        assert_eq!(arm.poll(30, &idle(), ArmGate::Unlocked, &mut rng), None);
        assert_eq!(arm.session().unwrap().digits_confirmed(), 0);
    }

    #[test]
    fn test_disarm_only_when_armed() {
        let mut rng = ScriptedRng::new(&[CODE]);
        let mut arm = ArmChallenge::new(1500);
        assert_eq!(arm.poll(0, &press(DISARM_BUTTON), ArmGate::Unlocked, &mut rng), None);
        arm.poll(10, &idle(), ArmGate::Armed, &mut rng);
        assert_eq!(
            arm.poll(20, &press(DISARM_BUTTON), ArmGate::Armed, &mut rng),
            Some(ArmEvent::DisarmRequested)
        );
        // Holding does not repeat
        assert_eq!(arm.poll(30, &press(DISARM_BUTTON), ArmGate::Armed, &mut rng), None);
    }
}
