//! Hold-to-trigger guard
//!
//! A sequence starts only after both trigger buttons have been held
//! together for the full hold time. Pressing both while a sequence runs
//! aborts it on the spot.

use crate::input::{Button, InputState};
use crate::timing::has_elapsed;

/// What a joint press will do, fixed at the moment it began
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerIntent {
    /// Press is ignored until release
    Idle,
    ArmingToTrigger,
    ArmingToAbort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriggerSession {
    pub held_since: u32,
    pub intent: TriggerIntent,
    pub fired: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerEvent {
    /// Countdown to trigger began
    HoldStarted,
    /// Released before the hold time
    HoldCancelled,
    TriggerRequested,
    AbortRequested,
}

#[derive(Debug, Clone)]
pub struct TriggerGuard {
    hold_ms: u32,
    session: Option<TriggerSession>,
}

impl TriggerGuard {
    pub fn new(hold_ms: u32) -> Self {
        Self {
            hold_ms,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&TriggerSession> {
        self.session.as_ref()
    }

    /// Whether a trigger countdown is in progress
    pub fn is_pending(&self) -> bool {
        matches!(
            self.session,
            Some(TriggerSession {
                intent: TriggerIntent::ArmingToTrigger,
                fired: false,
                ..
            })
        )
    }

    pub fn poll(
        &mut self,
        now: u32,
        input: &InputState,
        connected: bool,
        sequence_running: bool,
    ) -> Option<TriggerEvent> {
        let both =
            input.is_pressed(Button::LeftTrigger) && input.is_pressed(Button::RightTrigger);

        if !both {
            let was_pending = self.is_pending();
            self.session = None;
            return was_pending.then_some(TriggerEvent::HoldCancelled);
        }

        let Some(session) = self.session.as_mut() else {
            let (intent, event) = if sequence_running {
                (TriggerIntent::ArmingToAbort, Some(TriggerEvent::AbortRequested))
            } else if connected {
                (TriggerIntent::ArmingToTrigger, Some(TriggerEvent::HoldStarted))
            } else {
                (TriggerIntent::Idle, None)
            };
            self.session = Some(TriggerSession {
                held_since: now,
                intent,
                // Abort fires on the press itself
                fired: intent == TriggerIntent::ArmingToAbort,
            });
            return event;
        };

        if session.intent == TriggerIntent::ArmingToTrigger
            && !session.fired
            && has_elapsed(now, session.held_since, self.hold_ms)
        {
            session.fired = true;
            return Some(TriggerEvent::TriggerRequested);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: u32 = 3000;

    fn both() -> InputState {
        InputState::with_buttons(&[Button::LeftTrigger, Button::RightTrigger])
    }

    fn count_triggers(guard: &mut TriggerGuard, from: u32, to: u32) -> usize {
        (from..=to)
            .filter_map(|t| guard.poll(t, &both(), true, false))
            .filter(|&e| e == TriggerEvent::TriggerRequested)
            .count()
    }

    #[test]
    fn test_release_one_ms_early_fires_nothing() {
        let mut guard = TriggerGuard::new(HOLD);
        assert_eq!(guard.poll(0, &both(), true, false), Some(TriggerEvent::HoldStarted));
        assert_eq!(count_triggers(&mut guard, 1, HOLD - 1), 0);
        assert_eq!(
            guard.poll(HOLD, &InputState::default(), true, false),
            Some(TriggerEvent::HoldCancelled)
        );
        assert!(guard.session().is_none());
    }

    #[test]
    fn test_full_hold_fires_exactly_once() {
        let mut guard = TriggerGuard::new(HOLD);
        guard.poll(0, &both(), true, false);
        assert_eq!(count_triggers(&mut guard, 1, HOLD + 5000), 1);
        assert!(guard.session().unwrap().fired);
        // Release after firing is not a cancellation
        assert_eq!(guard.poll(HOLD + 5001, &InputState::default(), true, false), None);
    }

    #[test]
    fn test_one_button_is_not_enough() {
        let mut guard = TriggerGuard::new(HOLD);
        let left = InputState::with_buttons(&[Button::LeftTrigger]);
        for t in 0..=HOLD {
            assert_eq!(guard.poll(t, &left, true, false), None);
        }
        assert!(guard.session().is_none());
    }

    #[test]
    fn test_abort_on_press_while_running() {
        let mut guard = TriggerGuard::new(HOLD);
        assert_eq!(
            guard.poll(0, &both(), true, true),
            Some(TriggerEvent::AbortRequested)
        );
        // Intent stays abort for the rest of the press
        for t in 1..=HOLD + 10 {
            assert_eq!(guard.poll(t, &both(), true, false), None);
        }
        assert_eq!(guard.poll(HOLD + 11, &InputState::default(), true, false), None);
    }

    #[test]
    fn test_disconnected_press_ignored_until_release() {
        let mut guard = TriggerGuard::new(HOLD);
        assert_eq!(guard.poll(0, &both(), false, false), None);
        // Link comes back mid-press; the intent was fixed at press time
        for t in 1..=HOLD + 10 {
            assert_eq!(guard.poll(t, &both(), true, false), None);
        }
        assert_eq!(guard.session().unwrap().intent, TriggerIntent::Idle);
        assert_eq!(guard.poll(HOLD + 11, &InputState::default(), true, false), None);
        assert_eq!(guard.poll(HOLD + 12, &both(), true, false), Some(TriggerEvent::HoldStarted));
    }

    #[test]
    fn test_hold_across_clock_wrap() {
        let mut guard = TriggerGuard::new(HOLD);
        let start = u32::MAX - 1000;
        guard.poll(start, &both(), true, false);
        assert_eq!(guard.poll(start.wrapping_add(HOLD - 1), &both(), true, false), None);
        assert_eq!(
            guard.poll(start.wrapping_add(HOLD), &both(), true, false),
            Some(TriggerEvent::TriggerRequested)
        );
    }
}
