//! Timed playback of configured ignition sequences
//!
//! One sequence plays at a time. Steps carry offsets from the start of the
//! run; each poll emits the steps whose offset has passed.

use heapless::Vec;

use crate::config::{SequenceConfig, SequenceStep, MAX_SEQUENCES};
use crate::timing::elapsed_ms;

/// Output of a sequencer poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceEvent {
    /// Fire this step now
    Step(SequenceStep),
    /// The last step has been emitted
    Finished,
}

#[derive(Debug, Clone, Copy)]
struct Run {
    started_at: u32,
    next_step: usize,
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    sequences: Vec<SequenceConfig, MAX_SEQUENCES>,
    selected: usize,
    run: Option<Run>,
    aborted: bool,
}

impl Sequencer {
    pub fn new(sequences: &[SequenceConfig]) -> Self {
        // Extra sequences beyond capacity are dropped; the parser never produces them
        let sequences = sequences.iter().take(MAX_SEQUENCES).cloned().collect();
        Self {
            sequences,
            selected: 0,
            run: None,
            aborted: false,
        }
    }

    pub fn count(&self) -> usize {
        self.sequences.len()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&SequenceConfig> {
        self.sequences.get(self.selected)
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Whether the most recent run was aborted
    pub fn was_aborted(&self) -> bool {
        self.aborted
    }

    /// Steps emitted so far in the current run
    pub fn frame(&self) -> usize {
        self.run.map_or(0, |run| run.next_step)
    }

    /// Steps in the selected sequence
    pub fn frame_count(&self) -> usize {
        self.selected().map_or(0, |s| s.steps.len())
    }

    /// Move the selection; ignored while a sequence plays
    pub fn select_next(&mut self) -> bool {
        if self.is_running() || self.sequences.is_empty() {
            return false;
        }
        self.selected = (self.selected + 1) % self.sequences.len();
        true
    }

    pub fn select_prev(&mut self) -> bool {
        if self.is_running() || self.sequences.is_empty() {
            return false;
        }
        let count = self.sequences.len();
        self.selected = (self.selected + count - 1) % count;
        true
    }

    /// Start the selected sequence; false if one is already playing or none exists
    pub fn start(&mut self, now: u32) -> bool {
        if self.is_running() || self.selected().is_none() {
            return false;
        }
        self.run = Some(Run {
            started_at: now,
            next_step: 0,
        });
        self.aborted = false;
        true
    }

    /// Stop immediately; remaining steps are never emitted
    pub fn abort(&mut self) -> bool {
        if self.run.take().is_some() {
            self.aborted = true;
            return true;
        }
        false
    }

    /// Next due event, if any; call until it returns `None`
    pub fn poll(&mut self, now: u32) -> Option<SequenceEvent> {
        let run = self.run.as_mut()?;
        let sequence = self.sequences.get(self.selected)?;

        match sequence.steps.get(run.next_step) {
            Some(step) if elapsed_ms(now, run.started_at) >= step.at_ms => {
                run.next_step += 1;
                Some(SequenceEvent::Step(*step))
            }
            Some(_) => None,
            None => {
                self.run = None;
                Some(SequenceEvent::Finished)
            }
        }
    }
}
