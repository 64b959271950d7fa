//! Configuration type definitions

use boombarge_hal::ActiveLevel;
use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum sequence label length
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum sequences per rig
pub const MAX_SEQUENCES: usize = 8;

/// Maximum steps per sequence
pub const MAX_STEPS_PER_SEQUENCE: usize = 32;

/// Upper bound for the relay close period
pub const MAX_CLOSE_PERIOD_MS: u32 = 5000;

/// Relay node configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelayConfig {
    /// How long an ignited channel stays closed
    pub close_period_ms: u32,
    /// Pin level that energizes a relay coil
    pub close_level: ActiveLevel,
    /// Serial link baud rate
    pub baud_rate: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            close_period_ms: 700,
            close_level: ActiveLevel::Low,
            baud_rate: 115_200,
        }
    }
}

/// Console timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConsoleConfig {
    /// Arm-code progress is discarded after this long without a new digit
    pub arm_timeout_ms: u32,
    /// How long both trigger buttons must be held to start a sequence
    pub trigger_hold_ms: u32,
    /// A node is lost after this long without a reply
    pub liveness_window_ms: u32,
    /// Interval between liveness pings
    pub ping_interval_ms: u32,
    /// How long an expiring notification stays on screen
    pub notification_timeout_ms: u32,
    /// Serial link baud rate
    pub baud_rate: u32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            arm_timeout_ms: 1500,
            trigger_hold_ms: 3000,
            liveness_window_ms: 1500,
            ping_interval_ms: 500,
            notification_timeout_ms: 2000,
            baud_rate: 115_200,
        }
    }
}

/// One timed ignition inside a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SequenceStep {
    /// Offset from sequence start
    pub at_ms: u32,
    /// Relay channel to ignite
    pub channel: u8,
    /// Relay node the channel lives on
    pub node: u8,
}

/// Named, ordered list of ignitions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SequenceConfig {
    pub label: String<MAX_LABEL_LEN>,
    /// Steps sorted by `at_ms`
    pub steps: Vec<SequenceStep, MAX_STEPS_PER_SEQUENCE>,
}

impl SequenceConfig {
    /// Offset of the last step
    pub fn duration_ms(&self) -> u32 {
        self.steps.last().map_or(0, |step| step.at_ms)
    }
}

/// Complete rig configuration
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigConfig {
    pub relay: RelayConfig,
    pub console: ConsoleConfig,
    pub sequences: Vec<SequenceConfig, MAX_SEQUENCES>,
}

impl RigConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a sequence by label
    pub fn sequence(&self, label: &str) -> Option<&SequenceConfig> {
        self.sequences.iter().find(|s| s.label.as_str() == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RigConfig::new();
        assert_eq!(config.relay.close_period_ms, 700);
        assert_eq!(config.relay.close_level, ActiveLevel::Low);
        assert_eq!(config.console.trigger_hold_ms, 3000);
        assert_eq!(config.console.liveness_window_ms, 1500);
        assert!(config.sequences.is_empty());
    }

    #[test]
    fn test_sequence_duration() {
        let mut seq = SequenceConfig::default();
        assert_eq!(seq.duration_ms(), 0);
        seq.steps
            .push(SequenceStep { at_ms: 0, channel: 0, node: 0 })
            .unwrap();
        seq.steps
            .push(SequenceStep { at_ms: 2500, channel: 3, node: 0 })
            .unwrap();
        assert_eq!(seq.duration_ms(), 2500);
    }
}
