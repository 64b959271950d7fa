//! Minimal TOML parser for `rig.toml`
//!
//! Handles only the subset the rig configuration uses. It does NOT support
//! the full TOML spec and never allocates.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - [section] and [section.name] headers
//! - Inline tables for step arrays: steps = [{ at_ms = 0, channel = 3 }]
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line arrays or strings
//! - Floats, datetimes, nested tables

use heapless::{String as HString, Vec as HVec};

use boombarge_hal::ActiveLevel;
use boombarge_protocol::RELAY_COUNT;

use super::types::{
    ConsoleConfig, RelayConfig, RigConfig, SequenceConfig, SequenceStep, MAX_CLOSE_PERIOD_MS,
    MAX_STEPS_PER_SEQUENCE,
};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Sequence steps are not in time order
    UnorderedSteps,
}

/// Current parsing context
#[derive(Debug, Clone)]
enum Section {
    Root,
    Relay,
    Console,
    Sequence,
}

/// Parse `rig.toml` text into a validated [`RigConfig`]
pub fn parse_config(input: &str) -> Result<RigConfig, ParseError> {
    let mut config = RigConfig::new();
    let mut section = Section::Root;
    let mut current_sequence: Option<SequenceConfig> = None;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            save_sequence(&mut config, &mut current_sequence)?;

            let (next, sequence) = parse_section_header(&line[1..line.len() - 1])?;
            section = next;
            current_sequence = sequence;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        match section {
            Section::Root => return Err(ParseError::UnknownKey),
            Section::Relay => apply_relay_value(&mut config.relay, key, value)?,
            Section::Console => apply_console_value(&mut config.console, key, value)?,
            Section::Sequence => {
                let sequence = current_sequence
                    .as_mut()
                    .ok_or(ParseError::InvalidSection)?;
                match key {
                    "steps" => sequence.steps = parse_steps(value)?,
                    _ => return Err(ParseError::UnknownKey),
                }
            }
        }
    }

    save_sequence(&mut config, &mut current_sequence)?;

    validate(&config)?;
    Ok(config)
}

/// Parse a header like "relay", "console" or "sequence.finale"
fn parse_section_header(header: &str) -> Result<(Section, Option<SequenceConfig>), ParseError> {
    let header = header.trim();

    if let Some((kind, name)) = header.split_once('.') {
        if kind != "sequence" || name.is_empty() || name.contains('.') {
            return Err(ParseError::InvalidSection);
        }
        let label = HString::try_from(name).map_err(|_| ParseError::InvalidSection)?;
        let sequence = SequenceConfig {
            label,
            ..SequenceConfig::default()
        };
        return Ok((Section::Sequence, Some(sequence)));
    }

    match header {
        "relay" => Ok((Section::Relay, None)),
        "console" => Ok((Section::Console, None)),
        _ => Err(ParseError::InvalidSection),
    }
}

fn save_sequence(
    config: &mut RigConfig,
    current: &mut Option<SequenceConfig>,
) -> Result<(), ParseError> {
    if let Some(sequence) = current.take() {
        if config.sequence(&sequence.label).is_some() {
            return Err(ParseError::InvalidSection);
        }
        config
            .sequences
            .push(sequence)
            .map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(())
}

fn apply_relay_value(relay: &mut RelayConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "close_period_ms" => relay.close_period_ms = parse_int(value)?,
        "close_level" => relay.close_level = parse_level(value)?,
        "baud_rate" => relay.baud_rate = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_console_value(
    console: &mut ConsoleConfig,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match key {
        "arm_timeout_ms" => console.arm_timeout_ms = parse_int(value)?,
        "trigger_hold_ms" => console.trigger_hold_ms = parse_int(value)?,
        "liveness_window_ms" => console.liveness_window_ms = parse_int(value)?,
        "ping_interval_ms" => console.ping_interval_ms = parse_int(value)?,
        "notification_timeout_ms" => console.notification_timeout_ms = parse_int(value)?,
        "baud_rate" => console.baud_rate = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

/// Range checks that span keys or sections
fn validate(config: &RigConfig) -> Result<(), ParseError> {
    if !(1..=MAX_CLOSE_PERIOD_MS).contains(&config.relay.close_period_ms) {
        return Err(ParseError::InvalidValue);
    }
    if config.console.ping_interval_ms == 0 || config.console.baud_rate == 0 {
        return Err(ParseError::InvalidValue);
    }
    if config.relay.baud_rate == 0 {
        return Err(ParseError::InvalidValue);
    }

    for sequence in &config.sequences {
        if sequence.steps.iter().any(|step| step.channel >= RELAY_COUNT) {
            return Err(ParseError::InvalidValue);
        }
        if sequence.steps.windows(2).any(|w| w[1].at_ms < w[0].at_ms) {
            return Err(ParseError::UnorderedSteps);
        }
    }
    Ok(())
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        // Make sure # is not inside a string
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ParseError::InvalidValue)
    }
}

/// Parse an integer value, allowing `_` digit separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: HString<20> = HString::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_level(value: &str) -> Result<ActiveLevel, ParseError> {
    match parse_string(value)? {
        "low" | "LOW" => Ok(ActiveLevel::Low),
        "high" | "HIGH" => Ok(ActiveLevel::High),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a steps array like [{ at_ms = 0, channel = 1 }, { at_ms = 250, channel = 2 }]
fn parse_steps(value: &str) -> Result<HVec<SequenceStep, MAX_STEPS_PER_SEQUENCE>, ParseError> {
    let mut steps = HVec::new();

    let value = value.trim();
    if !value.starts_with('[') || !value.ends_with(']') {
        return Err(ParseError::InvalidValue);
    }
    let inner = &value[1..value.len() - 1];

    let mut start = None;
    for (i, c) in inner.char_indices() {
        match c {
            '{' if start.is_none() => start = Some(i),
            '}' => {
                let open = start.take().ok_or(ParseError::InvalidValue)?;
                let step = parse_single_step(&inner[open + 1..i])?;
                steps.push(step).map_err(|_| ParseError::TooManyItems)?;
            }
            '{' => return Err(ParseError::InvalidValue),
            _ => {}
        }
    }
    if start.is_some() {
        return Err(ParseError::InvalidValue);
    }

    Ok(steps)
}

/// Parse the body of one inline table like `at_ms = 0, channel = 3`
fn parse_single_step(body: &str) -> Result<SequenceStep, ParseError> {
    let mut at_ms = None;
    let mut channel = None;
    let mut node = 0;

    for part in body.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = parse_key_value(part).ok_or(ParseError::InvalidValue)?;
        match key {
            "at_ms" => at_ms = Some(parse_int(value)?),
            "channel" => channel = Some(parse_int(value)?),
            "node" => node = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        }
    }

    Ok(SequenceStep {
        at_ms: at_ms.ok_or(ParseError::InvalidValue)?,
        channel: channel.ok_or(ParseError::InvalidValue)?,
        node,
    })
}
