//! Build script for boombarge-console-fw
//!
//! - Sets up linker search paths for memory.x
//! - Validates the [console] and [sequence.*] sections of rig.toml

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Must match `boombarge_protocol::RELAY_COUNT`
const RELAY_COUNT: i64 = 16;
/// Must match the capacities in `boombarge_core::config`
const MAX_LABEL_LEN: usize = 16;
const MAX_SEQUENCES: usize = 8;
const MAX_STEPS_PER_SEQUENCE: usize = 32;
/// Relay nodes wired to this console (one UART)
const NODE_COUNT: i64 = 1;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate rig.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=../rig.toml");

    let config_path = Path::new("../rig.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail(&format!("Failed to read rig.toml: {}", e)),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(&format!("Invalid TOML syntax in rig.toml:\n{}", e)),
    };

    let mut errors = Vec::new();
    if let Some(console) = config.get("console") {
        validate_console(console, &mut errors);
    }
    let sequence_count = match config.get("sequence") {
        Some(sequences) => validate_sequences(sequences, &mut errors),
        None => 0,
    };

    if !errors.is_empty() {
        fail(&format!("rig.toml is invalid:\n{}", errors.join("\n")));
    }

    if sequence_count == 0 {
        println!("cargo:warning=rig.toml defines no sequences; trigger will do nothing");
    }
    println!(
        "cargo:warning=rig.toml [console] and {} sequence(s) validated successfully",
        sequence_count
    );
}

fn validate_console(console: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = console.as_table() else {
        errors.push("[console] must be a table".to_string());
        return;
    };

    for (key, value) in table {
        let min = match key.as_str() {
            "ping_interval_ms" | "baud_rate" => 1,
            "arm_timeout_ms"
            | "trigger_hold_ms"
            | "liveness_window_ms"
            | "notification_timeout_ms" => 0,
            other => {
                errors.push(format!("unknown key '{}' in [console]", other));
                continue;
            }
        };
        match value.as_integer() {
            Some(v) if v >= min && v <= u32::MAX as i64 => {}
            _ => errors.push(format!("{} must be an integer >= {}", key, min)),
        }
    }
}

/// Returns the number of sequences found
fn validate_sequences(sequences: &toml::Value, errors: &mut Vec<String>) -> usize {
    let Some(table) = sequences.as_table() else {
        errors.push("[sequence] must hold named tables like [sequence.finale]".to_string());
        return 0;
    };

    if table.len() > MAX_SEQUENCES {
        errors.push(format!("at most {} sequences are supported", MAX_SEQUENCES));
    }

    for (label, sequence) in table {
        if label.len() > MAX_LABEL_LEN {
            errors.push(format!("sequence label '{}' is over {} bytes", label, MAX_LABEL_LEN));
        }
        validate_sequence(label, sequence, errors);
    }
    table.len()
}

fn validate_sequence(label: &str, sequence: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = sequence.as_table() else {
        errors.push(format!("[sequence.{}] must be a table", label));
        return;
    };

    for key in table.keys().filter(|key| key.as_str() != "steps") {
        errors.push(format!("unknown key '{}' in [sequence.{}]", key, label));
    }

    let steps = match table.get("steps").map(toml::Value::as_array) {
        Some(Some(steps)) => steps,
        Some(None) => {
            errors.push(format!("[sequence.{}] steps must be an array", label));
            return;
        }
        None => return,
    };

    if steps.len() > MAX_STEPS_PER_SEQUENCE {
        errors.push(format!(
            "[sequence.{}] has more than {} steps",
            label, MAX_STEPS_PER_SEQUENCE
        ));
    }

    let mut previous_at = 0;
    for (i, step) in steps.iter().enumerate() {
        let Some(step) = step.as_table() else {
            errors.push(format!("[sequence.{}] step {} must be an inline table", label, i));
            continue;
        };
        let field = |name: &str| step.get(name).and_then(toml::Value::as_integer);

        match field("at_ms") {
            Some(at) if at >= 0 && at <= u32::MAX as i64 => {
                if at < previous_at {
                    errors.push(format!("[sequence.{}] steps are not in time order", label));
                }
                previous_at = at;
            }
            _ => errors.push(format!("[sequence.{}] step {} needs at_ms >= 0", label, i)),
        }
        match field("channel") {
            Some(ch) if (0..RELAY_COUNT).contains(&ch) => {}
            _ => errors.push(format!(
                "[sequence.{}] step {} needs channel in 0..{}",
                label, i, RELAY_COUNT
            )),
        }
        if step.contains_key("node") {
            match field("node") {
                Some(node) if (0..NODE_COUNT).contains(&node) => {}
                _ => errors.push(format!(
                    "[sequence.{}] step {} node must be below {}",
                    label, i, NODE_COUNT
                )),
            }
        }
        for key in step.keys() {
            if !matches!(key.as_str(), "at_ms" | "channel" | "node") {
                errors.push(format!("[sequence.{}] step {} has unknown key '{}'", label, i, key));
            }
        }
    }
}

/// Abort the build with a boxed error message
fn fail(msg: &str) -> ! {
    let lines = msg
        .lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        lines
    );
}
