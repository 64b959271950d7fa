//! Build script for boombarge-relay-fw
//!
//! - Sets up linker search paths for memory.x
//! - Validates the [relay] section of rig.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Must match `boombarge_core::config::MAX_CLOSE_PERIOD_MS`
const MAX_CLOSE_PERIOD_MS: i64 = 5000;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
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
    if let Some(relay) = config.get("relay") {
        validate_relay(relay, &mut errors);
    }

    if !errors.is_empty() {
        fail(&format!("rig.toml [relay] is invalid:\n{}", errors.join("\n")));
    }

    println!("cargo:warning=rig.toml [relay] validated successfully");
}

fn validate_relay(relay: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = relay.as_table() else {
        errors.push("[relay] must be a table".to_string());
        return;
    };

    for (key, value) in table {
        match key.as_str() {
            "close_period_ms" => match value.as_integer() {
                Some(ms) if (1..=MAX_CLOSE_PERIOD_MS).contains(&ms) => {}
                _ => errors.push(format!(
                    "close_period_ms must be an integer in 1..={}",
                    MAX_CLOSE_PERIOD_MS
                )),
            },
            "close_level" => match value.as_str() {
                Some("low" | "LOW" | "high" | "HIGH") => {}
                _ => errors.push("close_level must be \"low\" or \"high\"".to_string()),
            },
            "baud_rate" => match value.as_integer() {
                Some(baud) if baud > 0 && baud <= u32::MAX as i64 => {}
                _ => errors.push("baud_rate must be a positive integer".to_string()),
            },
            other => errors.push(format!("unknown key '{}' in [relay]", other)),
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
