//! Boot-time configuration
//!
//! `rig.toml` is compiled in and validated by `build.rs`; parsing it again
//! here only fails if the two parsers disagree.

use defmt::*;

use boombarge_core::config::{parse_config, RelayConfig};

/// Embedded rig configuration (edit rig.toml and rebuild to customize)
const RIG_CONFIG: &str = include_str!("../../rig.toml");

/// Relay settings from the embedded config, or defaults if it is rejected
pub fn load() -> RelayConfig {
    match parse_config(RIG_CONFIG) {
        Ok(config) => {
            info!("Loaded rig.toml");
            config.relay
        }
        Err(e) => {
            error!("rig.toml rejected: {:?}, using defaults", e);
            RelayConfig::default()
        }
    }
}
