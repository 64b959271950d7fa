//! Boot-time configuration
//!
//! `rig.toml` is compiled in and validated by `build.rs`.

use defmt::*;

use boombarge_core::config::{parse_config, RigConfig};

/// Embedded rig configuration (edit rig.toml and rebuild to customize)
const RIG_CONFIG: &str = include_str!("../../rig.toml");

/// Full rig configuration, or defaults (no sequences) if it is rejected
pub fn load() -> RigConfig {
    match parse_config(RIG_CONFIG) {
        Ok(config) => {
            info!("Loaded rig.toml");
            config
        }
        Err(e) => {
            error!("rig.toml rejected: {:?}, using defaults", e);
            RigConfig::new()
        }
    }
}
