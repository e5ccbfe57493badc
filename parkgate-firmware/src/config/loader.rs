//! Embedded configuration loader

use defmt::*;

use parkgate_core::config::{parse_config, ParkingConfig};

/// Embedded configuration (compiled into firmware)
/// Edit parking.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../parking.toml");

/// Parse the embedded configuration
///
/// build.rs already rejects a broken file, so the fallback only triggers
/// when the two validators disagree.
pub fn load_config() -> ParkingConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            ParkingConfig::default()
        }
    }
}
