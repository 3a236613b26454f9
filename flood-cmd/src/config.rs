//! TOML configuration for the CLI.
//!
//! ```toml
//! [risk]
//! fill_severe = 92.0
//!
//! [forecast]
//! default_days = 14
//! seed = 7
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use anyhow::Result;
use flood_data::forecast::ForecastSettings;
use flood_data::risk::RiskThresholds;
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, PartialEq, Clone, Deserialize, Serialize)]
pub struct FloodConfig {
    #[serde(default)]
    pub risk: RiskThresholds,
    #[serde(default)]
    pub forecast: ForecastSettings,
}

impl FloodConfig {
    pub fn from_toml(content: &str) -> Result<FloodConfig> {
        Ok(toml::from_str(content)?)
    }
}

/// Load the config file at `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&str>) -> Result<FloodConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            let config = FloodConfig::from_toml(&content)?;
            info!("Loaded configuration from {}", path);
            Ok(config)
        }
        None => Ok(FloodConfig::default()),
    }
}
