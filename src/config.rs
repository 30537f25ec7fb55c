use std::fs;
use std::path::Path;

use log::warn;
use serde::Deserialize;

use crate::error::Result;
use crate::packet::{BODY_25_PARTS, DEFAULT_MAX_DATAGRAM, capacity_for_datagram};
use crate::tracker::TrackerConfig;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub packet: PacketConfig,
    #[serde(default)]
    pub osc: OscConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PacketConfig {
    /// Byte budget of one encoded frame
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OscConfig {
    /// Destination host name or IP
    #[serde(default = "default_address")]
    pub address: String,
    /// Destination UDP port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_capacity() -> usize { capacity_for_datagram(DEFAULT_MAX_DATAGRAM, BODY_25_PARTS) }
fn default_address() -> String { "localhost".to_string() }
fn default_port() -> u16 { 7000 }

impl Default for PacketConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.tracker.validate()?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when it is missing or invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("using default configuration, could not load {}: {err}", path.display());
                Self::default()
            }
        }
    }
}
