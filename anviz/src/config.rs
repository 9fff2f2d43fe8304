//! Device connection settings
//!
//! Settings live in the `[anviz]` table of a TOML file:
//!
//! ```toml
//! [anviz]
//! device_id = 1
//! ip_addr = "192.168.1.218"
//! ip_port = 5010
//! ```
//!
//! The keys match the `[anviz]` section of the older `anviz.ini` files, but
//! the file is TOML: string values such as `ip_addr` must be quoted, so an
//! INI line `ip_addr = 192.168.1.218` has to be rewritten as
//! `ip_addr = "192.168.1.218"`.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anviz_core::constants::{DEFAULT_PORT, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Terminal connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device id placed in every frame.
    pub device_id: u32,
    /// Terminal host name or IPv4 address.
    pub ip_addr: String,
    /// TCP port (default: 5010).
    #[serde(default = "default_port")]
    pub ip_port: u16,
    /// Connect/read/write timeout in seconds (default: 5).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    anviz: DeviceConfig,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT
}

impl DeviceConfig {
    /// Settings for a terminal on the default port.
    pub fn new(device_id: u32, ip_addr: impl Into<String>) -> Self {
        Self {
            device_id,
            ip_addr: ip_addr.into(),
            ip_port: DEFAULT_PORT,
            timeout_secs: DEFAULT_TIMEOUT,
        }
    }

    /// Load and validate settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ip_addr.trim().is_empty() {
            return Err(ConfigError::Validation("ip_addr is required".into()));
        }
        if self.ip_port == 0 {
            return Err(ConfigError::Validation("ip_port must be non-zero".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation("timeout_secs must be non-zero".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl FromStr for DeviceConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let file: ConfigFile = toml::from_str(s)?;
        file.anviz.validate()?;
        Ok(file.anviz)
    }
}
