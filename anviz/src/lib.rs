//! # anviz
//!
//! Rust implementation of the Anviz attendance terminal communication protocol.
//!
//! ## Features
//!
//! - Type-safe frame codec with CRC16 validation
//! - Async/await API using Tokio
//! - Typed device status errors
//! - Decoders for clock, network and record payloads
//!
//! ## Quick Start
//!
//! ```no_run
//! use anviz::{Device, DeviceConfig};
//!
//! #[tokio::main]
//! async fn main() -> anviz::Result<()> {
//!     let config = DeviceConfig::load("anviz.toml")?;
//!     let mut device = Device::from_config(&config);
//!
//!     // The connection is opened by the first command
//!     let params = device.get_net_params().await?;
//!     println!("{}", params);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod device;
pub mod error;

// Re-exports
pub use config::{ConfigError, DeviceConfig};
pub use device::Device;
pub use error::{Error, Result};

// Re-export types
pub use anviz_core::{Command, DEFAULT_PORT, SessionState, Status};
pub use anviz_transport::{TcpTransport, Transport};
pub use anviz_types::{MacAddress, NetParams, RecordInfo};
