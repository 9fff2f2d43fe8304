//! # anviz-core
//!
//! Core protocol implementation for Anviz biometric attendance terminals.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding
//! - CRC16 checksum calculation
//! - Command and status definitions
//! - Session state

pub mod command;
pub mod constants;
pub mod crc;
pub mod error;
pub mod frame;
pub mod session;
pub mod status;

pub use command::Command;
pub use constants::DEFAULT_PORT;
pub use error::{Error, Result};
pub use frame::{Request, Response, ResponseHeader};
pub use session::{Session, SessionState};
pub use status::Status;
