//! Error types for anviz-core

use crate::{command::Command, status::Status};

/// Result type alias for anviz operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame is too short to be valid
    #[error("Frame too short: expected at least {expected} bytes, got {actual} bytes")]
    FrameTooShort {
        expected: usize,
        actual: usize,
    },

    /// Sentinel, device id or ack byte did not match the request
    #[error("Error in response")]
    InvalidResponse,

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    ChecksumMismatch {
        expected: u16,
        received: u16,
    },

    /// Declared payload length disagrees with the frame size
    #[error("Length mismatch: header declares {declared} payload bytes, frame carries {actual}")]
    LengthMismatch {
        declared: usize,
        actual: usize,
    },

    /// Unknown command code
    #[error("Unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Unknown status code
    #[error("Unknown status code: 0x{0:02X}")]
    UnknownStatus(u8),

    /// Device answered with a non-success status
    #[error("Device returned error for {command}: {status}")]
    Device {
        command: Command,
        status: Status,
    },

    /// Payload too large for the 16-bit length field
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },

    /// Invalid session state
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),
}

impl Error {
    /// Status reported by the device, if this is a device-side failure
    pub fn device_status(&self) -> Option<Status> {
        match self {
            Self::Device { status, .. } => Some(*status),
            _ => None,
        }
    }
}
