//! Device result codes

use std::fmt;

use crate::error::{Error, Result};

/// Result code carried in the status byte of every response
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    /// Operation successful
    Success = 0x00,

    /// Operation failed
    Fail = 0x01,

    /// Store full
    Full = 0x04,

    /// Store empty
    Empty = 0x05,

    /// User (or other entity) does not exist
    NotFound = 0x06,

    /// Biometric capture timed out
    Timeout = 0x08,

    /// User already exists
    DuplicateEntity = 0x0A,

    /// Fingerprint already enrolled
    DuplicateBiometric = 0x0B,
}

impl Status {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "operation successful",
            Self::Fail => "operation failed",
            Self::Full => "store full",
            Self::Empty => "store empty",
            Self::NotFound => "entity not found",
            Self::Timeout => "capture timed out",
            Self::DuplicateEntity => "entity already exists",
            Self::DuplicateBiometric => "biometric already enrolled",
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        status as u8
    }
}

impl TryFrom<u8> for Status {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(Self::Success),
            0x01 => Ok(Self::Fail),
            0x04 => Ok(Self::Full),
            0x05 => Ok(Self::Empty),
            0x06 => Ok(Self::NotFound),
            0x08 => Ok(Self::Timeout),
            0x0A => Ok(Self::DuplicateEntity),
            0x0B => Ok(Self::DuplicateBiometric),
            _ => Err(Error::UnknownStatus(value)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.description(), *self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion() {
        assert_eq!(Status::try_from(0x06).unwrap(), Status::NotFound);
        assert_eq!(u8::from(Status::DuplicateBiometric), 0x0B);
    }

    #[test]
    fn test_status_is_success() {
        assert!(Status::Success.is_success());
        assert!(!Status::Empty.is_success());
    }

    #[test]
    fn test_unknown_status() {
        assert!(matches!(Status::try_from(0x02), Err(Error::UnknownStatus(0x02))));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::NotFound.to_string(), "entity not found (0x06)");
    }
}
