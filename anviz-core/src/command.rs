//! Anviz protocol command definitions

use std::fmt;

use crate::constants::ACK_SUM;
use crate::error::{Error, Result};

/// Protocol command codes
///
/// The subset of the Anviz TC/T-series command set implemented by this
/// client. Responses echo the code with [`ACK_SUM`] added.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    // Device information
    GetInfo = 0x30,
    SetInfo = 0x31,
    GetInfo2 = 0x32,
    SetInfo2 = 0x33,

    // Clock
    GetDateTime = 0x38,
    SetDateTime = 0x39,

    // Network
    GetTcpIpParams = 0x3A,
    SetTcpIpParams = 0x3B,

    // Storage
    GetRecordInfo = 0x3C,
    DownloadRecords = 0x40,
    UploadRecords = 0x41,
    DownloadStaffInfo = 0x42,
    UploadStaffInfo = 0x43,

    // Identity
    GetDeviceSn = 0x46,
    SetDeviceSn = 0x47,
    GetDeviceType = 0x48,
    SetDeviceType = 0x49,
}

impl Command {
    /// Every command, in code order
    pub const ALL: [Command; 17] = [
        Self::GetInfo,
        Self::SetInfo,
        Self::GetInfo2,
        Self::SetInfo2,
        Self::GetDateTime,
        Self::SetDateTime,
        Self::GetTcpIpParams,
        Self::SetTcpIpParams,
        Self::GetRecordInfo,
        Self::DownloadRecords,
        Self::UploadRecords,
        Self::DownloadStaffInfo,
        Self::UploadStaffInfo,
        Self::GetDeviceSn,
        Self::SetDeviceSn,
        Self::GetDeviceType,
        Self::SetDeviceType,
    ];

    /// Raw command code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Ack byte the device answers this command with
    pub fn ack(self) -> u8 {
        self.code().wrapping_add(ACK_SUM)
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::GetInfo => "CMD_GET_INFO",
            Self::SetInfo => "CMD_SET_INFO",
            Self::GetInfo2 => "CMD_GET_INFO_2",
            Self::SetInfo2 => "CMD_SET_INFO_2",
            Self::GetDateTime => "CMD_GET_DATETIME",
            Self::SetDateTime => "CMD_SET_DATETIME",
            Self::GetTcpIpParams => "CMD_GET_TCPIP_PARAMS",
            Self::SetTcpIpParams => "CMD_SET_TCPIP_PARAMS",
            Self::GetRecordInfo => "CMD_GET_RECORD_INFO",
            Self::DownloadRecords => "CMD_DOWNLOAD_RECORDS",
            Self::UploadRecords => "CMD_UPLOAD_RECORDS",
            Self::DownloadStaffInfo => "CMD_DOWNLOAD_STAFF_INFO",
            Self::UploadStaffInfo => "CMD_UPLOAD_STAFF_INFO",
            Self::GetDeviceSn => "CMD_GET_DEVICE_SN",
            Self::SetDeviceSn => "CMD_SET_DEVICE_SN",
            Self::GetDeviceType => "CMD_GET_DEVICE_TYPE",
            Self::SetDeviceType => "CMD_SET_DEVICE_TYPE",
        }
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.code() == value)
            .ok_or(Error::UnknownCommand(value))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_conversion() {
        assert_eq!(u8::from(Command::GetDateTime), 0x38);
        assert_eq!(Command::try_from(0x3A).unwrap(), Command::GetTcpIpParams);
    }

    #[test]
    fn test_command_conversion_all() {
        for cmd in Command::ALL {
            assert_eq!(Command::try_from(cmd.code()).unwrap(), cmd);
        }
    }

    #[test]
    fn test_command_ack() {
        assert_eq!(Command::GetInfo.ack(), 0xB0);
        assert_eq!(Command::GetDateTime.ack(), 0xB8);
        assert_eq!(Command::SetDeviceType.ack(), 0xC9);
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(
            Command::try_from(0x34),
            Err(Error::UnknownCommand(0x34))
        ));
    }

    #[test]
    fn test_command_display() {
        assert_eq!(Command::GetRecordInfo.to_string(), "CMD_GET_RECORD_INFO(0x3C)");
    }
}
