//! Protocol constants

/// Start-of-frame sentinel
pub const STX: u8 = 0xA5;

/// Added to the command code to form the response ack byte
pub const ACK_SUM: u8 = 0x80;

/// Default TCP port of the terminal
pub const DEFAULT_PORT: u16 = 5010;

/// Default connect/read/write timeout (seconds)
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Frame layout sizes
pub mod sizes {
    /// Sentinel + device id + command
    pub const REQUEST_PREFIX: usize = 6;

    /// Sentinel + device id + ack + status
    pub const RESPONSE_HEADER: usize = 7;

    /// Payload length field
    pub const LENGTH: usize = 2;

    /// Trailing CRC16
    pub const CHECKSUM: usize = 2;

    /// Largest payload the length field can describe
    pub const MAX_PAYLOAD: usize = u16::MAX as usize;

    /// Smallest complete response (empty payload)
    pub const MIN_RESPONSE: usize = RESPONSE_HEADER + LENGTH + CHECKSUM;
}
