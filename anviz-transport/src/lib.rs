//! Transport layer for the Anviz protocol
//!
//! Provides TCP communication with terminals.

pub mod error;
pub mod tcp;

pub use error::{Error, Result};
pub use tcp::TcpTransport;

use async_trait::async_trait;
use bytes::BytesMut;

/// Byte-stream transport to a single terminal
///
/// The protocol has no framing signal besides the length field, so reads
/// are always for an exact byte count.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to device
    async fn connect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Send raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive exactly `len` bytes, waiting across short reads
    async fn read_exact(&mut self, len: usize) -> Result<BytesMut>;

    /// Get remote address
    fn remote_addr(&self) -> String;
}
