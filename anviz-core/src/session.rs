//! Session state for the Anviz protocol
//!
//! A session binds one device id to one connection. It is connected at
//! most once and never returns to `Disconnected`: a lost connection is
//! reported to the caller instead of being re-established.

use crate::error::{Error, Result};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No connection opened yet
    Disconnected,

    /// Connection established and ready for commands
    Connected,
}

/// Session state tracker
#[derive(Debug, Clone)]
pub struct Session {
    /// Device id placed in every request frame
    device_id: u32,

    state: SessionState,
}

impl Session {
    /// Create a new disconnected session
    pub fn new(device_id: u32) -> Self {
        Self {
            device_id,
            state: SessionState::Disconnected,
        }
    }

    /// Get the device id
    pub fn device_id(&self) -> u32 {
        self.device_id
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Record that the connection has been established
    pub fn mark_connected(&mut self) -> Result<()> {
        if self.state != SessionState::Disconnected {
            return Err(Error::InvalidSessionState(format!(
                "Cannot connect from state: {:?}",
                self.state
            )));
        }

        self.state = SessionState::Connected;
        Ok(())
    }
}
