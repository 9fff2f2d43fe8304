//! High-level error types

use anviz_core::Status;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] anviz_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] anviz_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] anviz_types::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Status reported by the device, if the device rejected the command
    pub fn device_status(&self) -> Option<Status> {
        match self {
            Self::Core(e) => e.device_status(),
            _ => None,
        }
    }

    /// Check if the device reported that the requested entity does not exist
    pub fn is_not_found(&self) -> bool {
        self.device_status() == Some(Status::NotFound)
    }

    /// Check if the connection can no longer be used
    ///
    /// Sessions are never re-established, so the caller has to build a
    /// new [`Device`](crate::Device) after one of these.
    pub fn is_connection_lost(&self) -> bool {
        matches!(
            self,
            Self::Transport(
                anviz_transport::Error::ConnectionClosed
                    | anviz_transport::Error::Io(_)
                    | anviz_transport::Error::ReadTimeout
                    | anviz_transport::Error::WriteTimeout
            )
        )
    }
}
