pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid payload length: expected at least {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Fail unless `payload` holds at least `expected` bytes
pub(crate) fn ensure_len(payload: &[u8], expected: usize) -> Result<()> {
    if payload.len() < expected {
        return Err(Error::InvalidLength {
            expected,
            actual: payload.len(),
        });
    }
    Ok(())
}
