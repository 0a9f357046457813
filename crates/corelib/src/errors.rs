use thiserror::Error;

/// Engine setup failed. Cloneable so one failed attempt can be reported to
/// every caller that was waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("engine '{engine}' failed to activate: {reason}")]
pub struct ActivationError {
    pub engine: &'static str,
    pub reason: String,
}

impl ActivationError {
    pub fn new(engine: &'static str, reason: impl Into<String>) -> Self {
        Self {
            engine,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    #[error("hasher has been disposed")]
    Disposed,
    #[error("output buffer too small: need {required} bytes at offset {offset}, capacity is {capacity}")]
    BufferTooSmall {
        offset: usize,
        required: usize,
        capacity: usize,
    },
    #[error(transparent)]
    Activation(#[from] ActivationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestError {
    #[error("multihash must be {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("unexpected multihash code 0x{0:02x}")]
    Code(u8),
    #[error("unexpected digest size {0}")]
    Size(u8),
}
