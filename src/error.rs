use std::collections::TryReserveError;

use thiserror::Error;

pub type RingResult<T, E = RingBufferError> = Result<T, E>;

#[derive(Debug, Error)]
pub enum RingBufferError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The buffer was destroyed; its storage is gone.
    #[error("Uninitialized buffer")]
    Uninitialized,

    #[error("Allocation failure: {0}")]
    AllocationFailure(#[from] TryReserveError),
}
