//! Error types for tensors-info synchronisation

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type alias for tensors-info operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric code for an invalid parameter (`-EINVAL`)
pub const ERROR_INVALID_PARAMETER: i32 = -22;

/// Numeric code for an allocation failure (`-ENOMEM`)
pub const ERROR_OUT_OF_MEMORY: i32 = -12;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Absent input or a structurally invalid collection
    InvalidParameter,
    /// A type code outside its enumeration
    InvalidType,
    /// A collection constructor could not allocate
    AllocationFailure,
}

/// Error types that can occur while converting tensors-info metadata
#[derive(Debug, Error)]
pub enum Error {
    /// Absent input, out-of-range index or a collection that cannot resolve
    /// an index within its declared count
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Type code or type name outside the known enumeration
    #[error("Invalid tensor type: {0}")]
    InvalidType(String),

    /// Storage for a collection could not be reserved
    #[error("Allocation failed: {0}")]
    AllocationFailed(String),
}

impl Error {
    /// Structured kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Error::InvalidType(_) => ErrorKind::InvalidType,
            Error::AllocationFailed(_) => ErrorKind::AllocationFailure,
        }
    }

    /// Numeric code exposed at the API surface
    ///
    /// Invalid types share the invalid-parameter code, the API has no
    /// dedicated value for them.
    pub fn code(&self) -> i32 {
        match self.kind() {
            ErrorKind::InvalidParameter | ErrorKind::InvalidType => ERROR_INVALID_PARAMETER,
            ErrorKind::AllocationFailure => ERROR_OUT_OF_MEMORY,
        }
    }
}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Self {
        Error::AllocationFailed(err.to_string())
    }
}
