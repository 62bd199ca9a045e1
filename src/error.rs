use thiserror::Error;

/// Errors that can occur when using a [`SecretBuffer`](crate::SecretBuffer).
///
/// Every error is synchronous and signals a programmer error or a data-shape
/// mismatch, never a transient condition; retrying the failed call with the
/// same arguments will fail again. Zeroing obligations are honored even on
/// error paths: a constructor that fails partway still wipes the
/// caller-supplied source.
#[derive(Error, Debug)]
pub enum SecretBufferError {
    /// A null or otherwise invalid foreign source was supplied to one of the
    /// raw-pointer constructors.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A read or peek was attempted at or past the end of the buffer's
    /// logical content.
    #[error("End of data reached")]
    EndOfData,

    /// The buffer's content contains an embedded zero byte and cannot be
    /// represented as a null-terminated view.
    #[error("Content is not representable: {0}")]
    Unrepresentable(String),

    /// The system failed to produce cryptographically secure random data
    /// for a randomly initialized buffer.
    #[error("Random generation failed: {0}")]
    RandomFailed(String),
}

/// Result type for secretbuffer operations.
///
/// This type alias is used throughout the library to represent operation
/// results that may fail with a [`SecretBufferError`].
pub type Result<T> = std::result::Result<T, SecretBufferError>;
