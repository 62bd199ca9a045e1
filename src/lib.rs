//! # secretbuffer
//!
//! A self-shredding byte buffer for short-lived sensitive data.
//!
//! `secretbuffer` provides a single primitive, [`SecretBuffer`]: a growable,
//! positionable byte buffer for passwords, keys, and tokens whose backing
//! memory is guaranteed to be overwritten with zeros before release, whose
//! equality comparison resists timing-based content inference, and which
//! otherwise behaves like a generic byte stream so it can be used wherever
//! byte-oriented I/O is expected.
//!
//! ## Features
//!
//! - **Secure zeroing**: every allocation the buffer ever held is zero-wiped
//!   before release, including storage superseded during growth. The wipe
//!   goes through `zeroize` and cannot be elided by the optimizer.
//! - **Shred lifecycle**: [`SecretBuffer::shred`] empties the buffer and
//!   wipes its full capacity; dropping an unshredded buffer logs a warning
//!   and wipes as a safety net.
//! - **Constant-time equality**: comparison scans the full compared length
//!   with no early exit, so timing reveals nothing about where secrets
//!   differ.
//! - **Content-free hashing**: all buffers hash identically, preventing
//!   content inference through hash-based side channels.
//! - **Stream semantics**: byte-level cursor operations plus
//!   `std::io::{Read, Write, Seek}`, and a bulk hand-off to any writer.
//! - **Foreign interop**: raw-pointer constructors that wipe their source,
//!   and a null-terminated view for C-style consumers.
//!
//! This crate is best-effort protection against accidental leakage via
//! stale copies and timing side channels. It is not a cryptographic
//! library, does not lock memory against swapping, and offers no defense
//! against physical memory inspection.
//!
//! ## Basic Usage
//!
//! ```rust
//! use secretbuffer::SecretBuffer;
//!
//! // Take ownership of a secret; the source is wiped.
//! let mut password = b"correct horse battery staple".to_vec();
//! let mut secret = SecretBuffer::from_bytes(&mut password);
//! assert!(password.iter().all(|&b| b == 0));
//!
//! // Hand the secret to a collaborator, then shred.
//! let mut prompt = Vec::new();
//! secret.copy_to_writer(&mut prompt).unwrap();
//! secret.shred();
//! assert!(secret.is_shredded());
//! ```
//!
//! ## Scoped Use
//!
//! Prefer [`SecretBuffer::shred_with`] when the secret's useful life is a
//! single operation; the shred is guaranteed on every exit path, including
//! panics:
//!
//! ```rust
//! use secretbuffer::SecretBuffer;
//!
//! let mut key = vec![0x13u8, 0x37];
//! let mut secret = SecretBuffer::from_bytes(&mut key);
//!
//! let first = secret.shred_with(|buf| buf.read_byte()).unwrap();
//! assert_eq!(first, 0x13);
//! assert!(secret.is_shredded());
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return a [`Result<T>`](Result) with a
//! [`SecretBufferError`] describing what went wrong. Errors signal
//! programmer error or a data-shape mismatch, never a transient condition.
//!
//! ```rust
//! use secretbuffer::{SecretBuffer, SecretBufferError};
//!
//! let mut buf = SecretBuffer::new();
//! assert!(matches!(buf.read_byte(), Err(SecretBufferError::EndOfData)));
//! ```

/// The SecretBuffer type and its lifecycle operations
pub mod buffer;

/// Error types
pub mod error;

/// std::io integration and the writer hand-off boundary
pub mod stream;

// Re-export key types
pub use crate::buffer::SecretBuffer;
pub use crate::error::{Result, SecretBufferError};
