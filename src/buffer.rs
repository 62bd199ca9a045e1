use crate::error::{Result, SecretBufferError};
use log::{debug, trace, warn};
use std::fmt;
use std::hash::{Hash, Hasher};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Fixed value fed to every hasher regardless of buffer content. All
/// SecretBuffers collide under hashing so that hash values can never be
/// used to infer content.
const HASH_SENTINEL: u64 = 0x5ec0_b0f0;

/// A growable byte buffer for short-lived sensitive data.
///
/// `SecretBuffer` behaves like a positionable byte stream: bytes are written
/// at a cursor, read back after seeking, and handed off to outside code in
/// bulk. What distinguishes it from an ordinary buffer is its lifecycle
/// discipline:
///
/// - Backing storage is always overwritten with zeros before release. This
///   covers explicit [`shred`](SecretBuffer::shred) calls, superseded
///   allocations during growth, and the `Drop` safety net.
/// - Equality comparison runs in constant time over the compared content,
///   so timing cannot reveal *where* two secrets differ. The size check
///   itself is a documented, accepted length leak.
/// - Hash values are derived from a fixed constant, never from content.
/// - The caller-supplied source of [`from_bytes`](SecretBuffer::from_bytes)
///   is wiped as part of construction, on every path.
///
/// Dropping a buffer that was not explicitly shredded emits a `log::warn!`
/// diagnostic before wiping, since relying on implicit cleanup usually means
/// the caller forgot [`shred`](SecretBuffer::shred) or should have used
/// [`shred_with`](SecretBuffer::shred_with).
///
/// This is best-effort protection against accidental leakage via stale
/// copies and timing side channels only. It does not lock memory against
/// swapping and offers no defense against physical memory inspection.
///
/// # Examples
///
/// ```rust
/// use secretbuffer::SecretBuffer;
///
/// let mut password = b"hunter2".to_vec();
/// let mut secret = SecretBuffer::from_bytes(&mut password);
///
/// // The original copy has been wiped.
/// assert!(password.iter().all(|&b| b == 0));
///
/// // Read the secret back through the cursor.
/// assert_eq!(secret.read_byte().unwrap(), b'h');
///
/// // Wipe it when done.
/// secret.shred();
/// assert!(secret.is_shredded());
/// ```
pub struct SecretBuffer {
    /// Owned allocation. `storage.len()` is the tracked capacity; every byte
    /// is initialized, and bytes past `size` are kept zero.
    storage: Vec<u8>,
    /// Count of logically valid bytes. Always `<= storage.len()`.
    size: usize,
    /// Read/write position, clamped to `[0, size]`.
    cursor: usize,
}

impl SecretBuffer {
    /// Creates an empty buffer with no preallocated storage.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty buffer with at least `size_hint` bytes of capacity.
    ///
    /// The hint avoids growth reallocations (and the zeroing work each one
    /// implies) when the final size is known up front.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use secretbuffer::SecretBuffer;
    ///
    /// let buf = SecretBuffer::with_capacity(32);
    /// assert!(buf.is_empty());
    /// assert!(buf.capacity() >= 32);
    /// ```
    pub fn with_capacity(size_hint: usize) -> Self {
        #[cfg(feature = "metrics")]
        let start = std::time::Instant::now();

        trace!("creating SecretBuffer with capacity hint {}", size_hint);
        let buf = Self {
            storage: vec![0u8; size_hint],
            size: 0,
            cursor: 0,
        };

        #[cfg(feature = "metrics")]
        metrics::histogram!(
            "secretbuffer.alloc_duration_seconds",
            start.elapsed().as_secs_f64()
        );

        buf
    }

    /// Creates a buffer holding a copy of `bytes`, then wipes `bytes`.
    ///
    /// Every byte of the source is written in order and the cursor is reset
    /// to the start. Wiping the caller's copy is a hard contract of this
    /// constructor: after it returns, `bytes` is all-zero on every path.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use secretbuffer::SecretBuffer;
    ///
    /// let mut key = vec![1u8, 2, 3];
    /// let mut buf = SecretBuffer::from_bytes(&mut key);
    ///
    /// assert_eq!(key, [0, 0, 0]);
    /// assert_eq!(buf.read_byte().unwrap(), 1);
    /// ```
    pub fn from_bytes(bytes: &mut [u8]) -> Self {
        let mut buf = Self::with_capacity(bytes.len());
        for &b in bytes.iter() {
            buf.write_byte(b);
        }
        buf.cursor = 0;
        bytes.zeroize();
        buf
    }

    /// Creates a buffer from a text string.
    ///
    /// Convenience only. The string's own bytes are *not* wiped (string
    /// literals are immutable, and `&str` gives no mutable access), so this
    /// is a weaker-security path: prefer [`from_bytes`](Self::from_bytes)
    /// with an owned, mutable source for true secrets.
    pub fn from_text(text: &str) -> Self {
        let mut staged = text.as_bytes().to_vec();
        // from_bytes wipes the staged copy; the original str remains.
        Self::from_bytes(&mut staged)
    }

    /// Creates a buffer from a foreign pointer and an explicit length,
    /// wiping the source region after the copy.
    ///
    /// # Errors
    ///
    /// Returns [`SecretBufferError::InvalidArgument`] if `ptr` is null.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `len` bytes, and the
    /// region must not be aliased for the duration of the call.
    pub unsafe fn from_raw(ptr: *mut u8, len: usize) -> Result<Self> {
        if ptr.is_null() {
            return Err(SecretBufferError::InvalidArgument(
                "null source pointer".to_string(),
            ));
        }
        let source = std::slice::from_raw_parts_mut(ptr, len);
        Ok(Self::from_bytes(source))
    }

    /// Creates a buffer from a foreign pointer by scanning for a zero
    /// terminator, wiping the source (terminator included) after the copy.
    ///
    /// The scan's duration is proportional to the secret's length; this is
    /// a documented, unmitigated length leak.
    ///
    /// # Errors
    ///
    /// Returns [`SecretBufferError::InvalidArgument`] if `ptr` is null.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a zero-terminated region valid for reads and
    /// writes up to and including the terminator, with no aliasing for the
    /// duration of the call.
    pub unsafe fn from_raw_nul_terminated(ptr: *mut u8) -> Result<Self> {
        if ptr.is_null() {
            return Err(SecretBufferError::InvalidArgument(
                "null source pointer".to_string(),
            ));
        }
        let mut len = 0usize;
        while *ptr.add(len) != 0 {
            len += 1;
        }
        let source = std::slice::from_raw_parts_mut(ptr, len + 1);
        let mut buf = Self::with_capacity(len);
        for &b in source[..len].iter() {
            buf.write_byte(b);
        }
        buf.cursor = 0;
        source.zeroize();
        Ok(buf)
    }

    /// Creates a buffer filled with `len` cryptographically secure random
    /// bytes, cursor at the start.
    ///
    /// # Errors
    ///
    /// Returns [`SecretBufferError::RandomFailed`] if the system's random
    /// source fails.
    pub fn random(len: usize) -> Result<Self> {
        let mut staged = vec![0u8; len];
        getrandom::getrandom(&mut staged)
            .map_err(|e| SecretBufferError::RandomFailed(e.to_string()))?;
        // from_bytes wipes the staging vec.
        Ok(Self::from_bytes(&mut staged))
    }

    /// Returns the count of logically valid bytes.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the allocated capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Returns the current cursor position.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Returns the number of bytes between the cursor and the end.
    pub fn bytes_available(&self) -> usize {
        self.size - self.cursor
    }

    /// Returns true if the cursor is at or past the end of the content.
    pub fn is_eof(&self) -> bool {
        self.cursor >= self.size
    }

    /// Moves the cursor to `pos`, clamped into `[0, len]`.
    pub fn seek(&mut self, pos: usize) {
        self.cursor = pos.min(self.size);
    }

    /// Moves the cursor to the end of the content.
    pub fn seek_to_end(&mut self) {
        self.cursor = self.size;
    }

    /// Moves the cursor by a signed offset, clamped into `[0, len]`.
    pub fn skip(&mut self, n: isize) {
        let target = if n.is_negative() {
            self.cursor.saturating_sub(n.unsigned_abs())
        } else {
            self.cursor.saturating_add(n.unsigned_abs())
        };
        self.seek(target);
    }

    /// Writes one byte at the cursor and advances it, extending the content
    /// when writing at the end.
    ///
    /// When the write would exceed the allocated capacity, storage grows to
    /// `(len + 16) * 2` bytes; the superseded allocation is zero-wiped
    /// before release so no stale copy of the content survives.
    pub fn write_byte(&mut self, byte: u8) {
        if self.cursor >= self.storage.len() {
            self.grow(self.cursor + 1);
        }
        self.storage[self.cursor] = byte;
        self.cursor += 1;
        if self.cursor > self.size {
            self.size = self.cursor;
        }
    }

    /// Writes a run of bytes at the cursor, with the same growth and
    /// wipe-on-reallocation contract as [`write_byte`](Self::write_byte).
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let end = self.cursor + bytes.len();
        if end > self.storage.len() {
            self.grow(end);
        }
        self.storage[self.cursor..end].copy_from_slice(bytes);
        self.cursor = end;
        if self.cursor > self.size {
            self.size = self.cursor;
        }
    }

    /// Returns the byte at the cursor and advances past it.
    ///
    /// # Errors
    ///
    /// Returns [`SecretBufferError::EndOfData`] if the cursor is at or past
    /// the end of the content.
    pub fn read_byte(&mut self) -> Result<u8> {
        let b = self.peek_byte()?;
        self.cursor += 1;
        Ok(b)
    }

    /// Returns the byte at the cursor without advancing.
    ///
    /// # Errors
    ///
    /// Returns [`SecretBufferError::EndOfData`] if the cursor is at or past
    /// the end of the content.
    pub fn peek_byte(&self) -> Result<u8> {
        if self.cursor >= self.size {
            return Err(SecretBufferError::EndOfData);
        }
        Ok(self.storage[self.cursor])
    }

    /// Overwrites the entire allocated capacity with zeros and resets the
    /// buffer to empty.
    ///
    /// The wipe goes through `zeroize`, which guarantees the stores are
    /// observable in memory and not elided by the optimizer. Idempotent:
    /// shredding an already-shredded buffer is a no-op. The buffer remains
    /// live and reusable afterward.
    pub fn shred(&mut self) {
        debug!(
            "shredding SecretBuffer ({} byte(s) live, capacity {})",
            self.size,
            self.storage.len()
        );
        // Wipe through the slice so the allocation's length survives;
        // zeroize on the Vec itself would also clear it.
        self.storage.as_mut_slice().zeroize();
        self.size = 0;
        self.cursor = 0;
    }

    /// Returns true if every byte of the allocated capacity is zero.
    ///
    /// Heuristic: a buffer that legitimately held only zero bytes is
    /// indistinguishable from a shredded one.
    pub fn is_shredded(&self) -> bool {
        self.storage.iter().all(|&b| b == 0)
    }

    /// Deep-copies this buffer's storage, size, and cursor into `dest`.
    ///
    /// Reallocates `dest` when its capacity differs (zero-wiping its old
    /// storage first), otherwise copies in place. The two buffers never
    /// share storage.
    pub fn copy_into(&self, dest: &mut SecretBuffer) {
        if dest.storage.len() != self.storage.len() {
            dest.storage.zeroize();
            dest.storage = vec![0u8; self.storage.len()];
        }
        dest.storage.copy_from_slice(&self.storage);
        dest.size = self.size;
        dest.cursor = self.cursor;
    }

    /// Runs `operation` against this buffer and shreds it on every exit
    /// path: normal return, error return, or panic.
    ///
    /// The operation's failure (if any) propagates after the shred has run.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use secretbuffer::SecretBuffer;
    ///
    /// let mut key = vec![9u8, 9, 9];
    /// let mut buf = SecretBuffer::from_bytes(&mut key);
    ///
    /// let first = buf.shred_with(|b| b.read_byte()).unwrap();
    /// assert_eq!(first, 9);
    /// assert!(buf.is_shredded());
    /// ```
    pub fn shred_with<T, F>(&mut self, operation: F) -> Result<T>
    where
        F: FnOnce(&mut SecretBuffer) -> Result<T>,
    {
        struct ShredGuard<'a>(&'a mut SecretBuffer);

        impl Drop for ShredGuard<'_> {
            fn drop(&mut self) {
                self.0.shred();
            }
        }

        let mut guard = ShredGuard(self);
        operation(&mut *guard.0)
    }

    /// Returns a null-terminated view of the content for foreign interop.
    ///
    /// On success the view is the content followed by exactly one zero
    /// terminator written into spare capacity past the end; `len` and
    /// `position` are unchanged. The slice aliases internal storage and is
    /// invalidated by the buffer's next mutation or shred.
    ///
    /// # Errors
    ///
    /// Returns [`SecretBufferError::Unrepresentable`] if the content
    /// contains an embedded zero byte.
    pub fn as_nul_terminated(&mut self) -> Result<&[u8]> {
        if self.storage[..self.size].iter().any(|&b| b == 0) {
            return Err(SecretBufferError::Unrepresentable(
                "content contains an embedded zero byte".to_string(),
            ));
        }
        if self.size == self.storage.len() {
            self.grow(self.size + 1);
        }
        self.storage[self.size] = 0;
        Ok(&self.storage[..self.size + 1])
    }

    /// The live content, `[0, size)`.
    pub(crate) fn live(&self) -> &[u8] {
        &self.storage[..self.size]
    }

    /// Copies up to `out.len()` bytes from the cursor and advances it.
    /// Returns the number of bytes copied; 0 means end of data.
    pub(crate) fn read_bytes(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.bytes_available());
        out[..n].copy_from_slice(&self.storage[self.cursor..self.cursor + n]);
        self.cursor += n;
        n
    }

    /// Reallocates storage to hold at least `required` bytes, copying the
    /// live content across and zero-wiping the old allocation before it is
    /// released.
    fn grow(&mut self, required: usize) {
        let new_capacity = ((self.size + 16) * 2).max(required);
        trace!(
            "growing SecretBuffer storage from {} to {} bytes",
            self.storage.len(),
            new_capacity
        );
        let mut next = vec![0u8; new_capacity];
        next[..self.size].copy_from_slice(&self.storage[..self.size]);
        self.storage.zeroize();
        self.storage = next;
    }
}

impl Default for SecretBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SecretBuffer {
    /// Deep copy; the clone owns fresh storage with the same content,
    /// size, and cursor.
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            size: self.size,
            cursor: self.cursor,
        }
    }
}

impl Drop for SecretBuffer {
    /// Best-effort safety net: wipes storage when the buffer goes out of
    /// scope. Emits a diagnostic first if the caller did not shred
    /// explicitly; the diagnostic cannot fail or block the wipe (a `log`
    /// call with no subscriber is a no-op, and one with a subscriber
    /// returns before the wipe proceeds).
    fn drop(&mut self) {
        if !self.is_shredded() {
            warn!(
                "SecretBuffer dropped without an explicit shred; wiping {} byte(s) now",
                self.size
            );
        }
        self.shred();
    }
}

impl PartialEq for SecretBuffer {
    /// Constant-time value equality.
    ///
    /// Two buffers are equal when their positions match, their sizes match,
    /// and their content matches. The content scan accumulates over exactly
    /// `min(len)` bytes with no early exit, so timing cannot reveal where a
    /// mismatch occurs. The size comparison is an accepted length leak.
    fn eq(&self, other: &Self) -> bool {
        let n = self.size.min(other.size);
        // Full-length accumulated scan; subtle prevents short-circuiting.
        let content_matches: bool = self.storage[..n].ct_eq(&other.storage[..n]).into();
        content_matches & (self.size == other.size) & (self.cursor == other.cursor)
    }
}

impl Eq for SecretBuffer {}

impl Hash for SecretBuffer {
    /// Content-independent hashing: every SecretBuffer hashes to the same
    /// value for a given hasher seed. This prevents content inference via
    /// hash-based side channels, and makes SecretBuffers unsuitable as keys
    /// needing hash discrimination.
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(HASH_SENTINEL);
    }
}

impl fmt::Debug for SecretBuffer {
    /// Redacting formatter: never prints content bytes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBuffer")
            .field("size", &self.size)
            .field("position", &self.cursor)
            .field("capacity", &self.storage.len())
            .finish()
    }
}
