//! Standard I/O integration for [`SecretBuffer`].
//!
//! A `SecretBuffer` can stand in wherever byte-oriented I/O is expected:
//! it implements [`Read`], [`Write`], and [`Seek`] over its cursor, and
//! offers [`copy_to_writer`](SecretBuffer::copy_to_writer) as the explicit
//! hand-off point to outside collaborators (a credential prompt, a
//! handshake). Once bytes leave through a writer, this crate's protection
//! ends.

use crate::buffer::SecretBuffer;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Applies a signed delta to a cursor base, clamping into `[0, limit]`.
fn offset_clamped(base: usize, delta: i64, limit: usize) -> usize {
    let target = if delta.is_negative() {
        base.saturating_sub(delta.unsigned_abs() as usize)
    } else {
        base.saturating_add(delta.unsigned_abs() as usize)
    };
    target.min(limit)
}

impl SecretBuffer {
    /// Copies the bytes between the cursor and the end of the content into
    /// `dest`, advancing the cursor to the end. Returns the number of bytes
    /// copied.
    ///
    /// This is the boundary past which no further protection is provided:
    /// `dest` receives a plaintext copy and is responsible for its own
    /// hygiene.
    ///
    /// # Errors
    ///
    /// Propagates any error from the destination writer. The cursor is not
    /// advanced on failure.
    pub fn copy_to_writer<W: Write>(&mut self, dest: &mut W) -> io::Result<usize> {
        let remaining = self.bytes_available();
        let start = self.position();
        dest.write_all(&self.live()[start..])?;
        self.seek_to_end();
        Ok(remaining)
    }
}

impl Read for SecretBuffer {
    /// Reads from the cursor, advancing it. Returns `Ok(0)` at end of data,
    /// per the `Read` contract.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_bytes(buf))
    }
}

impl Write for SecretBuffer {
    /// Writes at the cursor with the buffer's growth contract: a superseded
    /// allocation is always zero-wiped before release.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf);
        Ok(buf.len())
    }

    /// No-op; writes land in storage immediately.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for SecretBuffer {
    /// Seeks with the same clamping semantics as the inherent
    /// [`seek`](SecretBuffer::seek): any target outside `[0, len]` is
    /// clamped rather than rejected, including targets before the start.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let limit = self.len();
        let target = match pos {
            SeekFrom::Start(n) => (n.min(limit as u64)) as usize,
            SeekFrom::End(n) => offset_clamped(limit, n, limit),
            SeekFrom::Current(n) => offset_clamped(self.position(), n, limit),
        };
        SecretBuffer::seek(self, target);
        Ok(self.position() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(content: &[u8]) -> SecretBuffer {
        let mut staged = content.to_vec();
        SecretBuffer::from_bytes(&mut staged)
    }

    #[test]
    fn test_io_write_then_read() {
        let mut buf = SecretBuffer::new();
        buf.write_all(b"sensitive").unwrap();
        assert_eq!(buf.len(), 9);

        SecretBuffer::seek(&mut buf, 0);
        let mut out = [0u8; 9];
        buf.read_exact(&mut out).unwrap();
        assert_eq!(&out, b"sensitive");

        // EOF reads return 0.
        let mut spare = [0u8; 4];
        assert_eq!(Read::read(&mut buf, &mut spare).unwrap(), 0);
    }

    #[test]
    fn test_io_read_in_chunks() {
        let mut buf = buffer_with(b"abcdef");
        let mut chunk = [0u8; 4];
        assert_eq!(Read::read(&mut buf, &mut chunk).unwrap(), 4);
        assert_eq!(&chunk, b"abcd");
        assert_eq!(Read::read(&mut buf, &mut chunk).unwrap(), 2);
        assert_eq!(&chunk[..2], b"ef");
    }

    #[test]
    fn test_io_seek_variants() {
        let mut buf = buffer_with(b"abcdef");

        assert_eq!(Seek::seek(&mut buf, SeekFrom::Start(2)).unwrap(), 2);
        assert_eq!(buf.read_byte().unwrap(), b'c');

        assert_eq!(Seek::seek(&mut buf, SeekFrom::End(-1)).unwrap(), 5);
        assert_eq!(buf.read_byte().unwrap(), b'f');

        assert_eq!(Seek::seek(&mut buf, SeekFrom::Current(-2)).unwrap(), 4);
        assert_eq!(buf.read_byte().unwrap(), b'e');
    }

    #[test]
    fn test_io_seek_clamps_instead_of_failing() {
        let mut buf = buffer_with(b"abc");
        assert_eq!(Seek::seek(&mut buf, SeekFrom::Start(100)).unwrap(), 3);
        assert_eq!(Seek::seek(&mut buf, SeekFrom::Current(-100)).unwrap(), 0);
        assert_eq!(Seek::seek(&mut buf, SeekFrom::End(5)).unwrap(), 3);
        assert_eq!(Seek::seek(&mut buf, SeekFrom::End(-100)).unwrap(), 0);
    }

    #[test]
    fn test_copy_to_writer_drains_remaining() {
        let mut buf = buffer_with(b"abcdef");
        SecretBuffer::seek(&mut buf, 2);

        let mut sink = Vec::new();
        let copied = buf.copy_to_writer(&mut sink).unwrap();
        assert_eq!(copied, 4);
        assert_eq!(sink, b"cdef");
        assert!(buf.is_eof());

        // A drained buffer copies nothing further.
        let copied = buf.copy_to_writer(&mut sink).unwrap();
        assert_eq!(copied, 0);
        assert_eq!(sink, b"cdef");
    }

    #[test]
    fn test_std_io_copy_interop() {
        let mut buf = buffer_with(b"handshake-token");
        let mut sink = Vec::new();
        let copied = io::copy(&mut buf, &mut sink).unwrap();
        assert_eq!(copied, 15);
        assert_eq!(sink, b"handshake-token");
    }

    #[test]
    fn test_io_write_grows_and_preserves() {
        let mut buf = SecretBuffer::with_capacity(4);
        let mut expected = Vec::new();
        for i in 0..50u8 {
            let chunk = [i; 5];
            buf.write_all(&chunk).unwrap();
            expected.extend_from_slice(&chunk);
        }
        assert_eq!(buf.len(), expected.len());

        SecretBuffer::seek(&mut buf, 0);
        let mut out = vec![0u8; expected.len()];
        buf.read_exact(&mut out).unwrap();
        assert_eq!(out, expected);
    }
}
