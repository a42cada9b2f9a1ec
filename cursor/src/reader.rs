//! Seekable byte reader with bounded operations.

use crate::endian::Endian;
use crate::error::{CursorError, CursorResult};

/// A seekable reader over a borrowed byte slice.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` positioned at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the length of the underlying buffer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of bytes between the cursor and the end of the buffer.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current absolute position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor to an absolute position.
    ///
    /// Seeking to exactly the end of the buffer is allowed.
    pub fn seek(&mut self, position: usize) -> CursorResult<()> {
        if position > self.data.len() {
            return Err(CursorError::SeekOutOfBounds {
                position,
                len: self.data.len(),
            });
        }
        self.pos = position;
        Ok(())
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> CursorResult<&'a [u8]> {
        self.ensure_bytes(len)?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Reads a fixed-size byte array.
    pub fn read_array<const N: usize>(&mut self) -> CursorResult<[u8; N]> {
        self.ensure_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    /// Reads a `u32` in the given byte order.
    pub fn read_u32(&mut self, endian: Endian) -> CursorResult<u32> {
        let bytes = self.read_array::<4>()?;
        Ok(endian.u32_from_bytes(bytes))
    }

    /// Reads an `i32` in the given byte order.
    pub fn read_i32(&mut self, endian: Endian) -> CursorResult<i32> {
        Ok(self.read_u32(endian)? as i32)
    }

    /// Reads an IEEE-754 single-precision float in the given byte order.
    ///
    /// The bit pattern is preserved exactly, including NaN payloads.
    pub fn read_f32(&mut self, endian: Endian) -> CursorResult<f32> {
        Ok(f32::from_bits(self.read_u32(endian)?))
    }

    fn ensure_bytes(&self, len: usize) -> CursorResult<()> {
        let available = self.remaining();
        if len > available {
            return Err(CursorError::UnexpectedEof {
                position: self.pos,
                requested: len,
                available,
            });
        }
        Ok(())
    }
}
