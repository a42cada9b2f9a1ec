//! Seekable byte writer with positional patching.

use crate::endian::Endian;
use crate::error::{CursorError, CursorResult};

/// A growable, seekable byte writer.
///
/// Writes land at the current position, overwriting existing bytes and
/// extending the buffer as needed. Seeking past the end is allowed; the gap
/// is zero-filled by the next write. Call [`finish`](Self::finish) to get
/// the final byte buffer.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    bytes: Vec<u8>,
    pos: usize,
}

impl ByteWriter {
    /// Creates a new empty `ByteWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `ByteWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            pos: 0,
        }
    }

    /// Continues writing after the existing contents of `bytes`.
    #[must_use]
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let pos = bytes.len();
        Self { bytes, pos }
    }

    /// Returns the current absolute position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Moves the cursor to an absolute position.
    pub fn seek(&mut self, position: usize) {
        self.pos = position;
    }

    /// Moves the cursor to the end of the written bytes.
    pub fn seek_end(&mut self) {
        self.pos = self.bytes.len();
    }

    /// Writes raw bytes at the current position.
    pub fn write_bytes(&mut self, data: &[u8]) {
        let end = self.pos + data.len();
        if self.bytes.len() < end {
            self.bytes.resize(end, 0);
        }
        self.bytes[self.pos..end].copy_from_slice(data);
        self.pos = end;
    }

    /// Writes `len` zero bytes, typically to reserve placeholder space.
    pub fn write_zeros(&mut self, len: usize) {
        let end = self.pos + len;
        if self.bytes.len() < end {
            self.bytes.resize(end, 0);
        }
        self.bytes[self.pos..end].fill(0);
        self.pos = end;
    }

    /// Writes a `u32` in the given byte order.
    pub fn write_u32(&mut self, value: u32, endian: Endian) {
        self.write_bytes(&endian.u32_to_bytes(value));
    }

    /// Writes an `i32` in the given byte order.
    pub fn write_i32(&mut self, value: i32, endian: Endian) {
        self.write_u32(value as u32, endian);
    }

    /// Writes an IEEE-754 single-precision float in the given byte order.
    pub fn write_f32(&mut self, value: f32, endian: Endian) {
        self.write_u32(value.to_bits(), endian);
    }

    /// Overwrites an already written `u32` without moving the cursor.
    pub fn patch_u32(&mut self, position: usize, value: u32, endian: Endian) -> CursorResult<()> {
        let end = position.checked_add(4).filter(|end| *end <= self.bytes.len());
        let Some(end) = end else {
            return Err(CursorError::PatchOutOfBounds {
                position,
                width: 4,
                len: self.bytes.len(),
            });
        };
        self.bytes[position..end].copy_from_slice(&endian.u32_to_bytes(value));
        Ok(())
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_writer() {
        let writer = ByteWriter::new();
        assert!(writer.is_empty());
        assert_eq!(writer.position(), 0);
        assert!(writer.finish().is_empty());
    }

    #[test]
    fn write_u32_both_orders() {
        let mut writer = ByteWriter::new();
        writer.write_u32(0x1234_5678, Endian::Little);
        writer.write_u32(0x1234_5678, Endian::Big);
        assert_eq!(
            writer.finish(),
            vec![0x78, 0x56, 0x34, 0x12, 0x12, 0x34, 0x56, 0x78]
        );
    }

    #[test]
    fn write_i32_and_f32() {
        let mut writer = ByteWriter::new();
        writer.write_i32(-1, Endian::Little);
        writer.write_f32(1.0, Endian::Big);
        assert_eq!(
            writer.finish(),
            vec![0xFF, 0xFF, 0xFF, 0xFF, 0x3F, 0x80, 0x00, 0x00]
        );
    }

    #[test]
    fn seek_back_overwrites() {
        let mut writer = ByteWriter::new();
        writer.write_u32(0xFFFF_FFFF, Endian::Little);
        writer.write_u32(7, Endian::Little);
        writer.seek(0);
        writer.write_u32(1, Endian::Little);
        assert_eq!(writer.position(), 4);
        assert_eq!(writer.len(), 8);
        writer.seek_end();
        assert_eq!(writer.position(), 8);
        assert_eq!(writer.finish(), vec![1, 0, 0, 0, 7, 0, 0, 0]);
    }

    #[test]
    fn seek_past_end_zero_fills() {
        let mut writer = ByteWriter::new();
        writer.write_bytes(&[0xAA]);
        writer.seek(4);
        writer.write_bytes(&[0xBB]);
        assert_eq!(writer.finish(), vec![0xAA, 0, 0, 0, 0xBB]);
    }

    #[test]
    fn write_zeros_clears_existing_bytes() {
        let mut writer = ByteWriter::new();
        writer.write_bytes(&[1, 2, 3, 4]);
        writer.seek(1);
        writer.write_zeros(2);
        assert_eq!(writer.position(), 3);
        assert_eq!(writer.finish(), vec![1, 0, 0, 4]);
    }

    #[test]
    fn patch_keeps_position() {
        let mut writer = ByteWriter::new();
        writer.write_zeros(8);
        writer.patch_u32(4, 0xDEAD_BEEF, Endian::Big).unwrap();
        assert_eq!(writer.position(), 8);
        assert_eq!(writer.as_bytes(), &[0, 0, 0, 0, 0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn patch_out_of_bounds() {
        let mut writer = ByteWriter::new();
        writer.write_zeros(6);
        let err = writer.patch_u32(4, 1, Endian::Little).unwrap_err();
        assert_eq!(
            err,
            CursorError::PatchOutOfBounds {
                position: 4,
                width: 4,
                len: 6
            }
        );
        assert!(writer.patch_u32(usize::MAX, 1, Endian::Little).is_err());
    }

    #[test]
    fn from_vec_appends() {
        let mut writer = ByteWriter::from_vec(vec![9, 9]);
        assert_eq!(writer.position(), 2);
        writer.write_bytes(&[1]);
        assert_eq!(writer.finish(), vec![9, 9, 1]);
    }

    #[test]
    fn writer_default() {
        let writer = ByteWriter::default();
        assert_eq!(writer.len(), 0);
    }
}
