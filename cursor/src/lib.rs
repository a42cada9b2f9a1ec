//! Seekable, endian-aware byte cursors for the navcodec mesh codec.
//!
//! This crate provides [`ByteReader`] and [`ByteWriter`] for random-access
//! decoding and encoding of offset-linked binary records. Byte order is an
//! explicit [`Endian`] argument on every multi-byte operation.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads and patches are bounds-checked.
//! - **No domain knowledge** - This crate knows nothing about meshes, floors or offsets.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use cursor::{ByteReader, ByteWriter, Endian};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_u32(0xFFFF_FFFF, Endian::Little); // placeholder
//! writer.write_f32(1.5, Endian::Little);
//! writer.patch_u32(0, 8, Endian::Little).unwrap();
//!
//! let bytes = writer.finish();
//!
//! let mut reader = ByteReader::new(&bytes);
//! assert_eq!(reader.read_u32(Endian::Little).unwrap(), 8);
//! assert_eq!(reader.read_f32(Endian::Little).unwrap(), 1.5);
//! ```

mod endian;
mod error;
mod reader;
mod writer;

pub use endian::Endian;
pub use error::{CursorError, CursorResult};
pub use reader::ByteReader;
pub use writer::ByteWriter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roundtrip() {
        let writer = ByteWriter::new();
        let bytes = writer.finish();
        assert!(bytes.is_empty());

        let reader = ByteReader::new(&bytes);
        assert!(reader.is_empty());
    }

    #[test]
    fn mixed_roundtrip() {
        for endian in [Endian::Little, Endian::Big] {
            let mut writer = ByteWriter::new();
            writer.write_bytes(b"tag");
            writer.write_u32(42, endian);
            writer.write_i32(-1, endian);
            writer.write_f32(-0.25, endian);
            let bytes = writer.finish();

            let mut reader = ByteReader::new(&bytes);
            assert_eq!(reader.read_bytes(3).unwrap(), b"tag");
            assert_eq!(reader.read_u32(endian).unwrap(), 42);
            assert_eq!(reader.read_i32(endian).unwrap(), -1);
            assert_eq!(reader.read_f32(endian).unwrap(), -0.25);
            assert!(reader.is_empty());
        }
    }

    #[test]
    fn placeholder_then_patch() {
        let mut writer = ByteWriter::new();
        let site = writer.position();
        writer.write_u32(0xFFFF_FFFF, Endian::Big);
        writer.write_bytes(&[1, 2, 3, 4]);
        writer.patch_u32(site, 4, Endian::Big).unwrap();
        let bytes = writer.finish();

        let mut reader = ByteReader::new(&bytes);
        let offset = reader.read_u32(Endian::Big).unwrap();
        reader.seek(offset as usize).unwrap();
        assert_eq!(reader.read_bytes(4).unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn doctest_example() {
        let mut writer = ByteWriter::new();
        writer.write_u32(0xFFFF_FFFF, Endian::Little);
        writer.write_f32(1.5, Endian::Little);
        writer.patch_u32(0, 8, Endian::Little).unwrap();

        let bytes = writer.finish();

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_u32(Endian::Little).unwrap(), 8);
        assert_eq!(reader.read_f32(Endian::Little).unwrap(), 1.5);
    }
}
