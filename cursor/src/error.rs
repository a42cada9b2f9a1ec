//! Error types for cursor operations.

use std::fmt;

/// Result type for cursor operations.
pub type CursorResult<T> = Result<T, CursorError>;

/// Errors that can occur while reading or writing through a byte cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorError {
    /// Attempted to read past the end of the buffer.
    UnexpectedEof {
        /// Position the read started at.
        position: usize,
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available from `position`.
        available: usize,
    },

    /// Attempted to seek a reader beyond the end of its buffer.
    SeekOutOfBounds {
        /// The requested position.
        position: usize,
        /// Length of the underlying buffer.
        len: usize,
    },

    /// Attempted to patch bytes that have not been written yet.
    PatchOutOfBounds {
        /// Start of the patch site.
        position: usize,
        /// Number of bytes being patched.
        width: usize,
        /// Length of the written buffer.
        len: usize,
    },
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                position,
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes at {position} but only {available} bytes available"
                )
            }
            Self::SeekOutOfBounds { position, len } => {
                write!(f, "seek to {position} is past the end of a {len}-byte buffer")
            }
            Self::PatchOutOfBounds {
                position,
                width,
                len,
            } => {
                write!(
                    f,
                    "cannot patch {width} bytes at {position}: only {len} bytes written"
                )
            }
        }
    }
}

impl std::error::Error for CursorError {}
