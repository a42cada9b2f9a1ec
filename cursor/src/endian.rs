//! Byte order selection.

/// Byte order for multi-byte values.
///
/// Selected per call rather than per cursor: containers may embed a
/// little-endian structure inside an otherwise big-endian file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

impl Endian {
    /// Returns `Big` when `big_endian` is set, `Little` otherwise.
    #[must_use]
    pub const fn from_big_endian_flag(big_endian: bool) -> Self {
        if big_endian {
            Self::Big
        } else {
            Self::Little
        }
    }

    #[must_use]
    pub const fn is_big(self) -> bool {
        matches!(self, Self::Big)
    }

    pub(crate) const fn u32_from_bytes(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::Little => u32::from_le_bytes(bytes),
            Self::Big => u32::from_be_bytes(bytes),
        }
    }

    pub(crate) const fn u32_to_bytes(self, value: u32) -> [u8; 4] {
        match self {
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }
}
