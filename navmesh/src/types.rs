//! Core value types and handles shared by every record.

use std::fmt;

/// Marks an absent `{count, offset}` pair.
pub const SENTINEL: u32 = 0xFFFF_FFFF;

/// Length of the fixed type tag at the start of a mesh.
pub const TYPE_TAG_LEN: usize = 20;

/// A position or direction stored as three consecutive `f32`s.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Handle of a [`Floor`](crate::Floor) in its mesh's floor arena.
///
/// Handles are assigned in decode order and are only meaningful for the mesh
/// that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorId(u32);

impl FloorId {
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FloorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "floor#{}", self.0)
    }
}

/// Handle of a [`MeshBoundaryEdge`](crate::MeshBoundaryEdge) in its mesh's edge arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryEdgeId(u32);

impl BoundaryEdgeId {
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BoundaryEdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "boundary-edge#{}", self.0)
    }
}

/// The fixed 20-byte type tag at the start of a mesh, kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeTag([u8; TYPE_TAG_LEN]);

impl TypeTag {
    #[must_use]
    pub const fn new(bytes: [u8; TYPE_TAG_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds a tag from text, zero-padded (and truncated) to the fixed length.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut bytes = [0u8; TYPE_TAG_LEN];
        let len = text.len().min(TYPE_TAG_LEN);
        bytes[..len].copy_from_slice(&text.as_bytes()[..len]);
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; TYPE_TAG_LEN] {
        &self.0
    }

    /// Text up to the first NUL, lossily decoded.
    #[must_use]
    pub fn to_text_lossy(&self) -> String {
        let end = self.0.iter().position(|b| *b == 0).unwrap_or(TYPE_TAG_LEN);
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

/// Horizontal extent of the cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}
