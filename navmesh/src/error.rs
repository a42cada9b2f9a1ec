//! Error types for mesh decoding and encoding.

use std::fmt;

use cursor::CursorError;

use crate::types::{BoundaryEdgeId, FloorId};

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for encode operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Errors that can occur while decoding a mesh.
///
/// Every variant aborts the decode; there is no partial result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Low-level read or seek failure.
    Cursor(CursorError),

    /// A `{count, offset}` pair violates the sentinel rules.
    MalformedPointer {
        field: PointerField,
        count: u32,
        offset: u32,
    },

    /// An offset lookup found no record registered there.
    UnresolvedReference { kind: ReferenceKind, offset: u32 },

    /// Two records were registered at the same offset.
    DuplicateReference { kind: ReferenceKind, offset: u32 },

    /// A contour loop's end offset is not reachable in whole points.
    TruncatedContourLoop { start: u32, end: u32 },

    /// A field with a fixed value decoded to something else.
    UnexpectedConstant {
        field: ConstantField,
        expected: u32,
        found: u32,
    },

    /// A count read from input exceeds the configured limit.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// A record starts beyond what a relative `u32` offset can address.
    OffsetOutOfRange { position: usize },
}

/// Errors that can occur while encoding a mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Low-level patch failure.
    Cursor(CursorError),

    /// A cell boundary half-edge has no adjacent floor.
    MissingAdjacentFloor { floor: FloorId, edge_index: usize },

    /// A referenced record was never written.
    UnresolvedReference { kind: ReferenceKind, handle: u32 },

    /// A handle does not index into the mesh's arena.
    InvalidHandle { kind: ReferenceKind, handle: u32 },

    /// A record would be written at two places.
    DuplicatePlacement { kind: ReferenceKind, handle: u32 },

    /// The cell list does not match `rows * cols`.
    GridSizeMismatch { expected: u64, actual: usize },

    /// An offset or count does not fit in a `u32`.
    OffsetOverflow { value: usize },
}

/// The `{count, offset}` pair a [`DecodeError::MalformedPointer`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerField {
    AdjacencyGroups,
    FloorReserved,
    CellBoundaryEdges,
    MeshBoundaryEdges,
    ObstacleContours,
    WalkableContours,
    OrientedContours,
    BoundaryLinks,
}

/// Kind of record addressed by offset or handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Floor,
    MeshBoundaryEdge,
}

/// Fields that always carry a known value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantField {
    MeshReserved,
    FloorMeshId,
    FloorRasterPrecision,
    EdgeMarker,
}

/// Specific limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Cells,
    SlotsPerCell,
    ChildrenPerFloor,
    PointsPerContour,
    AdjacencyGroups,
    LinksPerGroup,
    EdgesPerLink,
    TotalFloorChildren,
    TotalPoints,
    TotalLinks,
    TotalEdgeRefs,
}

impl EncodeError {
    pub(crate) fn invalid_floor(id: FloorId) -> Self {
        Self::InvalidHandle {
            kind: ReferenceKind::Floor,
            handle: id.raw(),
        }
    }

    pub(crate) fn invalid_edge(id: BoundaryEdgeId) -> Self {
        Self::InvalidHandle {
            kind: ReferenceKind::MeshBoundaryEdge,
            handle: id.raw(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cursor(e) => write!(f, "cursor error: {e}"),
            Self::MalformedPointer {
                field,
                count,
                offset,
            } => {
                write!(
                    f,
                    "malformed {field} pointer: count {count}, offset 0x{offset:08X}"
                )
            }
            Self::UnresolvedReference { kind, offset } => {
                write!(f, "no {kind} registered at offset 0x{offset:08X}")
            }
            Self::DuplicateReference { kind, offset } => {
                write!(f, "duplicate {kind} registered at offset 0x{offset:08X}")
            }
            Self::TruncatedContourLoop { start, end } => {
                write!(
                    f,
                    "contour loop 0x{start:08X}..0x{end:08X} does not hold whole points"
                )
            }
            Self::UnexpectedConstant {
                field,
                expected,
                found,
            } => {
                write!(
                    f,
                    "unexpected {field}: expected 0x{expected:08X}, found 0x{found:08X}"
                )
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::OffsetOutOfRange { position } => {
                write!(f, "position {position} out of relative offset range")
            }
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cursor(e) => write!(f, "cursor error: {e}"),
            Self::MissingAdjacentFloor { floor, edge_index } => {
                write!(
                    f,
                    "cell boundary edge {edge_index} of {floor} has no adjacent floor"
                )
            }
            Self::UnresolvedReference { kind, handle } => {
                write!(f, "{kind} #{handle} is referenced but never written")
            }
            Self::InvalidHandle { kind, handle } => {
                write!(f, "invalid {kind} handle #{handle}")
            }
            Self::DuplicatePlacement { kind, handle } => {
                write!(f, "{kind} #{handle} is owned by more than one parent")
            }
            Self::GridSizeMismatch { expected, actual } => {
                write!(f, "grid needs {expected} cells, mesh has {actual}")
            }
            Self::OffsetOverflow { value } => {
                write!(f, "value {value} does not fit in a u32 field")
            }
        }
    }
}

impl fmt::Display for PointerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AdjacencyGroups => "adjacency groups",
            Self::FloorReserved => "floor reserved",
            Self::CellBoundaryEdges => "cell boundary edges",
            Self::MeshBoundaryEdges => "mesh boundary edges",
            Self::ObstacleContours => "obstacle contours",
            Self::WalkableContours => "walkable contours",
            Self::OrientedContours => "oriented contours",
            Self::BoundaryLinks => "boundary links",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Floor => "floor",
            Self::MeshBoundaryEdge => "mesh boundary edge",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for ConstantField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MeshReserved => "mesh reserved word",
            Self::FloorMeshId => "floor mesh id",
            Self::FloorRasterPrecision => "floor raster precision",
            Self::EdgeMarker => "edge marker",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cells => "cells",
            Self::SlotsPerCell => "slots per cell",
            Self::ChildrenPerFloor => "children per floor",
            Self::PointsPerContour => "points per contour",
            Self::AdjacencyGroups => "adjacency groups",
            Self::LinksPerGroup => "links per group",
            Self::EdgesPerLink => "edges per link",
            Self::TotalFloorChildren => "total floor children",
            Self::TotalPoints => "total contour points",
            Self::TotalLinks => "total boundary links",
            Self::TotalEdgeRefs => "total edge references",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Cursor(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Cursor(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CursorError> for DecodeError {
    fn from(err: CursorError) -> Self {
        Self::Cursor(err)
    }
}

impl From<CursorError> for EncodeError {
    fn from(err: CursorError) -> Self {
        Self::Cursor(err)
    }
}
