//! Lossless decoding and encoding of offset-linked navigation meshes.
//!
//! A mesh is a grid of cells, each holding stacked floors. Floors own
//! boundary edges and contour loops, and refer to neighbouring floors and
//! shared edges by serialized offset. Decoding materializes that graph into
//! arenas addressed by [`FloorId`] and [`BoundaryEdgeId`]; encoding writes it
//! back byte for byte.
//!
//! # Features
//!
//! - Decode from any position of a buffer, little- or big-endian per call
//! - Deferred resolution of floor back references after the full walk
//! - Shared mesh boundary edges keep a single identity
//! - Limits on every count read from untrusted input
//! - Optional `serde` support for every record type
//!
//! # Design Principles
//!
//! - **Round trip first** - `encode(decode(bytes)) == bytes` for valid input.
//! - **No panics on input** - Malformed data yields a [`DecodeError`].
//! - **No global state** - Registries live for one decode or encode call.
//!
//! # Example
//!
//! ```
//! use navmesh::{
//!     decode_nav_mesh_bytes, encode_nav_mesh_to_vec, DecodeLimits, Endian, Floor, FloorSlot, NavMesh,
//! };
//!
//! let mut mesh = NavMesh::new(7, 1, 1);
//! let floor = mesh.add_floor(Floor::default());
//! mesh.cells[0].slots.push(FloorSlot { altitude_min: 0.0, altitude_max: 2.0, floor });
//!
//! let bytes = encode_nav_mesh_to_vec(&mesh, Endian::Little).unwrap();
//! let decoded = decode_nav_mesh_bytes(&bytes, Endian::Little, &DecodeLimits::default()).unwrap();
//! assert_eq!(decoded, mesh);
//! ```

mod context;
mod error;
mod layout;
mod limits;
mod mesh;
mod records;
mod refs;
mod types;

pub use cursor::{ByteReader, ByteWriter, CursorError, Endian};
pub use error::{
    ConstantField, DecodeError, DecodeResult, EncodeError, EncodeResult, LimitKind, PointerField,
    ReferenceKind,
};
pub use layout::{FloorPlacement, LayoutRegistry};
pub use limits::DecodeLimits;
pub use mesh::{
    decode_nav_mesh, decode_nav_mesh_bytes, encode_nav_mesh, encode_nav_mesh_to_vec, NavMesh,
};
pub use records::{
    AdjacencyGroup, BoundaryLink, CellBoundaryHalfEdge, ContourLoop, Floor, FloorSlot,
    MeshBoundaryEdge, NavCell, OrientedContourLoop,
};
pub use refs::ReferenceRegistry;
pub use types::{BoundaryEdgeId, FloorId, GridBounds, TypeTag, Vec3, SENTINEL, TYPE_TAG_LEN};
