//! Record types and their per-record decode/encode.
//!
//! Each record decodes from the cursor's current position and leaves the
//! cursor just past its own bytes. Children reached through offsets are
//! visited with seek-out, read, seek-back.

mod adjacency;
mod cell;
mod contour;
mod edge;
mod floor;

pub use adjacency::{AdjacencyGroup, BoundaryLink};
pub use cell::{FloorSlot, NavCell};
pub use contour::{ContourLoop, OrientedContourLoop};
pub use edge::{CellBoundaryHalfEdge, MeshBoundaryEdge};
pub use floor::Floor;

pub(crate) use adjacency::ADJACENCY_GROUP_SIZE;
