//! Encode-side placement registry.

use std::collections::HashMap;

use cursor::{ByteWriter, Endian};
use tracing::trace;

use crate::error::{EncodeError, EncodeResult, ReferenceKind};
use crate::types::{BoundaryEdgeId, FloorId};

/// Where a floor landed in the output, relative to the mesh origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorPlacement {
    pub offset: u32,
    pub size: u32,
}

/// Handle-to-offset registry scoped to a single encode call.
///
/// Mesh boundary edges are always written before anything refers to them,
/// so their offsets are looked up directly. Floors may be referenced before
/// they are written; those references are queued as patch sites.
#[derive(Debug, Default)]
pub struct LayoutRegistry {
    floors: HashMap<FloorId, FloorPlacement>,
    floor_patches: Vec<(FloorId, usize)>,
    boundary_edges: HashMap<BoundaryEdgeId, u32>,
}

impl LayoutRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_floor_placement(
        &mut self,
        floor: FloorId,
        offset: u32,
        size: u32,
    ) -> EncodeResult<()> {
        if self
            .floors
            .insert(floor, FloorPlacement { offset, size })
            .is_some()
        {
            return Err(EncodeError::DuplicatePlacement {
                kind: ReferenceKind::Floor,
                handle: floor.raw(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn floor_placement(&self, floor: FloorId) -> Option<FloorPlacement> {
        self.floors.get(&floor).copied()
    }

    /// Queues the 8-byte `(offset, size)` pair at absolute `site` to be
    /// overwritten with `floor`'s placement.
    pub fn queue_floor_patch(&mut self, floor: FloorId, site: usize) {
        self.floor_patches.push((floor, site));
    }

    pub fn record_boundary_edge_placement(
        &mut self,
        edge: BoundaryEdgeId,
        offset: u32,
    ) -> EncodeResult<()> {
        if self.boundary_edges.insert(edge, offset).is_some() {
            return Err(EncodeError::DuplicatePlacement {
                kind: ReferenceKind::MeshBoundaryEdge,
                handle: edge.raw(),
            });
        }
        Ok(())
    }

    pub fn lookup_boundary_edge_placement(&self, edge: BoundaryEdgeId) -> EncodeResult<u32> {
        self.boundary_edges
            .get(&edge)
            .copied()
            .ok_or(EncodeError::UnresolvedReference {
                kind: ReferenceKind::MeshBoundaryEdge,
                handle: edge.raw(),
            })
    }

    /// Writes every queued floor placement into `writer`.
    ///
    /// Drains the patch queue and returns the number of sites patched.
    /// Recorded placements stay available for later lookups.
    pub fn finalize(&mut self, writer: &mut ByteWriter, endian: Endian) -> EncodeResult<usize> {
        trace!(patches = self.floor_patches.len(), "patching floor references");
        let mut patched = 0;
        for (floor, site) in std::mem::take(&mut self.floor_patches) {
            let placement = self
                .floor_placement(floor)
                .ok_or(EncodeError::UnresolvedReference {
                    kind: ReferenceKind::Floor,
                    handle: floor.raw(),
                })?;
            writer.patch_u32(site, placement.offset, endian)?;
            writer.patch_u32(site + 4, placement.size, endian)?;
            patched += 1;
        }
        Ok(patched)
    }
}
