//! Decode-side offset registry.
//!
//! Maps mesh-relative offsets to the arena handles of records decoded there,
//! and holds half-edge back references until every floor is known.

use std::collections::HashMap;

use tracing::trace;

use crate::error::{DecodeError, DecodeResult, ReferenceKind};
use crate::records::Floor;
use crate::types::{BoundaryEdgeId, FloorId};

/// A half-edge whose adjacent floor is still an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingFloorReference {
    owner: FloorId,
    edge_index: usize,
    floor_offset: u32,
}

/// Offset-to-handle registry scoped to a single decode call.
#[derive(Debug, Default)]
pub struct ReferenceRegistry {
    floors: HashMap<u32, FloorId>,
    boundary_edges: HashMap<u32, BoundaryEdgeId>,
    pending: Vec<PendingFloorReference>,
}

impl ReferenceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `floor` was decoded at `offset` from the mesh origin.
    pub fn register_floor(&mut self, offset: u32, floor: FloorId) -> DecodeResult<()> {
        if self.floors.insert(offset, floor).is_some() {
            return Err(DecodeError::DuplicateReference {
                kind: ReferenceKind::Floor,
                offset,
            });
        }
        Ok(())
    }

    /// Records that `edge` was decoded at `offset` from the mesh origin.
    pub fn register_boundary_edge(&mut self, offset: u32, edge: BoundaryEdgeId) -> DecodeResult<()> {
        if self.boundary_edges.insert(offset, edge).is_some() {
            return Err(DecodeError::DuplicateReference {
                kind: ReferenceKind::MeshBoundaryEdge,
                offset,
            });
        }
        Ok(())
    }

    /// Resolves an already-decoded mesh boundary edge by offset.
    pub fn lookup_boundary_edge(&self, offset: u32) -> DecodeResult<BoundaryEdgeId> {
        self.boundary_edges
            .get(&offset)
            .copied()
            .ok_or(DecodeError::UnresolvedReference {
                kind: ReferenceKind::MeshBoundaryEdge,
                offset,
            })
    }

    /// Queues the adjacent floor of `owner`'s half-edge `edge_index` for
    /// resolution in [`finalize`](Self::finalize).
    pub fn queue_floor_back_reference(&mut self, owner: FloorId, edge_index: usize, floor_offset: u32) {
        self.pending.push(PendingFloorReference {
            owner,
            edge_index,
            floor_offset,
        });
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Resolves every queued back reference into `floors`.
    ///
    /// Consumes the registry, so it runs exactly once per decode.
    pub fn finalize(self, floors: &mut [Floor]) -> DecodeResult<()> {
        trace!(
            pending = self.pending.len(),
            floors = self.floors.len(),
            "resolving floor back references"
        );
        for pending in self.pending {
            let target = self.floors.get(&pending.floor_offset).copied().ok_or(
                DecodeError::UnresolvedReference {
                    kind: ReferenceKind::Floor,
                    offset: pending.floor_offset,
                },
            )?;
            if let Some(edge) = floors
                .get_mut(pending.owner.index())
                .and_then(|floor| floor.cell_edges.get_mut(pending.edge_index))
            {
                edge.adjacent_floor = Some(target);
            }
        }
        Ok(())
    }
}
