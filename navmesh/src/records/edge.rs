//! Cell boundary half-edges and shared mesh boundary edges.

use crate::context::{expect_constant, DecodeContext, EncodeContext};
use crate::error::{ConstantField, DecodeResult, EncodeError, EncodeResult};
use crate::types::{BoundaryEdgeId, FloorId, Vec3};

const EDGE_MARKER: i32 = -1;

/// An edge on the grid boundary of a floor, linked to the floor on the
/// other side.
///
/// `adjacent_floor` is a lookup handle, never ownership. It is always set
/// after decode and must be set before encode.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellBoundaryHalfEdge {
    pub start: Vec3,
    pub end: Vec3,
    pub adjacent_floor: Option<FloorId>,
}

impl CellBoundaryHalfEdge {
    /// The adjacent floor's offset is queued and resolved once every floor
    /// is known; its recorded size is re-derived on encode.
    pub(crate) fn decode(
        ctx: &mut DecodeContext<'_, '_>,
        owner: FloorId,
        edge_index: usize,
    ) -> DecodeResult<Self> {
        let start = ctx.read_vec3()?;
        let end = ctx.read_vec3()?;
        let floor_offset = ctx.read_u32()?;
        let _floor_size = ctx.read_u32()?;
        ctx.refs
            .queue_floor_back_reference(owner, edge_index, floor_offset);
        Ok(Self {
            start,
            end,
            adjacent_floor: None,
        })
    }

    pub(crate) fn encode(
        &self,
        ctx: &mut EncodeContext<'_, '_>,
        owner: FloorId,
        edge_index: usize,
    ) -> EncodeResult<()> {
        let target = self
            .adjacent_floor
            .ok_or(EncodeError::MissingAdjacentFloor {
                floor: owner,
                edge_index,
            })?;
        ctx.floor(target)?;

        ctx.write_vec3(self.start);
        ctx.write_vec3(self.end);
        let site = ctx.position();
        ctx.write_zeros(8);
        ctx.layout.queue_floor_patch(target, site);
        Ok(())
    }
}

/// An edge where this mesh overlaps a neighbouring one.
///
/// Declared by exactly one floor and shared by handle with any
/// [`BoundaryLink`](crate::BoundaryLink) that refers to it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshBoundaryEdge {
    pub start: Vec3,
    pub end: Vec3,
    pub direction: Vec3,
}

impl MeshBoundaryEdge {
    /// Decodes an edge into the arena and registers it at its mesh offset.
    pub(crate) fn decode_registered(ctx: &mut DecodeContext<'_, '_>) -> DecodeResult<BoundaryEdgeId> {
        let offset = ctx.mesh_offset()?;
        let start = ctx.read_vec3()?;
        let end = ctx.read_vec3()?;
        for _ in 0..2 {
            let marker = ctx.read_i32()?;
            expect_constant(ConstantField::EdgeMarker, EDGE_MARKER as u32, marker as u32)?;
        }
        let direction = ctx.read_vec3()?;

        let id = ctx.push_boundary_edge(Self {
            start,
            end,
            direction,
        });
        ctx.refs.register_boundary_edge(offset, id)?;
        Ok(id)
    }

    pub(crate) fn encode(&self, ctx: &mut EncodeContext<'_, '_>, id: BoundaryEdgeId) -> EncodeResult<()> {
        let offset = ctx.mesh_offset(ctx.position())?;
        ctx.layout.record_boundary_edge_placement(id, offset)?;
        ctx.write_vec3(self.start);
        ctx.write_vec3(self.end);
        ctx.write_i32(EDGE_MARKER);
        ctx.write_i32(EDGE_MARKER);
        ctx.write_vec3(self.direction);
        Ok(())
    }
}
