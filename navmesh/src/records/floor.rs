//! Floors and their five child collections.

use tracing::trace;

use super::contour::{ContourLoop, OrientedContourLoop};
use super::edge::{CellBoundaryHalfEdge, MeshBoundaryEdge};
use crate::context::{expect_constant, DecodeContext, EncodeContext};
use crate::error::{ConstantField, DecodeError, DecodeResult, EncodeResult, LimitKind, PointerField};
use crate::types::{BoundaryEdgeId, FloorId, SENTINEL};

/// One walkable region within a cell.
///
/// The mesh id and raster precision stored in every serialized floor are
/// copies of the mesh's own values and are not kept here.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Floor {
    pub cell_x: u32,
    pub cell_y: u32,
    pub floor_index: u32,
    pub entity_radius: f32,
    pub altitude_max: f32,
    pub altitude_min: f32,
    pub cell_edges: Vec<CellBoundaryHalfEdge>,
    /// Mesh boundary edges declared (and owned) by this floor.
    pub boundary_edges: Vec<BoundaryEdgeId>,
    pub obstacle_contours: Vec<ContourLoop>,
    pub walkable_contours: Vec<ContourLoop>,
    pub oriented_contours: Vec<OrientedContourLoop>,
}

impl Floor {
    /// Decodes a floor whose header starts at the cursor. Child offsets are
    /// relative to that start.
    pub(crate) fn decode(ctx: &mut DecodeContext<'_, '_>, id: FloorId) -> DecodeResult<Self> {
        let base = ctx.position();

        let mesh_id = ctx.read_u32()?;
        expect_constant(ConstantField::FloorMeshId, ctx.mesh_id, mesh_id)?;
        let cell_x = ctx.read_u32()?;
        let cell_y = ctx.read_u32()?;
        let floor_index = ctx.read_u32()?;
        let entity_radius = ctx.read_f32()?;
        let raster_precision = ctx.read_f32()?;
        expect_constant(
            ConstantField::FloorRasterPrecision,
            ctx.raster_precision.to_bits(),
            raster_precision.to_bits(),
        )?;
        let altitude_max = ctx.read_f32()?;
        let altitude_min = ctx.read_f32()?;

        let reserved_count = ctx.read_u32()?;
        let reserved_offset = ctx.read_u32()?;
        if reserved_count != 0 || reserved_offset != SENTINEL {
            return Err(DecodeError::MalformedPointer {
                field: PointerField::FloorReserved,
                count: reserved_count,
                offset: reserved_offset,
            });
        }

        let limit = LimitKind::ChildrenPerFloor;
        let cell_edges_ptr = ctx.read_pointer(PointerField::CellBoundaryEdges, limit)?;
        let boundary_edges_ptr = ctx.read_pointer(PointerField::MeshBoundaryEdges, limit)?;
        let obstacle_ptr = ctx.read_pointer(PointerField::ObstacleContours, limit)?;
        let walkable_ptr = ctx.read_pointer(PointerField::WalkableContours, limit)?;
        let oriented_ptr = ctx.read_pointer(PointerField::OrientedContours, limit)?;
        let resume = ctx.position();

        let children = [
            cell_edges_ptr,
            boundary_edges_ptr,
            obstacle_ptr,
            walkable_ptr,
            oriented_ptr,
        ]
        .iter()
        .flatten()
        .map(|ptr| ptr.count)
        .sum();
        ctx.charge(LimitKind::TotalFloorChildren, children)?;

        let mut cell_edges = Vec::new();
        if let Some(ptr) = cell_edges_ptr {
            ctx.seek_relative(base, ptr.offset)?;
            cell_edges.reserve(ptr.count);
            for edge_index in 0..ptr.count {
                cell_edges.push(CellBoundaryHalfEdge::decode(ctx, id, edge_index)?);
            }
        }

        let mut boundary_edges = Vec::new();
        if let Some(ptr) = boundary_edges_ptr {
            ctx.seek_relative(base, ptr.offset)?;
            boundary_edges.reserve(ptr.count);
            for _ in 0..ptr.count {
                boundary_edges.push(MeshBoundaryEdge::decode_registered(ctx)?);
            }
        }

        let obstacle_contours = match obstacle_ptr {
            Some(ptr) => ContourLoop::decode_table(ctx, base, ptr)?,
            None => Vec::new(),
        };
        let walkable_contours = match walkable_ptr {
            Some(ptr) => ContourLoop::decode_table(ctx, base, ptr)?,
            None => Vec::new(),
        };
        let oriented_contours = match oriented_ptr {
            Some(ptr) => OrientedContourLoop::decode_table(ctx, base, ptr)?,
            None => Vec::new(),
        };

        ctx.seek(resume)?;
        trace!(
            %id,
            cell_x,
            cell_y,
            cell_edges = cell_edges.len(),
            boundary_edges = boundary_edges.len(),
            "decoded floor"
        );

        Ok(Self {
            cell_x,
            cell_y,
            floor_index,
            entity_radius,
            altitude_max,
            altitude_min,
            cell_edges,
            boundary_edges,
            obstacle_contours,
            walkable_contours,
            oriented_contours,
        })
    }

    /// Writes the header at the cursor and every child directly after it,
    /// leaving the cursor at the end of the floor.
    pub(crate) fn encode(&self, ctx: &mut EncodeContext<'_, '_>, id: FloorId) -> EncodeResult<()> {
        let base = ctx.position();

        ctx.write_u32(ctx.mesh.mesh_id);
        ctx.write_u32(self.cell_x);
        ctx.write_u32(self.cell_y);
        ctx.write_u32(self.floor_index);
        ctx.write_f32(self.entity_radius);
        ctx.write_f32(ctx.mesh.raster_precision);
        ctx.write_f32(self.altitude_max);
        ctx.write_f32(self.altitude_min);
        ctx.write_u32(0);
        ctx.write_u32(SENTINEL);

        let cell_edges_site = ctx.write_pointer_placeholder(self.cell_edges.len())?;
        let boundary_edges_site = ctx.write_pointer_placeholder(self.boundary_edges.len())?;
        let obstacle_site = ctx.write_pointer_placeholder(self.obstacle_contours.len())?;
        let walkable_site = ctx.write_pointer_placeholder(self.walkable_contours.len())?;
        let oriented_site = ctx.write_pointer_placeholder(self.oriented_contours.len())?;

        if !self.cell_edges.is_empty() {
            ctx.patch_relative(cell_edges_site, base, ctx.position())?;
            for (edge_index, edge) in self.cell_edges.iter().enumerate() {
                edge.encode(ctx, id, edge_index)?;
            }
        }

        if !self.boundary_edges.is_empty() {
            ctx.patch_relative(boundary_edges_site, base, ctx.position())?;
            for &edge_id in &self.boundary_edges {
                ctx.boundary_edge(edge_id)?.encode(ctx, edge_id)?;
            }
        }

        ContourLoop::encode_table(&self.obstacle_contours, ctx, obstacle_site, base)?;
        ContourLoop::encode_table(&self.walkable_contours, ctx, walkable_site, base)?;
        OrientedContourLoop::encode_table(&self.oriented_contours, ctx, oriented_site, base)?;
        Ok(())
    }
}
