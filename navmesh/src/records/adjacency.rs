//! Adjacency groups and the boundary links to neighbouring meshes.

use crate::context::{DecodeContext, EncodeContext};
use crate::error::{DecodeResult, EncodeResult, LimitKind, PointerField};
use crate::types::{BoundaryEdgeId, SENTINEL};

/// Serialized size of an adjacency group header.
pub(crate) const ADJACENCY_GROUP_SIZE: usize = 12;

/// A neighbouring mesh and the boundary links shared with it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdjacencyGroup {
    pub adjacent_mesh_id: u32,
    pub links: Vec<BoundaryLink>,
}

/// Binds a cell of the neighbouring mesh to boundary edges of this one.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryLink {
    pub adjacent_cell_x: u32,
    pub adjacent_cell_y: u32,
    /// Unknown word, kept verbatim.
    pub reserved: u32,
    /// Edges declared by floors of this mesh.
    pub edges: Vec<BoundaryEdgeId>,
}

impl AdjacencyGroup {
    /// Decodes a 12-byte header at the cursor and follows its link table.
    pub(crate) fn decode(ctx: &mut DecodeContext<'_, '_>) -> DecodeResult<Self> {
        let adjacent_mesh_id = ctx.read_u32()?;
        let links_ptr = ctx.read_pointer(PointerField::BoundaryLinks, LimitKind::LinksPerGroup)?;
        let resume = ctx.position();

        let mut links = Vec::new();
        if let Some(ptr) = links_ptr {
            ctx.charge(LimitKind::TotalLinks, ptr.count)?;
            ctx.seek_relative(ctx.origin, ptr.offset)?;
            links.reserve(ptr.count);
            for _ in 0..ptr.count {
                let link_offset = ctx.read_u32()?;
                let next = ctx.position();
                ctx.seek_relative(ctx.origin, link_offset)?;
                links.push(BoundaryLink::decode(ctx)?);
                ctx.seek(next)?;
            }
        }

        ctx.seek(resume)?;
        Ok(Self {
            adjacent_mesh_id,
            links,
        })
    }

    /// Writes the header at the cursor and the link table plus links at
    /// `body_start`, leaving the cursor at the end of the body.
    pub(crate) fn encode(
        &self,
        ctx: &mut EncodeContext<'_, '_>,
        body_start: usize,
    ) -> EncodeResult<()> {
        ctx.write_u32(self.adjacent_mesh_id);
        ctx.write_count(self.links.len())?;
        if self.links.is_empty() {
            ctx.write_u32(SENTINEL);
            ctx.seek(body_start);
            return Ok(());
        }
        let table_offset = ctx.mesh_offset(body_start)?;
        ctx.write_u32(table_offset);

        ctx.seek(body_start);
        ctx.write_zeros(4 * self.links.len());
        for (index, link) in self.links.iter().enumerate() {
            ctx.patch_relative(body_start + 4 * index, ctx.origin, ctx.position())?;
            link.encode(ctx)?;
        }
        Ok(())
    }
}

impl BoundaryLink {
    fn decode(ctx: &mut DecodeContext<'_, '_>) -> DecodeResult<Self> {
        let adjacent_cell_x = ctx.read_u32()?;
        let adjacent_cell_y = ctx.read_u32()?;
        let reserved = ctx.read_u32()?;
        let count = ctx.read_u32()?;
        let count = ctx.check_limit(LimitKind::EdgesPerLink, count)?;
        ctx.charge(LimitKind::TotalEdgeRefs, count)?;

        let mut edges = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = ctx.read_u32()?;
            edges.push(ctx.refs.lookup_boundary_edge(offset)?);
        }
        Ok(Self {
            adjacent_cell_x,
            adjacent_cell_y,
            reserved,
            edges,
        })
    }

    fn encode(&self, ctx: &mut EncodeContext<'_, '_>) -> EncodeResult<()> {
        ctx.write_u32(self.adjacent_cell_x);
        ctx.write_u32(self.adjacent_cell_y);
        ctx.write_u32(self.reserved);
        ctx.write_count(self.edges.len())?;
        for &edge in &self.edges {
            ctx.boundary_edge(edge)?;
            let offset = ctx.layout.lookup_boundary_edge_placement(edge)?;
            ctx.write_u32(offset);
        }
        Ok(())
    }
}
