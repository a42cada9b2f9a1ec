//! The mesh root and the top-level decode/encode entry points.

use cursor::{ByteReader, ByteWriter, Endian};
use tracing::{debug, trace};

use crate::context::{expect_constant, DecodeContext, EncodeContext};
use crate::error::{ConstantField, DecodeResult, EncodeError, EncodeResult, LimitKind, PointerField};
use crate::limits::DecodeLimits;
use crate::records::{AdjacencyGroup, Floor, MeshBoundaryEdge, NavCell, ADJACENCY_GROUP_SIZE};
use crate::types::{BoundaryEdgeId, FloorId, GridBounds, TypeTag, SENTINEL, TYPE_TAG_LEN};

const CELL_TABLE_ENTRY_SIZE: usize = 4;

/// One navigation mesh and every record it owns.
///
/// Floors and mesh boundary edges live in arenas owned by the mesh;
/// everything else refers to them by [`FloorId`] / [`BoundaryEdgeId`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavMesh {
    pub type_tag: TypeTag,
    pub version: u32,
    pub mesh_id: u32,
    pub inv_cell_size: f32,
    pub raster_precision: f32,
    pub bounds: GridBounds,
    pub rows: u32,
    pub cols: u32,
    pub entity_radius: f32,
    /// Row-major, `rows * cols` entries.
    pub cells: Vec<NavCell>,
    pub adjacency_groups: Vec<AdjacencyGroup>,
    floors: Vec<Floor>,
    boundary_edges: Vec<MeshBoundaryEdge>,
}

impl NavMesh {
    /// Creates a mesh with `rows * cols` empty cells and zeroed geometry.
    #[must_use]
    pub fn new(mesh_id: u32, rows: u32, cols: u32) -> Self {
        let cell_count = rows as usize * cols as usize;
        Self {
            type_tag: TypeTag::default(),
            version: 0,
            mesh_id,
            inv_cell_size: 0.0,
            raster_precision: 0.0,
            bounds: GridBounds::default(),
            rows,
            cols,
            entity_radius: 0.0,
            cells: vec![NavCell::default(); cell_count],
            adjacency_groups: Vec::new(),
            floors: Vec::new(),
            boundary_edges: Vec::new(),
        }
    }

    /// Adds a floor to the arena. It is not part of the grid until a
    /// [`FloorSlot`](crate::FloorSlot) refers to it.
    pub fn add_floor(&mut self, floor: Floor) -> FloorId {
        let id = FloorId::new(self.floors.len() as u32);
        self.floors.push(floor);
        id
    }

    /// Adds a mesh boundary edge to the arena. It is serialized only once
    /// some floor lists it in `boundary_edges`.
    pub fn add_boundary_edge(&mut self, edge: MeshBoundaryEdge) -> BoundaryEdgeId {
        let id = BoundaryEdgeId::new(self.boundary_edges.len() as u32);
        self.boundary_edges.push(edge);
        id
    }

    #[must_use]
    pub fn floor(&self, id: FloorId) -> Option<&Floor> {
        self.floors.get(id.index())
    }

    pub fn floor_mut(&mut self, id: FloorId) -> Option<&mut Floor> {
        self.floors.get_mut(id.index())
    }

    #[must_use]
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    #[must_use]
    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    #[must_use]
    pub fn boundary_edge(&self, id: BoundaryEdgeId) -> Option<&MeshBoundaryEdge> {
        self.boundary_edges.get(id.index())
    }

    pub fn boundary_edge_mut(&mut self, id: BoundaryEdgeId) -> Option<&mut MeshBoundaryEdge> {
        self.boundary_edges.get_mut(id.index())
    }

    #[must_use]
    pub fn boundary_edges(&self) -> &[MeshBoundaryEdge] {
        &self.boundary_edges
    }

    /// Returns the cell at `row`, `col` of the row-major grid.
    #[must_use]
    pub fn cell(&self, row: u32, col: u32) -> Option<&NavCell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row as usize * self.cols as usize + col as usize)
    }

    pub fn cell_mut(&mut self, row: u32, col: u32) -> Option<&mut NavCell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells
            .get_mut(row as usize * self.cols as usize + col as usize)
    }

    /// `rows * cols`, widened so it cannot overflow.
    #[must_use]
    pub fn expected_cell_count(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cols)
    }
}

/// Decodes a mesh starting at the reader's current position.
///
/// On success the reader is left just past the 80-byte header; the size
/// trailer written by [`encode_nav_mesh`] is not consumed.
pub fn decode_nav_mesh(
    reader: &mut ByteReader<'_>,
    endian: Endian,
    limits: &DecodeLimits,
) -> DecodeResult<NavMesh> {
    let origin = reader.position();

    let type_tag = TypeTag::new(reader.read_array::<TYPE_TAG_LEN>()?);
    let version = reader.read_u32(endian)?;
    let reserved = reader.read_u32(endian)?;
    expect_constant(ConstantField::MeshReserved, 0, reserved)?;
    let mesh_id = reader.read_u32(endian)?;
    let inv_cell_size = reader.read_f32(endian)?;
    let raster_precision = reader.read_f32(endian)?;
    let bounds = GridBounds {
        min_x: reader.read_f32(endian)?,
        max_x: reader.read_f32(endian)?,
        min_y: reader.read_f32(endian)?,
        max_y: reader.read_f32(endian)?,
    };
    let rows = reader.read_u32(endian)?;
    let cols = reader.read_u32(endian)?;
    let entity_radius = reader.read_f32(endian)?;
    let cells_offset = reader.read_u32(endian)?;

    let cell_count = limits.check(LimitKind::Cells, u64::from(rows) * u64::from(cols))?;
    let mut ctx = DecodeContext::new(reader, endian, origin, limits, mesh_id, raster_precision);

    let resume = ctx.position();
    let mut cells = Vec::with_capacity(cell_count);
    if cell_count > 0 {
        trace!(cells = cell_count, cells_offset, "decoding cell table");
        ctx.seek_relative(origin, cells_offset)?;
        for _ in 0..cell_count {
            let cell_offset = ctx.read_u32()?;
            let next = ctx.position();
            ctx.seek_relative(origin, cell_offset)?;
            cells.push(NavCell::decode(&mut ctx)?);
            ctx.seek(next)?;
        }
    }
    ctx.seek(resume)?;

    let groups_ptr = ctx.read_pointer(PointerField::AdjacencyGroups, LimitKind::AdjacencyGroups)?;
    let header_end = ctx.position();
    let mut adjacency_groups = Vec::new();
    if let Some(ptr) = groups_ptr {
        trace!(groups = ptr.count, offset = ptr.offset, "decoding adjacency groups");
        ctx.seek_relative(origin, ptr.offset)?;
        adjacency_groups.reserve(ptr.count);
        for _ in 0..ptr.count {
            adjacency_groups.push(AdjacencyGroup::decode(&mut ctx)?);
        }
    }
    ctx.seek(header_end)?;

    let (refs, mut floors, boundary_edges) = ctx.into_parts();
    let back_references = refs.pending_len();
    refs.finalize(&mut floors)?;

    debug!(
        mesh_id,
        rows,
        cols,
        floors = floors.len(),
        boundary_edges = boundary_edges.len(),
        back_references,
        adjacency_groups = adjacency_groups.len(),
        "decoded nav mesh"
    );

    Ok(NavMesh {
        type_tag,
        version,
        mesh_id,
        inv_cell_size,
        raster_precision,
        bounds,
        rows,
        cols,
        entity_radius,
        cells,
        adjacency_groups,
        floors,
        boundary_edges,
    })
}

/// Decodes a mesh that starts at the beginning of `bytes`.
pub fn decode_nav_mesh_bytes(
    bytes: &[u8],
    endian: Endian,
    limits: &DecodeLimits,
) -> DecodeResult<NavMesh> {
    let mut reader = ByteReader::new(bytes);
    decode_nav_mesh(&mut reader, endian, limits)
}

/// Encodes `mesh` at the writer's current position.
///
/// Returns the number of bytes written, including the trailing size word.
/// The writer is left at the end of the mesh.
pub fn encode_nav_mesh(mesh: &NavMesh, writer: &mut ByteWriter, endian: Endian) -> EncodeResult<usize> {
    let expected = mesh.expected_cell_count();
    if expected != mesh.cells.len() as u64 {
        return Err(EncodeError::GridSizeMismatch {
            expected,
            actual: mesh.cells.len(),
        });
    }

    let mut ctx = EncodeContext::new(writer, endian, mesh);
    let origin = ctx.origin;

    ctx.write_bytes(mesh.type_tag.as_bytes());
    ctx.write_u32(mesh.version);
    ctx.write_u32(0);
    ctx.write_u32(mesh.mesh_id);
    ctx.write_f32(mesh.inv_cell_size);
    ctx.write_f32(mesh.raster_precision);
    ctx.write_f32(mesh.bounds.min_x);
    ctx.write_f32(mesh.bounds.max_x);
    ctx.write_f32(mesh.bounds.min_y);
    ctx.write_f32(mesh.bounds.max_y);
    ctx.write_u32(mesh.rows);
    ctx.write_u32(mesh.cols);
    ctx.write_f32(mesh.entity_radius);
    let cells_site = ctx.position();
    ctx.write_u32(SENTINEL);
    let groups_site = ctx.write_pointer_placeholder(mesh.adjacency_groups.len())?;

    let table = ctx.position();
    ctx.patch_relative(cells_site, origin, table)?;
    ctx.write_zeros(CELL_TABLE_ENTRY_SIZE * (mesh.cells.len() + 1));

    for (index, cell) in mesh.cells.iter().enumerate() {
        let start = ctx.position();
        cell.encode(&mut ctx)?;
        let end = ctx.position();
        let entry = table + CELL_TABLE_ENTRY_SIZE * index;
        ctx.patch_relative(entry, origin, start)?;
        ctx.patch_relative(entry + CELL_TABLE_ENTRY_SIZE, origin, end)?;
    }

    let cells_end = ctx.position();
    let patched = ctx.finalize_layout()?;
    ctx.seek(cells_end);
    if mesh.cells.last().is_some_and(|cell| !cell.slots.is_empty()) {
        ctx.write_u32(0);
    }

    if !mesh.adjacency_groups.is_empty() {
        let groups_start = ctx.position();
        ctx.patch_relative(groups_site, origin, groups_start)?;
        ctx.write_zeros(ADJACENCY_GROUP_SIZE * mesh.adjacency_groups.len());
        let mut body = ctx.position();
        for (index, group) in mesh.adjacency_groups.iter().enumerate() {
            ctx.seek(groups_start + ADJACENCY_GROUP_SIZE * index);
            group.encode(&mut ctx, body)?;
            body = ctx.position();
        }
    }

    let size = ctx.mesh_offset(ctx.position())?;
    ctx.write_u32(size);
    let written = ctx.position() - origin;

    debug!(
        mesh_id = mesh.mesh_id,
        bytes = written,
        floors = mesh.floors.len(),
        floor_patches = patched,
        "encoded nav mesh"
    );
    Ok(written)
}

/// Encodes `mesh` into a fresh buffer.
pub fn encode_nav_mesh_to_vec(mesh: &NavMesh, endian: Endian) -> EncodeResult<Vec<u8>> {
    let mut writer = ByteWriter::new();
    encode_nav_mesh(mesh, &mut writer, endian)?;
    Ok(writer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::records::FloorSlot;

    #[test]
    fn new_mesh_has_full_grid() {
        let mesh = NavMesh::new(1, 3, 4);
        assert_eq!(mesh.cells.len(), 12);
        assert_eq!(mesh.expected_cell_count(), 12);
        assert_eq!(mesh.floor_count(), 0);
    }

    #[test]
    fn cell_lookup_is_row_major() {
        let mut mesh = NavMesh::new(1, 2, 3);
        let id = mesh.add_floor(Floor::default());
        mesh.cell_mut(1, 2).unwrap().slots.push(FloorSlot {
            altitude_min: 0.0,
            altitude_max: 1.0,
            floor: id,
        });
        assert_eq!(mesh.cells[5].slots.len(), 1);
        assert!(mesh.cell(2, 0).is_none());
        assert!(mesh.cell(0, 3).is_none());
    }

    #[test]
    fn arena_accessors() {
        let mut mesh = NavMesh::new(1, 1, 1);
        let floor = mesh.add_floor(Floor::default());
        mesh.floor_mut(floor).unwrap().floor_index = 4;
        assert_eq!(mesh.floor(floor).unwrap().floor_index, 4);
        assert_eq!(mesh.floors().len(), 1);
        assert!(mesh.floor(FloorId::new(1)).is_none());

        let edge = mesh.add_boundary_edge(MeshBoundaryEdge {
            start: crate::Vec3::ZERO,
            end: crate::Vec3::ZERO,
            direction: crate::Vec3::ZERO,
        });
        mesh.boundary_edge_mut(edge).unwrap().direction.z = 1.0;
        assert_eq!(mesh.boundary_edge(edge).unwrap().direction.z, 1.0);
        assert_eq!(mesh.boundary_edges().len(), 1);
    }

    #[test]
    fn grid_mismatch_rejected() {
        let mut mesh = NavMesh::new(1, 2, 2);
        mesh.cells.pop();
        assert_eq!(
            encode_nav_mesh_to_vec(&mesh, Endian::Little).unwrap_err(),
            EncodeError::GridSizeMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn empty_grid_roundtrip() {
        let mesh = NavMesh::new(3, 0, 0);
        let bytes = encode_nav_mesh_to_vec(&mesh, Endian::Little).unwrap();
        // Header, a one-entry cell table, size word.
        assert_eq!(bytes.len(), 80 + 4 + 4);
        let decoded = decode_nav_mesh_bytes(&bytes, Endian::Little, &DecodeLimits::for_testing())
            .unwrap();
        assert_eq!(decoded, mesh);
    }

    #[test]
    fn reserved_word_must_be_zero() {
        let mesh = NavMesh::new(3, 0, 0);
        let mut bytes = encode_nav_mesh_to_vec(&mesh, Endian::Little).unwrap();
        bytes[24] = 1;
        assert_eq!(
            decode_nav_mesh_bytes(&bytes, Endian::Little, &DecodeLimits::for_testing())
                .unwrap_err(),
            DecodeError::UnexpectedConstant {
                field: ConstantField::MeshReserved,
                expected: 0,
                found: 1
            }
        );
    }

    #[test]
    fn cell_limit_checked_before_reading_table() {
        let mesh = NavMesh::new(3, 0, 0);
        let mut bytes = encode_nav_mesh_to_vec(&mesh, Endian::Little).unwrap();
        bytes[56..60].copy_from_slice(&1000u32.to_le_bytes());
        bytes[60..64].copy_from_slice(&1000u32.to_le_bytes());
        assert!(matches!(
            decode_nav_mesh_bytes(&bytes, Endian::Little, &DecodeLimits::for_testing()),
            Err(DecodeError::LimitsExceeded {
                kind: LimitKind::Cells,
                ..
            })
        ));
    }
}
