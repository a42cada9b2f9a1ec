//! Per-call decode and encode state threaded through the record tree.

use cursor::{ByteReader, ByteWriter, Endian};

use crate::error::{
    ConstantField, DecodeError, DecodeResult, EncodeError, EncodeResult, LimitKind, PointerField,
};
use crate::layout::LayoutRegistry;
use crate::limits::DecodeLimits;
use crate::mesh::NavMesh;
use crate::records::{Floor, MeshBoundaryEdge};
use crate::refs::ReferenceRegistry;
use crate::types::{BoundaryEdgeId, FloorId, Vec3, SENTINEL};

/// A present `{count, offset}` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pointer {
    pub count: usize,
    pub offset: u32,
}

pub(crate) fn expect_constant(field: ConstantField, expected: u32, found: u32) -> DecodeResult<()> {
    if expected != found {
        return Err(DecodeError::UnexpectedConstant {
            field,
            expected,
            found,
        });
    }
    Ok(())
}

/// Running counts behind the `max_total_*` limits.
#[derive(Debug, Default)]
struct DecodeTotals {
    floor_children: u64,
    points: u64,
    links: u64,
    edge_refs: u64,
}

pub(crate) struct DecodeContext<'r, 'a> {
    reader: &'r mut ByteReader<'a>,
    pub endian: Endian,
    /// Absolute position of the mesh start; mesh-relative offsets count from here.
    pub origin: usize,
    pub limits: &'r DecodeLimits,
    pub mesh_id: u32,
    pub raster_precision: f32,
    pub refs: ReferenceRegistry,
    pub floors: Vec<Floor>,
    pub boundary_edges: Vec<MeshBoundaryEdge>,
    totals: DecodeTotals,
}

impl<'r, 'a> DecodeContext<'r, 'a> {
    pub fn new(
        reader: &'r mut ByteReader<'a>,
        endian: Endian,
        origin: usize,
        limits: &'r DecodeLimits,
        mesh_id: u32,
        raster_precision: f32,
    ) -> Self {
        Self {
            reader,
            endian,
            origin,
            limits,
            mesh_id,
            raster_precision,
            refs: ReferenceRegistry::new(),
            floors: Vec::new(),
            boundary_edges: Vec::new(),
            totals: DecodeTotals::default(),
        }
    }

    pub fn position(&self) -> usize {
        self.reader.position()
    }

    pub fn seek(&mut self, position: usize) -> DecodeResult<()> {
        Ok(self.reader.seek(position)?)
    }

    /// Seeks to `base + offset`.
    pub fn seek_relative(&mut self, base: usize, offset: u32) -> DecodeResult<()> {
        let position = base
            .checked_add(offset as usize)
            .ok_or(DecodeError::OffsetOutOfRange { position: base })?;
        self.seek(position)
    }

    /// Current position measured from the mesh origin.
    pub fn mesh_offset(&self) -> DecodeResult<u32> {
        let position = self.position();
        u32::try_from(position - self.origin).map_err(|_| DecodeError::OffsetOutOfRange { position })
    }

    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        Ok(self.reader.read_u32(self.endian)?)
    }

    pub fn read_i32(&mut self) -> DecodeResult<i32> {
        Ok(self.reader.read_i32(self.endian)?)
    }

    pub fn read_f32(&mut self) -> DecodeResult<f32> {
        Ok(self.reader.read_f32(self.endian)?)
    }

    pub fn read_vec3(&mut self) -> DecodeResult<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    pub fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        Ok(self.reader.read_array::<N>()?)
    }

    /// Reads a `{count, offset}` pair, enforcing the sentinel rules.
    ///
    /// Returns `None` for an absent collection.
    pub fn read_pointer(
        &mut self,
        field: PointerField,
        limit: LimitKind,
    ) -> DecodeResult<Option<Pointer>> {
        let count = self.read_u32()?;
        let offset = self.read_u32()?;
        match (count, offset) {
            (0, SENTINEL) => Ok(None),
            (0, _) | (_, SENTINEL) => Err(DecodeError::MalformedPointer {
                field,
                count,
                offset,
            }),
            (count, offset) => Ok(Some(Pointer {
                count: self.check_limit(limit, count)?,
                offset,
            })),
        }
    }

    pub fn check_limit(&self, kind: LimitKind, count: u32) -> DecodeResult<usize> {
        self.limits.check(kind, u64::from(count))
    }

    /// Adds `count` to the mesh-wide total for `kind` and checks its cap.
    pub fn charge(&mut self, kind: LimitKind, count: usize) -> DecodeResult<()> {
        let total = match kind {
            LimitKind::TotalFloorChildren => &mut self.totals.floor_children,
            LimitKind::TotalPoints => &mut self.totals.points,
            LimitKind::TotalLinks => &mut self.totals.links,
            LimitKind::TotalEdgeRefs => &mut self.totals.edge_refs,
            _ => return Ok(()),
        };
        *total = total.saturating_add(count as u64);
        self.limits.check(kind, *total)?;
        Ok(())
    }

    pub fn next_floor_id(&self) -> FloorId {
        // Floors sit at distinct u32 offsets and span 80 bytes each.
        FloorId::new(self.floors.len() as u32)
    }

    pub fn into_parts(self) -> (ReferenceRegistry, Vec<Floor>, Vec<MeshBoundaryEdge>) {
        (self.refs, self.floors, self.boundary_edges)
    }

    pub fn push_boundary_edge(&mut self, edge: MeshBoundaryEdge) -> BoundaryEdgeId {
        let id = BoundaryEdgeId::new(self.boundary_edges.len() as u32);
        self.boundary_edges.push(edge);
        id
    }
}

pub(crate) struct EncodeContext<'w, 'm> {
    writer: &'w mut ByteWriter,
    pub endian: Endian,
    pub origin: usize,
    pub mesh: &'m NavMesh,
    pub layout: LayoutRegistry,
}

impl<'w, 'm> EncodeContext<'w, 'm> {
    pub fn new(writer: &'w mut ByteWriter, endian: Endian, mesh: &'m NavMesh) -> Self {
        let origin = writer.position();
        Self {
            writer,
            endian,
            origin,
            mesh,
            layout: LayoutRegistry::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.writer.position()
    }

    pub fn seek(&mut self, position: usize) {
        self.writer.seek(position);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.writer.write_bytes(bytes);
    }

    pub fn write_zeros(&mut self, len: usize) {
        self.writer.write_zeros(len);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.writer.write_u32(value, self.endian);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.writer.write_i32(value, self.endian);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.writer.write_f32(value, self.endian);
    }

    pub fn write_vec3(&mut self, value: Vec3) {
        self.write_f32(value.x);
        self.write_f32(value.y);
        self.write_f32(value.z);
    }

    pub fn write_count(&mut self, len: usize) -> EncodeResult<()> {
        let count = u32::try_from(len).map_err(|_| EncodeError::OffsetOverflow { value: len })?;
        self.write_u32(count);
        Ok(())
    }

    /// Writes `{len, SENTINEL}` and returns the position of the offset field.
    pub fn write_pointer_placeholder(&mut self, len: usize) -> EncodeResult<usize> {
        self.write_count(len)?;
        let site = self.position();
        self.write_u32(SENTINEL);
        Ok(site)
    }

    /// Distance from `base` to `position` as a `u32` field value.
    pub fn relative(base: usize, position: usize) -> EncodeResult<u32> {
        let distance = position - base;
        u32::try_from(distance).map_err(|_| EncodeError::OffsetOverflow { value: distance })
    }

    pub fn mesh_offset(&self, position: usize) -> EncodeResult<u32> {
        Self::relative(self.origin, position)
    }

    pub fn patch_u32(&mut self, site: usize, value: u32) -> EncodeResult<()> {
        Ok(self.writer.patch_u32(site, value, self.endian)?)
    }

    pub fn patch_vec3(&mut self, site: usize, value: Vec3) -> EncodeResult<()> {
        self.patch_u32(site, value.x.to_bits())?;
        self.patch_u32(site + 4, value.y.to_bits())?;
        self.patch_u32(site + 8, value.z.to_bits())
    }

    /// Patches `site` with the offset of `position` relative to `base`.
    pub fn patch_relative(&mut self, site: usize, base: usize, position: usize) -> EncodeResult<()> {
        let offset = Self::relative(base, position)?;
        self.patch_u32(site, offset)
    }

    pub fn floor(&self, id: FloorId) -> EncodeResult<&'m Floor> {
        let mesh: &'m NavMesh = self.mesh;
        mesh.floor(id).ok_or(EncodeError::invalid_floor(id))
    }

    pub fn boundary_edge(&self, id: BoundaryEdgeId) -> EncodeResult<&'m MeshBoundaryEdge> {
        let mesh: &'m NavMesh = self.mesh;
        mesh.boundary_edge(id).ok_or(EncodeError::invalid_edge(id))
    }

    /// Writes every queued floor reference.
    pub fn finalize_layout(&mut self) -> EncodeResult<usize> {
        self.layout.finalize(self.writer, self.endian)
    }
}
