//! Grid cells and the floor slots they hold.

use super::floor::Floor;
use crate::context::{DecodeContext, EncodeContext};
use crate::error::{DecodeResult, EncodeResult, LimitKind};
use crate::types::FloorId;

const FLOOR_SLOT_SIZE: usize = 12;

/// One grid cell: the floors stacked in it, in serialized order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavCell {
    pub slots: Vec<FloorSlot>,
}

/// A floor occupying part of a cell's vertical range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorSlot {
    pub altitude_min: f32,
    pub altitude_max: f32,
    /// The owned floor.
    pub floor: FloorId,
}

impl NavCell {
    pub(crate) fn decode(ctx: &mut DecodeContext<'_, '_>) -> DecodeResult<Self> {
        let count = ctx.read_u32()?;
        let count = ctx.check_limit(LimitKind::SlotsPerCell, count)?;
        let mut slots = Vec::with_capacity(count);
        for _ in 0..count {
            slots.push(FloorSlot::decode(ctx)?);
        }
        Ok(Self { slots })
    }

    /// Writes the slot table followed by every floor back to back.
    ///
    /// The table ends with one extra word holding the end offset of the
    /// last floor, which stays zero for an empty cell.
    pub(crate) fn encode(&self, ctx: &mut EncodeContext<'_, '_>) -> EncodeResult<()> {
        ctx.write_count(self.slots.len())?;
        let table = ctx.position();
        let table_size = FLOOR_SLOT_SIZE * self.slots.len() + 4;
        ctx.write_zeros(table_size);

        let mut floor_start = table + table_size;
        for (index, slot) in self.slots.iter().enumerate() {
            ctx.seek(table + FLOOR_SLOT_SIZE * index);
            slot.encode(ctx, floor_start)?;
            floor_start = ctx.position();
        }
        Ok(())
    }
}

impl FloorSlot {
    fn decode(ctx: &mut DecodeContext<'_, '_>) -> DecodeResult<Self> {
        let floor_offset = ctx.read_u32()?;
        let altitude_min = ctx.read_f32()?;
        let altitude_max = ctx.read_f32()?;
        let resume = ctx.position();

        ctx.seek_relative(ctx.origin, floor_offset)?;
        let id = ctx.next_floor_id();
        let floor = Floor::decode(ctx, id)?;
        ctx.floors.push(floor);
        ctx.refs.register_floor(floor_offset, id)?;
        ctx.seek(resume)?;

        Ok(Self {
            altitude_min,
            altitude_max,
            floor: id,
        })
    }

    /// Writes the slot at the cursor and its floor at `floor_start`,
    /// leaving the cursor at the end of the floor.
    fn encode(&self, ctx: &mut EncodeContext<'_, '_>, floor_start: usize) -> EncodeResult<()> {
        let floor = ctx.floor(self.floor)?;
        let floor_offset = ctx.mesh_offset(floor_start)?;
        ctx.write_u32(floor_offset);
        ctx.write_f32(self.altitude_min);
        ctx.write_f32(self.altitude_max);
        let end_site = ctx.position();

        ctx.seek(floor_start);
        floor.encode(ctx, self.floor)?;
        let floor_end = ctx.position();
        let size = EncodeContext::relative(floor_start, floor_end)?;
        ctx.layout
            .record_floor_placement(self.floor, floor_offset, size)?;
        ctx.patch_relative(end_site, ctx.origin, floor_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EncodeError, ReferenceKind};
    use crate::limits::DecodeLimits;
    use crate::mesh::NavMesh;
    use cursor::{ByteReader, ByteWriter, Endian};

    fn encode_cell(mesh: &NavMesh, cell: &NavCell) -> EncodeResult<Vec<u8>> {
        let mut writer = ByteWriter::new();
        {
            let mut ctx = EncodeContext::new(&mut writer, Endian::Little, mesh);
            cell.encode(&mut ctx)?;
        }
        Ok(writer.finish())
    }

    fn words(bytes: &[u8]) -> Vec<u32> {
        bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    #[test]
    fn empty_cell_is_count_and_zero_trailer() {
        let mesh = NavMesh::new(1, 1, 1);
        let bytes = encode_cell(&mesh, &NavCell::default()).unwrap();
        assert_eq!(bytes, vec![0; 8]);
    }

    #[test]
    fn two_floors_back_to_back() {
        let mut mesh = NavMesh::new(1, 1, 1);
        let a = mesh.add_floor(Floor::default());
        let b = mesh.add_floor(Floor::default());
        let cell = NavCell {
            slots: vec![
                FloorSlot {
                    altitude_min: 0.0,
                    altitude_max: 1.0,
                    floor: a,
                },
                FloorSlot {
                    altitude_min: 2.0,
                    altitude_max: 3.0,
                    floor: b,
                },
            ],
        };
        let bytes = encode_cell(&mesh, &cell).unwrap();
        let w = words(&bytes);
        // count, 2 slots, trailer; floors at 32 and 112.
        assert_eq!(w[0], 2);
        assert_eq!(w[1], 32);
        assert_eq!(w[4], 112);
        assert_eq!(w[7], 192, "trailer holds the last floor's end");
        assert_eq!(bytes.len(), 192);

        let limits = DecodeLimits::for_testing();
        let mut reader = ByteReader::new(&bytes);
        let mut ctx = DecodeContext::new(&mut reader, Endian::Little, 0, &limits, 1, 0.0);
        let decoded = NavCell::decode(&mut ctx).unwrap();
        assert_eq!(decoded, cell);
        assert_eq!(ctx.floors.len(), 2);
        assert_eq!(ctx.position(), 28, "cursor stops after the last slot");
    }

    #[test]
    fn floor_in_two_slots_rejected() {
        let mut mesh = NavMesh::new(1, 1, 1);
        let a = mesh.add_floor(Floor::default());
        let slot = FloorSlot {
            altitude_min: 0.0,
            altitude_max: 0.0,
            floor: a,
        };
        let cell = NavCell {
            slots: vec![slot, slot],
        };
        assert_eq!(
            encode_cell(&mesh, &cell).unwrap_err(),
            EncodeError::DuplicatePlacement {
                kind: ReferenceKind::Floor,
                handle: 0
            }
        );
    }

    #[test]
    fn unknown_floor_handle_rejected() {
        let mesh = NavMesh::new(1, 1, 1);
        let cell = NavCell {
            slots: vec![FloorSlot {
                altitude_min: 0.0,
                altitude_max: 0.0,
                floor: FloorId::new(3),
            }],
        };
        assert!(matches!(
            encode_cell(&mesh, &cell),
            Err(EncodeError::InvalidHandle {
                kind: ReferenceKind::Floor,
                handle: 3
            })
        ));
    }

    #[test]
    fn slot_limit_enforced() {
        let bytes = 9u32.to_le_bytes();
        let limits = DecodeLimits::for_testing();
        let mut reader = ByteReader::new(&bytes);
        let mut ctx = DecodeContext::new(&mut reader, Endian::Little, 0, &limits, 1, 0.0);
        assert!(matches!(
            NavCell::decode(&mut ctx),
            Err(crate::error::DecodeError::LimitsExceeded {
                kind: LimitKind::SlotsPerCell,
                ..
            })
        ));
    }
}
