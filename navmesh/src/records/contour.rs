//! Contour loop tables whose lengths come from start and end offsets.

use crate::context::{DecodeContext, EncodeContext, Pointer};
use crate::error::{DecodeError, DecodeResult, EncodeResult, LimitKind};
use crate::types::Vec3;

const POINT_SIZE: u32 = 12;
const OFFSET_ENTRY_SIZE: usize = 4;
const ORIENTED_ENTRY_SIZE: usize = 16;

/// A polyline whose length is implied by its start and end offsets.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContourLoop {
    pub points: Vec<Vec3>,
}

/// A polyline that also carries a direction vector.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrientedContourLoop {
    pub direction: Vec3,
    pub points: Vec<Vec3>,
}

impl ContourLoop {
    /// Decodes a table of `count + 1` floor-relative offsets; loop `i` spans
    /// entries `i` and `i + 1`.
    pub(crate) fn decode_table(
        ctx: &mut DecodeContext<'_, '_>,
        base: usize,
        pointer: Pointer,
    ) -> DecodeResult<Vec<Self>> {
        ctx.seek_relative(base, pointer.offset)?;
        let mut loops = Vec::with_capacity(pointer.count);
        for _ in 0..pointer.count {
            let start = ctx.read_u32()?;
            let next = ctx.position();
            let end = ctx.read_u32()?;
            let points = read_points(ctx, base, start, end)?;
            loops.push(Self { points });
            ctx.seek(next)?;
        }
        Ok(loops)
    }

    pub(crate) fn encode_table(
        loops: &[Self],
        ctx: &mut EncodeContext<'_, '_>,
        site: usize,
        base: usize,
    ) -> EncodeResult<()> {
        if loops.is_empty() {
            return Ok(());
        }
        let table = ctx.position();
        ctx.patch_relative(site, base, table)?;
        ctx.write_zeros(OFFSET_ENTRY_SIZE * (loops.len() + 1));

        for (index, contour) in loops.iter().enumerate() {
            let start = ctx.position();
            write_points(ctx, &contour.points);
            let end = ctx.position();
            let entry = table + OFFSET_ENTRY_SIZE * index;
            ctx.patch_relative(entry, base, start)?;
            ctx.patch_relative(entry + OFFSET_ENTRY_SIZE, base, end)?;
        }
        Ok(())
    }
}

impl OrientedContourLoop {
    /// Decodes a table of `count + 1` `{start, direction}` entries. The final
    /// entry only contributes the last loop's end offset.
    pub(crate) fn decode_table(
        ctx: &mut DecodeContext<'_, '_>,
        base: usize,
        pointer: Pointer,
    ) -> DecodeResult<Vec<Self>> {
        ctx.seek_relative(base, pointer.offset)?;
        let mut loops = Vec::with_capacity(pointer.count);
        for _ in 0..pointer.count {
            let start = ctx.read_u32()?;
            let direction = ctx.read_vec3()?;
            let next = ctx.position();
            let end = ctx.read_u32()?;
            let points = read_points(ctx, base, start, end)?;
            loops.push(Self { direction, points });
            ctx.seek(next)?;
        }
        Ok(loops)
    }

    pub(crate) fn encode_table(
        loops: &[Self],
        ctx: &mut EncodeContext<'_, '_>,
        site: usize,
        base: usize,
    ) -> EncodeResult<()> {
        if loops.is_empty() {
            return Ok(());
        }
        let table = ctx.position();
        ctx.patch_relative(site, base, table)?;
        ctx.write_zeros(ORIENTED_ENTRY_SIZE * (loops.len() + 1));

        for (index, contour) in loops.iter().enumerate() {
            let start = ctx.position();
            write_points(ctx, &contour.points);
            let end = ctx.position();
            let entry = table + ORIENTED_ENTRY_SIZE * index;
            ctx.patch_relative(entry, base, start)?;
            ctx.patch_vec3(entry + 4, contour.direction)?;
            ctx.patch_relative(entry + ORIENTED_ENTRY_SIZE, base, end)?;
        }
        Ok(())
    }
}

fn read_points(
    ctx: &mut DecodeContext<'_, '_>,
    base: usize,
    start: u32,
    end: u32,
) -> DecodeResult<Vec<Vec3>> {
    let span = end
        .checked_sub(start)
        .filter(|span| span % POINT_SIZE == 0)
        .ok_or(DecodeError::TruncatedContourLoop { start, end })?;
    let count = ctx.check_limit(LimitKind::PointsPerContour, span / POINT_SIZE)?;
    ctx.charge(LimitKind::TotalPoints, count)?;

    ctx.seek_relative(base, start)?;
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        points.push(ctx.read_vec3()?);
    }
    Ok(points)
}

fn write_points(ctx: &mut EncodeContext<'_, '_>, points: &[Vec3]) {
    for point in points {
        ctx.write_vec3(*point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::DecodeLimits;
    use crate::mesh::NavMesh;
    use cursor::{ByteReader, ByteWriter, Endian};

    fn encode_with<F>(encode: F) -> Vec<u8>
    where
        F: FnOnce(&mut EncodeContext<'_, '_>) -> EncodeResult<()>,
    {
        let mesh = NavMesh::new(1, 0, 0);
        let mut writer = ByteWriter::new();
        {
            let mut ctx = EncodeContext::new(&mut writer, Endian::Little, &mesh);
            encode(&mut ctx).unwrap();
        }
        writer.finish()
    }

    fn le_words(bytes: &[u8]) -> Vec<u32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    #[test]
    fn plain_table_layout() {
        let loops = vec![
            ContourLoop {
                points: vec![Vec3::new(1.0, 2.0, 3.0)],
            },
            ContourLoop { points: vec![] },
        ];
        let bytes = encode_with(|ctx| {
            let site = ctx.write_pointer_placeholder(loops.len())?;
            ContourLoop::encode_table(&loops, ctx, site, 0)
        });

        // {count, offset} pair, 3-entry table, one point.
        let words = le_words(&bytes);
        assert_eq!(words[..5], [2, 8, 20, 32, 32]);
        assert_eq!(bytes.len(), 32);

        let limits = DecodeLimits::for_testing();
        let mut reader = ByteReader::new(&bytes);
        let mut ctx = DecodeContext::new(&mut reader, Endian::Little, 0, &limits, 1, 0.0);
        let pointer = ctx
            .read_pointer(
                crate::error::PointerField::ObstacleContours,
                LimitKind::ChildrenPerFloor,
            )
            .unwrap()
            .unwrap();
        let decoded = ContourLoop::decode_table(&mut ctx, 0, pointer).unwrap();
        assert_eq!(decoded, loops);
    }

    #[test]
    fn oriented_table_carries_direction() {
        let loops = vec![OrientedContourLoop {
            direction: Vec3::new(0.0, 0.0, 1.0),
            points: vec![Vec3::new(4.0, 5.0, 6.0), Vec3::new(7.0, 8.0, 9.0)],
        }];
        let bytes = encode_with(|ctx| {
            let site = ctx.write_pointer_placeholder(loops.len())?;
            OrientedContourLoop::encode_table(&loops, ctx, site, 0)
        });

        let words = le_words(&bytes);
        assert_eq!(words[1], 8, "table follows the pair");
        assert_eq!(words[2], 40, "points follow the 2-entry table");
        assert_eq!(words[5], 1.0f32.to_bits());
        assert_eq!(words[6], 64, "terminal entry holds the end offset");
        assert_eq!(words[7..10], [0, 0, 0], "terminal direction is zero");

        let limits = DecodeLimits::for_testing();
        let mut reader = ByteReader::new(&bytes);
        let mut ctx = DecodeContext::new(&mut reader, Endian::Little, 0, &limits, 1, 0.0);
        let pointer = Pointer {
            count: 1,
            offset: words[1],
        };
        let decoded = OrientedContourLoop::decode_table(&mut ctx, 0, pointer).unwrap();
        assert_eq!(decoded, loops);
    }

    #[test]
    fn misaligned_end_is_truncated() {
        // Table [8, 18] at offset 0: a 10-byte span is not whole points.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&8u32.to_le_bytes());
        bytes.extend_from_slice(&18u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 12]);

        let limits = DecodeLimits::for_testing();
        let mut reader = ByteReader::new(&bytes);
        let mut ctx = DecodeContext::new(&mut reader, Endian::Little, 0, &limits, 1, 0.0);
        let err =
            ContourLoop::decode_table(&mut ctx, 0, Pointer { count: 1, offset: 0 }).unwrap_err();
        assert_eq!(err, DecodeError::TruncatedContourLoop { start: 8, end: 18 });
    }

    #[test]
    fn backwards_loop_is_truncated() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&20u32.to_le_bytes());
        bytes.extend_from_slice(&8u32.to_le_bytes());

        let limits = DecodeLimits::for_testing();
        let mut reader = ByteReader::new(&bytes);
        let mut ctx = DecodeContext::new(&mut reader, Endian::Little, 0, &limits, 1, 0.0);
        assert!(matches!(
            ContourLoop::decode_table(&mut ctx, 0, Pointer { count: 1, offset: 0 }),
            Err(DecodeError::TruncatedContourLoop { start: 20, end: 8 })
        ));
    }

    #[test]
    fn point_limit_enforced() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&8u32.to_le_bytes());
        bytes.extend_from_slice(&(8 + 12 * 65u32).to_le_bytes());

        let limits = DecodeLimits::for_testing();
        let mut reader = ByteReader::new(&bytes);
        let mut ctx = DecodeContext::new(&mut reader, Endian::Little, 0, &limits, 1, 0.0);
        assert!(matches!(
            ContourLoop::decode_table(&mut ctx, 0, Pointer { count: 1, offset: 0 }),
            Err(DecodeError::LimitsExceeded {
                kind: LimitKind::PointsPerContour,
                ..
            })
        ));
    }
}
