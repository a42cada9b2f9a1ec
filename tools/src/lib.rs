//! Introspection and debugging tools for navcodec meshes.
//!
//! This crate provides utilities for looking inside encoded meshes:
//!
//! - Decode a mesh at any offset of a file and summarize its records
//! - Re-encode a decoded mesh and locate the first byte that differs
//! - Render a decoded mesh as JSON or an indented text tree
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what the codec decoded.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use cursor::{ByteReader, Endian};
use navmesh::{
    decode_nav_mesh, encode_nav_mesh_to_vec, DecodeLimits, Floor, GridBounds, NavMesh,
};
use serde::Serialize;
use tracing::debug;

/// Record counts and header fields of one decoded mesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshReport {
    pub type_tag: String,
    pub version: u32,
    pub mesh_id: u32,
    pub rows: u32,
    pub cols: u32,
    pub bounds: GridBounds,
    pub entity_radius: f32,
    pub raster_precision: f32,
    pub occupied_cells: usize,
    pub floors: usize,
    pub cell_boundary_half_edges: usize,
    pub mesh_boundary_edges: usize,
    pub obstacle_contours: usize,
    pub walkable_contours: usize,
    pub oriented_contours: usize,
    pub contour_points: usize,
    pub adjacency_groups: usize,
    pub boundary_links: usize,
    pub encoded_len: usize,
}

/// Outcome of decoding and re-encoding a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundtripReport {
    pub offset: usize,
    pub encoded_len: usize,
    /// First differing byte, relative to the mesh start.
    pub first_mismatch: Option<usize>,
}

impl RoundtripReport {
    pub fn is_identical(&self) -> bool {
        self.first_mismatch.is_none()
    }
}

/// Decodes the mesh that starts at `offset`.
pub fn decode_mesh_at(
    bytes: &[u8],
    offset: usize,
    endian: Endian,
    limits: &DecodeLimits,
) -> Result<NavMesh> {
    let mut reader = ByteReader::new(bytes);
    reader
        .seek(offset)
        .with_context(|| format!("seek to mesh offset {offset}"))?;
    let mesh = decode_nav_mesh(&mut reader, endian, limits)
        .with_context(|| format!("decode mesh at offset {offset}"))?;
    Ok(mesh)
}

pub fn inspect_mesh(
    bytes: &[u8],
    offset: usize,
    endian: Endian,
    limits: &DecodeLimits,
) -> Result<MeshReport> {
    let mesh = decode_mesh_at(bytes, offset, endian, limits)?;
    let encoded_len = encode_nav_mesh_to_vec(&mesh, endian)
        .context("re-encode mesh")?
        .len();
    Ok(summarize(&mesh, encoded_len))
}

/// Summarizes a mesh whose encoded form is `encoded_len` bytes long.
pub fn summarize(mesh: &NavMesh, encoded_len: usize) -> MeshReport {
    let floors = mesh.floors();
    MeshReport {
        type_tag: mesh.type_tag.to_text_lossy(),
        version: mesh.version,
        mesh_id: mesh.mesh_id,
        rows: mesh.rows,
        cols: mesh.cols,
        bounds: mesh.bounds,
        entity_radius: mesh.entity_radius,
        raster_precision: mesh.raster_precision,
        occupied_cells: mesh.cells.iter().filter(|cell| !cell.slots.is_empty()).count(),
        floors: floors.len(),
        cell_boundary_half_edges: total(floors, |floor| floor.cell_edges.len()),
        mesh_boundary_edges: mesh.boundary_edges().len(),
        obstacle_contours: total(floors, |floor| floor.obstacle_contours.len()),
        walkable_contours: total(floors, |floor| floor.walkable_contours.len()),
        oriented_contours: total(floors, |floor| floor.oriented_contours.len()),
        contour_points: total(floors, contour_points),
        adjacency_groups: mesh.adjacency_groups.len(),
        boundary_links: mesh
            .adjacency_groups
            .iter()
            .map(|group| group.links.len())
            .sum(),
        encoded_len,
    }
}

fn total(floors: &[Floor], per_floor: impl Fn(&Floor) -> usize) -> usize {
    floors.iter().map(per_floor).sum()
}

fn contour_points(floor: &Floor) -> usize {
    let plain: usize = floor
        .obstacle_contours
        .iter()
        .chain(&floor.walkable_contours)
        .map(|contour| contour.points.len())
        .sum();
    let oriented: usize = floor
        .oriented_contours
        .iter()
        .map(|contour| contour.points.len())
        .sum();
    plain + oriented
}

/// Decodes the mesh at `offset`, re-encodes it and compares the result with
/// the input bytes it was read from.
pub fn roundtrip_mesh(
    bytes: &[u8],
    offset: usize,
    endian: Endian,
    limits: &DecodeLimits,
) -> Result<RoundtripReport> {
    let mesh = decode_mesh_at(bytes, offset, endian, limits)?;
    let encoded = encode_nav_mesh_to_vec(&mesh, endian).context("re-encode mesh")?;
    let original = bytes.get(offset..).unwrap_or_default();
    let first_mismatch = first_mismatch(original, &encoded);
    debug!(
        offset,
        encoded_len = encoded.len(),
        ?first_mismatch,
        "roundtrip compared"
    );
    Ok(RoundtripReport {
        offset,
        encoded_len: encoded.len(),
        first_mismatch,
    })
}

/// Index of the first byte of `encoded` that `original` does not reproduce.
///
/// Bytes of `original` past the end of `encoded` are ignored; a shorter
/// `original` mismatches at its end.
pub fn first_mismatch(original: &[u8], encoded: &[u8]) -> Option<usize> {
    encoded
        .iter()
        .enumerate()
        .find(|&(index, byte)| original.get(index) != Some(byte))
        .map(|(index, _)| index)
}

pub fn format_mesh_pretty(mesh: &NavMesh) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "mesh {} \"{}\" v{} ({}x{} cells, radius {})",
        mesh.mesh_id,
        mesh.type_tag.to_text_lossy(),
        mesh.version,
        mesh.rows,
        mesh.cols,
        mesh.entity_radius
    );
    let bounds = mesh.bounds;
    let _ = writeln!(
        out,
        "bounds: x [{}, {}] y [{}, {}]",
        bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y
    );
    for (index, cell) in mesh.cells.iter().enumerate() {
        if cell.slots.is_empty() {
            continue;
        }
        let _ = writeln!(out, "cell {index}:");
        for slot in &cell.slots {
            let _ = writeln!(
                out,
                "  {} altitude [{}, {}]",
                slot.floor, slot.altitude_min, slot.altitude_max
            );
            let Some(floor) = mesh.floor(slot.floor) else {
                continue;
            };
            for edge in &floor.cell_edges {
                let target = edge
                    .adjacent_floor
                    .map_or_else(|| "unresolved".to_string(), |id| id.to_string());
                let _ = writeln!(out, "    half-edge -> {target}");
            }
            for edge in &floor.boundary_edges {
                let _ = writeln!(out, "    {edge}");
            }
            let _ = writeln!(
                out,
                "    contours: {} obstacle, {} walkable, {} oriented",
                floor.obstacle_contours.len(),
                floor.walkable_contours.len(),
                floor.oriented_contours.len()
            );
        }
    }
    for group in &mesh.adjacency_groups {
        let _ = writeln!(out, "adjacent mesh {}:", group.adjacent_mesh_id);
        for link in &group.links {
            let edges: Vec<String> = link.edges.iter().map(ToString::to_string).collect();
            let _ = writeln!(
                out,
                "  cell ({}, {}): {}",
                link.adjacent_cell_x,
                link.adjacent_cell_y,
                edges.join(", ")
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use navmesh::{
        AdjacencyGroup, BoundaryLink, CellBoundaryHalfEdge, FloorSlot, MeshBoundaryEdge, Vec3,
    };

    fn sample_mesh() -> NavMesh {
        let mut mesh = NavMesh::new(4, 1, 2);
        let a = mesh.add_floor(Floor::default());
        let b = mesh.add_floor(Floor::default());
        let edge = mesh.add_boundary_edge(MeshBoundaryEdge {
            start: Vec3::ZERO,
            end: Vec3::new(1.0, 0.0, 0.0),
            direction: Vec3::new(0.0, 1.0, 0.0),
        });
        {
            let floor = mesh.floor_mut(a).unwrap();
            floor.cell_edges.push(CellBoundaryHalfEdge {
                start: Vec3::ZERO,
                end: Vec3::ZERO,
                adjacent_floor: Some(b),
            });
            floor.boundary_edges.push(edge);
        }
        for (cell, floor) in [a, b].into_iter().enumerate() {
            mesh.cells[cell].slots.push(FloorSlot {
                altitude_min: 0.0,
                altitude_max: 1.0,
                floor,
            });
        }
        mesh.adjacency_groups.push(AdjacencyGroup {
            adjacent_mesh_id: 5,
            links: vec![BoundaryLink {
                adjacent_cell_x: 1,
                adjacent_cell_y: 0,
                reserved: 0,
                edges: vec![edge],
            }],
        });
        mesh
    }

    fn embedded(prefix: usize, endian: Endian) -> Vec<u8> {
        let mut bytes = vec![0xEE; prefix];
        bytes.extend(encode_nav_mesh_to_vec(&sample_mesh(), endian).unwrap());
        bytes
    }

    #[test]
    fn inspect_counts_records() {
        let bytes = embedded(6, Endian::Little);
        let report = inspect_mesh(&bytes, 6, Endian::Little, &DecodeLimits::default()).unwrap();
        assert_eq!(report.mesh_id, 4);
        assert_eq!(report.occupied_cells, 2);
        assert_eq!(report.floors, 2);
        assert_eq!(report.cell_boundary_half_edges, 1);
        assert_eq!(report.mesh_boundary_edges, 1);
        assert_eq!(report.adjacency_groups, 1);
        assert_eq!(report.boundary_links, 1);
        assert_eq!(report.encoded_len, bytes.len() - 6);
    }

    #[test]
    fn roundtrip_identical_at_offset() {
        let bytes = embedded(3, Endian::Big);
        let report = roundtrip_mesh(&bytes, 3, Endian::Big, &DecodeLimits::default()).unwrap();
        assert!(report.is_identical());
        assert_eq!(report.encoded_len, bytes.len() - 3);
    }

    #[test]
    fn roundtrip_reports_garbage_padding() {
        let mut bytes = embedded(0, Endian::Little);
        // Last cell is non-empty, so the padding word sits before the group header.
        let groups = u32::from_le_bytes(bytes[76..80].try_into().unwrap()) as usize;
        bytes[groups - 4] = 0x5A;
        let report = roundtrip_mesh(&bytes, 0, Endian::Little, &DecodeLimits::default()).unwrap();
        assert_eq!(report.first_mismatch, Some(groups - 4));
    }

    #[test]
    fn first_mismatch_cases() {
        assert_eq!(first_mismatch(&[1, 2, 3], &[1, 2, 3]), None);
        assert_eq!(first_mismatch(&[1, 2, 3, 4], &[1, 2, 3]), None);
        assert_eq!(first_mismatch(&[1, 9, 3], &[1, 2, 3]), Some(1));
        assert_eq!(first_mismatch(&[1, 2], &[1, 2, 3]), Some(2));
    }

    #[test]
    fn decode_error_has_context() {
        let err = decode_mesh_at(&[0; 16], 0, Endian::Little, &DecodeLimits::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("decode mesh at offset 0"));
        assert!(decode_mesh_at(&[0; 16], 17, Endian::Little, &DecodeLimits::default()).is_err());
    }

    #[test]
    fn pretty_lists_links() {
        let text = format_mesh_pretty(&sample_mesh());
        assert!(text.starts_with("mesh 4"));
        assert!(text.contains("half-edge -> floor#1"));
        assert!(text.contains("adjacent mesh 5:"));
        assert!(text.contains("cell (1, 0): boundary-edge#0"));
    }

    #[test]
    fn report_serializes() {
        let report = summarize(&sample_mesh(), 0);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["floors"], 2);
        assert_eq!(json["bounds"]["min_x"], 0.0);
    }
}
