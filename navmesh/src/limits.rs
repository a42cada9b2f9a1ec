//! Limits enforced while decoding untrusted input.

use crate::error::{DecodeError, DecodeResult, LimitKind};

/// Upper bounds on every count read from a mesh.
///
/// Counts are checked before anything is allocated or iterated. Offsets may
/// alias, so the `max_total_*` caps bound what a whole decode materializes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum number of grid cells (`rows * cols`).
    pub max_cells: usize,
    /// Maximum number of floor slots in one cell.
    pub max_slots_per_cell: usize,
    /// Maximum length of any one child collection of a floor.
    pub max_children_per_floor: usize,
    /// Maximum number of points in one contour loop.
    pub max_points_per_contour: usize,
    /// Maximum number of adjacency groups in a mesh.
    pub max_adjacency_groups: usize,
    /// Maximum number of boundary links in one adjacency group.
    pub max_links_per_group: usize,
    /// Maximum number of edge references in one boundary link.
    pub max_edges_per_link: usize,
    /// Maximum number of floor children decoded across the whole mesh.
    pub max_total_floor_children: usize,
    /// Maximum number of contour points decoded across the whole mesh.
    pub max_total_points: usize,
    /// Maximum number of boundary links decoded across all groups.
    pub max_total_links: usize,
    /// Maximum number of edge references decoded across all links.
    pub max_total_edge_refs: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_cells: 1 << 20,
            max_slots_per_cell: 256,
            max_children_per_floor: 1 << 16,
            max_points_per_contour: 1 << 16,
            max_adjacency_groups: 1024,
            max_links_per_group: 1 << 16,
            max_edges_per_link: 1 << 12,
            max_total_floor_children: 1 << 22,
            max_total_points: 1 << 22,
            max_total_links: 1 << 18,
            max_total_edge_refs: 1 << 20,
        }
    }
}

impl DecodeLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_cells: 256,
            max_slots_per_cell: 8,
            max_children_per_floor: 64,
            max_points_per_contour: 64,
            max_adjacency_groups: 8,
            max_links_per_group: 32,
            max_edges_per_link: 16,
            max_total_floor_children: 256,
            max_total_points: 512,
            max_total_links: 64,
            max_total_edge_refs: 128,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_cells: usize::MAX,
            max_slots_per_cell: usize::MAX,
            max_children_per_floor: usize::MAX,
            max_points_per_contour: usize::MAX,
            max_adjacency_groups: usize::MAX,
            max_links_per_group: usize::MAX,
            max_edges_per_link: usize::MAX,
            max_total_floor_children: usize::MAX,
            max_total_points: usize::MAX,
            max_total_links: usize::MAX,
            max_total_edge_refs: usize::MAX,
        }
    }

    fn limit_for(&self, kind: LimitKind) -> usize {
        match kind {
            LimitKind::Cells => self.max_cells,
            LimitKind::SlotsPerCell => self.max_slots_per_cell,
            LimitKind::ChildrenPerFloor => self.max_children_per_floor,
            LimitKind::PointsPerContour => self.max_points_per_contour,
            LimitKind::AdjacencyGroups => self.max_adjacency_groups,
            LimitKind::LinksPerGroup => self.max_links_per_group,
            LimitKind::EdgesPerLink => self.max_edges_per_link,
            LimitKind::TotalFloorChildren => self.max_total_floor_children,
            LimitKind::TotalPoints => self.max_total_points,
            LimitKind::TotalLinks => self.max_total_links,
            LimitKind::TotalEdgeRefs => self.max_total_edge_refs,
        }
    }

    pub(crate) fn check(&self, kind: LimitKind, actual: u64) -> DecodeResult<usize> {
        let limit = self.limit_for(kind);
        match usize::try_from(actual) {
            Ok(count) if count <= limit => Ok(count),
            _ => Err(DecodeError::LimitsExceeded {
                kind,
                limit,
                actual: usize::try_from(actual).unwrap_or(usize::MAX),
            }),
        }
    }
}
