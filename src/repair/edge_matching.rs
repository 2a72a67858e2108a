// src/repair/edge_matching.rs

use super::longest_boundary::{boundary_lengths, longest};
use super::priority::PriorityRanking;
use super::priority_list::resolve_by_priority;
use super::strategy::{RegionResolver, RepairContext, Resolution};
use crate::mesh::PartitionMesh;
use crate::partition::PolygonId;
use crate::utils::planar;
use crate::validator::{ConflictRegion, RegionKind};
use geo::Coord;
use std::collections::HashMap;
use tracing::debug;

/// Seite eines Regionspunkts relativ zu den beiden angrenzenden Labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    First,
    Second,
    Ambiguous,
}

/// Abgleich zweier Datensätze entlang gemeinsamer Grenzen.
///
/// Schmale Regionen zwischen genau zwei Labels werden vorab entlang ihrer
/// Mittellinie geteilt (`plan_splits`); Teilregionen gehen an das Label mit
/// der längsten Grenze, alle übrigen Regionen nach Priorität.
#[derive(Debug, Clone)]
pub struct EdgeMatching {
    ranking: PriorityRanking,
}

impl EdgeMatching {
    pub fn new(ranking: PriorityRanking) -> Self {
        Self { ranking }
    }

    /// Teilungsstrecken für alle Regionen, deren Breite `max_distance` nicht übersteigt.
    pub fn plan_splits(
        ctx: &RepairContext<'_>,
        regions: &[ConflictRegion],
        max_distance: f64,
    ) -> Vec<(Coord<f64>, Coord<f64>)> {
        let mut segments = Vec::new();
        for region in regions {
            if region.kind == RegionKind::Mixed {
                continue;
            }
            let planned = split_region(ctx.mesh, region, max_distance);
            if !planned.is_empty() {
                debug!(
                    "Region {} is split by {} segment(s)",
                    region.id,
                    planned.len()
                );
            }
            segments.extend(planned);
        }
        segments
    }
}

impl RegionResolver for EdgeMatching {
    fn name(&self) -> &'static str {
        "EdgeMatching"
    }

    fn resolve(&self, ctx: &RepairContext<'_>, region: &ConflictRegion) -> Resolution {
        if region.kind == RegionKind::Mixed {
            return Resolution::Tie;
        }
        let touches_split = region
            .triangles
            .iter()
            .any(|&id| (0..3).any(|edge| ctx.mesh.is_split_edge(id, edge)));
        if touches_split {
            return match longest(&boundary_lengths(ctx.mesh, region)) {
                Some(label) => Resolution::Whole(label),
                None => Resolution::Tie,
            };
        }
        resolve_by_priority(&self.ranking, ctx, region)
    }
}

fn split_region(
    mesh: &PartitionMesh,
    region: &ConflictRegion,
    max_distance: f64,
) -> Vec<(Coord<f64>, Coord<f64>)> {
    // Randkanten nach angrenzendem Label sortieren
    let mut sides: HashMap<PolygonId, Vec<(usize, usize)>> = HashMap::new();
    for edge in region.boundary(mesh) {
        if let Some(owner) = edge.outside.and_then(|n| mesh.triangle(n).owner()) {
            sides
                .entry(owner)
                .or_default()
                .push(mesh.edge_vertices(edge.triangle, edge.edge));
        }
    }
    if sides.len() != 2 {
        return Vec::new();
    }
    let mut labels: Vec<PolygonId> = sides.keys().copied().collect();
    labels.sort_unstable();
    let first_edges = &sides[&labels[0]];
    let second_edges = &sides[&labels[1]];

    let mut side_of: HashMap<usize, Side> = HashMap::new();
    for (edges, side) in [(first_edges, Side::First), (second_edges, Side::Second)] {
        for &(a, b) in edges {
            for v in [a, b] {
                side_of
                    .entry(v)
                    .and_modify(|s| {
                        if *s != side {
                            *s = Side::Ambiguous;
                        }
                    })
                    .or_insert(side);
            }
        }
    }

    let width = region_width(mesh, &side_of, first_edges, second_edges);
    if !width.is_some_and(|w| w <= max_distance) {
        return Vec::new();
    }

    let side = |v: usize| side_of.get(&v).copied().unwrap_or(Side::Ambiguous);
    let mut segments = Vec::new();
    for &id in &region.triangles {
        let vertices = mesh.triangle(id).vertices;
        let cross_midpoints: Vec<Coord<f64>> = (0..3)
            .filter_map(|i| {
                let (a, b) = (vertices[i], vertices[(i + 1) % 3]);
                let crossing = matches!(
                    (side(a), side(b)),
                    (Side::First, Side::Second) | (Side::Second, Side::First)
                );
                crossing.then(|| planar::midpoint(mesh.position(a), mesh.position(b)))
            })
            .collect();

        match cross_midpoints.as_slice() {
            [p, q] => segments.push((*p, *q)),
            [p] => {
                // Spitze der Region: Mittelpunkt mit dem mehrdeutigen Eckpunkt verbinden
                if let Some(&apex) = vertices.iter().find(|&&v| side(v) == Side::Ambiguous) {
                    segments.push((*p, mesh.position(apex)));
                }
            }
            _ => {}
        }
    }
    segments
}

/// Größter Abstand eines Randpunkts zur gegenüberliegenden Seite.
fn region_width(
    mesh: &PartitionMesh,
    side_of: &HashMap<usize, Side>,
    first_edges: &[(usize, usize)],
    second_edges: &[(usize, usize)],
) -> Option<f64> {
    let distance_to = |v: usize, edges: &[(usize, usize)]| {
        let p = mesh.position(v);
        edges
            .iter()
            .map(|&(a, b)| planar::point_segment_distance(p, mesh.position(a), mesh.position(b)))
            .fold(f64::INFINITY, f64::min)
    };

    let mut width: Option<f64> = None;
    for (&v, side) in side_of {
        let d = match side {
            Side::First => distance_to(v, second_edges),
            Side::Second => distance_to(v, first_edges),
            Side::Ambiguous => continue,
        };
        width = Some(width.map_or(d, |w| w.max(d)));
    }
    width
}
