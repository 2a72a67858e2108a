// src/repair/longest_boundary.rs

use super::strategy::{RegionResolver, RepairContext, Resolution};
use crate::mesh::PartitionMesh;
use crate::partition::PolygonId;
use crate::utils::constants::LENGTH_TIE_TOLERANCE;
use crate::validator::{ConflictRegion, RegionKind};
use std::collections::BTreeMap;

/// Vergibt eine Region an das Label mit der längsten gemeinsamen Grenze.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestBoundary;

impl RegionResolver for LongestBoundary {
    fn name(&self) -> &'static str {
        "LongestBoundary"
    }

    fn resolve(&self, ctx: &RepairContext<'_>, region: &ConflictRegion) -> Resolution {
        if region.kind == RegionKind::Mixed {
            return Resolution::Tie;
        }
        match longest(&boundary_lengths(ctx.mesh, region)) {
            Some(label) => Resolution::Whole(label),
            None => Resolution::Tie,
        }
    }
}

/// Summierte Kantenlänge zwischen der Region und sauberen Nachbarn, je Label.
///
/// Bei Überlappungen zählen nur die eigenen Kandidaten, sofern mindestens
/// einer von ihnen an die Region grenzt.
pub(crate) fn boundary_lengths(
    mesh: &PartitionMesh,
    region: &ConflictRegion,
) -> BTreeMap<PolygonId, f64> {
    let mut lengths: BTreeMap<PolygonId, f64> = BTreeMap::new();
    for edge in region.boundary(mesh) {
        let Some(owner) = edge.outside.and_then(|n| mesh.triangle(n).owner()) else {
            continue;
        };
        *lengths.entry(owner).or_insert(0.0) += edge.length;
    }

    if region.kind == RegionKind::Overlap
        && lengths.keys().any(|label| region.candidates.contains(*label))
    {
        lengths.retain(|label, _| region.candidates.contains(*label));
    }
    lengths
}

/// Label mit der größten Länge; `None` bei Gleichstand oder ohne Kandidaten.
pub(crate) fn longest(lengths: &BTreeMap<PolygonId, f64>) -> Option<PolygonId> {
    let mut ranked: Vec<(PolygonId, f64)> = lengths.iter().map(|(l, v)| (*l, *v)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    match ranked.as_slice() {
        [] => None,
        [(label, _)] => Some(*label),
        [(label, best), (_, second), ..] => {
            let tolerance = LENGTH_TIE_TOLERANCE * best.abs().max(1.0);
            (best - second > tolerance).then_some(*label)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_picks_maximum() {
        let a = PolygonId::new(0, 0);
        let b = PolygonId::new(1, 0);
        let lengths = BTreeMap::from([(a, 0.6), (b, 0.5)]);
        assert_eq!(longest(&lengths), Some(a));
    }

    #[test]
    fn test_equal_lengths_are_a_tie() {
        let a = PolygonId::new(0, 0);
        let b = PolygonId::new(1, 0);
        let lengths = BTreeMap::from([(a, 1.0), (b, 1.0 + 1e-12)]);
        assert_eq!(longest(&lengths), None);
        assert_eq!(longest(&BTreeMap::new()), None);
    }
}
