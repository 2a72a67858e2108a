// src/repair/priority_list.rs

use super::priority::PriorityRanking;
use super::strategy::{RegionResolver, RepairContext, Resolution};
use crate::partition::LabelSet;
use crate::validator::{ConflictRegion, RegionKind};
use tracing::{debug, warn};

/// Vergibt eine Region an den Kandidaten mit dem höchsten Rang.
///
/// Kandidaten einer Überlappung sind ihre eigenen Labels, Kandidaten einer
/// Lücke die Labels der angrenzenden sauberen Dreiecke. Die Geometrie spielt
/// keine Rolle.
#[derive(Debug, Clone)]
pub struct PriorityList {
    ranking: PriorityRanking,
}

impl PriorityList {
    pub fn new(ranking: PriorityRanking) -> Self {
        Self { ranking }
    }

    pub fn ranking(&self) -> &PriorityRanking {
        &self.ranking
    }
}

impl RegionResolver for PriorityList {
    fn name(&self) -> &'static str {
        "PriorityList"
    }

    fn resolve(&self, ctx: &RepairContext<'_>, region: &ConflictRegion) -> Resolution {
        resolve_by_priority(&self.ranking, ctx, region)
    }
}

pub(crate) fn resolve_by_priority(
    ranking: &PriorityRanking,
    ctx: &RepairContext<'_>,
    region: &ConflictRegion,
) -> Resolution {
    let candidates: LabelSet = match region.kind {
        RegionKind::Overlap => region.candidates.clone(),
        RegionKind::Gap => region.bordering_labels(ctx.mesh),
        RegionKind::Mixed => return Resolution::Tie,
    };

    let mut best = None;
    let mut shared_best = false;
    for label in candidates.iter() {
        let Some(rank) = ranking.rank(ctx.catalog, label) else {
            warn!(
                "Polygon {} of region {} is not in the priority list; region falls back to RandomNeighbour",
                label, region.id
            );
            return Resolution::Tie;
        };
        match best {
            Some((_, best_rank)) if rank > best_rank => {}
            Some((_, best_rank)) if rank == best_rank => shared_best = true,
            _ => {
                best = Some((label, rank));
                shared_best = false;
            }
        }
    }

    match best {
        Some((label, rank)) if !shared_best => {
            debug!("Region {} assigned to {} (rank {})", region.id, label, rank);
            Resolution::Whole(label)
        }
        _ => Resolution::Tie,
    }
}
