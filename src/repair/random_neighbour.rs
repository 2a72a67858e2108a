// src/repair/random_neighbour.rs

use super::strategy::{RegionResolver, RepairContext, Resolution};
use crate::mesh::TriangleId;
use crate::partition::PolygonId;
use crate::validator::ConflictRegion;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Füllt eine Region vom sauberen Rand her nach innen.
///
/// In jeder Runde übernimmt jedes noch offene Dreieck das Label eines bereits
/// aufgelösten Nachbarn (über beliebige Kanten). Ohne Seed wird der erste
/// Nachbar in Kantenreihenfolge genommen, mit Seed ein zufälliger.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNeighbour {
    seed: Option<u64>,
}

impl RandomNeighbour {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }
}

impl RegionResolver for RandomNeighbour {
    fn name(&self) -> &'static str {
        "RandomNeighbour"
    }

    fn resolve(&self, ctx: &RepairContext<'_>, region: &ConflictRegion) -> Resolution {
        let Some(&first) = region.triangles.first() else {
            return Resolution::Tie;
        };
        // Pro Region geseedet, damit die Reihenfolge der Regionen keine Rolle spielt
        let mut rng = self
            .seed
            .map(|seed| StdRng::seed_from_u64(seed ^ first as u64));

        let mut assigned: HashMap<TriangleId, PolygonId> = HashMap::new();
        loop {
            let mut round = Vec::new();
            for &id in &region.triangles {
                if assigned.contains_key(&id) {
                    continue;
                }
                let options: Vec<PolygonId> = ctx
                    .mesh
                    .triangle(id)
                    .neighbors
                    .iter()
                    .flatten()
                    .filter_map(|&n| {
                        assigned
                            .get(&n)
                            .copied()
                            .or_else(|| ctx.mesh.triangle(n).owner())
                    })
                    .collect();
                if options.is_empty() {
                    continue;
                }
                let pick = match rng.as_mut() {
                    Some(rng) => options[rng.random_range(0..options.len())],
                    None => options[0],
                };
                round.push((id, pick));
            }
            if round.is_empty() {
                break;
            }
            assigned.extend(round);
        }

        if assigned.is_empty() {
            // Kein aufgelöster Nachbar: bei Überlappungen bleibt der kleinste Kandidat
            return match region.candidates.iter().next() {
                Some(label) => Resolution::Whole(label),
                None => Resolution::Tie,
            };
        }

        let mut decisions: Vec<(TriangleId, PolygonId)> = assigned.into_iter().collect();
        decisions.sort_unstable();
        Resolution::PerTriangle(decisions)
    }
}
