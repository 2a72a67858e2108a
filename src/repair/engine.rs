// src/repair/engine.rs

use super::config::{RepairConfig, RepairMethod};
use super::edge_matching::EdgeMatching;
use super::longest_boundary::LongestBoundary;
use super::priority_list::PriorityList;
use super::random_neighbour::RandomNeighbour;
use super::strategy::{RegionResolver, RepairContext, Resolution};
use crate::error::{PartitionError, PartitionResult};
use crate::mesh::PartitionMesh;
use crate::partition::Partition;
use crate::validator::ConflictRegion;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Ergebnis eines Reparaturlaufs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairSummary {
    pub method: RepairMethod,
    /// Regionen vor der Reparatur
    pub initial_regions: usize,
    /// Vom gewählten Verfahren entschiedene Regionen
    pub resolved_by_method: usize,
    /// Von RandomNeighbour nachträglich aufgelöste Regionen
    pub resolved_by_fallback: usize,
    pub fallback_passes: usize,
    /// Von EdgeMatching eingefügte Teilkanten
    pub split_edges: usize,
    pub changed_triangles: usize,
}

/// Treiber der Reparatur.
///
/// Ein Durchgang des gewählten Verfahrens über alle Regionen, danach
/// RandomNeighbour, solange noch Konflikte bestehen und Fortschritt möglich ist.
pub struct RepairEngine {
    config: RepairConfig,
}

impl RepairEngine {
    /// Prüft die Konfiguration; fehlt eine Prioritätsliste, wird nichts verändert.
    pub fn new(config: RepairConfig) -> PartitionResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RepairConfig {
        &self.config
    }

    pub fn run(&self, partition: &mut Partition) -> PartitionResult<RepairSummary> {
        let method = self.config.method;
        let mut summary = RepairSummary {
            method,
            ..RepairSummary::default()
        };

        let mut classification = partition.classify();
        summary.initial_regions = classification.regions.len();
        if classification.is_valid {
            info!("Partition is already valid, nothing to repair");
            return Ok(summary);
        }
        info!(
            "Repairing {} conflict region(s) ({} triangles) with {} [{}]",
            summary.initial_regions,
            classification.conflicted_triangles(),
            method,
            method.short_name()
        );

        if method == RepairMethod::EdgeMatching {
            if let Some(distance) = self.config.split_distance() {
                let segments = {
                    let ctx = RepairContext::new(partition.mesh(), partition.catalog());
                    EdgeMatching::plan_splits(&ctx, &classification.regions, distance)
                };
                if !segments.is_empty() {
                    summary.split_edges = partition.insert_split_constraints(&segments)?;
                    classification = partition.classify();
                }
            }
        }

        let resolver = self.resolver();
        let (resolved, changed) = self.pass(resolver.as_ref(), partition, &classification.regions);
        summary.resolved_by_method = resolved;
        summary.changed_triangles += changed;
        info!(
            "{} resolved {} of {} region(s)",
            resolver.name(),
            resolved,
            classification.regions.len()
        );

        let fallback = RandomNeighbour::new(self.config.seed);
        loop {
            let remaining = partition.classify();
            if remaining.is_valid {
                break;
            }
            let (resolved, changed) = self.pass(&fallback, partition, &remaining.regions);
            summary.fallback_passes += 1;
            if changed == 0 {
                return Err(PartitionError::RepairIncomplete {
                    remaining_regions: remaining.regions.len(),
                });
            }
            summary.resolved_by_fallback += resolved;
            summary.changed_triangles += changed;
            debug!(
                "Fallback pass {} resolved {} region(s)",
                summary.fallback_passes, resolved
            );
        }

        info!(
            "Repair finished: {} triangle(s) relabelled, {} fallback pass(es)",
            summary.changed_triangles, summary.fallback_passes
        );
        Ok(summary)
    }

    fn resolver(&self) -> Box<dyn RegionResolver> {
        let ranking = self.config.priority.clone().unwrap_or_default();
        match self.config.method {
            RepairMethod::RandomNeighbour => Box::new(RandomNeighbour::new(self.config.seed)),
            RepairMethod::LongestBoundary => Box::new(LongestBoundary),
            RepairMethod::PriorityList => Box::new(PriorityList::new(ranking)),
            RepairMethod::EdgeMatching => Box::new(EdgeMatching::new(ranking)),
        }
    }

    /// Entscheidet alle Regionen auf dem aktuellen Stand und schreibt danach.
    fn pass(
        &self,
        resolver: &dyn RegionResolver,
        partition: &mut Partition,
        regions: &[ConflictRegion],
    ) -> (usize, usize) {
        let decisions: Vec<Resolution> = {
            let ctx = RepairContext::new(partition.mesh(), partition.catalog());
            if self.config.parallel {
                regions
                    .par_iter()
                    .map(|region| resolver.resolve(&ctx, region))
                    .collect()
            } else {
                regions
                    .iter()
                    .map(|region| resolver.resolve(&ctx, region))
                    .collect()
            }
        };
        apply(partition.mesh_mut(), regions, decisions)
    }
}

/// Schreibt die Entscheidungen; liefert (entschiedene Regionen, geänderte Dreiecke).
fn apply(
    mesh: &mut PartitionMesh,
    regions: &[ConflictRegion],
    decisions: Vec<Resolution>,
) -> (usize, usize) {
    let mut resolved = 0;
    let mut changed = 0;
    for (region, decision) in regions.iter().zip(decisions) {
        match decision {
            Resolution::Whole(label) => {
                for &id in &region.triangles {
                    mesh.triangle_mut(id).labels.assign(label);
                }
                changed += region.len();
                resolved += 1;
                debug!("Region {} ({}) assigned to {}", region.id, region.kind, label);
            }
            Resolution::PerTriangle(assignments) if !assignments.is_empty() => {
                // Teilweise beschriftete Regionen zählen erst im nächsten Durchgang
                if assignments.len() == region.len() {
                    resolved += 1;
                }
                changed += assignments.len();
                for (id, label) in assignments {
                    mesh.triangle_mut(id).labels.assign(label);
                }
            }
            Resolution::PerTriangle(_) | Resolution::Tie => {
                debug!("Region {} ({}) left as tie", region.id, region.kind);
            }
        }
    }
    (resolved, changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{BuildConfig, Dataset, PartitionBuilder, PolygonId};
    use geo::polygon;

    fn overlap_strip() -> Partition {
        PartitionBuilder::new(BuildConfig::default())
            .add_dataset(Dataset::new("a").with_polygon(
                polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)],
            ))
            .add_dataset(Dataset::new("b").with_polygon(
                polygon![(x: 0.9, y: 0.0), (x: 1.9, y: 0.0), (x: 1.9, y: 1.0), (x: 0.9, y: 1.0)],
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn test_partial_assignment_is_not_counted_as_resolved() {
        let mut partition = overlap_strip();
        let regions = partition.classify().regions;
        assert_eq!(regions.len(), 1);
        let region = &regions[0];
        assert!(region.len() >= 2);
        let a = PolygonId::new(0, 0);

        let partial = Resolution::PerTriangle(vec![(region.triangles[0], a)]);
        let (resolved, changed) = apply(partition.mesh_mut(), &regions, vec![partial]);
        assert_eq!((resolved, changed), (0, 1));

        let full = Resolution::PerTriangle(region.triangles.iter().map(|&id| (id, a)).collect());
        let (resolved, changed) = apply(partition.mesh_mut(), &regions, vec![full]);
        assert_eq!((resolved, changed), (1, region.len()));
        assert!(partition.is_valid());
    }

    #[test]
    fn test_missing_priority_is_rejected_up_front() {
        let config = RepairConfig::new(RepairMethod::EdgeMatching);
        assert!(matches!(
            RepairEngine::new(config),
            Err(PartitionError::MissingPriorityInput { .. })
        ));
    }
}
