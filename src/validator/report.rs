// src/validator/report.rs

use super::classify::Classification;
use super::region::RegionKind;
use crate::error::{PartitionError, PartitionResult};
use crate::mesh::PartitionMesh;
use crate::partition::PolygonId;
use crate::reconstruct::rings::trace_polygons;
use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::io::Write;
use tracing::warn;

/// Einstellungen für den Problemreport
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Lücken mit kleinerer Fläche werden nicht gemeldet (Sliver-Filter).
    pub min_gap_area: Option<f64>,
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_gap_area(mut self, area: f64) -> Self {
        self.min_gap_area = Some(area);
        self
    }

    pub fn validate(&self) -> PartitionResult<()> {
        if let Some(area) = self.min_gap_area {
            if !area.is_finite() || area < 0.0 {
                return Err(PartitionError::InvalidConfiguration {
                    message: format!("min_gap_area must be a non-negative number, got {area}"),
                });
            }
        }
        Ok(())
    }

    fn reports(&self, kind: RegionKind, area: f64) -> bool {
        match (kind, self.min_gap_area) {
            (RegionKind::Gap, Some(threshold)) => area >= threshold,
            _ => true,
        }
    }
}

/// Eine gemeldete Konfliktregion samt Umriss.
#[derive(Debug, Clone)]
pub struct ProblemRegion {
    pub id: usize,
    pub kind: RegionKind,
    pub area: f64,
    pub triangle_count: usize,
    pub candidates: Vec<PolygonId>,
    pub outline: MultiPolygon<f64>,
}

/// Problemregionen einer Partition, wie sie ein Export-Adapter schreibt.
#[derive(Debug, Clone, Default)]
pub struct ProblemReport {
    pub regions: Vec<ProblemRegion>,
    /// Anzahl der Lücken, die der Sliver-Filter ausgeblendet hat
    pub filtered_gaps: usize,
    pairs: Vec<(PolygonId, PolygonId)>,
}

impl ProblemReport {
    pub fn new(mesh: &PartitionMesh, classification: &Classification, config: &ReportConfig) -> Self {
        let mut report = Self::default();

        for region in &classification.regions {
            if !config.reports(region.kind, region.area) {
                report.filtered_gaps += 1;
                continue;
            }
            let outline = match trace_polygons(mesh, &region.triangles) {
                Ok(polygons) => MultiPolygon::new(polygons),
                Err(e) => {
                    warn!("Could not trace outline of region {}: {}", region.id, e);
                    MultiPolygon::new(Vec::new())
                }
            };
            report.regions.push(ProblemRegion {
                id: region.id,
                kind: region.kind,
                area: region.area,
                triangle_count: region.len(),
                candidates: region.candidates.as_slice().to_vec(),
                outline,
            });
        }

        report.pairs = collect_overlapping_pairs(mesh);
        report
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Alle Paare von Polygonen, die sich irgendwo überlappen, sortiert und eindeutig.
    pub fn overlapping_pairs(&self) -> &[(PolygonId, PolygonId)] {
        &self.pairs
    }

    /// Schreibt die überlappenden Paare als CSV.
    pub fn write_overlap_csv<W: Write>(&self, mut writer: W) -> PartitionResult<()> {
        writeln!(writer, "dataset_a,polygon_a,dataset_b,polygon_b")?;
        for (a, b) in &self.pairs {
            writeln!(writer, "{},{},{},{}", a.dataset, a.polygon, b.dataset, b.polygon)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Paare aus den ursprünglichen Labelmengen, damit der Report auch nach der
/// Reparatur noch die Überlappungen der Eingabe nennt.
fn collect_overlapping_pairs(mesh: &PartitionMesh) -> Vec<(PolygonId, PolygonId)> {
    let mut pairs = BTreeSet::new();
    for triangle in mesh.triangles() {
        if triangle.exterior || triangle.original.len() < 2 {
            continue;
        }
        let labels = triangle.original.as_slice();
        for (i, &a) in labels.iter().enumerate() {
            for &b in &labels[i + 1..] {
                pairs.insert((a, b));
            }
        }
    }
    pairs.into_iter().collect()
}

/// Kennzahlen der Triangulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangulationStats {
    pub vertices: usize,
    pub triangles: usize,
    pub clean: usize,
    pub gaps: usize,
    pub overlaps: usize,
    pub exterior: usize,
    pub gap_regions: usize,
    pub overlap_regions: usize,
    pub mixed_regions: usize,
}

impl TriangulationStats {
    pub fn collect(mesh: &PartitionMesh, vertices: usize) -> Self {
        let mut stats = Self {
            vertices,
            triangles: mesh.len(),
            ..Self::default()
        };
        for triangle in mesh.triangles() {
            if triangle.exterior {
                stats.exterior += 1;
            } else {
                match triangle.labels.len() {
                    0 => stats.gaps += 1,
                    1 => stats.clean += 1,
                    _ => stats.overlaps += 1,
                }
            }
        }
        for region in super::classify(mesh).regions {
            match region.kind {
                RegionKind::Gap => stats.gap_regions += 1,
                RegionKind::Overlap => stats.overlap_regions += 1,
                RegionKind::Mixed => stats.mixed_regions += 1,
            }
        }
        stats
    }
}

impl fmt::Display for TriangulationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vertices:  {}", self.vertices)?;
        writeln!(f, "Triangles: {}", self.triangles)?;
        writeln!(f, "  clean:    {}", self.clean)?;
        writeln!(f, "  gaps:     {}", self.gaps)?;
        writeln!(f, "  overlaps: {}", self.overlaps)?;
        writeln!(f, "  exterior: {}", self.exterior)?;
        write!(
            f,
            "Regions: {} gap, {} overlap, {} mixed",
            self.gap_regions, self.overlap_regions, self.mixed_regions
        )
    }
}
