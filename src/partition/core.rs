// src/partition/core.rs

use super::builder::{label_triangles, mark_exterior};
use super::catalog::PolygonCatalog;
use crate::error::PartitionResult;
use crate::mesh::{CdtAdapter, EdgeKey, PartitionMesh};
use crate::reconstruct::{self, Reconstruction};
use crate::repair::{RepairConfig, RepairEngine, RepairSummary};
use crate::validator::{self, Classification, ProblemReport, ReportConfig, TriangulationStats};
use geo::{Coord, Polygon};
use std::collections::HashSet;
use tracing::debug;

/// Die beschriftete Triangulation aller Eingabepolygone.
///
/// Besitzt die Triangulation exklusiv; nach dem Aufbau ändern sich nur noch
/// die Labels der Dreiecke (und bei EdgeMatching neue Zwangskanten).
pub struct Partition {
    catalog: PolygonCatalog,
    extent: Option<Polygon<f64>>,
    adapter: CdtAdapter,
    mesh: PartitionMesh,
    split_edges: HashSet<EdgeKey>,
}

impl Partition {
    pub(crate) fn assemble(
        catalog: PolygonCatalog,
        extent: Option<Polygon<f64>>,
        adapter: CdtAdapter,
    ) -> Self {
        let mut partition = Self {
            catalog,
            extent,
            adapter,
            mesh: PartitionMesh::default(),
            split_edges: HashSet::new(),
        };
        partition.mesh = partition.labelled_mesh();
        partition
    }

    pub fn catalog(&self) -> &PolygonCatalog {
        &self.catalog
    }

    pub fn extent(&self) -> Option<&Polygon<f64>> {
        self.extent.as_ref()
    }

    pub fn mesh(&self) -> &PartitionMesh {
        &self.mesh
    }

    pub(crate) fn mesh_mut(&mut self) -> &mut PartitionMesh {
        &mut self.mesh
    }

    pub(crate) fn adapter(&self) -> &CdtAdapter {
        &self.adapter
    }

    /// Klassifiziert alle Dreiecke und bildet die Konfliktregionen.
    pub fn classify(&self) -> Classification {
        validator::classify(&self.mesh)
    }

    pub fn is_valid(&self) -> bool {
        self.classify().is_valid
    }

    pub fn stats(&self) -> TriangulationStats {
        TriangulationStats::collect(&self.mesh, self.adapter.num_vertices())
    }

    pub fn problem_report(&self, config: &ReportConfig) -> PartitionResult<ProblemReport> {
        config.validate()?;
        Ok(ProblemReport::new(&self.mesh, &self.classify(), config))
    }

    /// Repariert alle Konfliktregionen mit der gewählten Methode.
    pub fn repair(&mut self, config: &RepairConfig) -> PartitionResult<RepairSummary> {
        RepairEngine::new(config.clone())?.run(self)
    }

    /// Setzt aus den beschrifteten Dreiecken wieder Polygone zusammen.
    pub fn reconstruct(&self) -> PartitionResult<Reconstruction> {
        reconstruct::reconstruct(&self.mesh, &self.catalog)
    }

    /// Fügt Teilungs-Zwangskanten ein und baut die Arena neu auf.
    ///
    /// Bereits veränderte Labels werden über die Lage der Schwerpunkte auf die
    /// neuen Dreiecke übertragen.
    pub(crate) fn insert_split_constraints(
        &mut self,
        segments: &[(Coord<f64>, Coord<f64>)],
    ) -> PartitionResult<usize> {
        let mut inserted = 0;
        for &(from, to) in segments {
            let edges = self.adapter.insert_segment(from, to)?;
            inserted += edges.len();
            self.split_edges.extend(edges);
        }

        let previous = std::mem::take(&mut self.mesh);
        let mut mesh = self.labelled_mesh();
        carry_over_labels(&previous, &mut mesh);
        self.mesh = mesh;
        debug!(
            "Inserted {} split constraint edge(s), mesh now has {} triangles",
            inserted,
            self.mesh.len()
        );
        Ok(inserted)
    }

    fn labelled_mesh(&self) -> PartitionMesh {
        let mut mesh =
            PartitionMesh::from_faces(self.adapter.vertex_positions(), &self.adapter.faces());
        label_triangles(&mut mesh, &self.catalog);
        mark_exterior(&mut mesh, self.extent.as_ref());
        mesh.set_split_edges(self.split_edges.clone());
        mesh
    }
}

/// Überträgt reparierte Labels der alten Arena auf die Dreiecke der neuen.
fn carry_over_labels(previous: &PartitionMesh, mesh: &mut PartitionMesh) {
    let changed: Vec<usize> = (0..previous.len())
        .filter(|&id| {
            let t = previous.triangle(id);
            t.labels != t.original
        })
        .collect();
    if changed.is_empty() {
        return;
    }

    for id in 0..mesh.len() {
        let centroid = mesh.centroid(id);
        let source = changed
            .iter()
            .copied()
            .find(|&old| previous.contains_point(old, centroid));
        if let Some(old) = source {
            mesh.triangle_mut(id).labels = previous.triangle(old).labels.clone();
        }
    }
}
