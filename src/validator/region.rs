// src/validator/region.rs

use crate::mesh::{PartitionMesh, TriangleId};
use crate::partition::LabelSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Art einer Konfliktregion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    /// Alle Dreiecke ohne Label
    Gap,
    /// Alle Dreiecke mit mindestens zwei Labels
    Overlap,
    /// Lücke und Überlappung grenzen ohne sauberes Dreieck dazwischen aneinander
    Mixed,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegionKind::Gap => "gap",
            RegionKind::Overlap => "overlap",
            RegionKind::Mixed => "mixed",
        };
        f.write_str(name)
    }
}

/// Eine Kante auf dem Rand einer Region, von innen gesehen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionEdge {
    /// Dreieck innerhalb der Region
    pub triangle: TriangleId,
    /// Kantenindex im Dreieck
    pub edge: usize,
    /// Dreieck jenseits der Kante; `None` am Rand der Triangulation
    pub outside: Option<TriangleId>,
    pub length: f64,
}

/// Maximale zusammenhängende Menge von Konfliktdreiecken.
///
/// Wird nach jeder Änderung der Labels neu berechnet.
#[derive(Debug, Clone)]
pub struct ConflictRegion {
    pub id: usize,
    pub kind: RegionKind,
    /// Aufsteigend sortiert
    pub triangles: Vec<TriangleId>,
    pub area: f64,
    /// Vereinigung der Labelmengen aller Mitglieder
    pub candidates: LabelSet,
}

impl ConflictRegion {
    pub fn contains(&self, triangle: TriangleId) -> bool {
        self.triangles.binary_search(&triangle).is_ok()
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Alle Kanten, deren Gegenseite nicht zur Region gehört.
    ///
    /// Betrachtet jede Kante, auch Zwangskanten: eine Region grenzt über eine
    /// Polygonkante hinweg an ihre Nachbarn.
    pub fn boundary(&self, mesh: &PartitionMesh) -> Vec<RegionEdge> {
        let mut edges = Vec::new();
        for &id in &self.triangles {
            let triangle = mesh.triangle(id);
            for edge in 0..3 {
                let outside = triangle.neighbors[edge];
                if outside.is_some_and(|n| self.contains(n)) {
                    continue;
                }
                edges.push(RegionEdge {
                    triangle: id,
                    edge,
                    outside,
                    length: mesh.edge_length(id, edge),
                });
            }
        }
        edges
    }

    /// Labels der sauberen Dreiecke, die an die Region grenzen.
    pub fn bordering_labels(&self, mesh: &PartitionMesh) -> LabelSet {
        self.boundary(mesh)
            .iter()
            .filter_map(|e| e.outside)
            .filter_map(|n| mesh.triangle(n).owner())
            .collect()
    }
}
