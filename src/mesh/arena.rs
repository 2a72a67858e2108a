// src/mesh/arena.rs

use super::adapter::{EdgeKey, RawFace};
use crate::partition::{LabelSet, PolygonId};
use crate::utils::planar;
use geo::Coord;
use std::collections::{HashMap, HashSet};

/// Stabiler Index eines Dreiecks in der Arena
pub type TriangleId = usize;

/// Ein Dreieck der Partition.
///
/// Kante `i` verläuft von `vertices[i]` nach `vertices[(i + 1) % 3]`;
/// `neighbors[i]` liegt jenseits dieser Kante (über jede Kante, auch über
/// Zwangskanten), `constrained[i]` markiert Zwangskanten.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [usize; 3],
    pub neighbors: [Option<TriangleId>; 3],
    pub constrained: [bool; 3],
    /// Aktuelle Kandidatenmenge (wird durch die Reparatur auf ein Label reduziert)
    pub labels: LabelSet,
    /// Kandidatenmenge direkt nach dem Aufbau
    pub original: LabelSet,
    /// Liegt außerhalb des Betrachtungsgebiets (kein Gap, kein Overlap)
    pub exterior: bool,
}

impl Triangle {
    /// Innerhalb des Gebiets und genau ein Label.
    pub fn is_resolved(&self) -> bool {
        !self.exterior && self.labels.is_clean()
    }

    /// Innerhalb des Gebiets und kein oder mehrere Labels.
    pub fn is_conflicted(&self) -> bool {
        !self.exterior && !self.labels.is_clean()
    }

    /// Das eindeutige Label eines aufgelösten Dreiecks.
    pub fn owner(&self) -> Option<PolygonId> {
        if self.exterior { None } else { self.labels.sole() }
    }
}

/// Arena aller Dreiecke, adressiert über stabile Indizes.
#[derive(Debug, Clone, Default)]
pub struct PartitionMesh {
    positions: Vec<Coord<f64>>,
    triangles: Vec<Triangle>,
    split_edges: HashSet<EdgeKey>,
}

impl PartitionMesh {
    /// Baut die Arena aus den Rohdreiecken des Adapters (alle Labels leer).
    pub fn from_faces(positions: Vec<Coord<f64>>, faces: &[RawFace]) -> Self {
        let id_of: HashMap<usize, TriangleId> = faces
            .iter()
            .enumerate()
            .map(|(id, face)| (face.face_index, id))
            .collect();

        let triangles = faces
            .iter()
            .map(|face| Triangle {
                vertices: face.vertices,
                neighbors: face
                    .neighbors
                    .map(|n| n.and_then(|index| id_of.get(&index).copied())),
                constrained: face.constrained,
                labels: LabelSet::new(),
                original: LabelSet::new(),
                exterior: false,
            })
            .collect();

        Self {
            positions,
            triangles,
            split_edges: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle(&self, id: TriangleId) -> &Triangle {
        &self.triangles[id]
    }

    pub(crate) fn triangle_mut(&mut self, id: TriangleId) -> &mut Triangle {
        &mut self.triangles[id]
    }

    pub fn positions(&self) -> &[Coord<f64>] {
        &self.positions
    }

    pub fn position(&self, vertex: usize) -> Coord<f64> {
        self.positions[vertex]
    }

    pub fn corners(&self, id: TriangleId) -> [Coord<f64>; 3] {
        self.triangles[id].vertices.map(|v| self.positions[v])
    }

    pub fn area(&self, id: TriangleId) -> f64 {
        let [a, b, c] = self.corners(id);
        planar::triangle_area(a, b, c)
    }

    pub fn centroid(&self, id: TriangleId) -> Coord<f64> {
        let [a, b, c] = self.corners(id);
        planar::centroid(a, b, c)
    }

    /// Endpunkte (Vertex-Indizes) der Kante `edge` des Dreiecks `id`.
    pub fn edge_vertices(&self, id: TriangleId, edge: usize) -> (usize, usize) {
        let t = &self.triangles[id];
        (t.vertices[edge], t.vertices[(edge + 1) % 3])
    }

    pub fn edge_key(&self, id: TriangleId, edge: usize) -> EdgeKey {
        let (a, b) = self.edge_vertices(id, edge);
        EdgeKey::new(a, b)
    }

    pub fn edge_length(&self, id: TriangleId, edge: usize) -> f64 {
        let (a, b) = self.edge_vertices(id, edge);
        planar::distance(self.positions[a], self.positions[b])
    }

    /// Kante wurde von EdgeMatching zum Aufteilen einer Region eingefügt.
    pub fn is_split_edge(&self, id: TriangleId, edge: usize) -> bool {
        !self.split_edges.is_empty() && self.split_edges.contains(&self.edge_key(id, edge))
    }

    pub(crate) fn set_split_edges(&mut self, edges: HashSet<EdgeKey>) {
        self.split_edges = edges;
    }

    /// Liegt der Punkt im Dreieck (inklusive Rand)? Dreiecke sind CCW.
    pub fn contains_point(&self, id: TriangleId, point: Coord<f64>) -> bool {
        let [a, b, c] = self.corners(id);
        planar::signed_area_doubled(a, b, point) >= 0.0
            && planar::signed_area_doubled(b, c, point) >= 0.0
            && planar::signed_area_doubled(c, a, point) >= 0.0
    }

    /// Summe der Dreiecksflächen, für die das Prädikat gilt.
    pub fn area_where(&self, predicate: impl Fn(&Triangle) -> bool) -> f64 {
        (0..self.triangles.len())
            .filter(|&id| predicate(&self.triangles[id]))
            .map(|id| self.area(id))
            .sum()
    }

    /// Alle Dreiecke mit genau diesem Label.
    pub fn triangles_of(&self, owner: PolygonId) -> Vec<TriangleId> {
        (0..self.triangles.len())
            .filter(|&id| self.triangles[id].owner() == Some(owner))
            .collect()
    }
}
