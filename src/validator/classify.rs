// src/validator/classify.rs

use super::region::{ConflictRegion, RegionKind};
use crate::mesh::{PartitionMesh, TriangleId};
use crate::partition::LabelSet;
use std::collections::VecDeque;
use tracing::debug;

/// Ergebnis einer Prüfung der Triangulation
#[derive(Debug, Clone)]
pub struct Classification {
    pub is_valid: bool,
    pub regions: Vec<ConflictRegion>,
}

impl Classification {
    pub fn gaps(&self) -> impl Iterator<Item = &ConflictRegion> {
        self.regions_of(RegionKind::Gap)
    }

    pub fn overlaps(&self) -> impl Iterator<Item = &ConflictRegion> {
        self.regions_of(RegionKind::Overlap)
    }

    pub fn regions_of(&self, kind: RegionKind) -> impl Iterator<Item = &ConflictRegion> {
        self.regions.iter().filter(move |r| r.kind == kind)
    }

    /// Gesamtfläche aller Konfliktregionen.
    pub fn conflicted_area(&self) -> f64 {
        self.regions.iter().map(|r| r.area).sum()
    }

    /// Anzahl der Konfliktdreiecke über alle Regionen.
    pub fn conflicted_triangles(&self) -> usize {
        self.regions.iter().map(ConflictRegion::len).sum()
    }
}

/// Klassifiziert alle Dreiecke und gruppiert Konfliktdreiecke zu Regionen.
///
/// Die Flutfüllung überschreitet nur Kanten ohne Zwangsbedingung. Regionen
/// werden in der Reihenfolge ihres kleinsten Dreiecksindex nummeriert.
pub fn classify(mesh: &PartitionMesh) -> Classification {
    let mut visited = vec![false; mesh.len()];
    let mut regions = Vec::new();

    for start in 0..mesh.len() {
        if visited[start] || !mesh.triangle(start).is_conflicted() {
            continue;
        }
        let triangles = flood_region(mesh, start, &mut visited);
        regions.push(build_region(mesh, regions.len(), triangles));
    }

    debug!(
        "Classification found {} conflict region(s) in {} triangles",
        regions.len(),
        mesh.len()
    );
    Classification {
        is_valid: regions.is_empty(),
        regions,
    }
}

fn flood_region(mesh: &PartitionMesh, start: TriangleId, visited: &mut [bool]) -> Vec<TriangleId> {
    visited[start] = true;
    let mut members = vec![start];
    let mut queue = VecDeque::from([start]);

    while let Some(id) = queue.pop_front() {
        let triangle = mesh.triangle(id);
        for edge in 0..3 {
            if triangle.constrained[edge] {
                continue;
            }
            let Some(neighbor) = triangle.neighbors[edge] else {
                continue;
            };
            if !visited[neighbor] && mesh.triangle(neighbor).is_conflicted() {
                visited[neighbor] = true;
                members.push(neighbor);
                queue.push_back(neighbor);
            }
        }
    }
    members.sort_unstable();
    members
}

fn build_region(mesh: &PartitionMesh, id: usize, triangles: Vec<TriangleId>) -> ConflictRegion {
    let mut candidates = LabelSet::new();
    let mut has_gap = false;
    let mut has_overlap = false;
    let mut area = 0.0;

    for &t in &triangles {
        let labels = &mesh.triangle(t).labels;
        if labels.is_empty() {
            has_gap = true;
        } else {
            has_overlap = true;
            candidates.extend(labels);
        }
        area += mesh.area(t);
    }

    let kind = match (has_gap, has_overlap) {
        (true, false) => RegionKind::Gap,
        (false, true) => RegionKind::Overlap,
        _ => RegionKind::Mixed,
    };

    ConflictRegion {
        id,
        kind,
        triangles,
        area,
        candidates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::CdtAdapter;
    use crate::partition::PolygonId;
    use approx::assert_relative_eq;
    use geo::Coord;

    /// Streifen aus drei Einheitsquadraten ohne innere Zwangskanten
    fn strip_mesh() -> PartitionMesh {
        let mut adapter = CdtAdapter::new();
        for x in [1.0, 2.0] {
            adapter.insert_vertex(Coord { x, y: 0.0 }).unwrap();
            adapter.insert_vertex(Coord { x, y: 1.0 }).unwrap();
        }
        adapter
            .insert_ring(&[
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 3.0, y: 0.0 },
                Coord { x: 3.0, y: 1.0 },
                Coord { x: 0.0, y: 1.0 },
            ])
            .unwrap();
        PartitionMesh::from_faces(adapter.vertex_positions(), &adapter.faces())
    }

    fn label_by_x(mesh: &mut PartitionMesh, label: impl Fn(f64) -> LabelSet) {
        for id in 0..mesh.len() {
            let x = mesh.centroid(id).x;
            mesh.triangle_mut(id).labels = label(x);
        }
    }

    #[test]
    fn test_clean_mesh_is_valid() {
        let mut mesh = strip_mesh();
        label_by_x(&mut mesh, |_| LabelSet::single(PolygonId::new(0, 0)));
        let result = classify(&mesh);
        assert!(result.is_valid);
        assert!(result.regions.is_empty());
    }

    #[test]
    fn test_gap_and_overlap_are_separate_when_clean_between() {
        let a = PolygonId::new(0, 0);
        let b = PolygonId::new(1, 0);
        let mut mesh = strip_mesh();
        label_by_x(&mut mesh, |x| {
            if x < 1.0 {
                LabelSet::new()
            } else if x < 2.0 {
                LabelSet::single(a)
            } else {
                [a, b].into_iter().collect()
            }
        });
        let result = classify(&mesh);
        assert!(!result.is_valid);
        assert_eq!(result.regions.len(), 2);
        assert_eq!(result.gaps().count(), 1);
        assert_eq!(result.overlaps().count(), 1);
        let overlap = result.overlaps().next().unwrap();
        assert_relative_eq!(overlap.area, 1.0, epsilon = 1e-12);
        assert_eq!(overlap.candidates.as_slice(), &[a, b]);
    }

    #[test]
    fn test_adjacent_gap_and_overlap_form_mixed_region() {
        let a = PolygonId::new(0, 0);
        let b = PolygonId::new(1, 0);
        let mut mesh = strip_mesh();
        label_by_x(&mut mesh, |x| {
            if x < 1.0 {
                LabelSet::new()
            } else if x < 2.0 {
                [a, b].into_iter().collect()
            } else {
                LabelSet::single(b)
            }
        });
        let result = classify(&mesh);
        assert_eq!(result.regions.len(), 1);
        assert_eq!(result.regions[0].kind, RegionKind::Mixed);
        assert_relative_eq!(result.conflicted_area(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_exterior_triangles_are_ignored() {
        let mut mesh = strip_mesh();
        label_by_x(&mut mesh, |_| LabelSet::new());
        for id in 0..mesh.len() {
            mesh.triangle_mut(id).exterior = true;
        }
        assert!(classify(&mesh).is_valid);
    }
}
