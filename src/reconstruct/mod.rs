// src/reconstruct/mod.rs

pub mod rings;

use crate::error::{PartitionError, PartitionResult};
use crate::mesh::{PartitionMesh, TriangleId};
use crate::partition::{PolygonCatalog, PolygonId};
use geo::{Area, MultiPolygon};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Ein Eingabepolygon nach der Reparatur.
///
/// Kann leer sein, wenn die Reparatur seine gesamte Fläche anderen Polygonen
/// zugesprochen hat, oder aus mehreren Teilen bestehen.
#[derive(Debug, Clone)]
pub struct RepairedPolygon {
    pub id: PolygonId,
    pub dataset_name: String,
    pub attribute: Option<String>,
    pub geometry: MultiPolygon<f64>,
}

impl RepairedPolygon {
    pub fn is_empty(&self) -> bool {
        self.geometry.0.is_empty()
    }

    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }
}

/// Alle rekonstruierten Polygone, in Id-Reihenfolge.
#[derive(Debug, Clone, Default)]
pub struct Reconstruction {
    polygons: Vec<RepairedPolygon>,
}

impl Reconstruction {
    pub fn polygons(&self) -> &[RepairedPolygon] {
        &self.polygons
    }

    pub fn get(&self, id: PolygonId) -> Option<&RepairedPolygon> {
        self.polygons
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|index| &self.polygons[index])
    }

    /// Polygone eines Datensatzes, zum Schreiben je Ausgabedatei.
    pub fn for_dataset(&self, dataset: usize) -> impl Iterator<Item = &RepairedPolygon> {
        self.polygons.iter().filter(move |p| p.id.dataset == dataset)
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn total_area(&self) -> f64 {
        self.polygons.iter().map(RepairedPolygon::area).sum()
    }
}

/// Setzt aus den beschrifteten Dreiecken wieder Polygone zusammen.
pub fn reconstruct(
    mesh: &PartitionMesh,
    catalog: &PolygonCatalog,
) -> PartitionResult<Reconstruction> {
    let mut groups: BTreeMap<PolygonId, Vec<TriangleId>> = BTreeMap::new();
    let mut conflicted = 0;
    for (id, triangle) in mesh.triangles().iter().enumerate() {
        if triangle.exterior {
            continue;
        }
        match triangle.owner() {
            Some(owner) => groups.entry(owner).or_default().push(id),
            None => conflicted += 1,
        }
    }
    if conflicted > 0 {
        warn!(
            "{} conflicted triangle(s) are not part of any reconstructed polygon",
            conflicted
        );
    }

    let mut polygons = Vec::with_capacity(catalog.len());
    for input in catalog.polygons() {
        let members = groups.remove(&input.id).unwrap_or_default();
        let parts = rings::trace_polygons(mesh, &members).map_err(|e| {
            PartitionError::DegenerateReconstruction {
                polygon: input.id,
                reason: e.to_string(),
            }
        })?;
        polygons.push(RepairedPolygon {
            id: input.id,
            dataset_name: input.dataset_name.clone(),
            attribute: input.attribute.clone(),
            geometry: MultiPolygon::new(parts),
        });
    }

    if let Some(unknown) = groups.keys().next() {
        return Err(PartitionError::DegenerateReconstruction {
            polygon: *unknown,
            reason: "label does not belong to any input polygon".to_string(),
        });
    }

    info!(
        "Reconstructed {} polygon(s), {} of them empty",
        polygons.len(),
        polygons.iter().filter(|p| p.is_empty()).count()
    );
    Ok(Reconstruction { polygons })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{BuildConfig, Dataset, PartitionBuilder};
    use approx::assert_relative_eq;
    use geo::polygon;

    #[test]
    fn test_polygon_with_hole_survives() {
        let shell = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 1.0, y: 3.0), (x: 3.0, y: 3.0), (x: 3.0, y: 1.0)]],
        );
        let inner = polygon![(x: 1.0, y: 1.0), (x: 3.0, y: 1.0), (x: 3.0, y: 3.0), (x: 1.0, y: 3.0)];
        let partition = PartitionBuilder::new(BuildConfig::default())
            .add_dataset(Dataset::new("a").with_attributed_polygon(shell, "shell"))
            .add_dataset(Dataset::new("b").with_polygon(inner))
            .build()
            .unwrap();
        let result = partition.reconstruct().unwrap();
        assert_eq!(result.len(), 2);

        let shell = result.get(PolygonId::new(0, 0)).unwrap();
        assert_eq!(shell.attribute.as_deref(), Some("shell"));
        assert_eq!(shell.geometry.0.len(), 1);
        assert_eq!(shell.geometry.0[0].interiors().len(), 1);
        assert_relative_eq!(shell.area(), 12.0, epsilon = 1e-9);
        assert_eq!(result.for_dataset(1).count(), 1);
        assert_relative_eq!(result.total_area(), 16.0, epsilon = 1e-9);
    }
}
