// src/partition/catalog.rs

use super::input::{InputPolygon, PolygonId};

/// Alle Eingabepolygone, adressierbar über ihre `PolygonId`.
#[derive(Debug, Clone, Default)]
pub struct PolygonCatalog {
    polygons: Vec<InputPolygon>,
    dataset_names: Vec<String>,
    /// Startindex jedes Datensatzes in `polygons`
    offsets: Vec<usize>,
}

impl PolygonCatalog {
    /// Erwartet die Polygone nach Datensatz gruppiert, in Id-Reihenfolge.
    pub(crate) fn new(dataset_names: Vec<String>, polygons: Vec<InputPolygon>) -> Self {
        let mut offsets = Vec::with_capacity(dataset_names.len());
        let mut next = 0;
        for dataset in 0..dataset_names.len() {
            offsets.push(next);
            next += polygons[next..]
                .iter()
                .take_while(|p| p.id.dataset == dataset)
                .count();
        }
        Self {
            polygons,
            dataset_names,
            offsets,
        }
    }

    pub fn get(&self, id: PolygonId) -> Option<&InputPolygon> {
        let start = *self.offsets.get(id.dataset)?;
        let polygon = self.polygons.get(start + id.polygon)?;
        (polygon.id == id).then_some(polygon)
    }

    pub fn polygons(&self) -> &[InputPolygon] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn dataset_names(&self) -> &[String] {
        &self.dataset_names
    }

    pub fn dataset_name(&self, dataset: usize) -> Option<&str> {
        self.dataset_names.get(dataset).map(String::as_str)
    }

    /// Polygone eines Datensatzes.
    pub fn dataset(&self, dataset: usize) -> &[InputPolygon] {
        let Some(&start) = self.offsets.get(dataset) else {
            return &[];
        };
        let end = self
            .offsets
            .get(dataset + 1)
            .copied()
            .unwrap_or(self.polygons.len());
        &self.polygons[start..end]
    }
}
