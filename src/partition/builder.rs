// src/partition/builder.rs

use super::catalog::PolygonCatalog;
use super::config::BuildConfig;
use super::core::Partition;
use super::input::{Dataset, InputPolygon, PolygonId, round_coordinates};
use super::validation::{PolygonValidator, ring_vertices};
use crate::error::{PartitionError, PartitionResult};
use crate::mesh::{CdtAdapter, PartitionMesh};
use geo::{BoundingRect, Contains, Coord, Point, Polygon, Rect};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Baut aus mehreren Datensätzen eine gemeinsame, beschriftete Triangulation.
///
/// Jeder Ring jedes Polygons wird als Zwangskante eingefügt; danach erhält
/// jedes Dreieck per Punkt-in-Polygon-Test seines Schwerpunkts die Menge der
/// Polygone, die es überdecken.
pub struct PartitionBuilder {
    config: BuildConfig,
    datasets: Vec<Dataset>,
    extent: Option<Polygon<f64>>,
}

impl PartitionBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            datasets: Vec::new(),
            extent: None,
        }
    }

    pub fn add_dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }

    /// Setzt das Betrachtungsgebiet (ein Polygon mit genau einem Ring).
    pub fn with_extent(mut self, extent: Polygon<f64>) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn build(self) -> PartitionResult<Partition> {
        self.config.validate()?;
        if self.config.skip_individual_validation {
            warn!("Individual polygon validation is skipped; invalid input may produce garbage labels");
        }

        let catalog = self.load_polygons()?;
        let extent = self.prepare_extent()?;

        let mut adapter = CdtAdapter::new();
        for polygon in catalog.polygons() {
            for ring in std::iter::once(polygon.geometry.exterior())
                .chain(polygon.geometry.interiors().iter())
            {
                let vertices = ring_vertices(ring);
                if vertices.len() < 2 {
                    debug!("Skipping degenerate ring of polygon {}", polygon.id);
                    continue;
                }
                adapter.insert_ring(&vertices)?;
            }
        }
        if let Some(extent) = &extent {
            adapter.insert_ring(&ring_vertices(extent.exterior()))?;
        }

        let partition = Partition::assemble(catalog, extent, adapter);
        info!(
            "Partition built: {} polygons, {} vertices, {} triangles",
            partition.catalog().len(),
            partition.adapter().num_vertices(),
            partition.mesh().len()
        );
        Ok(partition)
    }

    fn load_polygons(&self) -> PartitionResult<PolygonCatalog> {
        let validator = PolygonValidator::new();
        let mut polygons = Vec::new();

        for (dataset_index, dataset) in self.datasets.iter().enumerate() {
            for (polygon_index, feature) in dataset.features.iter().enumerate() {
                let id = PolygonId::new(dataset_index, polygon_index);
                let mut geometry = feature.geometry.clone();
                if let Some(exponent) = self.config.rounding {
                    round_coordinates(&mut geometry, exponent);
                }

                if !self.config.skip_individual_validation {
                    let result = validator.validate(&geometry);
                    if let Some(error) = result.errors.first() {
                        return Err(PartitionError::InvalidInputGeometry {
                            polygon: id,
                            reason: error.to_string(),
                        });
                    }
                }

                polygons.push(InputPolygon {
                    id,
                    bounds: geometry.bounding_rect(),
                    geometry,
                    attribute: feature.attribute.clone(),
                    dataset_name: dataset.name.clone(),
                });
            }
        }

        let names = self.datasets.iter().map(|d| d.name.clone()).collect();
        Ok(PolygonCatalog::new(names, polygons))
    }

    fn prepare_extent(&self) -> PartitionResult<Option<Polygon<f64>>> {
        let Some(extent) = &self.extent else {
            return Ok(None);
        };
        if !extent.interiors().is_empty() {
            return Err(PartitionError::InvalidConfiguration {
                message: "Extent polygon must consist of a single ring".to_string(),
            });
        }
        let mut extent = extent.clone();
        if let Some(exponent) = self.config.rounding {
            round_coordinates(&mut extent, exponent);
        }
        let result = PolygonValidator::new().validate(&extent);
        if let Some(error) = result.errors.first() {
            return Err(PartitionError::InvalidConfiguration {
                message: format!("Extent polygon is invalid: {error}"),
            });
        }
        Ok(Some(extent))
    }
}

/// Weist jedem Dreieck die Menge der Polygone zu, die seinen Schwerpunkt enthalten.
pub(crate) fn label_triangles(mesh: &mut PartitionMesh, catalog: &PolygonCatalog) {
    for id in 0..mesh.len() {
        let centroid = mesh.centroid(id);
        let point = Point::from(centroid);
        let triangle = mesh.triangle_mut(id);
        for polygon in catalog.polygons() {
            let inside_bounds = polygon
                .bounds()
                .is_some_and(|rect| rect_contains(&rect, centroid));
            if inside_bounds && polygon.geometry.contains(&point) {
                triangle.labels.insert(polygon.id);
            }
        }
        triangle.original = triangle.labels.clone();
    }
}

/// Markiert Dreiecke außerhalb des Betrachtungsgebiets.
///
/// Mit Extent: alles außerhalb des Extent-Polygons. Ohne Extent: alle
/// label-losen Dreiecke, die über label-lose Dreiecke mit der konvexen Hülle
/// verbunden sind.
pub(crate) fn mark_exterior(mesh: &mut PartitionMesh, extent: Option<&Polygon<f64>>) {
    if let Some(extent) = extent {
        for id in 0..mesh.len() {
            let centroid = Point::from(mesh.centroid(id));
            mesh.triangle_mut(id).exterior = !extent.contains(&centroid);
        }
        return;
    }

    let mut queue: VecDeque<usize> = (0..mesh.len())
        .filter(|&id| {
            let t = mesh.triangle(id);
            t.labels.is_empty() && t.neighbors.iter().any(Option::is_none)
        })
        .collect();
    for &id in &queue {
        mesh.triangle_mut(id).exterior = true;
    }
    while let Some(id) = queue.pop_front() {
        let neighbors = mesh.triangle(id).neighbors;
        for neighbor in neighbors.into_iter().flatten() {
            let n = mesh.triangle(neighbor);
            if !n.exterior && n.labels.is_empty() {
                mesh.triangle_mut(neighbor).exterior = true;
                queue.push_back(neighbor);
            }
        }
    }
}

fn rect_contains(rect: &Rect<f64>, c: Coord<f64>) -> bool {
    let min = rect.min();
    let max = rect.max();
    c.x >= min.x && c.x <= max.x && c.y >= min.y && c.y <= max.y
}
