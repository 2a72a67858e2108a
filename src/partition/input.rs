// src/partition/input.rs

use geo::{MapCoordsInPlace, Polygon, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiziert ein Eingabepolygon über (Datensatz-Index, Polygon-Index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PolygonId {
    pub dataset: usize,
    pub polygon: usize,
}

impl PolygonId {
    pub fn new(dataset: usize, polygon: usize) -> Self {
        Self { dataset, polygon }
    }
}

impl fmt::Display for PolygonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dataset, self.polygon)
    }
}

/// Ein Polygon eines Datensatzes, bevor es eine `PolygonId` erhält.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Polygon<f64>,
    /// Optionaler Attributwert für PriorityList/EdgeMatching
    pub attribute: Option<String>,
}

/// Ein benannter Datensatz (z.B. eine Datei) mit seinen Polygonen.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub name: String,
    pub features: Vec<Feature>,
}

impl Dataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            features: Vec::new(),
        }
    }

    pub fn with_polygon(mut self, geometry: Polygon<f64>) -> Self {
        self.features.push(Feature {
            geometry,
            attribute: None,
        });
        self
    }

    pub fn with_attributed_polygon(
        mut self,
        geometry: Polygon<f64>,
        attribute: impl Into<String>,
    ) -> Self {
        self.features.push(Feature {
            geometry,
            attribute: Some(attribute.into()),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Unveränderliches Eingabepolygon nach dem Laden.
#[derive(Debug, Clone)]
pub struct InputPolygon {
    pub id: PolygonId,
    pub geometry: Polygon<f64>,
    pub attribute: Option<String>,
    /// Name des Datensatzes, aus dem das Polygon stammt
    pub dataset_name: String,
    pub(crate) bounds: Option<Rect<f64>>,
}

impl InputPolygon {
    /// Achsenparallele Hülle (leer bei degenerierten Polygonen).
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.bounds
    }
}

/// Rundet alle Koordinaten auf ein Vielfaches von `10^exponent`.
///
/// `exponent = -3` rundet auf Millimeter, wenn die Einheiten Meter sind.
pub fn round_coordinates(polygon: &mut Polygon<f64>, exponent: i32) {
    let step = 10f64.powi(exponent);
    polygon.map_coords_in_place(|c| geo::Coord {
        x: (c.x / step).round() * step,
        y: (c.y / step).round() * step,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use geo::polygon;

    #[test]
    fn test_round_coordinates() {
        let mut poly = polygon![
            (x: 0.00049, y: 0.0),
            (x: 1.0004, y: 0.0),
            (x: 1.0, y: 0.9996),
        ];
        round_coordinates(&mut poly, -3);
        let coords: Vec<_> = poly.exterior().coords().copied().collect();
        assert_abs_diff_eq!(coords[0].x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(coords[1].x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(coords[2].y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_polygon_id_ordering_and_display() {
        let a = PolygonId::new(0, 5);
        let b = PolygonId::new(1, 0);
        assert!(a < b);
        assert_eq!(b.to_string(), "(1, 0)");
    }

    #[test]
    fn test_dataset_builder() {
        let ds = Dataset::new("parcels")
            .with_polygon(polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 0.0, y: 1.0)])
            .with_attributed_polygon(
                polygon![(x: 2.0, y: 0.0), (x: 3.0, y: 0.0), (x: 2.0, y: 1.0)],
                "forest",
            );
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.features[1].attribute.as_deref(), Some("forest"));
    }
}
