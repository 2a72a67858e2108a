// src/partition/validation.rs

use crate::utils::{constants, planar};
use geo::line_intersection::{LineIntersection, line_intersection};
use geo::{Coord, Intersects, Line, LineString, Point, Polygon};
use thiserror::Error;

/// Validierungsfehler eines einzelnen Eingabepolygons
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("ring {ring} has {count} distinct vertices, at least {minimum} required")]
    InsufficientVertices {
        ring: usize,
        count: usize,
        minimum: usize,
    },
    #[error("ring {ring} has a non-finite vertex at index {vertex_index}")]
    InvalidVertex { ring: usize, vertex_index: usize },
    #[error("ring {ring} encloses no area")]
    ZeroArea { ring: usize },
    #[error("segments of rings {ring_a} and {ring_b} intersect near ({x}, {y})")]
    SelfIntersection {
        ring_a: usize,
        ring_b: usize,
        x: f64,
        y: f64,
    },
    #[error("hole ring {ring} lies outside the exterior ring")]
    HoleOutsideExterior { ring: usize },
    #[error("hole ring {ring} has the same orientation as the exterior ring")]
    InconsistentOrientation { ring: usize },
}

/// Validation-Ergebnisse
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Ein Ringsegment mit Herkunft, für den Überschneidungstest
struct RingSegment {
    ring: usize,
    index: usize,
    ring_len: usize,
    line: Line<f64>,
}

/// Validator für einzelne Eingabepolygone (Ring 0 = Außenring, 1.. = Löcher).
pub struct PolygonValidator {
    check_self_intersections: bool,
}

impl Default for PolygonValidator {
    fn default() -> Self {
        Self {
            check_self_intersections: true,
        }
    }
}

impl PolygonValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aktiviert/deaktiviert Selbstüberschneidungs-Check
    pub fn check_self_intersections(mut self, check: bool) -> Self {
        self.check_self_intersections = check;
        self
    }

    /// Validiert ein Polygon
    pub fn validate(&self, polygon: &Polygon<f64>) -> ValidationResult {
        let mut errors = Vec::new();
        let rings: Vec<Vec<Coord<f64>>> = std::iter::once(polygon.exterior())
            .chain(polygon.interiors().iter())
            .map(ring_vertices)
            .collect();

        self.validate_vertices(&rings, &mut errors);
        if !errors.is_empty() {
            return ValidationResult {
                is_valid: false,
                errors,
            };
        }

        if self.check_self_intersections {
            self.validate_self_intersections(&rings, &mut errors);
        }
        self.validate_holes(polygon, &rings, &mut errors);

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    // === Private Validation Methods ===

    fn validate_vertices(&self, rings: &[Vec<Coord<f64>>], errors: &mut Vec<ValidationError>) {
        for (ring, vertices) in rings.iter().enumerate() {
            if let Some(vertex_index) = vertices
                .iter()
                .position(|c| !c.x.is_finite() || !c.y.is_finite())
            {
                errors.push(ValidationError::InvalidVertex { ring, vertex_index });
                continue;
            }
            if vertices.len() < 3 {
                errors.push(ValidationError::InsufficientVertices {
                    ring,
                    count: vertices.len(),
                    minimum: 3,
                });
                continue;
            }
            if planar::ring_signed_area(vertices).abs() < constants::EPSILON_F64 {
                errors.push(ValidationError::ZeroArea { ring });
            }
        }
    }

    fn validate_self_intersections(
        &self,
        rings: &[Vec<Coord<f64>>],
        errors: &mut Vec<ValidationError>,
    ) {
        let segments: Vec<RingSegment> = rings
            .iter()
            .enumerate()
            .flat_map(|(ring, vertices)| {
                let n = vertices.len();
                (0..n).map(move |index| RingSegment {
                    ring,
                    index,
                    ring_len: n,
                    line: Line::new(vertices[index], vertices[(index + 1) % n]),
                })
            })
            .collect();

        for (i, a) in segments.iter().enumerate() {
            for b in &segments[i + 1..] {
                if !boxes_overlap(&a.line, &b.line) {
                    continue;
                }
                let Some(hit) = line_intersection(a.line, b.line) else {
                    continue;
                };
                let adjacent = a.ring == b.ring
                    && ((a.index + 1) % a.ring_len == b.index
                        || (b.index + 1) % b.ring_len == a.index);
                let offending = match hit {
                    // Kollineare Überlappung ist immer ungültig (auch bei Nachbarsegmenten: Spike)
                    LineIntersection::Collinear { intersection } => Some(intersection.start),
                    LineIntersection::SinglePoint {
                        intersection,
                        is_proper,
                    } => {
                        if is_proper {
                            Some(intersection)
                        } else if a.ring == b.ring && !adjacent {
                            // Ring berührt sich selbst
                            Some(intersection)
                        } else {
                            // Gemeinsamer Eckpunkt oder Berührung zweier Ringe
                            None
                        }
                    }
                };
                if let Some(point) = offending {
                    errors.push(ValidationError::SelfIntersection {
                        ring_a: a.ring,
                        ring_b: b.ring,
                        x: point.x,
                        y: point.y,
                    });
                    return;
                }
            }
        }
    }

    fn validate_holes(
        &self,
        polygon: &Polygon<f64>,
        rings: &[Vec<Coord<f64>>],
        errors: &mut Vec<ValidationError>,
    ) {
        if rings.len() < 2 {
            return;
        }
        let shell = Polygon::new(polygon.exterior().clone(), vec![]);
        let shell_sign = planar::ring_signed_area(&rings[0]).signum();

        for (ring, vertices) in rings.iter().enumerate().skip(1) {
            if !vertices.iter().all(|&c| shell.intersects(&Point::from(c))) {
                errors.push(ValidationError::HoleOutsideExterior { ring });
            }
            if planar::ring_signed_area(vertices).signum() == shell_sign {
                errors.push(ValidationError::InconsistentOrientation { ring });
            }
        }
    }
}

/// Eckpunkte eines Rings ohne Schlusspunkt und ohne aufeinanderfolgende Duplikate.
pub fn ring_vertices(ring: &LineString<f64>) -> Vec<Coord<f64>> {
    let mut vertices: Vec<Coord<f64>> = Vec::with_capacity(ring.0.len());
    for &c in &ring.0 {
        if vertices.last() != Some(&c) {
            vertices.push(c);
        }
    }
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    vertices
}

fn boxes_overlap(a: &Line<f64>, b: &Line<f64>) -> bool {
    let (a_min_x, a_max_x) = min_max(a.start.x, a.end.x);
    let (a_min_y, a_max_y) = min_max(a.start.y, a.end.y);
    let (b_min_x, b_max_x) = min_max(b.start.x, b.end.x);
    let (b_min_y, b_max_y) = min_max(b.start.y, b.end.y);
    a_min_x <= b_max_x && b_min_x <= a_max_x && a_min_y <= b_max_y && b_min_y <= a_max_y
}

fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}
