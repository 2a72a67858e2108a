// src/mesh/adapter.rs

use crate::error::{PartitionError, PartitionResult};
use geo::Coord;
use spade::handles::FixedVertexHandle;
use spade::{ConstrainedDelaunayTriangulation, Point2, Triangulation};

pub type SpadePoint = Point2<f64>;

/// Ungerichtete Kante über zwei Vertex-Indizes (kleinerer Index zuerst).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(pub usize, pub usize);

impl EdgeKey {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

/// Rohes Dreieck, wie es die Triangulation liefert.
///
/// Kante `i` verläuft von `vertices[i]` nach `vertices[(i + 1) % 3]`, das
/// Dreieck liegt links davon (CCW). `neighbors[i]` ist das Face jenseits
/// dieser Kante, `None` für die äußere Fläche.
#[derive(Debug, Clone, Copy)]
pub struct RawFace {
    pub face_index: usize,
    pub vertices: [usize; 3],
    pub neighbors: [Option<usize>; 3],
    pub constrained: [bool; 3],
}

/// Adapter um spades `ConstrainedDelaunayTriangulation`.
///
/// Kapselt genau die Operationen, die der Rest des Crates braucht: Punkte und
/// Zwangskanten einfügen, Dreiecke samt Nachbarn aufzählen.
pub struct CdtAdapter {
    cdt: ConstrainedDelaunayTriangulation<SpadePoint>,
}

impl Default for CdtAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CdtAdapter {
    pub fn new() -> Self {
        Self {
            cdt: ConstrainedDelaunayTriangulation::new(),
        }
    }

    /// Fügt einen Punkt ein; identische Punkte liefern denselben Index.
    pub fn insert_vertex(&mut self, position: Coord<f64>) -> PartitionResult<usize> {
        self.cdt
            .insert(SpadePoint::new(position.x, position.y))
            .map(|handle| handle.index())
            .map_err(|e| PartitionError::Triangulation {
                reason: format!(
                    "Failed to insert point ({}, {}): {:?}",
                    position.x, position.y, e
                ),
            })
    }

    /// Fügt eine Zwangskante zwischen zwei vorhandenen Punkten ein.
    ///
    /// Schneidet sie bestehende Zwangskanten, werden an den Schnittpunkten neue
    /// Punkte eingefügt. Zurückgegeben werden alle entstandenen Teilkanten.
    pub fn insert_constraint(&mut self, from: usize, to: usize) -> Vec<EdgeKey> {
        if from == to {
            return Vec::new();
        }
        let created = self.cdt.add_constraint_and_split(
            FixedVertexHandle::from_index(from),
            FixedVertexHandle::from_index(to),
            |p| p,
        );
        created
            .into_iter()
            .map(|handle| {
                let edge = self.cdt.directed_edge(handle);
                EdgeKey::new(edge.from().fix().index(), edge.to().fix().index())
            })
            .collect()
    }

    /// Fügt eine Strecke als Zwangskante ein (Endpunkte werden bei Bedarf angelegt).
    pub fn insert_segment(
        &mut self,
        from: Coord<f64>,
        to: Coord<f64>,
    ) -> PartitionResult<Vec<EdgeKey>> {
        let a = self.insert_vertex(from)?;
        let b = self.insert_vertex(to)?;
        Ok(self.insert_constraint(a, b))
    }

    /// Fügt einen offenen Ring (ohne Schlusspunkt) als geschlossene Kantenfolge ein.
    pub fn insert_ring(&mut self, ring: &[Coord<f64>]) -> PartitionResult<()> {
        if ring.len() < 2 {
            return Ok(());
        }
        let handles = ring
            .iter()
            .map(|&c| self.insert_vertex(c))
            .collect::<PartitionResult<Vec<usize>>>()?;
        for i in 0..handles.len() {
            self.insert_constraint(handles[i], handles[(i + 1) % handles.len()]);
        }
        Ok(())
    }

    pub fn num_vertices(&self) -> usize {
        self.cdt.num_vertices()
    }

    pub fn num_triangles(&self) -> usize {
        self.cdt.num_inner_faces()
    }

    pub fn num_constraints(&self) -> usize {
        self.cdt.num_constraints()
    }

    /// Positionen aller Punkte, indiziert über den Vertex-Index.
    pub fn vertex_positions(&self) -> Vec<Coord<f64>> {
        let mut positions = vec![Coord { x: 0.0, y: 0.0 }; self.cdt.num_vertices()];
        for vertex in self.cdt.vertices() {
            let p = vertex.position();
            positions[vertex.fix().index()] = Coord { x: p.x, y: p.y };
        }
        positions
    }

    /// Zählt alle inneren Dreiecke mit Nachbarschaft und Zwangskanten-Flags auf.
    pub fn faces(&self) -> Vec<RawFace> {
        self.cdt
            .inner_faces()
            .map(|face| {
                let mut vertices = [0usize; 3];
                let mut neighbors = [None; 3];
                let mut constrained = [false; 3];
                for (i, edge) in face.adjacent_edges().iter().enumerate() {
                    vertices[i] = edge.from().fix().index();
                    neighbors[i] = edge.rev().face().as_inner().map(|f| f.fix().index());
                    constrained[i] = self.cdt.is_constraint_edge(edge.as_undirected().fix());
                }
                RawFace {
                    face_index: face.fix().index(),
                    vertices,
                    neighbors,
                    constrained,
                }
            })
            .collect()
    }
}
