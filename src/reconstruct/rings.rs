// src/reconstruct/rings.rs

use crate::mesh::{PartitionMesh, TriangleId};
use crate::utils::{constants, planar};
use geo::kernels::Orientation;
use geo::{Coord, LineString, Polygon};
use std::collections::{HashMap, VecDeque};
use std::f64::consts::TAU;
use thiserror::Error;

/// Fehler beim Verfolgen der Randkanten
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TraceError {
    #[error("open boundary at vertex {vertex}")]
    OpenBoundary { vertex: usize },
    #[error("boundary tracing did not terminate")]
    Unterminated,
    #[error("exterior ring is not counter-clockwise")]
    ClockwiseExterior,
    #[error("component has more than one exterior ring")]
    MultipleExteriors,
}

/// Gerichtete Randkante; das Innere liegt links davon.
#[derive(Debug, Clone, Copy)]
struct BoundaryEdge {
    from: usize,
    to: usize,
}

/// Verschmilzt eine Menge von Dreiecken zu Polygonen mit Löchern.
///
/// Jede kantenzusammenhängende Komponente ergibt ein Polygon; der Ring mit der
/// größten Fläche wird Außenring, alle weiteren werden Löcher.
pub fn trace_polygons(
    mesh: &PartitionMesh,
    members: &[TriangleId],
) -> Result<Vec<Polygon<f64>>, TraceError> {
    let mut is_member = vec![false; mesh.len()];
    for &id in members {
        is_member[id] = true;
    }

    let mut polygons = Vec::new();
    for component in components(mesh, members, &is_member) {
        let edges = boundary_edges(mesh, &component, &is_member);
        let rings = trace_rings(mesh, &edges)?;
        polygons.push(assemble_polygon(rings)?);
    }
    Ok(polygons)
}

/// Kantenzusammenhängende Komponenten, sortiert nach kleinstem Dreiecksindex.
fn components(
    mesh: &PartitionMesh,
    members: &[TriangleId],
    is_member: &[bool],
) -> Vec<Vec<TriangleId>> {
    let mut sorted = members.to_vec();
    sorted.sort_unstable();
    let mut visited = vec![false; mesh.len()];
    let mut result = Vec::new();

    for &start in &sorted {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut component = vec![start];
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            for neighbor in mesh.triangle(id).neighbors.into_iter().flatten() {
                if is_member[neighbor] && !visited[neighbor] {
                    visited[neighbor] = true;
                    component.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }
        component.sort_unstable();
        result.push(component);
    }
    result
}

fn boundary_edges(
    mesh: &PartitionMesh,
    component: &[TriangleId],
    is_member: &[bool],
) -> Vec<BoundaryEdge> {
    let mut edges = Vec::new();
    for &id in component {
        let triangle = mesh.triangle(id);
        for edge in 0..3 {
            let inside = triangle.neighbors[edge].is_some_and(|n| is_member[n]);
            if !inside {
                let (from, to) = mesh.edge_vertices(id, edge);
                edges.push(BoundaryEdge { from, to });
            }
        }
    }
    edges
}

/// Verfolgt die Randkanten zu geschlossenen Ringen.
///
/// An Punkten, an denen sich der Rand selbst berührt, wird über die äußere
/// Seite abgebogen: ein Loch, das den Außenring in einem Punkt berührt, wird
/// so ein eigener Ring und kein Teil des Außenrings.
fn trace_rings(
    mesh: &PartitionMesh,
    edges: &[BoundaryEdge],
) -> Result<Vec<Vec<Coord<f64>>>, TraceError> {
    let mut outgoing: HashMap<usize, Vec<usize>> = HashMap::new();
    for (index, edge) in edges.iter().enumerate() {
        outgoing.entry(edge.from).or_default().push(index);
    }

    let mut used = vec![false; edges.len()];
    let mut rings = Vec::new();

    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        let mut ring = Vec::new();
        let mut current = start;
        used[start] = true;

        loop {
            let edge = edges[current];
            ring.push(mesh.position(edge.from));
            if ring.len() > edges.len() {
                return Err(TraceError::Unterminated);
            }

            let candidates: Vec<usize> = outgoing
                .get(&edge.to)
                .map(|list| {
                    list.iter()
                        .copied()
                        .filter(|&e| !used[e] || e == start)
                        .collect()
                })
                .unwrap_or_default();
            let next = pick_widest_turn(mesh, edge, &candidates, edges)
                .ok_or(TraceError::OpenBoundary { vertex: edge.to })?;

            if next == start {
                break;
            }
            used[next] = true;
            current = next;
        }
        rings.push(simplify_ring(ring));
    }
    Ok(rings)
}

/// Wählt die ausgehende Kante mit dem größten Drehwinkel im Uhrzeigersinn,
/// gemessen von der Rückrichtung der eingehenden Kante.
fn pick_widest_turn(
    mesh: &PartitionMesh,
    incoming: BoundaryEdge,
    candidates: &[usize],
    edges: &[BoundaryEdge],
) -> Option<usize> {
    if candidates.len() <= 1 {
        return candidates.first().copied();
    }
    let pivot = mesh.position(incoming.to);
    let back = mesh.position(incoming.from);
    let back_angle = (back.y - pivot.y).atan2(back.x - pivot.x);

    candidates.iter().copied().max_by(|&a, &b| {
        let turn = |e: usize| {
            let target = mesh.position(edges[e].to);
            let angle = (target.y - pivot.y).atan2(target.x - pivot.x);
            (back_angle - angle).rem_euclid(TAU)
        };
        turn(a).total_cmp(&turn(b))
    })
}

/// Entfernt exakt kollineare Zwischenpunkte.
fn simplify_ring(mut ring: Vec<Coord<f64>>) -> Vec<Coord<f64>> {
    let mut changed = true;
    while changed && ring.len() > 3 {
        changed = false;
        let n = ring.len();
        for i in 0..n {
            let prev = ring[(i + n - 1) % n];
            let next = ring[(i + 1) % n];
            if planar::orientation(prev, ring[i], next) == Orientation::Collinear {
                ring.remove(i);
                changed = true;
                break;
            }
        }
    }
    ring
}

/// Größter Ring wird Außenring (muss CCW sein), alle anderen Löcher (CW).
fn assemble_polygon(rings: Vec<Vec<Coord<f64>>>) -> Result<Polygon<f64>, TraceError> {
    let areas: Vec<f64> = rings.iter().map(|r| planar::ring_signed_area(r)).collect();
    let exterior_index = areas
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
        .map(|(i, _)| i)
        .ok_or(TraceError::OpenBoundary { vertex: 0 })?;

    if areas[exterior_index] <= constants::EPSILON_F64 {
        return Err(TraceError::ClockwiseExterior);
    }

    let mut exterior = LineString::new(Vec::new());
    let mut holes = Vec::new();
    for (index, ring) in rings.into_iter().enumerate() {
        if index == exterior_index {
            exterior = LineString::from(ring);
        } else if areas[index] < 0.0 {
            holes.push(LineString::from(ring));
        } else {
            return Err(TraceError::MultipleExteriors);
        }
    }
    Ok(Polygon::new(exterior, holes))
}
