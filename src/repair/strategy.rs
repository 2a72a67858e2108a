// src/repair/strategy.rs

use crate::mesh::{PartitionMesh, TriangleId};
use crate::partition::{PolygonCatalog, PolygonId};
use crate::validator::ConflictRegion;

/// Lesesicht auf die Partition während eines Reparaturdurchgangs.
///
/// Alle Verfahren entscheiden auf dem Stand zu Beginn des Durchgangs; als
/// aufgelöst gelten nur saubere Dreiecke.
#[derive(Clone, Copy)]
pub struct RepairContext<'a> {
    pub mesh: &'a PartitionMesh,
    pub catalog: &'a PolygonCatalog,
}

impl<'a> RepairContext<'a> {
    pub fn new(mesh: &'a PartitionMesh, catalog: &'a PolygonCatalog) -> Self {
        Self { mesh, catalog }
    }
}

/// Entscheidung eines Verfahrens für eine Region
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Die ganze Region erhält dieses Label.
    Whole(PolygonId),
    /// Einzelne Dreiecke erhalten unterschiedliche Labels.
    PerTriangle(Vec<(TriangleId, PolygonId)>),
    /// Keine eindeutige Entscheidung; der Treiber greift auf RandomNeighbour zurück.
    Tie,
}

impl Resolution {
    pub fn is_tie(&self) -> bool {
        matches!(self, Resolution::Tie)
    }
}

/// Gemeinsame Schnittstelle aller Reparaturverfahren.
///
/// Implementierungen lesen das Netz nur; das Schreiben der Labels übernimmt
/// der Treiber, damit Regionen parallel entschieden werden können.
pub trait RegionResolver: Sync {
    fn name(&self) -> &'static str;

    fn resolve(&self, ctx: &RepairContext<'_>, region: &ConflictRegion) -> Resolution;
}
