// src/lib.rs
//! Validierung und Reparatur planarer Partitionen.
//!
//! Alle Eingabepolygone werden gemeinsam trianguliert; jedes Dreieck erhält
//! die Menge der Polygone, die es überdecken. Dreiecke ohne oder mit mehreren
//! Labels bilden Konfliktregionen, die eines der Reparaturverfahren auflöst.
//! Aus den bereinigten Dreiecken entstehen wieder Polygone.

pub mod debug;
pub mod error;
pub mod mesh;
pub mod partition;
pub mod reconstruct;
pub mod repair;
pub mod utils;
pub mod validator;

#[cfg(test)]
mod scenarios;

pub use error::{PartitionError, PartitionResult};
pub use partition::{BuildConfig, Dataset, Partition, PartitionBuilder, PolygonId};
pub use reconstruct::{Reconstruction, RepairedPolygon};
pub use repair::{PriorityRanking, RepairConfig, RepairMethod, RepairSummary};
pub use validator::{Classification, ConflictRegion, ProblemReport, RegionKind, ReportConfig};
