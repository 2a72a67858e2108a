// src/validator/mod.rs

pub mod classify;
pub mod region;
pub mod report;

pub use classify::{Classification, classify};
pub use region::{ConflictRegion, RegionEdge, RegionKind};
pub use report::{ProblemRegion, ProblemReport, ReportConfig, TriangulationStats};
