// src/error.rs
use crate::partition::PolygonId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PartitionError {
    #[error("Invalid input geometry in polygon {polygon}: {reason}")]
    InvalidInputGeometry { polygon: PolygonId, reason: String },

    #[error("Missing priority input for {method}: {detail}")]
    MissingPriorityInput { method: String, detail: String },

    #[error("Degenerate reconstruction of polygon {polygon}: {reason}")]
    DegenerateReconstruction { polygon: PolygonId, reason: String },

    #[error("Triangulation failed: {reason}")]
    Triangulation { reason: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Repair left {remaining_regions} conflict region(s) unresolved after the fallback pass")]
    RepairIncomplete { remaining_regions: usize },

    #[error("I/O error while writing report: {0}")]
    Io(#[from] std::io::Error),
}

pub type PartitionResult<T> = Result<T, PartitionError>;
