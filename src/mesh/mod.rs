// src/mesh/mod.rs

pub mod adapter;
pub mod arena;

pub use adapter::{CdtAdapter, EdgeKey, RawFace};
pub use arena::{PartitionMesh, Triangle, TriangleId};
