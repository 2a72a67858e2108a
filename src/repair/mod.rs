// src/repair/mod.rs

pub mod config;
pub mod edge_matching;
pub mod engine;
pub mod longest_boundary;
pub mod priority;
pub mod priority_list;
pub mod random_neighbour;
pub mod strategy;

pub use config::{RepairConfig, RepairMethod};
pub use edge_matching::EdgeMatching;
pub use engine::{RepairEngine, RepairSummary};
pub use longest_boundary::LongestBoundary;
pub use priority::PriorityRanking;
pub use priority_list::PriorityList;
pub use random_neighbour::RandomNeighbour;
pub use strategy::{RegionResolver, RepairContext, Resolution};
