// src/partition/mod.rs

pub mod builder;
pub mod catalog;
pub mod config;
pub mod core;
pub mod input;
pub mod labels;
pub mod validation;

pub use self::builder::PartitionBuilder;
pub use self::catalog::PolygonCatalog;
pub use self::config::BuildConfig;
pub use self::core::Partition;
pub use self::input::{Dataset, Feature, InputPolygon, PolygonId, round_coordinates};
pub use self::labels::LabelSet;
pub use self::validation::{PolygonValidator, ValidationError, ValidationResult};
