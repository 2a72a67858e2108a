// src/partition/config.rs
use crate::error::{PartitionError, PartitionResult};
use serde::{Deserialize, Serialize};

/// Laufbezogene Konfiguration des Partition Builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Rundung aller Eingabekoordinaten auf `10^rounding`, falls gesetzt
    pub rounding: Option<i32>,
    /// Überspringt die Validierung jedes einzelnen Eingabepolygons
    pub skip_individual_validation: bool,
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rounding(mut self, exponent: i32) -> Self {
        self.rounding = Some(exponent);
        self
    }

    pub fn skip_individual_validation(mut self, skip: bool) -> Self {
        self.skip_individual_validation = skip;
        self
    }

    pub fn validate(&self) -> PartitionResult<()> {
        if let Some(exponent) = self.rounding {
            // 10^exponent muss als f64 darstellbar und von Null verschieden sein
            if !(-300..=300).contains(&exponent) {
                return Err(PartitionError::InvalidConfiguration {
                    message: format!("Rounding exponent {exponent} is out of range [-300, 300]"),
                });
            }
        }
        Ok(())
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            rounding: None,
            skip_individual_validation: false,
        }
    }
}
