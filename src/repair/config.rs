// src/repair/config.rs

use super::priority::PriorityRanking;
use crate::error::{PartitionError, PartitionResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Verfügbare Reparaturverfahren
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RepairMethod {
    #[default]
    RandomNeighbour,
    LongestBoundary,
    PriorityList,
    EdgeMatching,
}

impl RepairMethod {
    /// Verfahren, die ohne Prioritätsliste nicht arbeiten können
    pub fn requires_priority(self) -> bool {
        matches!(self, RepairMethod::PriorityList | RepairMethod::EdgeMatching)
    }

    pub fn short_name(self) -> &'static str {
        match self {
            RepairMethod::RandomNeighbour => "RN",
            RepairMethod::LongestBoundary => "LB",
            RepairMethod::PriorityList => "PL",
            RepairMethod::EdgeMatching => "EM",
        }
    }
}

impl fmt::Display for RepairMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepairMethod::RandomNeighbour => "RandomNeighbour",
            RepairMethod::LongestBoundary => "LongestBoundary",
            RepairMethod::PriorityList => "PriorityList",
            RepairMethod::EdgeMatching => "EdgeMatching",
        };
        f.write_str(name)
    }
}

impl FromStr for RepairMethod {
    type Err = PartitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "fix" | "RN" | "RandomNeighbour" => Ok(RepairMethod::RandomNeighbour),
            "LB" | "LongestBoundary" => Ok(RepairMethod::LongestBoundary),
            "PL" | "PriorityList" => Ok(RepairMethod::PriorityList),
            "EM" | "EdgeMatching" => Ok(RepairMethod::EdgeMatching),
            other => Err(PartitionError::InvalidConfiguration {
                message: format!("Unknown repair method '{other}', expected one of fix|RN|LB|PL|EM"),
            }),
        }
    }
}

/// Konfiguration eines Reparaturlaufs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairConfig {
    pub method: RepairMethod,
    /// Pflicht für PriorityList und EdgeMatching
    pub priority: Option<PriorityRanking>,
    /// Nur für EdgeMatching; `None` schaltet das Aufteilen ab
    pub max_split_distance: Option<f64>,
    /// Zufällige statt erster Nachbarwahl in RandomNeighbour
    pub seed: Option<u64>,
    /// Regionen parallel auflösen (rayon)
    pub parallel: bool,
}

impl RepairConfig {
    pub fn new(method: RepairMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, ranking: PriorityRanking) -> Self {
        self.priority = Some(ranking);
        self
    }

    /// Negative Werte schalten das Aufteilen ab.
    pub fn with_max_split_distance(mut self, distance: f64) -> Self {
        self.max_split_distance = if distance < 0.0 {
            warn!("Negative split distance {} disables region splitting", distance);
            None
        } else {
            Some(distance)
        };
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> PartitionResult<()> {
        if self.method.requires_priority() && self.priority.as_ref().is_none_or(|p| p.is_empty()) {
            return Err(PartitionError::MissingPriorityInput {
                method: self.method.to_string(),
                detail: "a non-empty priority ranking must be provided".to_string(),
            });
        }
        if let Some(distance) = self.max_split_distance {
            if !distance.is_finite() {
                return Err(PartitionError::InvalidConfiguration {
                    message: format!("max_split_distance must be finite, got {distance}"),
                });
            }
        }
        Ok(())
    }

    /// Split-Distanz nach Normalisierung (negativ zählt als abgeschaltet).
    pub(crate) fn split_distance(&self) -> Option<f64> {
        self.max_split_distance.filter(|d| *d >= 0.0)
    }
}
