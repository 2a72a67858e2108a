// src/repair/priority.rs

use crate::error::PartitionError;
use crate::partition::{PolygonCatalog, PolygonId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Geordnete Liste von Bezeichnern, höchste Priorität zuerst.
///
/// Ein Bezeichner ist entweder ein Attributwert eines Polygons oder der Name
/// eines Datensatzes; das Attribut hat bei der Suche Vorrang.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityRanking {
    entries: Vec<String>,
}

impl PriorityRanking {
    /// Doppelte Einträge behalten ihren ersten Rang.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ranking = Self::default();
        for entry in entries {
            let entry = entry.into();
            if !ranking.entries.contains(&entry) {
                ranking.entries.push(entry);
            }
        }
        ranking
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Rang eines Bezeichners (0 = höchste Priorität).
    pub fn rank_of(&self, identifier: &str) -> Option<usize> {
        self.entries.iter().position(|e| e == identifier)
    }

    /// Rang eines Polygons: zuerst über sein Attribut, dann über den Datensatznamen.
    pub fn rank(&self, catalog: &PolygonCatalog, id: PolygonId) -> Option<usize> {
        let polygon = catalog.get(id)?;
        polygon
            .attribute
            .as_deref()
            .and_then(|attribute| self.rank_of(attribute))
            .or_else(|| self.rank_of(&polygon.dataset_name))
    }
}

impl FromStr for PriorityRanking {
    type Err = PartitionError;

    /// Ein Bezeichner pro Zeile; Leerzeilen und `#`-Kommentare werden ignoriert.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let ranking = Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        );
        if ranking.is_empty() {
            return Err(PartitionError::InvalidConfiguration {
                message: "Priority list contains no entries".to_string(),
            });
        }
        Ok(ranking)
    }
}
