// src/partition/labels.rs

use super::input::PolygonId;

/// Menge der Kandidaten-Polygone eines Dreiecks.
///
/// Intern ein sortierter, duplikatfreier Vektor; die Mengen sind fast immer
/// sehr klein (0, 1 oder 2 Einträge).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LabelSet(Vec<PolygonId>);

impl LabelSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(id: PolygonId) -> Self {
        Self(vec![id])
    }

    pub fn insert(&mut self, id: PolygonId) -> bool {
        match self.0.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, id);
                true
            }
        }
    }

    pub fn contains(&self, id: PolygonId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Genau ein Label?
    pub fn is_clean(&self) -> bool {
        self.0.len() == 1
    }

    /// Das eindeutige Label, falls vorhanden.
    pub fn sole(&self) -> Option<PolygonId> {
        match self.0.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    /// Ersetzt den Inhalt durch genau ein Label.
    pub fn assign(&mut self, id: PolygonId) {
        self.0.clear();
        self.0.push(id);
    }

    pub fn extend(&mut self, other: &LabelSet) {
        for &id in &other.0 {
            self.insert(id);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = PolygonId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[PolygonId] {
        &self.0
    }
}

impl FromIterator<PolygonId> for LabelSet {
    fn from_iter<I: IntoIterator<Item = PolygonId>>(iter: I) -> Self {
        let mut ids: Vec<PolygonId> = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }
}
