//! @ai:module:intent Immutable identifier-to-label mapping built from validated records
//! @ai:module:layer domain
//! @ai:module:public_api Submission
//! @ai:module:stateless true

use crate::label::Label;
use std::collections::BTreeMap;

/// @ai:intent Mapping from message identifier to predicted or gold label
/// @ai:invariant identifiers are unique; iteration order is sorted by identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    entries: BTreeMap<String, Label>,
}

impl Submission {
    pub fn get(&self, id: &str) -> Option<Label> {
        self.entries.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Label)> {
        self.entries.iter().map(|(id, label)| (id.as_str(), *label))
    }

    /// @ai:intent Count entries carrying each label, indexed by `Label::index`
    /// @ai:effects pure
    pub fn label_counts(&self) -> [usize; 4] {
        let mut counts = [0; 4];

        for label in self.entries.values() {
            counts[label.index()] += 1;
        }

        counts
    }
}

impl FromIterator<(String, Label)> for Submission {
    /// Later duplicates are ignored; duplicate detection is the validator's job.
    fn from_iter<T: IntoIterator<Item = (String, Label)>>(iter: T) -> Self {
        let mut entries = BTreeMap::new();

        for (id, label) in iter {
            entries.entry(id).or_insert(label);
        }

        Self { entries }
    }
}
