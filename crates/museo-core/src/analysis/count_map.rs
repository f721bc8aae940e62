use crate::records::strip_brackets;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Label to occurrence count, in first-occurrence order.
///
/// Keys are matched exactly as given; [`CountMap::display_entries`] yields the
/// bracket-stripped form for presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountMap {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl CountMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, label: &str) {
        self.add(label, 1);
    }

    /// Make sure `label` is present, with count 0 if it was never seen.
    pub fn ensure(&mut self, label: &str) {
        self.add(label, 0);
    }

    fn add(&mut self, label: &str, by: usize) {
        match self.index.get(label) {
            Some(&pos) => self.entries[pos].1 += by,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), by));
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.index.get(label).map(|&pos| self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    /// Counts as floats, in key order, ready for summarizing
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, count)| *count as f64).collect()
    }

    /// Entries with bracket-stripped labels, in key order
    pub fn display_entries(&self) -> Vec<(String, usize)> {
        self.entries
            .iter()
            .map(|(label, count)| (strip_brackets(label).to_string(), *count))
            .collect()
    }

    /// Display entries ordered by descending count, ties kept in key order
    pub fn sorted_by_count(&self) -> Vec<(String, usize)> {
        let mut entries = self.display_entries();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    /// Display entries ordered lexically by label
    pub fn sorted_by_label(&self) -> Vec<(String, usize)> {
        let mut entries = self.display_entries();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl<'a> FromIterator<&'a str> for CountMap {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut map = CountMap::new();
        for label in iter {
            map.increment(label);
        }
        map
    }
}

impl Serialize for CountMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, count) in &self.entries {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}
