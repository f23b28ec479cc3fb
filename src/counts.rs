use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Reverse;

/// Frequency table of error messages that remembers first-seen order.
///
/// Entries live in a `Vec` in the order each distinct message was first
/// counted; the hash map only points into it. Iteration and ranking ties
/// therefore follow insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorCounts {
    index: FxHashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl ErrorCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `message`.
    pub fn increment(&mut self, message: &str) {
        self.add(message, 1);
    }

    /// Add `count` occurrences of `message`, appending it if unseen.
    pub fn add(&mut self, message: &str, count: usize) {
        match self.index.get(message) {
            Some(&slot) => self.entries[slot].1 += count,
            None => {
                self.index.insert(message.to_string(), self.entries.len());
                self.entries.push((message.to_string(), count));
            }
        }
    }

    /// Fold another table into this one. Keys new to `self` are appended
    /// in the order `other` first saw them.
    pub fn merge(&mut self, other: &ErrorCounts) {
        for (message, count) in &other.entries {
            self.add(message, *count);
        }
    }

    pub fn get(&self, message: &str) -> Option<usize> {
        self.index.get(message).map(|&slot| self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total occurrences across all messages.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(message, count)| (message.as_str(), *count))
    }

    /// The `n` most frequent messages, count descending, ties in first-seen order.
    pub fn most_common(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked: Vec<&(String, usize)> = self.entries.iter().collect();
        // sort_by_key is stable, which keeps insertion order among equal counts
        ranked.sort_by_key(|entry| Reverse(entry.1));
        ranked.into_iter().take(n).cloned().collect()
    }
}

impl Serialize for ErrorCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (message, count) in &self.entries {
            map.serialize_entry(message, count)?;
        }
        map.end()
    }
}

impl<'a> FromIterator<&'a str> for ErrorCounts {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut counts = ErrorCounts::new();
        for message in iter {
            counts.increment(message);
        }
        counts
    }
}
