//! Iteration over resolved dictionary entries.

use super::format::content::InflatedDictionary;
use super::types::error::Result;
use super::types::models::{EncodingPair, ResolvedEntry};

/// Iterator over the entries of an inflated dictionary, in index order.
///
/// Yields `Result<ResolvedEntry>`; an error does not end the iteration, but
/// callers converting a dictionary stop at the first one.
#[derive(Debug)]
pub struct EntryIterator<'a> {
    dict: &'a InflatedDictionary,
    encodings: EncodingPair,
    next: usize,
    len: usize,
}

impl<'a> EntryIterator<'a> {
    pub(crate) fn new(dict: &'a InflatedDictionary, encodings: EncodingPair) -> Self {
        Self {
            dict,
            encodings,
            next: 0,
            len: dict.entry_count(),
        }
    }
}

impl Iterator for EntryIterator<'_> {
    type Item = Result<ResolvedEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let entry = self.dict.resolve(self.next, &self.encodings);
        self.next += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EntryIterator<'_> {}

impl InflatedDictionary {
    /// Iterates all entries using `encodings`.
    pub fn entries(&self, encodings: EncodingPair) -> EntryIterator<'_> {
        EntryIterator::new(self, encodings)
    }
}
