//! Duplicate paper detection across one run.
//!
//! Multi-source exports list the same publication more than once. A paper is
//! identified by year, lowercased title and lowercased venue; the first row
//! with a given key is admitted and every later one is a duplicate. Venue is
//! part of the key so a preprint and its journal version both survive.

use crate::model::RawPaper;
use std::collections::HashSet;

/// Composite paper identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub year: String,
    pub title: String,
    pub venue: String,
}

impl DedupKey {
    pub fn new(year: &str, title: &str, venue: &str) -> Self {
        Self {
            year: year.to_string(),
            title: title.to_lowercase(),
            venue: venue.to_lowercase(),
        }
    }

    pub fn of(paper: &RawPaper) -> Self {
        Self::new(&paper.year, &paper.title, &paper.venue)
    }
}

/// Outcome of [`PaperDeduplicator::admit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    Duplicate,
}

/// Set of paper identities seen so far in the run.
#[derive(Debug, Default)]
pub struct PaperDeduplicator {
    seen: HashSet<DedupKey>,
}

impl PaperDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the paper's key, reporting whether it was already seen.
    pub fn admit(&mut self, paper: &RawPaper) -> Admission {
        self.admit_key(DedupKey::of(paper))
    }

    pub fn admit_key(&mut self, key: DedupKey) -> Admission {
        if self.seen.insert(key) {
            Admission::Accepted
        } else {
            Admission::Duplicate
        }
    }

    /// Number of distinct papers admitted.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
