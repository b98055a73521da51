//! Pagination windows over the source dataset.

use serde::{Deserialize, Serialize};

/// One fixed-size page of the source dataset.
///
/// The planned sequence of windows for a dataset of size N is contiguous
/// and non-overlapping; the final window's `limit` may exceed the rows
/// actually remaining, in which case the fetch simply yields fewer records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

impl Window {
    #[must_use]
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// First row index past this window.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.limit)
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rows [{}, {})", self.offset, self.end())
    }
}
