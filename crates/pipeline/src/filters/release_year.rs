//! Filter for a release year window.

use crate::traits::Filter;
use data_loader::{CatalogEntry, ReleaseYear};

/// Keeps candidates released within `from..=to`.
///
/// Either bound may be open. Items without a known year are dropped as soon
/// as any bound is set, since there is nothing to compare.
pub struct ReleaseYearFilter {
    from: Option<u16>,
    to: Option<u16>,
}

impl ReleaseYearFilter {
    pub fn new(from: Option<u16>, to: Option<u16>) -> Self {
        Self { from, to }
    }

    fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

impl Filter for ReleaseYearFilter {
    fn name(&self) -> &str {
        "ReleaseYearFilter"
    }

    fn apply<'a>(&self, candidates: Vec<&'a CatalogEntry>) -> Vec<&'a CatalogEntry> {
        if self.is_open() {
            return candidates;
        }
        candidates
            .into_iter()
            .filter(|entry| match entry.item.year {
                Some(ReleaseYear::Known(year)) => {
                    self.from.is_none_or(|from| year >= from) && self.to.is_none_or(|to| year <= to)
                }
                _ => false,
            })
            .collect()
    }
}
