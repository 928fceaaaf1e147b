//! Filter to keep only movies tagged with a given genre.
//!
//! Backs the genre selector of the movie listing.

use crate::traits::Filter;
use data_loader::{CatalogEntry, Genre};

/// Keeps only candidates carrying `genre`.
pub struct GenreFilter {
    genre: Genre,
}

impl GenreFilter {
    pub fn new(genre: Genre) -> Self {
        Self { genre }
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn apply<'a>(&self, candidates: Vec<&'a CatalogEntry>) -> Vec<&'a CatalogEntry> {
        candidates
            .into_iter()
            .filter(|entry| entry.item.genres.contains(&self.genre))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Catalog, RawItem};

    #[test]
    fn test_genre_filter() {
        let (catalog, _) = Catalog::build(
            vec![
                RawItem::new(1, "Action Movie", vec![Genre::Action, Genre::Adventure]),
                RawItem::new(2, "Drama Movie", vec![Genre::Drama]),
                RawItem::new(3, "Sci-Fi Movie", vec![Genre::SciFi, Genre::Action]),
            ],
            Vec::new(),
        )
        .unwrap();

        let filter = GenreFilter::new(Genre::Action);
        let filtered = filter.apply(catalog.entries().iter().collect());

        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().any(|e| e.id() == 1));
        assert!(filtered.iter().any(|e| e.id() == 3));
    }
}
