//! # Data Loader Crate
//!
//! This crate builds the read-only movie catalog the recommender scores
//! against.
//!
//! ## Main Components
//!
//! - **types**: Domain types (Item, Genre, RatingAggregate, Catalog, raw records)
//! - **parser**: Parse MovieLens 100k / 1M files into raw records
//! - **builder**: Validate, aggregate and assemble the `Catalog`
//! - **error**: Fatal load errors and per-row data quality warnings
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let (catalog, report) = Catalog::load_from_dir(Path::new("data/ml-100k"))?;
//! println!("{} movies, {} rows skipped", catalog.len(), report.skipped());
//!
//! // Share it read-only with every request handler
//! let catalog = Arc::new(catalog);
//! ```

// Public modules
pub mod builder;
pub mod error;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use builder::BuildReport;
pub use error::{DataLoadError, DataQualityWarning, Result, Table};
pub use parser::DatasetLayout;
pub use types::{
    join_genres, Catalog, CatalogEntry, Genre, Item, MovieId, RatingAggregate, RawItem,
    RawRating, ReleaseYear,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_empty_catalog_queries() {
        let catalog = Catalog::default();

        // Querying non-existent data should return None or empty slices
        assert!(catalog.is_empty());
        assert!(catalog.get(999).is_none());
        assert!(catalog.get_item(999).is_none());
        assert!(catalog.entries().is_empty());
        assert!(catalog.genre_counts().is_empty());
        assert_eq!(catalog.overall_mean_rating(), None);
    }

    #[test]
    fn test_genre_labels_round_trip() {
        for genre in Genre::ALL {
            assert_eq!(Genre::from_label(genre.label()), Some(genre));
        }
        assert_eq!(Genre::from_label("scifi"), Some(Genre::SciFi));
        assert_eq!(Genre::from_label("Children"), Some(Genre::Children));
        assert_eq!(Genre::from_label("film noir"), Some(Genre::FilmNoir));
        assert_eq!(Genre::from_label("Cartoon"), None);
    }

    #[test]
    fn test_serde_uses_dataset_spelling() {
        assert_eq!(serde_json::to_string(&Genre::SciFi).unwrap(), "\"Sci-Fi\"");
        let genre: Genre = serde_json::from_str("\"Children\"").unwrap();
        assert_eq!(genre, Genre::Children);
        assert_eq!(
            serde_json::to_string(&ReleaseYear::Unknown).unwrap(),
            "\"unknown\""
        );
        let year: ReleaseYear = serde_json::from_str("\"1977\"").unwrap();
        assert_eq!(year, ReleaseYear::Known(1977));
    }

    #[test]
    fn test_synthesized_description() {
        let item = Item {
            id: 1,
            title: "The Matrix".to_string(),
            year: Some(ReleaseYear::Known(1999)),
            genres: BTreeSet::from([Genre::SciFi, Genre::Action]),
            description: None,
        };
        assert_eq!(item.description(), "Action, Sci-Fi film from 1999");

        let unknown = Item {
            year: Some(ReleaseYear::Unknown),
            genres: BTreeSet::new(),
            ..item.clone()
        };
        assert_eq!(unknown.description(), "Feature film from an unknown year");

        let described = Item {
            description: Some("A hacker discovers reality is a simulation".to_string()),
            ..item
        };
        assert_eq!(
            described.description(),
            "A hacker discovers reality is a simulation"
        );
    }

    #[test]
    fn test_genre_counts_and_overall_mean() {
        let (catalog, _) = Catalog::build(
            vec![
                RawItem::new(1, "A (2000)", vec![Genre::Action, Genre::SciFi]),
                RawItem::new(2, "B (2001)", vec![Genre::Action]),
            ],
            vec![
                RawRating::new(1, 5.0),
                RawRating::new(2, 3.0),
                RawRating::new(2, 4.0),
            ],
        )
        .unwrap();

        assert_eq!(
            catalog.genre_counts(),
            vec![(Genre::Action, 2), (Genre::SciFi, 1)]
        );
        assert_eq!(catalog.overall_mean_rating(), Some(4.0));
    }
}
