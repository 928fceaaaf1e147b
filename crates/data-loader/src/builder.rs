//! Catalog building.
//!
//! Turns raw item and rating records into an immutable `Catalog`:
//! - normalize titles, years and genre sets
//! - drop duplicate items and unusable ratings, recording why
//! - aggregate ratings per item (count + mean)
//!
//! Bad rows never abort the build. The only fatal outcome is a catalog with
//! no items in it.

use crate::error::{DataLoadError, DataQualityWarning, Result, Table};
use crate::parser::{self, DatasetLayout};
use crate::types::*;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Valid rating range in the source data
const MIN_RATING: f32 = 1.0;
const MAX_RATING: f32 = 5.0;

/// Diagnostics from one catalog build
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub items_loaded: usize,
    pub ratings_loaded: usize,
    pub warnings: Vec<DataQualityWarning>,
}

impl BuildReport {
    /// Number of rows that were skipped
    pub fn skipped(&self) -> usize {
        self.warnings.len()
    }

    pub fn skipped_in(&self, table: Table) -> usize {
        self.warnings.iter().filter(|w| w.table == table).count()
    }
}

impl Catalog {
    /// Load a MovieLens dataset directory and build the catalog from it
    ///
    /// Steps:
    /// 1. Detect the layout (100k or 1M)
    /// 2. Parse items and ratings in parallel
    /// 3. Build the catalog, carrying over parse warnings
    pub fn load_from_dir(data_dir: &Path) -> Result<(Self, BuildReport)> {
        let layout = DatasetLayout::detect(data_dir)?;
        let (items_path, ratings_path) = layout.paths(data_dir);
        info!(?layout, dir = %data_dir.display(), "Loading MovieLens dataset");

        let (items, ratings) = rayon::join(
            || layout.parse_items(&items_path),
            || layout.parse_ratings(&ratings_path),
        );
        let items = items?;
        let ratings = ratings?;

        let mut warnings = items.warnings;
        warnings.extend(ratings.warnings);

        Self::build_with_warnings(items.records, ratings.records, warnings)
    }

    /// Build a catalog from raw records
    pub fn build(raw_items: Vec<RawItem>, raw_ratings: Vec<RawRating>) -> Result<(Self, BuildReport)> {
        Self::build_with_warnings(raw_items, raw_ratings, Vec::new())
    }

    fn build_with_warnings(
        raw_items: Vec<RawItem>,
        raw_ratings: Vec<RawRating>,
        mut warnings: Vec<DataQualityWarning>,
    ) -> Result<(Self, BuildReport)> {
        // 1. Insert items in order, first occurrence of an id wins
        let mut items: Vec<Item> = Vec::with_capacity(raw_items.len());
        let mut by_id: HashMap<MovieId, usize> = HashMap::with_capacity(raw_items.len());
        for raw in raw_items {
            if by_id.contains_key(&raw.id) {
                warnings.push(DataQualityWarning::new(
                    Table::Items,
                    raw.line,
                    format!("duplicate movieId {}", raw.id),
                ));
                continue;
            }
            by_id.insert(raw.id, items.len());
            items.push(normalize_item(raw));
        }

        if items.is_empty() {
            return Err(DataLoadError::EmptyCatalog {
                skipped: warnings.len(),
            });
        }

        // 2. Keep ratings that are in range and point at a known item
        let mut accepted: Vec<(usize, f32)> = Vec::with_capacity(raw_ratings.len());
        let mut users: HashSet<UserId> = HashSet::new();
        for rating in raw_ratings {
            if !rating.rating.is_finite() || rating.rating < MIN_RATING || rating.rating > MAX_RATING {
                warnings.push(DataQualityWarning::new(
                    Table::Ratings,
                    rating.line,
                    format!("rating {} for movieId {} out of range", rating.rating, rating.movie_id),
                ));
                continue;
            }
            match by_id.get(&rating.movie_id) {
                Some(&idx) => {
                    accepted.push((idx, rating.rating));
                    users.extend(rating.user_id);
                }
                None => warnings.push(DataQualityWarning::new(
                    Table::Ratings,
                    rating.line,
                    format!("rating references unknown movieId {}", rating.movie_id),
                )),
            }
        }

        // 3. Aggregate in parallel into per-entry (sum, count) slots
        let aggregates = aggregate_ratings(items.len(), &accepted);
        let total_ratings = accepted.len() as u64;

        let entries: Vec<CatalogEntry> = items
            .into_iter()
            .zip(aggregates)
            .map(|(item, aggregate)| CatalogEntry { item, aggregate })
            .collect();

        let report = BuildReport {
            items_loaded: entries.len(),
            ratings_loaded: accepted.len(),
            warnings,
        };

        if report.skipped() > 0 {
            warn!(
                skipped = report.skipped(),
                skipped_items = report.skipped_in(Table::Items),
                skipped_ratings = report.skipped_in(Table::Ratings),
                "Skipped malformed rows while building catalog"
            );
            for warning in report.warnings.iter().take(10) {
                debug!(%warning, "Skipped row");
            }
        }
        info!(
            items = report.items_loaded,
            ratings = report.ratings_loaded,
            users = users.len(),
            "Catalog built"
        );

        let catalog = Catalog {
            entries,
            by_id,
            total_ratings,
            total_users: users.len(),
        };
        Ok((catalog, report))
    }
}

/// Normalize a raw item into a catalog item
///
/// The year comes from a "(YYYY)" title suffix first, then from the release
/// date. A blank or unreadable release date gives `ReleaseYear::Unknown`;
/// no release date column at all leaves the year absent.
fn normalize_item(raw: RawItem) -> Item {
    let (title, title_year) = parser::split_title_year(&raw.title);
    let year = match (title_year, raw.release_date.as_deref()) {
        (Some(year), _) => Some(ReleaseYear::Known(year)),
        (None, Some(date)) => Some(
            parser::year_from_release_date(date)
                .map(ReleaseYear::Known)
                .unwrap_or(ReleaseYear::Unknown),
        ),
        (None, None) => None,
    };
    Item {
        id: raw.id,
        title,
        year,
        genres: raw.genres.into_iter().collect(),
        description: raw.description.filter(|d| !d.trim().is_empty()),
    }
}

/// Compute count and mean per catalog slot
///
/// Uses rayon's fold/reduce: each worker fills its own slot vector and the
/// vectors are summed element-wise at the end.
fn aggregate_ratings(slots: usize, accepted: &[(usize, f32)]) -> Vec<RatingAggregate> {
    let sums = accepted
        .par_iter()
        .fold(
            || vec![(0.0f64, 0u32); slots],
            |mut acc, &(idx, rating)| {
                acc[idx].0 += rating as f64;
                acc[idx].1 += 1;
                acc
            },
        )
        .reduce(
            || vec![(0.0f64, 0u32); slots],
            |mut left, right| {
                for (l, r) in left.iter_mut().zip(right) {
                    l.0 += r.0;
                    l.1 += r.1;
                }
                left
            },
        );

    sums.into_iter()
        .map(|(sum, count)| RatingAggregate::from_sum(sum, count))
        .collect()
}
