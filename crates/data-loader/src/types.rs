//! Core domain types for the movie catalog.
//!
//! Raw records (`RawItem`, `RawRating`) are what the parsers hand over.
//! The builder turns them into `Item` + `RatingAggregate` pairs inside a
//! `Catalog`, which is read-only from then on.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie (1-1682 in MovieLens 100k)
pub type MovieId = u32;

/// Unique identifier for a user (1-943 in MovieLens 100k)
pub type UserId = u32;

// =============================================================================
// Genre Vocabulary
// =============================================================================

/// Movie genres from MovieLens
///
/// Variant order follows the genre flag columns of `u.item`, which is also
/// the order genres are listed in reasons and API output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Genre {
    #[serde(rename = "unknown")]
    Unknown,
    Action,
    Adventure,
    Animation,
    #[serde(rename = "Children's", alias = "Children")]
    Children,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Fantasy,
    #[serde(rename = "Film-Noir")]
    FilmNoir,
    Horror,
    Musical,
    Mystery,
    Romance,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Thriller,
    War,
    Western,
}

impl Genre {
    /// All genres, in `u.item` column order
    pub const ALL: [Genre; 19] = [
        Genre::Unknown,
        Genre::Action,
        Genre::Adventure,
        Genre::Animation,
        Genre::Children,
        Genre::Comedy,
        Genre::Crime,
        Genre::Documentary,
        Genre::Drama,
        Genre::Fantasy,
        Genre::FilmNoir,
        Genre::Horror,
        Genre::Musical,
        Genre::Mystery,
        Genre::Romance,
        Genre::SciFi,
        Genre::Thriller,
        Genre::War,
        Genre::Western,
    ];

    /// Dataset spelling of the genre
    pub fn label(self) -> &'static str {
        match self {
            Genre::Unknown => "unknown",
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Animation => "Animation",
            Genre::Children => "Children's",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Documentary => "Documentary",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasy",
            Genre::FilmNoir => "Film-Noir",
            Genre::Horror => "Horror",
            Genre::Musical => "Musical",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
            Genre::Thriller => "Thriller",
            Genre::War => "War",
            Genre::Western => "Western",
        }
    }

    /// Look a genre up by label, ignoring case and punctuation
    ///
    /// Example: "Sci-Fi", "scifi" and "SCI FI" -> Some(Genre::SciFi)
    ///          "Children" and "Children's"   -> Some(Genre::Children)
    pub fn from_label(s: &str) -> Option<Genre> {
        let wanted = squash(s);
        if wanted == "children" {
            return Some(Genre::Children);
        }
        Genre::ALL
            .into_iter()
            .find(|genre| squash(genre.label()) == wanted)
    }
}

/// Lowercase and drop everything that isn't alphanumeric
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Join genres for display: "Action, Sci-Fi"
pub fn join_genres<'a>(genres: impl IntoIterator<Item = &'a Genre>) -> String {
    genres
        .into_iter()
        .map(|g| g.label())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Raw Records
// =============================================================================

/// One row of the items table, before normalization
///
/// `title` may still carry a "(1995)" suffix; the builder strips it.
/// `release_date` is `None` when the source has no such column at all and
/// `Some("")` when the column exists but is blank.
#[derive(Debug, Clone, PartialEq)]
pub struct RawItem {
    pub id: MovieId,
    pub title: String,
    pub release_date: Option<String>,
    pub genres: Vec<Genre>,
    pub description: Option<String>,
    /// 1-based line in the source file, if there was one
    pub line: Option<usize>,
}

impl RawItem {
    pub fn new(id: MovieId, title: impl Into<String>, genres: Vec<Genre>) -> Self {
        Self {
            id,
            title: title.into(),
            release_date: None,
            genres,
            description: None,
            line: None,
        }
    }
}

/// One row of the ratings table
///
/// Values outside 1.0 - 5.0 are rejected by the builder, not here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRating {
    pub movie_id: MovieId,
    pub rating: f32,
    pub user_id: Option<UserId>,
    pub line: Option<usize>,
}

impl RawRating {
    pub fn new(movie_id: MovieId, rating: f32) -> Self {
        Self {
            movie_id,
            rating,
            user_id: None,
            line: None,
        }
    }

    pub fn by_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

// =============================================================================
// Catalog Types
// =============================================================================

/// Release year of an item
///
/// `Unknown` means the source explicitly had no usable date. An item whose
/// source never carried a date at all has `year: None` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ReleaseYear {
    Known(u16),
    Unknown,
}

impl fmt::Display for ReleaseYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseYear::Known(year) => write!(f, "{}", year),
            ReleaseYear::Unknown => f.write_str("unknown"),
        }
    }
}

impl From<ReleaseYear> for String {
    fn from(year: ReleaseYear) -> Self {
        year.to_string()
    }
}

impl TryFrom<String> for ReleaseYear {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        if s.eq_ignore_ascii_case("unknown") {
            return Ok(ReleaseYear::Unknown);
        }
        s.parse::<u16>()
            .map(ReleaseYear::Known)
            .map_err(|e| format!("invalid release year {:?}: {}", s, e))
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: MovieId,
    /// Title without the trailing "(year)"
    pub title: String,
    pub year: Option<ReleaseYear>,
    pub genres: BTreeSet<Genre>,
    pub description: Option<String>,
}

impl Item {
    /// Description from the source, or one synthesized from genres and year
    ///
    /// Example: "Action, Sci-Fi film from 1999"
    pub fn description(&self) -> String {
        if let Some(description) = &self.description {
            return description.clone();
        }
        let kind = if self.genres.is_empty() {
            "Feature".to_string()
        } else {
            join_genres(&self.genres)
        };
        match self.year {
            Some(ReleaseYear::Known(year)) => format!("{} film from {}", kind, year),
            _ => format!("{} film from an unknown year", kind),
        }
    }
}

/// Rating statistics for one item
///
/// `mean_rating` is `None` exactly when `rating_count` is 0. An unrated item
/// has no mean; it is never treated as a mean of 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingAggregate {
    pub rating_count: u32,
    pub mean_rating: Option<f32>,
}

impl RatingAggregate {
    /// Aggregate for an item nobody rated
    pub fn unrated() -> Self {
        Self::default()
    }

    /// Build from a running sum and count
    pub fn from_sum(sum: f64, count: u32) -> Self {
        if count == 0 {
            return Self::unrated();
        }
        Self {
            rating_count: count,
            mean_rating: Some((sum / count as f64) as f32),
        }
    }
}

/// An item joined with its rating statistics
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub item: Item,
    pub aggregate: RatingAggregate,
}

impl CatalogEntry {
    pub fn id(&self) -> MovieId {
        self.item.id
    }
}

// =============================================================================
// Catalog - The In-Memory Snapshot
// =============================================================================

/// All items with their aggregates, keyed by id.
///
/// Entries keep the order items were inserted in, so callers iterating the
/// catalog always see the same sequence. Lookups by id go through a
/// `HashMap` into that vector.
///
/// There are no mutators: a new dataset means a new `Catalog`, swapped in
/// behind an `Arc`.
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) entries: Vec<CatalogEntry>,
    pub(crate) by_id: HashMap<MovieId, usize>,
    pub(crate) total_ratings: u64,
    pub(crate) total_users: usize,
}

impl Catalog {
    /// Get an entry by movie ID
    pub fn get(&self, id: MovieId) -> Option<&CatalogEntry> {
        self.by_id.get(&id).map(|&idx| &self.entries[idx])
    }

    /// Get an item by movie ID
    pub fn get_item(&self, id: MovieId) -> Option<&Item> {
        self.get(id).map(|entry| &entry.item)
    }

    /// Get rating statistics for a movie
    pub fn get_aggregate(&self, id: MovieId) -> Option<&RatingAggregate> {
        self.get(id).map(|entry| &entry.aggregate)
    }

    /// All entries in catalog order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of ratings that made it into the aggregates
    pub fn total_ratings(&self) -> u64 {
        self.total_ratings
    }

    /// Distinct users behind the accepted ratings
    ///
    /// Ratings built without a user id don't count towards this.
    pub fn total_users(&self) -> usize {
        self.total_users
    }

    /// Mean over every accepted rating, `None` if there are none
    pub fn overall_mean_rating(&self) -> Option<f32> {
        if self.total_ratings == 0 {
            return None;
        }
        let sum: f64 = self
            .entries
            .iter()
            .filter_map(|entry| {
                let agg = entry.aggregate;
                agg.mean_rating
                    .map(|mean| mean as f64 * agg.rating_count as f64)
            })
            .sum();
        Some((sum / self.total_ratings as f64) as f32)
    }

    /// How many items carry each genre, in genre order, zero counts omitted
    pub fn genre_counts(&self) -> Vec<(Genre, usize)> {
        let mut counts = [0usize; Genre::ALL.len()];
        for entry in &self.entries {
            for &genre in &entry.item.genres {
                counts[genre as usize] += 1;
            }
        }
        Genre::ALL
            .into_iter()
            .zip(counts)
            .filter(|&(_, count)| count > 0)
            .collect()
    }
}
