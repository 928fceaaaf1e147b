//! Parsers for MovieLens data files.
//!
//! Two layouts are understood:
//! - MovieLens 100k: `u.item` (pipe-separated, 19 genre flag columns) and
//!   `u.data` (tab-separated)
//! - MovieLens 1M: `movies.dat` and `ratings.dat` (`::`-separated)
//!
//! A line that can't be parsed is not fatal. It is reported back as a
//! `DataQualityWarning` next to the records that did parse. Only I/O
//! failures abort.

use crate::error::{DataLoadError, DataQualityWarning, Result, Table};
use crate::types::*;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Number of fixed columns in `u.item` before the genre flags
const ITEM_FIXED_COLUMNS: usize = 5;

/// Records parsed from one table plus the lines that were skipped
#[derive(Debug, Clone)]
pub struct ParsedTable<T> {
    pub records: Vec<T>,
    pub warnings: Vec<DataQualityWarning>,
}

impl<T> Default for ParsedTable<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// File layout of a MovieLens dataset directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetLayout {
    /// `u.item` + `u.data`
    Ml100k,
    /// `movies.dat` + `ratings.dat`
    Ml1m,
}

impl DatasetLayout {
    /// Work out which layout lives in `dir`
    pub fn detect(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(DataLoadError::FileNotFound {
                path: dir.to_path_buf(),
            });
        }
        if dir.join("u.item").exists() {
            Ok(DatasetLayout::Ml100k)
        } else if dir.join("movies.dat").exists() {
            Ok(DatasetLayout::Ml1m)
        } else {
            Err(DataLoadError::UnknownLayout {
                dir: dir.to_path_buf(),
            })
        }
    }

    /// Paths of the (items, ratings) files for this layout
    pub fn paths(self, dir: &Path) -> (PathBuf, PathBuf) {
        match self {
            DatasetLayout::Ml100k => (dir.join("u.item"), dir.join("u.data")),
            DatasetLayout::Ml1m => (dir.join("movies.dat"), dir.join("ratings.dat")),
        }
    }

    pub fn parse_items(self, path: &Path) -> Result<ParsedTable<RawItem>> {
        let content = read_latin1(path)?;
        Ok(match self {
            DatasetLayout::Ml100k => parse_table(&content, Table::Items, parse_item_100k),
            DatasetLayout::Ml1m => parse_table(&content, Table::Items, parse_movie_1m),
        })
    }

    pub fn parse_ratings(self, path: &Path) -> Result<ParsedTable<RawRating>> {
        let content = read_latin1(path)?;
        Ok(match self {
            DatasetLayout::Ml100k => {
                parse_table(&content, Table::Ratings, |line, no| {
                    parse_rating(line, no, '\t')
                })
            }
            DatasetLayout::Ml1m => {
                let normalized = content.replace("::", "\t");
                parse_table(&normalized, Table::Ratings, |line, no| {
                    parse_rating(line, no, '\t')
                })
            }
        })
    }
}

/// Read a whole file as ISO-8859-1 (Latin-1)
///
/// MovieLens files are Latin-1, not UTF-8. Every Latin-1 byte maps straight
/// to the Unicode code point with the same value.
fn read_latin1(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes.iter().map(|&b| b as char).collect())
}

/// Run a line parser over every non-blank line, collecting failures
///
/// Line parsers only return `ParseError`s; they are turned into warnings.
fn parse_table<T>(
    content: &str,
    table: Table,
    parse_line: impl Fn(&str, usize) -> Result<T>,
) -> ParsedTable<T> {
    let mut parsed = ParsedTable::default();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        match parse_line(line_trimmed, line_no) {
            Ok(record) => parsed.records.push(record),
            Err(DataLoadError::ParseError { line, reason, .. }) => parsed
                .warnings
                .push(DataQualityWarning::new(table, Some(line), reason)),
            Err(other) => parsed
                .warnings
                .push(DataQualityWarning::new(table, Some(line_no), other.to_string())),
        }
    }
    parsed
}

/// Parse items from `u.item` content (used by tests and in-memory loading)
pub fn parse_items_100k(content: &str) -> ParsedTable<RawItem> {
    parse_table(content, Table::Items, parse_item_100k)
}

/// Parse items from `movies.dat` content
pub fn parse_movies_1m(content: &str) -> ParsedTable<RawItem> {
    parse_table(content, Table::Items, parse_movie_1m)
}

/// Parse ratings from `u.data` content
pub fn parse_ratings_100k(content: &str) -> ParsedTable<RawRating> {
    parse_table(content, Table::Ratings, |line, no| parse_rating(line, no, '\t'))
}

fn items_error(line: usize, reason: impl Into<String>) -> DataLoadError {
    DataLoadError::ParseError {
        table: Table::Items,
        line,
        reason: reason.into(),
    }
}

fn ratings_error(line: usize, reason: impl Into<String>) -> DataLoadError {
    DataLoadError::ParseError {
        table: Table::Ratings,
        line,
        reason: reason.into(),
    }
}

/// Parse one `u.item` line
///
/// Format: movieId|title|release date|video release date|IMDb URL|19 genre flags
fn parse_item_100k(line: &str, line_no: usize) -> Result<RawItem> {
    let parts: Vec<&str> = line.split('|').collect();
    let expected = ITEM_FIXED_COLUMNS + Genre::ALL.len();
    if parts.len() != expected {
        return Err(items_error(
            line_no,
            format!("expected {} fields but found {}", expected, parts.len()),
        ));
    }

    let id = parse_movie_id(parts[0]).map_err(|reason| items_error(line_no, reason))?;

    let mut genres = Vec::new();
    for (genre, flag) in Genre::ALL.iter().zip(&parts[ITEM_FIXED_COLUMNS..]) {
        match flag.trim() {
            "1" => genres.push(*genre),
            "0" => {}
            other => {
                return Err(items_error(
                    line_no,
                    format!("invalid flag {:?} for genre {}", other, genre),
                ));
            }
        }
    }

    Ok(RawItem {
        id,
        title: parts[1].trim().to_string(),
        release_date: Some(parts[2].trim().to_string()),
        genres,
        description: None,
        line: Some(line_no),
    })
}

/// Parse one `movies.dat` line
///
/// Format: movieId::title::Genre|Genre
fn parse_movie_1m(line: &str, line_no: usize) -> Result<RawItem> {
    let mut parts = line.split("::");

    let movie_id = parts
        .next()
        .ok_or_else(|| items_error(line_no, "missing movieId"))?;
    let title = parts
        .next()
        .ok_or_else(|| items_error(line_no, "missing title"))?;
    let genres_str = parts
        .next()
        .ok_or_else(|| items_error(line_no, "missing genres"))?;

    let id = parse_movie_id(movie_id).map_err(|reason| items_error(line_no, reason))?;
    let genres = parse_genres(genres_str).map_err(|reason| items_error(line_no, reason))?;

    Ok(RawItem {
        id,
        title: title.trim().to_string(),
        release_date: None,
        genres,
        description: None,
        line: Some(line_no),
    })
}

/// Parse one ratings line: userId, movieId, rating, timestamp
///
/// The timestamp is ignored; the user id is kept for catalog stats.
fn parse_rating(line: &str, line_no: usize, sep: char) -> Result<RawRating> {
    let mut parts = line.split(sep);

    let user_field = parts
        .next()
        .ok_or_else(|| ratings_error(line_no, "missing userId"))?;
    let movie_id = parts
        .next()
        .ok_or_else(|| ratings_error(line_no, "missing movieId"))?;
    let rating_value = parts
        .next()
        .ok_or_else(|| ratings_error(line_no, "missing rating"))?;

    let user_id: UserId = user_field
        .trim()
        .parse()
        .map_err(|e| ratings_error(line_no, format!("invalid userId {:?}: {}", user_field, e)))?;

    Ok(RawRating {
        movie_id: parse_movie_id(movie_id).map_err(|reason| ratings_error(line_no, reason))?,
        rating: rating_value
            .trim()
            .parse()
            .map_err(|e| ratings_error(line_no, format!("invalid rating: {}", e)))?,
        user_id: Some(user_id),
        line: Some(line_no),
    })
}

fn parse_movie_id(s: &str) -> std::result::Result<MovieId, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("missing movieId".to_string());
    }
    s.parse().map_err(|e| format!("invalid movieId {:?}: {}", s, e))
}

/// Parse pipe-separated genres
///
/// Example: "Action|Adventure|Sci-Fi" -> vec![Genre::Action, Genre::Adventure, Genre::SciFi]
fn parse_genres(s: &str) -> std::result::Result<Vec<Genre>, String> {
    let s = s.trim();
    if s.is_empty() || s == "(no genres listed)" {
        return Ok(Vec::new());
    }
    s.split('|')
        .map(|name| Genre::from_label(name).ok_or_else(|| format!("unknown genre {:?}", name)))
        .collect()
}

/// Extract year from a movie title
///
/// Example: "Toy Story (1995)" -> ("Toy Story", Some(1995))
///          "Movie Title"      -> ("Movie Title", None)
pub fn split_title_year(title: &str) -> (String, Option<u16>) {
    let trimmed = title.trim();
    if let (Some(start), true) = (trimmed.rfind('('), trimmed.ends_with(')')) {
        let inner = &trimmed[start + 1..trimmed.len() - 1];
        if inner.len() == 4 {
            if let Ok(year) = inner.parse::<u16>() {
                return (trimmed[..start].trim_end().to_string(), Some(year));
            }
        }
    }
    (trimmed.to_string(), None)
}

/// Extract the year from a release date such as "01-Jan-1995"
pub fn year_from_release_date(date: &str) -> Option<u16> {
    let last = date.trim().rsplit('-').next()?;
    if last.len() != 4 {
        return None;
    }
    last.parse().ok()
}
