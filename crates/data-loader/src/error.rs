//! Error types for the data-loader crate.
//!
//! Two kinds of problems show up while building a catalog:
//! - `DataLoadError`: the build cannot continue (missing files, nothing usable)
//! - `DataQualityWarning`: one row was bad and got skipped; the build carries on

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a catalog from being built
///
/// Everything here is a startup-time failure. Row-level problems are
/// never raised as errors, they are collected as `DataQualityWarning`s.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in a data file couldn't be parsed
    ///
    /// Parsers produce this per line; the builder turns it into a warning.
    #[error("Parse error at line {line} in {table}: {reason}")]
    ParseError {
        table: Table,
        line: usize,
        reason: String,
    },

    /// The directory holds neither a MovieLens 100k nor a 1M layout
    #[error("No MovieLens dataset found in {}", dir.display())]
    UnknownLayout { dir: PathBuf },

    /// Every item row was rejected, so there is nothing to recommend from
    #[error("Catalog is empty after skipping {skipped} malformed rows")]
    EmptyCatalog { skipped: usize },
}

/// Which raw table a row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Items,
    Ratings,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Items => write!(f, "items"),
            Table::Ratings => write!(f, "ratings"),
        }
    }
}

/// A row that was skipped during the build
///
/// `line` is 1-based when the row came from a file and `None` for
/// records handed to the builder directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataQualityWarning {
    pub table: Table,
    pub line: Option<usize>,
    pub reason: String,
}

impl DataQualityWarning {
    pub fn new(table: Table, line: Option<usize>, reason: impl Into<String>) -> Self {
        Self {
            table,
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} line {}: {}", self.table, line, self.reason),
            None => write!(f, "{}: {}", self.table, self.reason),
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
