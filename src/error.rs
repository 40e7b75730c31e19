//! Error types for salarypdf.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for salarypdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting or combining reports.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// A word that delimits the data region was not found on the page.
    #[error("Layout marker {marker:?} not found on page {page}")]
    MissingMarker { marker: String, page: u32 },

    /// The data region of a page contains no words.
    #[error("No data words on page {0}")]
    EmptyDataRegion(u32),

    /// The inferred table does not have the expected number of columns.
    #[error("Page {page}: expected {expected} columns, found {found}")]
    ColumnMismatch {
        page: u32,
        expected: usize,
        found: usize,
    },

    /// A CSV file name does not carry a year.
    #[error("No year found in file name: {0}")]
    MissingYear(PathBuf),

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
