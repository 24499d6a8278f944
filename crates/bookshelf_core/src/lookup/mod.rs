//! External catalog lookup collaborator.
//!
//! # Responsibility
//! - Resolve an ISBN into best-effort author/publisher/date metadata.
//! - Distinguish "catalog does not know this ISBN" from "catalog unreachable".
//!
//! # Invariants
//! - One lookup is one bounded attempt; implementations never retry.
//! - Absent metadata surfaces as `None`/empty, never as placeholder text;
//!   placeholders are applied by `CatalogEntry` accessors.

use crate::model::book::MISSING_FIELD;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod google_books;

pub use google_books::GoogleBooksLookup;

/// Metadata returned for a known ISBN.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
}

impl CatalogEntry {
    /// Authors joined with `" and "`, or `"missing"` when none are listed.
    pub fn authors_line(&self) -> String {
        if self.authors.is_empty() {
            return MISSING_FIELD.to_string();
        }
        self.authors.join(" and ")
    }

    pub fn publisher_or_missing(&self) -> String {
        self.publisher
            .clone()
            .unwrap_or_else(|| MISSING_FIELD.to_string())
    }

    pub fn published_date_or_missing(&self) -> String {
        self.published_date
            .clone()
            .unwrap_or_else(|| MISSING_FIELD.to_string())
    }
}

#[derive(Debug)]
pub enum LookupError {
    /// The HTTP client could not be constructed.
    Client(reqwest::Error),
    /// Connection failure or timeout.
    Transport(reqwest::Error),
    /// The catalog answered with a non-success status.
    Status(u16),
    /// The response body was not a catalog volume listing.
    Decode(reqwest::Error),
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client(err) => write!(f, "catalog client setup failed: {err}"),
            Self::Transport(err) if err.is_timeout() => write!(f, "catalog lookup timed out"),
            Self::Transport(err) => write!(f, "catalog unreachable: {err}"),
            Self::Status(status) => write!(f, "catalog answered with status {status}"),
            Self::Decode(err) => write!(f, "catalog response could not be decoded: {err}"),
        }
    }
}

impl Error for LookupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Client(err) | Self::Transport(err) | Self::Decode(err) => Some(err),
            Self::Status(_) => None,
        }
    }
}

/// ISBN metadata source.
pub trait CatalogLookup {
    /// Returns `Ok(None)` when the catalog has no entry for `isbn`.
    fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<CatalogEntry>, LookupError>;
}

impl<T: CatalogLookup + ?Sized> CatalogLookup for &T {
    fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<CatalogEntry>, LookupError> {
        (**self).lookup_by_isbn(isbn)
    }
}
