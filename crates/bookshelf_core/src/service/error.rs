//! Boundary-facing catalog errors.

use crate::lookup::LookupError;
use crate::model::book::{BookId, BookValidationError};
use crate::model::filter::FilterError;
use crate::model::rating::RatingValidationError;
use crate::repo::book_repo::RepoError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Coarse error category reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    UpstreamUnavailable,
    Store,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::Store => "store",
        }
    }

    /// HTTP-equivalent status for routing layers.
    pub fn status_code(self) -> u16 {
        match self {
            Self::Validation => 422,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::UpstreamUnavailable => 503,
            Self::Store => 500,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum CatalogError {
    InvalidFilter(FilterError),
    InvalidBook(BookValidationError),
    InvalidRating(RatingValidationError),
    MalformedId(String),
    BookNotFound(BookId),
    RatingNotFound(BookId),
    DuplicateIsbn(String),
    IdSpaceExhausted { attempts: u32 },
    Upstream(LookupError),
    UnknownIsbn(String),
    Store(RepoError),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFilter(_)
            | Self::InvalidBook(_)
            | Self::InvalidRating(_)
            | Self::MalformedId(_) => ErrorKind::Validation,
            Self::BookNotFound(_) | Self::RatingNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateIsbn(_) | Self::IdSpaceExhausted { .. } => ErrorKind::Conflict,
            Self::Upstream(_) | Self::UnknownIsbn(_) => ErrorKind::UpstreamUnavailable,
            Self::Store(_) => ErrorKind::Store,
        }
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFilter(err) => write!(f, "{err}"),
            Self::InvalidBook(err) => write!(f, "{err}"),
            Self::InvalidRating(err) => write!(f, "{err}"),
            Self::MalformedId(raw) => write!(f, "malformed identifier `{raw}`"),
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::RatingNotFound(id) => write!(f, "rating not found: {id}"),
            Self::DuplicateIsbn(isbn) => write!(f, "a book with ISBN {isbn} already exists"),
            Self::IdSpaceExhausted { attempts } => {
                write!(f, "no unused identifier after {attempts} attempts")
            }
            Self::Upstream(err) => write!(f, "{err}"),
            Self::UnknownIsbn(isbn) => write!(f, "ISBN {isbn} not found in external catalog"),
            Self::Store(_) => write!(f, "catalog store operation failed"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidFilter(err) => Some(err),
            Self::InvalidBook(err) => Some(err),
            Self::InvalidRating(err) => Some(err),
            Self::Upstream(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FilterError> for CatalogError {
    fn from(value: FilterError) -> Self {
        Self::InvalidFilter(value)
    }
}

impl From<BookValidationError> for CatalogError {
    fn from(value: BookValidationError) -> Self {
        Self::InvalidBook(value)
    }
}

impl From<RatingValidationError> for CatalogError {
    fn from(value: RatingValidationError) -> Self {
        Self::InvalidRating(value)
    }
}

impl From<LookupError> for CatalogError {
    fn from(value: LookupError) -> Self {
        Self::Upstream(value)
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::BookNotFound(id),
            RepoError::DuplicateIsbn(isbn) => Self::DuplicateIsbn(isbn),
            other => Self::Store(other),
        }
    }
}

/// Parses a boundary-supplied identifier.
pub fn parse_book_id(raw: &str) -> Result<BookId, CatalogError> {
    BookId::parse_str(raw.trim()).map_err(|_| CatalogError::MalformedId(raw.to_string()))
}
