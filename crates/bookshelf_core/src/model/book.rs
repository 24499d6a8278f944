//! Book record and its creation/update request schemas.
//!
//! # Invariants
//! - `title`, `ISBN` and every update field are non-blank after trimming.
//! - `genre` is one of the fixed catalog genres.
//! - Metadata the external catalog does not provide is stored as `"missing"`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Identifier shared by a book and its rating record.
pub type BookId = Uuid;

/// Placeholder stored for metadata the external catalog did not return.
pub const MISSING_FIELD: &str = "missing";

/// Fixed set of catalog genres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Fiction,
    Children,
    Biography,
    Science,
    #[serde(rename = "Science Fiction")]
    ScienceFiction,
    Fantasy,
    Other,
}

impl Genre {
    pub const ALL: [Genre; 7] = [
        Genre::Fiction,
        Genre::Children,
        Genre::Biography,
        Genre::Science,
        Genre::ScienceFiction,
        Genre::Fantasy,
        Genre::Other,
    ];

    /// Display name, also used as the stored and serialized value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fiction => "Fiction",
            Self::Children => "Children",
            Self::Biography => "Biography",
            Self::Science => "Science",
            Self::ScienceFiction => "Science Fiction",
            Self::Fantasy => "Fantasy",
            Self::Other => "Other",
        }
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = BookValidationError;

    /// Exact, case-sensitive match on the display name.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|genre| genre.as_str() == value)
            .ok_or_else(|| BookValidationError::UnknownGenre(value.to_string()))
    }
}

/// Validation failures for book requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    /// A required field was empty or whitespace only.
    BlankField(&'static str),
    UnknownGenre(String),
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} cannot be blank"),
            Self::UnknownGenre(value) => {
                let allowed = Genre::ALL.map(Genre::as_str).join(", ");
                write!(f, "genre `{value}` must be one of: {allowed}")
            }
        }
    }
}

impl Error for BookValidationError {}

/// Stored book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    /// Author names joined with `" and "`.
    pub authors: String,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    pub publisher: String,
    #[serde(rename = "publishedDate")]
    pub published_date: String,
    pub genre: Genre,
}

impl Book {
    /// Builds the replacement record for an existing book id.
    pub fn from_update(id: BookId, update: BookUpdate) -> Self {
        Self {
            id,
            title: update.title,
            authors: update.authors,
            isbn: update.isbn,
            publisher: update.publisher,
            published_date: update.published_date,
            genre: update.genre,
        }
    }
}

/// Raw creation request as received from the boundary layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewBookRequest {
    pub title: String,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    pub genre: String,
}

/// Creation request that passed schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub isbn: String,
    pub genre: Genre,
}

impl NewBookRequest {
    pub fn validate(&self) -> Result<NewBook, BookValidationError> {
        Ok(NewBook {
            title: required("title", &self.title)?,
            isbn: required("ISBN", &self.isbn)?,
            genre: self.genre.trim().parse()?,
        })
    }
}

/// Raw full-replacement request; every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookUpdateRequest {
    pub title: String,
    pub authors: String,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    pub publisher: String,
    #[serde(rename = "publishedDate")]
    pub published_date: String,
    pub genre: String,
}

/// Full-replacement request that passed schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookUpdate {
    pub title: String,
    pub authors: String,
    pub isbn: String,
    pub publisher: String,
    pub published_date: String,
    pub genre: Genre,
}

impl BookUpdateRequest {
    pub fn validate(&self) -> Result<BookUpdate, BookValidationError> {
        Ok(BookUpdate {
            title: required("title", &self.title)?,
            authors: required("authors", &self.authors)?,
            isbn: required("ISBN", &self.isbn)?,
            publisher: required("publisher", &self.publisher)?,
            published_date: required("publishedDate", &self.published_date)?,
            genre: self.genre.trim().parse()?,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, BookValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookValidationError::BlankField(field));
    }
    Ok(trimmed.to_string())
}
