//! Field filters over catalog records.
//!
//! # Invariants
//! - Only whitelisted wire field names are accepted.
//! - Constraints combine with AND and compare by exact string equality.
//! - An empty filter matches every record.

use crate::model::book::Book;
use crate::model::rating::Rating;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Whitelisted filter fields, named by their wire spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Title,
    Authors,
    Isbn,
    Publisher,
    PublishedDate,
    Genre,
    Id,
}

impl FilterField {
    pub const ALL: [FilterField; 7] = [
        FilterField::Title,
        FilterField::Authors,
        FilterField::Isbn,
        FilterField::Publisher,
        FilterField::PublishedDate,
        FilterField::Genre,
        FilterField::Id,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Authors => "authors",
            Self::Isbn => "ISBN",
            Self::Publisher => "publisher",
            Self::PublishedDate => "publishedDate",
            Self::Genre => "genre",
            Self::Id => "id",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.wire_name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    UnknownField(String),
}

impl Display for FilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField(name) => write!(f, "incorrect field name: {name}"),
        }
    }
}

impl Error for FilterError {}

/// Conjunction of exact-match field constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    constraints: Vec<(FilterField, String)>,
}

impl QueryFilter {
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Adds one constraint; repeated fields must all match.
    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.constraints.push((field, value.into()));
        self
    }

    pub fn constraints(&self) -> &[(FilterField, String)] {
        &self.constraints
    }

    pub fn is_match_all(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn matches_book(&self, book: &Book) -> bool {
        self.constraints.iter().all(|(field, expected)| {
            let id;
            let actual = match field {
                FilterField::Title => book.title.as_str(),
                FilterField::Authors => book.authors.as_str(),
                FilterField::Isbn => book.isbn.as_str(),
                FilterField::Publisher => book.publisher.as_str(),
                FilterField::PublishedDate => book.published_date.as_str(),
                FilterField::Genre => book.genre.as_str(),
                FilterField::Id => {
                    id = book.id.to_string();
                    id.as_str()
                }
            };
            actual == expected
        })
    }

    /// Ratings only carry `id` and `title`; other fields never match.
    pub fn matches_rating(&self, rating: &Rating) -> bool {
        self.constraints
            .iter()
            .all(|(field, expected)| match field {
                FilterField::Id => rating.id.to_string() == *expected,
                FilterField::Title => rating.title == *expected,
                _ => false,
            })
    }
}

/// Validates raw query parameters and builds the matching filter.
///
/// # Errors
/// - `FilterError::UnknownField` for the first key outside the whitelist.
pub fn build_filter<I, K, V>(params: I) -> Result<QueryFilter, FilterError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut filter = QueryFilter::match_all();
    for (key, value) in params {
        let key = key.as_ref();
        let field = FilterField::from_wire_name(key)
            .ok_or_else(|| FilterError::UnknownField(key.to_string()))?;
        filter = filter.with(field, value);
    }
    Ok(filter)
}
