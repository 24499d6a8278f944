//! Rating record, rating values, and leaderboard entries.
//!
//! # Invariants
//! - `values` is append-only and every value is within `1..=5`.
//! - `average == sum(values) / len(values)` for non-empty `values`, else `0`.
//! - `average` is never set independently of `values`.

use crate::model::book::BookId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MIN_RATING_VALUE: i64 = 1;
pub const MAX_RATING_VALUE: i64 = 5;

/// Per-book rating aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: BookId,
    /// Book title copied when the rating record was created.
    pub title: String,
    pub values: Vec<u8>,
    pub average: f64,
}

impl Rating {
    /// Creates the empty rating record that accompanies a new book.
    pub fn empty(id: BookId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            values: Vec::new(),
            average: 0.0,
        }
    }

    /// Appends one value and recomputes the average. Returns the new average.
    pub fn push(&mut self, value: RatingValue) -> f64 {
        self.values.push(value.get());
        self.average = average_of(&self.values);
        self.average
    }
}

/// Arithmetic mean with floating-point division; `0.0` for no values.
pub fn average_of(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u64 = values.iter().map(|value| u64::from(*value)).sum();
    sum as f64 / values.len() as f64
}

/// One validated rating submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingValue(u8);

impl RatingValue {
    pub fn get(self) -> u8 {
        self.0
    }

    /// Accepts only JSON integers within range; `4.0` and `"4"` are rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, RatingValidationError> {
        match value.as_i64() {
            Some(number) => Self::try_from(number),
            None => Err(RatingValidationError::NotAnInteger(value.to_string())),
        }
    }
}

impl TryFrom<i64> for RatingValue {
    type Error = RatingValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if !(MIN_RATING_VALUE..=MAX_RATING_VALUE).contains(&value) {
            return Err(RatingValidationError::OutOfRange(value));
        }
        u8::try_from(value)
            .map(Self)
            .map_err(|_| RatingValidationError::OutOfRange(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingValidationError {
    OutOfRange(i64),
    NotAnInteger(String),
}

impl Display for RatingValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange(value) => write!(
                f,
                "rating value {value} is outside {MIN_RATING_VALUE}..={MAX_RATING_VALUE}"
            ),
            Self::NotAnInteger(raw) => write!(f, "rating value `{raw}` is not an integer"),
        }
    }
}

impl Error for RatingValidationError {}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRatedEntry {
    pub id: BookId,
    pub title: String,
    pub average: f64,
}

impl From<Rating> for TopRatedEntry {
    fn from(rating: Rating) -> Self {
        Self {
            id: rating.id,
            title: rating.title,
            average: rating.average,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{average_of, Rating, RatingValidationError, RatingValue};
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn rating_value_accepts_one_through_five_only() {
        for value in 1..=5 {
            assert_eq!(RatingValue::try_from(value).unwrap().get() as i64, value);
        }
        assert_eq!(
            RatingValue::try_from(0),
            Err(RatingValidationError::OutOfRange(0))
        );
        assert_eq!(
            RatingValue::try_from(6),
            Err(RatingValidationError::OutOfRange(6))
        );
    }

    #[test]
    fn rating_value_from_json_rejects_non_integers() {
        assert!(RatingValue::from_json(&json!(3)).is_ok());
        assert!(matches!(
            RatingValue::from_json(&json!(4.5)),
            Err(RatingValidationError::NotAnInteger(_))
        ));
        assert!(matches!(
            RatingValue::from_json(&json!("4")),
            Err(RatingValidationError::NotAnInteger(_))
        ));
    }

    #[test]
    fn push_recomputes_exact_mean() {
        let mut rating = Rating::empty(Uuid::new_v4(), "Emma");
        assert_eq!(rating.average, 0.0);

        rating.push(RatingValue::try_from(5).unwrap());
        rating.push(RatingValue::try_from(4).unwrap());
        let average = rating.push(RatingValue::try_from(4).unwrap());

        assert_eq!(rating.values, vec![5, 4, 4]);
        assert_eq!(average, 13.0 / 3.0);
        assert_eq!(average_of(&[]), 0.0);
    }
}
