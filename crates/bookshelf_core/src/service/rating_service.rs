//! Rating use-case service: submissions, reads and the leaderboard.
//!
//! # Invariants
//! - A submission for an unknown book is `NotFound` whatever its value;
//!   the value is validated before anything is written.
//! - Append and average recompute happen inside one store operation.
//! - The leaderboard is a read-only scan; it never writes.

use crate::config::LeaderboardConfig;
use crate::model::book::BookId;
use crate::model::filter::{build_filter, QueryFilter};
use crate::model::rating::{Rating, RatingValue, TopRatedEntry};
use crate::repo::book_repo::RepoError;
use crate::repo::rating_repo::RatingRepository;
use crate::service::error::CatalogError;
use crate::service::leaderboard::rank_top_rated;
use log::{debug, info};

pub struct RatingService<S> {
    store: S,
    leaderboard: LeaderboardConfig,
}

impl<S: RatingRepository> RatingService<S> {
    pub fn new(store: S, leaderboard: LeaderboardConfig) -> Self {
        Self { store, leaderboard }
    }

    pub fn get_rating(&self, id: BookId) -> Result<Rating, CatalogError> {
        self.store
            .get_rating(id)?
            .ok_or(CatalogError::RatingNotFound(id))
    }

    /// Lists ratings matching whitelisted `field=value` parameters.
    pub fn list_ratings<I, K, V>(&self, params: I) -> Result<Vec<Rating>, CatalogError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let filter = build_filter(params)?;
        Ok(self.store.list_ratings(&filter)?)
    }

    /// Appends one value to a book's rating and returns the new average.
    ///
    /// # Errors
    /// - `NotFound` when the book has no rating record; checked first.
    /// - `Validation` for values outside `1..=5`.
    pub fn submit_rating(&self, id: BookId, value: i64) -> Result<f64, CatalogError> {
        self.ensure_rating(id)?;
        let value = RatingValue::try_from(value)?;
        self.append(id, value)
    }

    /// Like `submit_rating`, for a raw JSON value; non-integers are rejected.
    pub fn submit_rating_json(
        &self,
        id: BookId,
        value: &serde_json::Value,
    ) -> Result<f64, CatalogError> {
        self.ensure_rating(id)?;
        let value = RatingValue::from_json(value)?;
        self.append(id, value)
    }

    /// Current leaderboard; empty when no rating has enough values.
    pub fn top_rated(&self) -> Result<Vec<TopRatedEntry>, CatalogError> {
        let ratings = self.store.list_ratings(&QueryFilter::match_all())?;
        let scanned = ratings.len();
        let board = rank_top_rated(ratings, &self.leaderboard);
        debug!(
            "event=top_rated module=service status=ok scanned={scanned} ranked={}",
            board.len()
        );
        Ok(board)
    }

    fn ensure_rating(&self, id: BookId) -> Result<(), CatalogError> {
        if self.store.rating_exists(id)? {
            Ok(())
        } else {
            Err(CatalogError::RatingNotFound(id))
        }
    }

    /// Re-checks existence inside the store write; a concurrent delete still
    /// surfaces as `NotFound`.
    fn append(&self, id: BookId, value: RatingValue) -> Result<f64, CatalogError> {
        let average = self
            .store
            .append_rating_value(id, value)
            .map_err(|err| match err {
                RepoError::NotFound(id) => CatalogError::RatingNotFound(id),
                other => CatalogError::from(other),
            })?;

        info!("event=rating_submit module=service status=ok book_id={id}");
        Ok(average)
    }
}
