//! Rating repository contract and SQLite implementation.
//!
//! # Invariants
//! - Appending a value and recomputing the average is one write transaction;
//!   concurrent appends to one rating never lose a value.
//! - Values are returned in submission order.

use crate::model::book::BookId;
use crate::model::filter::{FilterField, QueryFilter};
use crate::model::rating::{average_of, Rating, RatingValue};
use crate::repo::book_repo::{RepoError, RepoResult};
use crate::repo::sqlite_store::{parse_id, parse_value, where_clause, SqliteStore};
use rusqlite::{params, params_from_iter, Connection};

/// Repository interface for rating records.
pub trait RatingRepository {
    fn rating_exists(&self, id: BookId) -> RepoResult<bool>;
    fn get_rating(&self, id: BookId) -> RepoResult<Option<Rating>>;
    /// Lists matching ratings in creation order.
    fn list_ratings(&self, filter: &QueryFilter) -> RepoResult<Vec<Rating>>;
    /// Appends `value`, recomputes the average and returns it.
    ///
    /// Returns `RepoError::NotFound` when no rating exists for `id`.
    fn append_rating_value(&self, id: BookId, value: RatingValue) -> RepoResult<f64>;
}

impl<T: RatingRepository + ?Sized> RatingRepository for &T {
    fn rating_exists(&self, id: BookId) -> RepoResult<bool> {
        (**self).rating_exists(id)
    }

    fn get_rating(&self, id: BookId) -> RepoResult<Option<Rating>> {
        (**self).get_rating(id)
    }

    fn list_ratings(&self, filter: &QueryFilter) -> RepoResult<Vec<Rating>> {
        (**self).list_ratings(filter)
    }

    fn append_rating_value(&self, id: BookId, value: RatingValue) -> RepoResult<f64> {
        (**self).append_rating_value(id, value)
    }
}

impl RatingRepository for SqliteStore<'_> {
    fn rating_exists(&self, id: BookId) -> RepoResult<bool> {
        rating_row_exists(self.conn(), &id.to_string())
    }

    fn get_rating(&self, id: BookId) -> RepoResult<Option<Rating>> {
        let tx = self.read_tx()?;
        let row = tx
            .prepare("SELECT id, title, average FROM ratings WHERE id = ?1;")?
            .query_row([id.to_string()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, f64>(2)?))
            });

        let (id_text, title, average) = match row {
            Ok(fields) => fields,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let values = load_values(&tx, &id_text)?;

        Ok(Some(Rating {
            id: parse_id(&id_text, "ratings.id")?,
            title,
            values,
            average,
        }))
    }

    fn list_ratings(&self, filter: &QueryFilter) -> RepoResult<Vec<Rating>> {
        let (clause, bind_values) = where_clause(filter, rating_column);
        let sql = format!("SELECT id, title, average FROM ratings{clause} ORDER BY seq ASC;");

        let tx = self.read_tx()?;
        let mut stmt = tx.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut ratings = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            ratings.push(Rating {
                id: parse_id(&id_text, "ratings.id")?,
                title: row.get("title")?,
                values: load_values(&tx, &id_text)?,
                average: row.get("average")?,
            });
        }
        Ok(ratings)
    }

    fn append_rating_value(&self, id: BookId, value: RatingValue) -> RepoResult<f64> {
        let id_text = id.to_string();
        let tx = self.write_tx()?;

        if !rating_row_exists(&tx, &id_text)? {
            return Err(RepoError::NotFound(id));
        }

        tx.execute(
            "INSERT INTO rating_values (rating_id, value) VALUES (?1, ?2);",
            params![id_text.as_str(), i64::from(value.get())],
        )?;
        let average = average_of(&load_values(&tx, &id_text)?);
        tx.execute(
            "UPDATE ratings SET average = ?2 WHERE id = ?1;",
            params![id_text.as_str(), average],
        )?;

        tx.commit()?;
        Ok(average)
    }
}

fn rating_column(field: FilterField) -> Option<&'static str> {
    match field {
        FilterField::Id => Some("id"),
        FilterField::Title => Some("title"),
        _ => None,
    }
}

fn rating_row_exists(conn: &Connection, rating_id: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM ratings WHERE id = ?1);",
        [rating_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn load_values(conn: &Connection, rating_id: &str) -> RepoResult<Vec<u8>> {
    let mut stmt =
        conn.prepare("SELECT value FROM rating_values WHERE rating_id = ?1 ORDER BY seq ASC;")?;
    let mut rows = stmt.query([rating_id])?;
    let mut values = Vec::new();
    while let Some(row) = rows.next()? {
        values.push(parse_value(row.get(0)?)?);
    }
    Ok(values)
}
