//! SQLite-backed catalog record store.
//!
//! # Invariants
//! - The store borrows a connection that went through `db::open_db*`.
//! - Multi-row writes use `BEGIN IMMEDIATE`, so competing writers on other
//!   connections wait on the busy timeout instead of interleaving.
//! - Multi-row reads run inside one read transaction and observe a single
//!   committed state.

use crate::model::book::{Book, BookId, Genre};
use crate::model::filter::{FilterField, QueryFilter};
use crate::model::rating::RatingValue;
use crate::repo::book_repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

/// Catalog store over one SQLite connection.
///
/// Cheap to copy; every worker thread builds one over its own connection.
/// SQLite admits one writer per file, so appends to different books still
/// take turns on the write lock; each holds it only for its own short
/// transaction.
#[derive(Clone, Copy)]
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub(crate) fn conn(&self) -> &'conn Connection {
        self.conn
    }

    /// Starts a write transaction that takes the database write lock up front.
    pub(crate) fn write_tx(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }

    pub(crate) fn read_tx(&self) -> RepoResult<Transaction<'conn>> {
        Ok(self.conn.unchecked_transaction()?)
    }
}

/// Renders `filter` as a SQL `WHERE` clause plus bind values.
///
/// `column_for` maps a field to its column; fields a table does not carry
/// turn the whole clause into a match-nothing predicate.
pub(crate) fn where_clause(
    filter: &QueryFilter,
    column_for: fn(FilterField) -> Option<&'static str>,
) -> (String, Vec<Value>) {
    let mut sql = String::from(" WHERE 1 = 1");
    let mut bind_values = Vec::new();

    for (field, value) in filter.constraints() {
        match column_for(*field) {
            Some(column) => {
                sql.push_str(&format!(" AND {column} = ?"));
                bind_values.push(Value::Text(value.clone()));
            }
            None => {
                return (String::from(" WHERE 0 = 1"), Vec::new());
            }
        }
    }

    (sql, bind_values)
}

pub(crate) fn parse_id(value: &str, column: &str) -> RepoResult<BookId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid id value `{value}` in {column}")))
}

pub(crate) fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let id_text: String = row.get("id")?;
    let genre_text: String = row.get("genre")?;
    let genre = genre_text.parse::<Genre>().map_err(|_| {
        RepoError::InvalidData(format!("invalid genre `{genre_text}` in books.genre"))
    })?;

    Ok(Book {
        id: parse_id(&id_text, "books.id")?,
        title: row.get("title")?,
        authors: row.get("authors")?,
        isbn: row.get("isbn")?,
        publisher: row.get("publisher")?,
        published_date: row.get("published_date")?,
        genre,
    })
}

pub(crate) fn parse_value(raw: i64) -> RepoResult<u8> {
    RatingValue::try_from(raw)
        .map(RatingValue::get)
        .map_err(|_| {
            RepoError::InvalidData(format!("invalid rating value `{raw}` in rating_values.value"))
        })
}

/// Whether `err` is the `UNIQUE` violation on `books.isbn`.
pub(crate) fn is_isbn_conflict(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, Some(message))
            if inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                && message.contains("books.isbn")
    )
}
