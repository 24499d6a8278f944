//! Book repository contract and SQLite implementation.
//!
//! # Invariants
//! - A book is always inserted together with its empty rating record.
//! - Deleting a book deletes its rating and rating values in the same write.
//! - At most one book per ISBN; the `UNIQUE` constraint decides races.

use crate::db::DbError;
use crate::model::book::{Book, BookId};
use crate::model::filter::{FilterField, QueryFilter};
use crate::model::rating::Rating;
use crate::repo::sqlite_store::{is_isbn_conflict, parse_book_row, where_clause, SqliteStore};
use rusqlite::{params, params_from_iter};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    authors,
    isbn,
    publisher,
    published_date,
    genre
FROM books";

pub type RepoResult<T> = Result<T, RepoError>;

/// Record store error shared by every repository contract.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(BookId),
    DuplicateIsbn(String),
    InvalidData(String),
    /// A writer panicked while holding an in-memory lock.
    LockPoisoned(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::DuplicateIsbn(isbn) => write!(f, "a book with ISBN {isbn} already exists"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
            Self::LockPoisoned(table) => write!(f, "in-memory {table} lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for book records.
pub trait BookRepository {
    /// Inserts `book` and an empty rating titled after it, atomically.
    fn insert_book(&self, book: &Book) -> RepoResult<()>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn find_book_by_isbn(&self, isbn: &str) -> RepoResult<Option<Book>>;
    /// Lists matching books in creation order.
    fn list_books(&self, filter: &QueryFilter) -> RepoResult<Vec<Book>>;
    /// Replaces every mutable field of the stored book with `book`'s values.
    fn replace_book(&self, book: &Book) -> RepoResult<()>;
    /// Deletes the book and its rating.
    fn delete_book(&self, id: BookId) -> RepoResult<()>;
}

impl<T: BookRepository + ?Sized> BookRepository for &T {
    fn insert_book(&self, book: &Book) -> RepoResult<()> {
        (**self).insert_book(book)
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        (**self).get_book(id)
    }

    fn find_book_by_isbn(&self, isbn: &str) -> RepoResult<Option<Book>> {
        (**self).find_book_by_isbn(isbn)
    }

    fn list_books(&self, filter: &QueryFilter) -> RepoResult<Vec<Book>> {
        (**self).list_books(filter)
    }

    fn replace_book(&self, book: &Book) -> RepoResult<()> {
        (**self).replace_book(book)
    }

    fn delete_book(&self, id: BookId) -> RepoResult<()> {
        (**self).delete_book(id)
    }
}

impl BookRepository for SqliteStore<'_> {
    fn insert_book(&self, book: &Book) -> RepoResult<()> {
        let rating = Rating::empty(book.id, book.title.as_str());
        let tx = self.write_tx()?;

        tx.execute(
            "INSERT INTO books (
                id,
                title,
                authors,
                isbn,
                publisher,
                published_date,
                genre
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                book.id.to_string(),
                book.title.as_str(),
                book.authors.as_str(),
                book.isbn.as_str(),
                book.publisher.as_str(),
                book.published_date.as_str(),
                book.genre.as_str(),
            ],
        )
        .map_err(|err| isbn_error(err, &book.isbn))?;

        tx.execute(
            "INSERT INTO ratings (id, title, average) VALUES (?1, ?2, ?3);",
            params![rating.id.to_string(), rating.title.as_str(), rating.average],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }
        Ok(None)
    }

    fn find_book_by_isbn(&self, isbn: &str) -> RepoResult<Option<Book>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE isbn = ?1;"))?;
        let mut rows = stmt.query([isbn])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }
        Ok(None)
    }

    fn list_books(&self, filter: &QueryFilter) -> RepoResult<Vec<Book>> {
        let (clause, bind_values) = where_clause(filter, book_column);
        let sql = format!("{BOOK_SELECT_SQL}{clause} ORDER BY seq ASC;");

        let mut stmt = self.conn().prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }

    fn replace_book(&self, book: &Book) -> RepoResult<()> {
        let changed = self
            .conn()
            .execute(
                "UPDATE books
                 SET
                    title = ?2,
                    authors = ?3,
                    isbn = ?4,
                    publisher = ?5,
                    published_date = ?6,
                    genre = ?7
                 WHERE id = ?1;",
                params![
                    book.id.to_string(),
                    book.title.as_str(),
                    book.authors.as_str(),
                    book.isbn.as_str(),
                    book.publisher.as_str(),
                    book.published_date.as_str(),
                    book.genre.as_str(),
                ],
            )
            .map_err(|err| isbn_error(err, &book.isbn))?;

        if changed == 0 {
            return Err(RepoError::NotFound(book.id));
        }
        Ok(())
    }

    fn delete_book(&self, id: BookId) -> RepoResult<()> {
        let id_text = id.to_string();
        let tx = self.write_tx()?;

        tx.execute(
            "DELETE FROM rating_values WHERE rating_id = ?1;",
            [id_text.as_str()],
        )?;
        tx.execute("DELETE FROM ratings WHERE id = ?1;", [id_text.as_str()])?;
        let changed = tx.execute("DELETE FROM books WHERE id = ?1;", [id_text.as_str()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        tx.commit()?;
        Ok(())
    }
}

fn book_column(field: FilterField) -> Option<&'static str> {
    Some(match field {
        FilterField::Title => "title",
        FilterField::Authors => "authors",
        FilterField::Isbn => "isbn",
        FilterField::Publisher => "publisher",
        FilterField::PublishedDate => "published_date",
        FilterField::Genre => "genre",
        FilterField::Id => "id",
    })
}

fn isbn_error(err: rusqlite::Error, isbn: &str) -> RepoError {
    if is_isbn_conflict(&err) {
        RepoError::DuplicateIsbn(isbn.to_string())
    } else {
        err.into()
    }
}
