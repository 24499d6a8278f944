//! Book use-case service.
//!
//! # Responsibility
//! - Create books from caller input plus external catalog metadata.
//! - Provide read, filtered list, full-replacement update and cascading delete.
//!
//! # Invariants
//! - Requests are validated before the lookup or any write happens.
//! - A lookup failure always rejects creation; an unknown ISBN follows
//!   `ServiceConfig::unknown_isbn`.
//! - ISBN uniqueness is finally decided by the store, so concurrent creations
//!   of one ISBN yield exactly one success.

use crate::config::{ServiceConfig, UnknownIsbnPolicy};
use crate::lookup::{CatalogEntry, CatalogLookup};
use crate::model::book::{Book, BookId, BookUpdateRequest, NewBookRequest};
use crate::model::filter::build_filter;
use crate::repo::book_repo::BookRepository;
use crate::repo::id_registry::IdRegistry;
use crate::service::error::CatalogError;
use crate::service::id_allocator::allocate_id;
use log::{info, warn};

/// Book service facade over a record store and a catalog lookup.
pub struct BookService<S, L> {
    store: S,
    lookup: L,
    config: ServiceConfig,
}

impl<S, L> BookService<S, L>
where
    S: BookRepository + IdRegistry,
    L: CatalogLookup,
{
    pub fn new(store: S, lookup: L, config: ServiceConfig) -> Self {
        Self {
            store,
            lookup,
            config,
        }
    }

    /// Creates a book and its empty rating; returns the new identifier.
    ///
    /// # Errors
    /// - `Validation` for a blank title/ISBN or an unknown genre.
    /// - `Conflict` when the ISBN is already catalogued.
    /// - `UpstreamUnavailable` when the lookup fails, or the ISBN is unknown
    ///   under `UnknownIsbnPolicy::Reject`.
    pub fn create_book(&self, request: &NewBookRequest) -> Result<BookId, CatalogError> {
        let new_book = request.validate()?;

        if self.store.find_book_by_isbn(&new_book.isbn)?.is_some() {
            return Err(CatalogError::DuplicateIsbn(new_book.isbn));
        }

        let entry = match self.lookup.lookup_by_isbn(&new_book.isbn) {
            Ok(Some(entry)) => entry,
            Ok(None) => match self.config.unknown_isbn {
                UnknownIsbnPolicy::Reject => {
                    warn!("event=book_create module=service status=error error_code=isbn_unknown");
                    return Err(CatalogError::UnknownIsbn(new_book.isbn));
                }
                UnknownIsbnPolicy::FillDefaults => CatalogEntry::default(),
            },
            Err(err) => {
                warn!("event=book_create module=service status=error error_code=lookup_failed");
                return Err(err.into());
            }
        };

        let id = allocate_id(&self.store, self.config.max_id_attempts)?;
        let book = Book {
            id,
            authors: entry.authors_line(),
            publisher: entry.publisher_or_missing(),
            published_date: entry.published_date_or_missing(),
            title: new_book.title,
            isbn: new_book.isbn,
            genre: new_book.genre,
        };
        self.store.insert_book(&book)?;

        info!("event=book_create module=service status=ok book_id={id}");
        Ok(id)
    }

    pub fn get_book(&self, id: BookId) -> Result<Book, CatalogError> {
        self.store
            .get_book(id)?
            .ok_or(CatalogError::BookNotFound(id))
    }

    /// Lists books matching whitelisted `field=value` parameters.
    pub fn list_books<I, K, V>(&self, params: I) -> Result<Vec<Book>, CatalogError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let filter = build_filter(params)?;
        Ok(self.store.list_books(&filter)?)
    }

    /// Replaces every mutable field of an existing book.
    ///
    /// The rating keeps the title it was created with.
    pub fn update_book(
        &self,
        id: BookId,
        request: &BookUpdateRequest,
    ) -> Result<Book, CatalogError> {
        let update = request.validate()?;
        let book = Book::from_update(id, update);
        self.store.replace_book(&book)?;

        info!("event=book_update module=service status=ok book_id={id}");
        Ok(book)
    }

    /// Deletes a book together with its rating.
    pub fn delete_book(&self, id: BookId) -> Result<BookId, CatalogError> {
        self.store.delete_book(id)?;
        info!("event=book_delete module=service status=ok book_id={id}");
        Ok(id)
    }
}
