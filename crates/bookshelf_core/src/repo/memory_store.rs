//! In-process catalog record store.
//!
//! Used by tests and embedders that do not need durability.
//!
//! # Invariants
//! - Lock order is `books` before `ratings`; `issued_ids` is never held with
//!   another lock.
//! - Each rating sits behind its own mutex: appends to one book serialize,
//!   appends to different books only share a read lock on the index.
//! - ISBN uniqueness is checked and claimed under the `books` write lock.

use crate::model::book::{Book, BookId};
use crate::model::filter::QueryFilter;
use crate::model::rating::{Rating, RatingValue};
use crate::repo::book_repo::{BookRepository, RepoError, RepoResult};
use crate::repo::id_registry::IdRegistry;
use crate::repo::rating_repo::RatingRepository;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

#[derive(Default)]
struct BookTable {
    next_seq: u64,
    rows: BTreeMap<u64, Book>,
    seq_by_id: HashMap<BookId, u64>,
    id_by_isbn: HashMap<String, BookId>,
}

struct RatingSlot {
    seq: u64,
    record: Arc<Mutex<Rating>>,
}

#[derive(Default)]
pub struct MemoryStore {
    books: RwLock<BookTable>,
    ratings: RwLock<HashMap<BookId, RatingSlot>>,
    issued_ids: Mutex<HashSet<BookId>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rating_handle(&self, id: BookId) -> RepoResult<Option<Arc<Mutex<Rating>>>> {
        let ratings = self
            .ratings
            .read()
            .map_err(|_| RepoError::LockPoisoned("ratings"))?;
        Ok(ratings.get(&id).map(|slot| Arc::clone(&slot.record)))
    }
}

impl BookRepository for MemoryStore {
    fn insert_book(&self, book: &Book) -> RepoResult<()> {
        let mut books = self
            .books
            .write()
            .map_err(|_| RepoError::LockPoisoned("books"))?;
        if books.id_by_isbn.contains_key(&book.isbn) {
            return Err(RepoError::DuplicateIsbn(book.isbn.clone()));
        }
        if books.seq_by_id.contains_key(&book.id) {
            return Err(RepoError::InvalidData(format!(
                "book id {} is already stored",
                book.id
            )));
        }

        let mut ratings = self
            .ratings
            .write()
            .map_err(|_| RepoError::LockPoisoned("ratings"))?;

        let seq = books.next_seq;
        books.next_seq += 1;
        books.rows.insert(seq, book.clone());
        books.seq_by_id.insert(book.id, seq);
        books.id_by_isbn.insert(book.isbn.clone(), book.id);
        ratings.insert(
            book.id,
            RatingSlot {
                seq,
                record: Arc::new(Mutex::new(Rating::empty(book.id, book.title.as_str()))),
            },
        );
        Ok(())
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let books = self
            .books
            .read()
            .map_err(|_| RepoError::LockPoisoned("books"))?;
        Ok(books
            .seq_by_id
            .get(&id)
            .and_then(|seq| books.rows.get(seq))
            .cloned())
    }

    fn find_book_by_isbn(&self, isbn: &str) -> RepoResult<Option<Book>> {
        let books = self
            .books
            .read()
            .map_err(|_| RepoError::LockPoisoned("books"))?;
        Ok(books
            .id_by_isbn
            .get(isbn)
            .and_then(|id| books.seq_by_id.get(id))
            .and_then(|seq| books.rows.get(seq))
            .cloned())
    }

    fn list_books(&self, filter: &QueryFilter) -> RepoResult<Vec<Book>> {
        let books = self
            .books
            .read()
            .map_err(|_| RepoError::LockPoisoned("books"))?;
        Ok(books
            .rows
            .values()
            .filter(|book| filter.matches_book(book))
            .cloned()
            .collect())
    }

    fn replace_book(&self, book: &Book) -> RepoResult<()> {
        let mut books = self
            .books
            .write()
            .map_err(|_| RepoError::LockPoisoned("books"))?;
        let seq = *books
            .seq_by_id
            .get(&book.id)
            .ok_or(RepoError::NotFound(book.id))?;
        if let Some(owner) = books.id_by_isbn.get(&book.isbn) {
            if *owner != book.id {
                return Err(RepoError::DuplicateIsbn(book.isbn.clone()));
            }
        }

        if let Some(previous) = books.rows.insert(seq, book.clone()) {
            books.id_by_isbn.remove(&previous.isbn);
        }
        books.id_by_isbn.insert(book.isbn.clone(), book.id);
        Ok(())
    }

    fn delete_book(&self, id: BookId) -> RepoResult<()> {
        let mut books = self
            .books
            .write()
            .map_err(|_| RepoError::LockPoisoned("books"))?;
        let seq = books.seq_by_id.remove(&id).ok_or(RepoError::NotFound(id))?;
        if let Some(removed) = books.rows.remove(&seq) {
            books.id_by_isbn.remove(&removed.isbn);
        }

        let mut ratings = self
            .ratings
            .write()
            .map_err(|_| RepoError::LockPoisoned("ratings"))?;
        ratings.remove(&id);
        Ok(())
    }
}

impl RatingRepository for MemoryStore {
    fn rating_exists(&self, id: BookId) -> RepoResult<bool> {
        Ok(self.rating_handle(id)?.is_some())
    }

    fn get_rating(&self, id: BookId) -> RepoResult<Option<Rating>> {
        let Some(handle) = self.rating_handle(id)? else {
            return Ok(None);
        };
        let rating = handle
            .lock()
            .map_err(|_| RepoError::LockPoisoned("rating"))?;
        Ok(Some(rating.clone()))
    }

    fn list_ratings(&self, filter: &QueryFilter) -> RepoResult<Vec<Rating>> {
        let mut handles: Vec<(u64, Arc<Mutex<Rating>>)> = {
            let ratings = self
                .ratings
                .read()
                .map_err(|_| RepoError::LockPoisoned("ratings"))?;
            ratings
                .values()
                .map(|slot| (slot.seq, Arc::clone(&slot.record)))
                .collect()
        };
        handles.sort_by_key(|(seq, _)| *seq);

        let mut listed = Vec::new();
        for (_, handle) in handles {
            let rating = handle
                .lock()
                .map_err(|_| RepoError::LockPoisoned("rating"))?;
            if filter.matches_rating(&rating) {
                listed.push(rating.clone());
            }
        }
        Ok(listed)
    }

    fn append_rating_value(&self, id: BookId, value: RatingValue) -> RepoResult<f64> {
        let handle = self.rating_handle(id)?.ok_or(RepoError::NotFound(id))?;
        let mut rating = handle
            .lock()
            .map_err(|_| RepoError::LockPoisoned("rating"))?;
        Ok(rating.push(value))
    }
}

impl IdRegistry for MemoryStore {
    fn register_id(&self, id: BookId) -> RepoResult<bool> {
        let mut issued = self
            .issued_ids
            .lock()
            .map_err(|_| RepoError::LockPoisoned("issued_ids"))?;
        Ok(issued.insert(id))
    }
}
