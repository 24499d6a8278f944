//! Registry of issued book identifiers.
//!
//! # Invariants
//! - `register_id` is a single insert-if-absent; two callers can never both
//!   claim the same identifier.
//! - Identifiers stay registered after their book is deleted.

use crate::model::book::BookId;
use crate::repo::book_repo::RepoResult;
use crate::repo::sqlite_store::SqliteStore;

pub trait IdRegistry {
    /// Records `id` as issued. Returns `false` when it was already issued.
    fn register_id(&self, id: BookId) -> RepoResult<bool>;
}

impl<T: IdRegistry + ?Sized> IdRegistry for &T {
    fn register_id(&self, id: BookId) -> RepoResult<bool> {
        (**self).register_id(id)
    }
}

impl IdRegistry for SqliteStore<'_> {
    fn register_id(&self, id: BookId) -> RepoResult<bool> {
        let inserted = self.conn().execute(
            "INSERT OR IGNORE INTO issued_ids (id) VALUES (?1);",
            [id.to_string()],
        )?;
        Ok(inserted == 1)
    }
}
