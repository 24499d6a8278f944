#![allow(dead_code)]

use bookshelf_core::{CatalogEntry, CatalogLookup, LookupError, NewBookRequest};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Catalog lookup answering from a fixed table; unknown ISBNs are "not found".
#[derive(Default)]
pub struct StaticLookup {
    entries: HashMap<String, CatalogEntry>,
    unavailable: bool,
    calls: AtomicUsize,
}

impl StaticLookup {
    pub fn with_entry(
        mut self,
        isbn: &str,
        authors: &[&str],
        publisher: &str,
        date: &str,
    ) -> Self {
        self.entries.insert(
            isbn.to_string(),
            CatalogEntry {
                authors: authors.iter().map(|name| name.to_string()).collect(),
                publisher: Some(publisher.to_string()),
                published_date: Some(date.to_string()),
            },
        );
        self
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CatalogLookup for StaticLookup {
    fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<CatalogEntry>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(LookupError::Status(503));
        }
        Ok(self.entries.get(isbn).cloned())
    }
}

pub fn library_lookup() -> StaticLookup {
    StaticLookup::default()
        .with_entry(
            "9780520343641",
            &["Mark Twain"],
            "Univ of California Press",
            "2010",
        )
        .with_entry(
            "9780060853983",
            &["Terry Pratchett", "Neil Gaiman"],
            "Harper Collins",
            "2006-11-28",
        )
        .with_entry("9780141439518", &["Jane Austen"], "Penguin", "2003-04-29")
}

pub fn request(title: &str, isbn: &str, genre: &str) -> NewBookRequest {
    NewBookRequest {
        title: title.to_string(),
        isbn: isbn.to_string(),
        genre: genre.to_string(),
    }
}
