//! Core domain logic for the bookshelf catalog service.
//! Book and rating records, identifier allocation, rating aggregation and the
//! top-rated leaderboard live here; transport layers only call into services.

pub mod config;
pub mod db;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{LeaderboardConfig, LookupConfig, ServiceConfig, UnknownIsbnPolicy};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use lookup::{CatalogEntry, CatalogLookup, GoogleBooksLookup, LookupError};
pub use model::book::{
    Book, BookId, BookUpdateRequest, BookValidationError, Genre, NewBookRequest, MISSING_FIELD,
};
pub use model::filter::{build_filter, FilterError, FilterField, QueryFilter};
pub use model::rating::{Rating, RatingValidationError, RatingValue, TopRatedEntry};
pub use repo::book_repo::{BookRepository, RepoError, RepoResult};
pub use repo::id_registry::IdRegistry;
pub use repo::memory_store::MemoryStore;
pub use repo::rating_repo::RatingRepository;
pub use repo::sqlite_store::SqliteStore;
pub use service::book_service::BookService;
pub use service::error::{parse_book_id, CatalogError, ErrorKind};
pub use service::id_allocator::allocate_id;
pub use service::leaderboard::rank_top_rated;
pub use service::rating_service::RatingService;

/// Version of the catalog core linked into the running binary.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
