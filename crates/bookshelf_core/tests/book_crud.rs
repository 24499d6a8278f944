mod common;

use bookshelf_core::db::open_db_in_memory;
use bookshelf_core::{
    BookService, BookUpdateRequest, CatalogError, ErrorKind, Genre, MemoryStore, RatingService,
    ServiceConfig, SqliteStore, UnknownIsbnPolicy,
};
use common::{library_lookup, request, StaticLookup};

#[test]
fn create_fills_metadata_from_catalog_and_creates_empty_rating() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    let lookup = library_lookup();
    let books = BookService::new(store, &lookup, ServiceConfig::default());
    let ratings = RatingService::new(store, Default::default());

    let id = books
        .create_book(&request(
            "Good Omens",
            "9780060853983",
            "Fantasy",
        ))
        .unwrap();

    let book = books.get_book(id).unwrap();
    assert_eq!(book.title, "Good Omens");
    assert_eq!(book.authors, "Terry Pratchett and Neil Gaiman");
    assert_eq!(book.publisher, "Harper Collins");
    assert_eq!(book.published_date, "2006-11-28");
    assert_eq!(book.genre, Genre::Fantasy);

    let rating = ratings.get_rating(id).unwrap();
    assert_eq!(rating.title, "Good Omens");
    assert!(rating.values.is_empty());
    assert_eq!(rating.average, 0.0);
}

#[test]
fn ids_are_distinct_across_creations() {
    let store = MemoryStore::new();
    let lookup = library_lookup();
    let books = BookService::new(&store, &lookup, ServiceConfig::default());

    let first = books
        .create_book(&request("Huck Finn", "9780520343641", "Fiction"))
        .unwrap();
    let second = books
        .create_book(&request("Good Omens", "9780060853983", "Fantasy"))
        .unwrap();
    let third = books
        .create_book(&request("Emma", "9780141439518", "Fiction"))
        .unwrap();

    assert_ne!(first, second);
    assert_ne!(first, third);
    assert_ne!(second, third);
}

#[test]
fn duplicate_isbn_is_rejected_before_lookup() {
    let conn = open_db_in_memory().unwrap();
    let lookup = library_lookup();
    let books = BookService::new(SqliteStore::new(&conn), &lookup, ServiceConfig::default());

    books
        .create_book(&request("Emma", "9780141439518", "Fiction"))
        .unwrap();
    let err = books
        .create_book(&request("Emma again", "9780141439518", "Other"))
        .unwrap_err();

    assert!(matches!(err, CatalogError::DuplicateIsbn(_)));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(lookup.calls(), 1);
}

#[test]
fn invalid_genre_is_rejected_without_side_effects() {
    let store = MemoryStore::new();
    let lookup = library_lookup();
    let books = BookService::new(&store, &lookup, ServiceConfig::default());

    let err = books
        .create_book(&request("Emma", "9780141439518", "Romance"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(lookup.calls(), 0);
    assert!(books.list_books(Vec::<(String, String)>::new()).unwrap().is_empty());
}

#[test]
fn lookup_failure_rejects_creation() {
    let store = MemoryStore::new();
    let lookup = StaticLookup::unavailable();
    let books = BookService::new(&store, &lookup, ServiceConfig::default());

    let err = books
        .create_book(&request("Emma", "9780141439518", "Fiction"))
        .unwrap_err();

    assert!(matches!(err, CatalogError::Upstream(_)));
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
    assert!(books.list_books(Vec::<(String, String)>::new()).unwrap().is_empty());
}

#[test]
fn lookup_failure_rejects_even_when_filling_defaults() {
    let store = MemoryStore::new();
    let lookup = StaticLookup::unavailable();
    let config = ServiceConfig {
        unknown_isbn: UnknownIsbnPolicy::FillDefaults,
        ..ServiceConfig::default()
    };
    let books = BookService::new(&store, &lookup, config);

    let err = books
        .create_book(&request("Emma", "9780141439518", "Fiction"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
}

#[test]
fn unknown_isbn_follows_policy() {
    let store = MemoryStore::new();
    let lookup = library_lookup();

    let rejecting = BookService::new(&store, &lookup, ServiceConfig::default());
    let err = rejecting
        .create_book(&request("Unlisted", "0000000000", "Other"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::UnknownIsbn(_)));
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);

    let filling = BookService::new(
        &store,
        &lookup,
        ServiceConfig {
            unknown_isbn: UnknownIsbnPolicy::FillDefaults,
            ..ServiceConfig::default()
        },
    );
    let id = filling
        .create_book(&request("Unlisted", "0000000000", "Other"))
        .unwrap();
    let book = filling.get_book(id).unwrap();
    assert_eq!(book.authors, "missing");
    assert_eq!(book.publisher, "missing");
    assert_eq!(book.published_date, "missing");
}

#[test]
fn list_books_filters_by_whitelisted_fields() {
    let conn = open_db_in_memory().unwrap();
    let lookup = library_lookup();
    let books = BookService::new(SqliteStore::new(&conn), &lookup, ServiceConfig::default());

    let huck = books
        .create_book(&request("Huck Finn", "9780520343641", "Fiction"))
        .unwrap();
    books
        .create_book(&request("Good Omens", "9780060853983", "Fantasy"))
        .unwrap();
    let emma = books
        .create_book(&request("Emma", "9780141439518", "Fiction"))
        .unwrap();

    let all = books.list_books(Vec::<(String, String)>::new()).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].id, huck);

    let fiction = books.list_books([("genre", "Fiction")]).unwrap();
    let ids: Vec<_> = fiction.iter().map(|book| book.id).collect();
    assert_eq!(ids, vec![huck, emma]);

    let narrowed = books
        .list_books([("genre", "Fiction"), ("authors", "Jane Austen")])
        .unwrap();
    assert_eq!(narrowed.len(), 1);
    assert_eq!(narrowed[0].id, emma);

    let by_id = books.list_books([("id", huck.to_string())]).unwrap();
    assert_eq!(by_id.len(), 1);

    let err = books.list_books([("language", "en")]).unwrap_err();
    assert!(matches!(err, CatalogError::InvalidFilter(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn update_replaces_all_fields_but_keeps_rating_title() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    let lookup = library_lookup();
    let books = BookService::new(store, &lookup, ServiceConfig::default());
    let ratings = RatingService::new(store, Default::default());

    let id = books
        .create_book(&request("Emma", "9780141439518", "Fiction"))
        .unwrap();
    let update = BookUpdateRequest {
        title: "Emma (Annotated)".to_string(),
        authors: "Jane Austen".to_string(),
        isbn: "9780141439519".to_string(),
        publisher: "Penguin Classics".to_string(),
        published_date: "2015".to_string(),
        genre: "Other".to_string(),
    };
    books.update_book(id, &update).unwrap();

    let book = books.get_book(id).unwrap();
    assert_eq!(book.title, "Emma (Annotated)");
    assert_eq!(book.isbn, "9780141439519");
    assert_eq!(book.genre, Genre::Other);
    assert_eq!(ratings.get_rating(id).unwrap().title, "Emma");
}

#[test]
fn update_rejects_missing_book_and_taken_isbn() {
    let store = MemoryStore::new();
    let lookup = library_lookup();
    let books = BookService::new(&store, &lookup, ServiceConfig::default());

    let huck = books
        .create_book(&request("Huck Finn", "9780520343641", "Fiction"))
        .unwrap();
    let emma = books
        .create_book(&request("Emma", "9780141439518", "Fiction"))
        .unwrap();

    let mut update = BookUpdateRequest {
        title: "Emma".to_string(),
        authors: "Jane Austen".to_string(),
        isbn: "9780520343641".to_string(),
        publisher: "Penguin".to_string(),
        published_date: "2003".to_string(),
        genre: "Fiction".to_string(),
    };
    let err = books.update_book(emma, &update).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(books.get_book(huck).unwrap().isbn, "9780520343641");

    update.isbn = "9780141439518".to_string();
    let missing = uuid::Uuid::new_v4();
    let err = books.update_book(missing, &update).unwrap_err();
    assert!(matches!(err, CatalogError::BookNotFound(id) if id == missing));
}

#[test]
fn delete_cascades_to_rating() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    let lookup = library_lookup();
    let books = BookService::new(store, &lookup, ServiceConfig::default());
    let ratings = RatingService::new(store, Default::default());

    let id = books
        .create_book(&request("Huck Finn", "9780520343641", "Fiction"))
        .unwrap();
    ratings.submit_rating(id, 4).unwrap();

    assert_eq!(books.delete_book(id).unwrap(), id);

    assert!(matches!(books.get_book(id), Err(CatalogError::BookNotFound(_))));
    assert!(matches!(
        ratings.get_rating(id),
        Err(CatalogError::RatingNotFound(_))
    ));
    assert!(matches!(
        books.delete_book(id),
        Err(CatalogError::BookNotFound(_))
    ));
    assert!(ratings
        .list_ratings(Vec::<(String, String)>::new())
        .unwrap()
        .is_empty());
}

#[test]
fn deleted_isbn_can_be_catalogued_again() {
    let store = MemoryStore::new();
    let lookup = library_lookup();
    let books = BookService::new(&store, &lookup, ServiceConfig::default());

    let first = books
        .create_book(&request("Emma", "9780141439518", "Fiction"))
        .unwrap();
    books.delete_book(first).unwrap();
    let second = books
        .create_book(&request("Emma", "9780141439518", "Fiction"))
        .unwrap();
    assert_ne!(first, second);
}
