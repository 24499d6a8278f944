//! Command execution against one catalog database.

use crate::cli::{AddArgs, Command, UpdateArgs};
use anyhow::{anyhow, Context, Result};
use bookshelf_core::db::migrations::schema_version;
use bookshelf_core::db::open_db;
use bookshelf_core::{
    core_version, parse_book_id, BookService, BookUpdateRequest, CatalogError, GoogleBooksLookup,
    NewBookRequest, RatingService, ServiceConfig, SqliteStore,
};
use serde_json::{json, Value};
use std::path::Path;

pub fn execute(command: Command, db_path: &Path, config: ServiceConfig) -> Result<Value> {
    let conn = open_db(db_path)
        .with_context(|| format!("failed to open catalog at `{}`", db_path.display()))?;
    let store = SqliteStore::new(&conn);
    let ratings = RatingService::new(store, config.leaderboard);

    let output = match command {
        Command::Add(args) => {
            let books = book_service(store, config)?;
            let id = books.create_book(&new_book_request(args))?;
            json!({ "ID": id })
        }
        Command::Get { id } => {
            let books = book_service(store, config)?;
            serde_json::to_value(books.get_book(parse_book_id(&id)?)?)?
        }
        Command::List { filters } => {
            let books = book_service(store, config)?;
            serde_json::to_value(books.list_books(split_filters(&filters)?)?)?
        }
        Command::Update(args) => {
            let books = book_service(store, config)?;
            let id = parse_book_id(&args.id)?;
            let book = books.update_book(id, &update_request(args))?;
            json!({ "ID": book.id })
        }
        Command::Delete { id } => {
            let books = book_service(store, config)?;
            let id = books.delete_book(parse_book_id(&id)?)?;
            json!({ "ID": id })
        }
        Command::Rate { id, value } => {
            let raw: Value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            let average = ratings.submit_rating_json(parse_book_id(&id)?, &raw)?;
            json!({ "new_average": average })
        }
        Command::Rating { id } => serde_json::to_value(ratings.get_rating(parse_book_id(&id)?)?)?,
        Command::Ratings { filters } => {
            serde_json::to_value(ratings.list_ratings(split_filters(&filters)?)?)?
        }
        Command::Top => serde_json::to_value(ratings.top_rated()?)?,
        Command::Ping => json!({
            "ping": "pong",
            "core_version": core_version(),
            "schema_version": schema_version(&conn)?,
        }),
    };
    Ok(output)
}

fn book_service(
    store: SqliteStore<'_>,
    config: ServiceConfig,
) -> Result<BookService<SqliteStore<'_>, GoogleBooksLookup>> {
    let lookup = GoogleBooksLookup::new(&config.lookup).map_err(CatalogError::from)?;
    Ok(BookService::new(store, lookup, config))
}

fn new_book_request(args: AddArgs) -> NewBookRequest {
    NewBookRequest {
        title: args.title,
        isbn: args.isbn,
        genre: args.genre,
    }
}

fn update_request(args: UpdateArgs) -> BookUpdateRequest {
    BookUpdateRequest {
        title: args.title,
        authors: args.authors,
        isbn: args.isbn,
        publisher: args.publisher,
        published_date: args.published_date,
        genre: args.genre,
    }
}

/// Splits `field=value` arguments; the value may itself contain `=`.
fn split_filters(filters: &[String]) -> Result<Vec<(&str, &str)>> {
    filters
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .ok_or_else(|| anyhow!("filter `{pair}` must look like field=value"))
        })
        .collect()
}
