//! Command-line surface and its configuration.
//!
//! Every setting can come from a flag or a `BOOKSHELF_*` environment variable.

use bookshelf_core::{LookupConfig, ServiceConfig, UnknownIsbnPolicy};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "bookshelf", author, version, about = "Book catalog and rating leaderboard")]
pub struct Cli {
    /// SQLite database file.
    #[arg(long, env = "BOOKSHELF_DB", default_value = "bookshelf.sqlite3")]
    pub db: PathBuf,

    /// Volumes endpoint of the external catalog.
    #[arg(
        long,
        env = "BOOKSHELF_CATALOG_URL",
        default_value = bookshelf_core::config::DEFAULT_CATALOG_URL
    )]
    pub catalog_url: String,

    /// Upper bound for one catalog lookup, in seconds.
    #[arg(long, env = "BOOKSHELF_LOOKUP_TIMEOUT_SECS", default_value_t = 5)]
    pub lookup_timeout_secs: u64,

    /// Behavior for ISBNs the catalog does not know: reject | fill-defaults.
    #[arg(long, env = "BOOKSHELF_UNKNOWN_ISBN", default_value = "reject")]
    pub unknown_isbn: UnknownIsbnPolicy,

    /// Log level: trace | debug | info | warn | error.
    #[arg(long, env = "BOOKSHELF_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "BOOKSHELF_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            lookup: LookupConfig {
                base_url: self.catalog_url.clone(),
                timeout: Duration::from_secs(self.lookup_timeout_secs),
            },
            unknown_isbn: self.unknown_isbn,
            ..ServiceConfig::default()
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a book from title, ISBN and genre; prints the new id.
    Add(AddArgs),
    /// Show one book.
    Get { id: String },
    /// List books; filters are `field=value` pairs.
    List { filters: Vec<String> },
    /// Replace every field of a book.
    Update(UpdateArgs),
    /// Delete a book and its rating.
    Delete { id: String },
    /// Submit a rating value (integer 1-5).
    Rate { id: String, value: String },
    /// Show one rating record.
    Rating { id: String },
    /// List rating records; filters are `field=value` pairs.
    Ratings { filters: Vec<String> },
    /// Show the top-rated leaderboard.
    Top,
    /// Open the catalog and report core and schema versions.
    Ping,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub isbn: String,
    #[arg(long)]
    pub genre: String,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub authors: String,
    #[arg(long)]
    pub isbn: String,
    #[arg(long)]
    pub publisher: String,
    #[arg(long)]
    pub published_date: String,
    #[arg(long)]
    pub genre: String,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use bookshelf_core::UnknownIsbnPolicy;
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn flags_fill_service_config() {
        let cli = Cli::parse_from([
            "bookshelf",
            "--catalog-url",
            "http://localhost:9000/volumes",
            "--lookup-timeout-secs",
            "2",
            "--unknown-isbn",
            "fill-defaults",
            "top",
        ]);
        let config = cli.service_config();
        assert_eq!(config.lookup.base_url, "http://localhost:9000/volumes");
        assert_eq!(config.lookup.timeout, Duration::from_secs(2));
        assert_eq!(config.unknown_isbn, UnknownIsbnPolicy::FillDefaults);
        assert!(matches!(cli.command, Command::Top));
    }

    #[test]
    fn list_collects_filter_pairs() {
        let cli = Cli::parse_from(["bookshelf", "list", "genre=Fiction", "authors=Mark Twain"]);
        match cli.command {
            Command::List { filters } => {
                assert_eq!(filters, ["genre=Fiction", "authors=Mark Twain"])
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ping_takes_no_arguments() {
        let cli = Cli::parse_from(["bookshelf", "ping"]);
        assert!(matches!(cli.command, Command::Ping));
        assert!(Cli::try_parse_from(["bookshelf", "ping", "extra"]).is_err());
    }
}
