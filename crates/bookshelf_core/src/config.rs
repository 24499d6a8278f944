//! Runtime configuration for catalog services.
//!
//! Values are plain data with defaults; the binary fills them from flags and
//! environment variables.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CATALOG_URL: &str = "https://www.googleapis.com/books/v1/volumes";
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_ID_ATTEMPTS: u32 = 8;
pub const DEFAULT_MIN_LEADERBOARD_VALUES: usize = 3;
pub const DEFAULT_LEADERBOARD_CUTOFF_RANK: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    pub base_url: String,
    /// Upper bound for the whole lookup request, connect included.
    pub timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

/// What book creation does when the catalog has no entry for the ISBN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownIsbnPolicy {
    /// Reject creation as upstream-unavailable.
    #[default]
    Reject,
    /// Create the book with `"missing"` metadata.
    FillDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPolicyError(String);

impl Display for UnknownPolicyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported unknown-ISBN policy `{}`; expected reject|fill-defaults",
            self.0
        )
    }
}

impl Error for UnknownPolicyError {}

impl FromStr for UnknownIsbnPolicy {
    type Err = UnknownPolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "fill-defaults" | "fill_defaults" => Ok(Self::FillDefaults),
            other => Err(UnknownPolicyError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardConfig {
    /// Ratings with fewer values never rank.
    pub min_values: usize,
    /// Rank whose average sets the tie-inclusion threshold.
    pub cutoff_rank: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            min_values: DEFAULT_MIN_LEADERBOARD_VALUES,
            cutoff_rank: DEFAULT_LEADERBOARD_CUTOFF_RANK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub lookup: LookupConfig,
    pub unknown_isbn: UnknownIsbnPolicy,
    /// Identifier candidates tried before allocation gives up.
    pub max_id_attempts: u32,
    pub leaderboard: LeaderboardConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            lookup: LookupConfig::default(),
            unknown_isbn: UnknownIsbnPolicy::default(),
            max_id_attempts: DEFAULT_MAX_ID_ATTEMPTS,
            leaderboard: LeaderboardConfig::default(),
        }
    }
}
