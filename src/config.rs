//! Runtime configuration for the cache and the remote API
//!
//! Cache TTLs are configured per collection in minutes. Development mode uses
//! much shorter TTLs so cached data turns over quickly while testing.

use crate::cache::Collection;

/// Default base URL for TheSportsDB free API
pub const DEFAULT_API_URL: &str = "https://www.thesportsdb.com/api/v1/json/3";

/// Base URL used by the local mock server in tests
pub const TEST_API_URL: &str = "http://localhost:3000/api/v1/json/3";

/// Deployment environment, selects which cache TTLs apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Development,
}

/// Cache behaviour for a single collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Time-to-live in minutes
    pub ttl_minutes: u64,
    /// Storage size (in MB) above which stats log a warning; never enforced
    pub storage_warning_threshold_mb: u64,
    /// Whether writes trigger a debounced sweep of expired entries
    pub auto_cleanup: bool,
}

impl CollectionConfig {
    const fn new(ttl_minutes: u64, storage_warning_threshold_mb: u64) -> Self {
        Self {
            ttl_minutes,
            storage_warning_threshold_mb,
            auto_cleanup: true,
        }
    }

    /// Returns a copy with a different TTL
    pub const fn with_ttl(mut self, ttl_minutes: u64) -> Self {
        self.ttl_minutes = ttl_minutes;
        self
    }

    /// Warning threshold converted to bytes
    pub fn storage_warning_threshold_bytes(&self) -> u64 {
        self.storage_warning_threshold_mb * 1024 * 1024
    }
}

/// Per-collection cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub leagues: CollectionConfig,
    pub badges: CollectionConfig,
    pub search_results: CollectionConfig,
    /// Informational only: every `Collection` has its own entry, so
    /// `for_collection` never falls back to this
    pub default: CollectionConfig,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::production()
    }
}

impl CacheSettings {
    /// Production settings: a day for leagues, a week for badges, an hour for searches
    pub const fn production() -> Self {
        Self {
            leagues: CollectionConfig::new(24 * 60, 5),
            badges: CollectionConfig::new(7 * 24 * 60, 50),
            search_results: CollectionConfig::new(60, 2),
            default: CollectionConfig::new(60, 10),
        }
    }

    /// Development settings keep thresholds but shorten every TTL
    pub const fn development() -> Self {
        let prod = Self::production();
        Self {
            leagues: prod.leagues.with_ttl(5),
            badges: prod.badges.with_ttl(30),
            search_results: prod.search_results.with_ttl(2),
            default: prod.default.with_ttl(5),
        }
    }

    pub const fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
    }

    /// Returns the configuration for a collection
    pub fn for_collection(&self, collection: Collection) -> &CollectionConfig {
        match collection {
            Collection::Leagues => &self.leagues,
            Collection::Badges => &self.badges,
            Collection::SearchResults => &self.search_results,
        }
    }
}

/// Location of the remote leagues API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub leagues_endpoint: String,
    pub seasons_endpoint: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl ApiConfig {
    pub fn production() -> Self {
        Self::with_base_url(DEFAULT_API_URL)
    }

    pub fn test() -> Self {
        Self::with_base_url(TEST_API_URL)
    }

    /// Standard endpoints under a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            leagues_endpoint: "/all_leagues.php".to_string(),
            seasons_endpoint: "/search_all_seasons.php".to_string(),
        }
    }

    pub fn leagues_url(&self) -> String {
        format!("{}{}", self.base_url, self.leagues_endpoint)
    }

    pub fn seasons_url(&self) -> String {
        format!("{}{}", self.base_url, self.seasons_endpoint)
    }
}

/// Converts minutes to milliseconds, or `None` if the result overflows
pub const fn minutes_to_ms(minutes: u64) -> Option<u64> {
    minutes.checked_mul(60 * 1000)
}
