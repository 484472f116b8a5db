//! Configuration constants for geodex

/// Application metadata
pub mod app {
    /// Application name (used for config directory, etc.)
    pub const NAME: &str = "geodex";
}

/// Network-related configuration
pub mod network {
    /// User agent for HTTP requests
    pub const USER_AGENT: &str = concat!("geodex/", env!("CARGO_PKG_VERSION"));

    /// Connection timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Overall request timeout in seconds
    pub const READ_TIMEOUT_SECS: u64 = 30;
}

/// Retry configuration for API requests
pub mod retry {
    /// Attempts per request, including the first one
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Backoff unit in milliseconds (delay before retry n is n * base)
    pub const BASE_DELAY_MS: u64 = 1000;
}

/// Provider-related configuration
pub mod providers {
    /// Default REST Countries API base URL
    pub const REST_COUNTRIES_DEFAULT_URL: &str = "https://restcountries.com/v3.1";

    /// Environment variable overriding the API base URL
    pub const API_URL_ENV: &str = "GEODEX_API_URL";

    /// Fields requested for the listing projection
    pub const LISTING_FIELDS: &str = "name,flags,population,region,capital,cca2";

    /// Fields requested for border links
    pub const BORDER_FIELDS: &str = "name,cca2";

    /// Resolve the API base URL: environment override, else the default
    pub fn api_base_url() -> String {
        std::env::var(API_URL_ENV)
            .ok()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| REST_COUNTRIES_DEFAULT_URL.to_string())
    }
}

/// Local storage keys
pub mod storage {
    /// Session record key
    pub const SESSION_KEY: &str = "auth-storage";

    /// Favorites record key
    pub const FAVORITES_KEY: &str = "favorites-storage";
}
