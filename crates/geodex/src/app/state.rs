//! Shared application state and commands
//!
//! `AppCommand` is the command type sent by any frontend.
//! `AppSnapshot` is the state frontends render from.

use crate::data::types::{BorderCountry, Country, CountryDetail, FavoriteEntry, Region};

/// Commands sent by any frontend
#[derive(Debug, Clone)]
pub enum AppCommand {
    // Session
    Login { username: String, password: String },
    Logout,

    // Data
    LoadCountries,
    ShowCountry(String),

    // Filters
    SetSearchTerm(String),
    SetRegion(Option<Region>),
    ClearFilters,

    // Favorites (require a logged-in session)
    ShowFavorites,
    AddFavorite(FavoriteEntry),
    ToggleFavorite(FavoriteEntry),
    RemoveFavorite(String),

    // Stop the controller loop
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// User-visible feedback for the most recent command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Change notifications pushed to subscribers after a command
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    SessionChanged,
    FavoritesChanged,
    FiltersChanged,
    CountriesLoaded { count: usize },
    DetailLoaded { code: String },
    Notice(Notice),
}

/// Snapshot of app state, rebuilt after every command
#[derive(Clone, Debug, Default)]
pub struct AppSnapshot {
    pub is_authenticated: bool,
    pub username: Option<String>,

    /// Bookmarks in insertion order
    pub favorites: Vec<FavoriteEntry>,

    pub search_term: String,
    pub region: Option<Region>,
    /// Loaded countries passing the current filter
    pub visible: Vec<Country>,
    /// Loaded countries before filtering
    pub total_countries: usize,

    /// Country opened with `ShowCountry`
    pub detail: Option<CountryDetail>,
    pub borders: Vec<BorderCountry>,

    pub notice: Option<Notice>,
    /// True when the last command was refused for lack of a session
    pub login_required: bool,
    /// Last error from loading data
    pub last_error: Option<String>,
}

impl AppSnapshot {
    pub fn is_favorite(&self, code: &str) -> bool {
        self.favorites.iter().any(|f| f.code == code)
    }
}
