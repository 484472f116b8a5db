//! Data and persistence
//!
//! Country types, session and favorites stores, listing filters.

pub mod favorites;
pub mod filter;
pub mod format;
pub mod session;
pub mod storage;
pub mod types;

// Re-export common types
pub use favorites::{FavoritesStore, Toggle};
pub use filter::FilterState;
pub use session::{Authenticator, FixedCredentials, Session, SessionStore};
pub use storage::{config_dir, FileStorage, MemoryStorage, Storage};
pub use types::{
    BorderCountry, Country, CountryDetail, Currency, DrivingSide, FavoriteEntry, Flag, Region,
    UnknownRegion,
};
