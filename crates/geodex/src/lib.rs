//! geodex — Country Explorer Core
//!
//! Session and favorites stores with local persistence, listing filters,
//! and a retrying client for the REST Countries API.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use geodex::app::{AppCommand, AppController};
//! use geodex::data::{FavoritesStore, FileStorage, SessionStore, Storage};
//! use geodex::providers::RestCountriesProvider;
//!
//! # fn main() -> geodex::error::Result<()> {
//! let storage: Arc<dyn Storage> = Arc::new(FileStorage::default_location()?);
//! let session = SessionStore::load(storage.clone())?;
//! let favorites = FavoritesStore::load(storage)?;
//! let provider = RestCountriesProvider::new()?;
//!
//! let mut app = AppController::new(session, favorites, Box::new(provider));
//! app.handle_command(AppCommand::LoadCountries);
//! println!("{} countries", app.snapshot().total_countries);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod network;
pub mod providers;
