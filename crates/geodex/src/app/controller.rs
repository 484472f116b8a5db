//! Application controller
//!
//! Owns the stores, the provider and the shared snapshot, and processes
//! commands from every frontend one at a time. Favorite mutations, the
//! favorites view and the detail view are refused while no user is logged in.

use std::sync::{Arc, Mutex};

use crossbeam_channel::Receiver;
use tracing::{error, warn};

use crate::data::favorites::{FavoritesStore, Toggle};
use crate::data::filter::FilterState;
use crate::data::session::SessionStore;
use crate::data::types::{BorderCountry, Country, CountryDetail, FavoriteEntry};
use crate::providers::CountryProvider;

use super::events::Observers;
use super::state::{AppCommand, AppEvent, AppSnapshot, Notice};

const LOGIN_TO_FAVORITE: &str = "Please log in to add favorites";
const LOGIN_TO_MANAGE: &str = "Please log in to manage favorites";
const LOGIN_TO_VIEW: &str = "Please log in to view country details";
const LOGIN_TO_LIST: &str = "Please log in to view favorites";

pub struct AppController {
    session: SessionStore,
    favorites: FavoritesStore,
    filter: FilterState,
    provider: Box<dyn CountryProvider>,
    countries: Vec<Country>,
    detail: Option<CountryDetail>,
    borders: Vec<BorderCountry>,
    notice: Option<Notice>,
    login_required: bool,
    last_error: Option<String>,
    shared_state: Arc<Mutex<AppSnapshot>>,
    observers: Observers<AppEvent>,
    /// Events raised by the command in progress
    pending: Vec<AppEvent>,
}

impl AppController {
    pub fn new(
        session: SessionStore,
        favorites: FavoritesStore,
        provider: Box<dyn CountryProvider>,
    ) -> Self {
        let mut controller = Self {
            session,
            favorites,
            filter: FilterState::new(),
            provider,
            countries: Vec::new(),
            detail: None,
            borders: Vec::new(),
            notice: None,
            login_required: false,
            last_error: None,
            shared_state: Arc::new(Mutex::new(AppSnapshot::default())),
            observers: Observers::new(),
            pending: Vec::new(),
        };
        controller.publish();
        controller
    }

    /// Run the controller loop until `Shutdown` or all senders are gone
    pub fn run(&mut self, cmd_rx: &Receiver<AppCommand>) {
        while let Ok(cmd) = cmd_rx.recv() {
            if self.handle_command(cmd) {
                break;
            }
        }
    }

    /// Handle a single command. Returns true if the loop should exit.
    pub fn handle_command(&mut self, cmd: AppCommand) -> bool {
        self.notice = None;
        self.login_required = false;

        match cmd {
            AppCommand::Shutdown => return true,

            AppCommand::Login { username, password } => self.login(&username, &password),
            AppCommand::Logout => self.logout(),

            AppCommand::LoadCountries => self.load_countries(),
            AppCommand::ShowCountry(code) => self.show_country(&code),

            AppCommand::SetSearchTerm(term) => {
                self.filter.set_search_term(term);
                self.pending.push(AppEvent::FiltersChanged);
            }
            AppCommand::SetRegion(region) => {
                self.filter.set_region(region);
                self.pending.push(AppEvent::FiltersChanged);
            }
            AppCommand::ClearFilters => {
                self.filter.clear();
                self.pending.push(AppEvent::FiltersChanged);
            }

            AppCommand::ShowFavorites => {
                self.require_login(LOGIN_TO_LIST);
            }
            AppCommand::AddFavorite(entry) => self.add_favorite(entry),
            AppCommand::ToggleFavorite(entry) => self.toggle_favorite(entry),
            AppCommand::RemoveFavorite(code) => self.remove_favorite(&code),
        }

        self.publish();
        false
    }

    /// Current snapshot (cloned)
    pub fn snapshot(&self) -> AppSnapshot {
        self.shared_state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Handle on the snapshot for frontends on other threads
    pub fn shared_state(&self) -> Arc<Mutex<AppSnapshot>> {
        Arc::clone(&self.shared_state)
    }

    /// Receive events for every subsequent command
    pub fn subscribe(&mut self) -> Receiver<AppEvent> {
        self.observers.subscribe()
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    // =========================================================================
    // Session
    // =========================================================================

    fn login(&mut self, username: &str, password: &str) {
        match self.session.login(username, password) {
            Ok(true) => {
                self.post_notice(Notice::success(format!("Welcome, {username}")));
                self.pending.push(AppEvent::SessionChanged);
            }
            Ok(false) => self.post_notice(Notice::error("Invalid username or password")),
            Err(e) => {
                error!("Failed to save session: {e}");
                self.post_notice(Notice::error(format!("Could not save session: {e}")));
            }
        }
    }

    fn logout(&mut self) {
        let result = self.session.logout();
        self.detail = None;
        self.borders.clear();
        self.pending.push(AppEvent::SessionChanged);

        match result {
            Ok(()) => self.post_notice(Notice::success("Logged out")),
            Err(e) => {
                error!("Failed to save session: {e}");
                self.post_notice(Notice::error(format!("Could not save session: {e}")));
            }
        }
    }

    /// Refuse the command unless a user is logged in
    fn require_login(&mut self, message: &str) -> bool {
        if self.session.is_authenticated() {
            return true;
        }
        self.login_required = true;
        self.post_notice(Notice::error(message));
        false
    }

    // =========================================================================
    // Data loading
    // =========================================================================

    fn load_countries(&mut self) {
        match self.provider.all_countries() {
            Ok(countries) => {
                self.countries = countries;
                self.last_error = None;
            }
            Err(e) => {
                error!("Error fetching countries: {e}");
                self.countries.clear();
                self.last_error = Some(e.to_string());
                self.post_notice(Notice::error("Could not load countries"));
            }
        }
        self.pending.push(AppEvent::CountriesLoaded {
            count: self.countries.len(),
        });
    }

    fn show_country(&mut self, code: &str) {
        if !self.require_login(LOGIN_TO_VIEW) {
            return;
        }

        self.detail = None;
        self.borders.clear();

        match self.provider.country(code) {
            Ok(Some(detail)) => {
                self.borders = self
                    .provider
                    .border_countries(&detail.borders)
                    .unwrap_or_else(|e| {
                        warn!("Error fetching border countries: {e}");
                        Vec::new()
                    });
                self.last_error = None;
                self.pending.push(AppEvent::DetailLoaded {
                    code: detail.code().to_string(),
                });
                self.detail = Some(detail);
            }
            Ok(None) => self.post_notice(Notice::error(format!("Country not found: {code}"))),
            Err(e) => {
                error!("Error fetching country {code}: {e}");
                self.last_error = Some(e.to_string());
                self.post_notice(Notice::error(format!("Could not load country {code}")));
            }
        }
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    fn add_favorite(&mut self, entry: FavoriteEntry) {
        if !self.require_login(LOGIN_TO_FAVORITE) {
            return;
        }

        let name = entry.name.clone();
        match self.favorites.add(entry) {
            Ok(true) => {
                self.post_notice(Notice::success(format!("{name} added to favorites")));
                self.pending.push(AppEvent::FavoritesChanged);
            }
            Ok(false) => {
                self.post_notice(Notice::success(format!("{name} is already in favorites")))
            }
            Err(e) => self.favorites_write_failed(e),
        }
    }

    fn toggle_favorite(&mut self, entry: FavoriteEntry) {
        if !self.require_login(LOGIN_TO_FAVORITE) {
            return;
        }

        let name = entry.name.clone();
        match self.favorites.toggle(entry) {
            Ok(toggle) => {
                let action = match toggle {
                    Toggle::Added => "added to",
                    Toggle::Removed => "removed from",
                };
                self.post_notice(Notice::success(format!("{name} {action} favorites")));
                self.pending.push(AppEvent::FavoritesChanged);
            }
            Err(e) => self.favorites_write_failed(e),
        }
    }

    fn remove_favorite(&mut self, code: &str) {
        if !self.require_login(LOGIN_TO_MANAGE) {
            return;
        }

        match self.favorites.remove(code) {
            Ok(Some(entry)) => {
                self.post_notice(Notice::success(format!(
                    "{} removed from favorites",
                    entry.name
                )));
                self.pending.push(AppEvent::FavoritesChanged);
            }
            Ok(None) => self.post_notice(Notice::error(format!("{code} is not in favorites"))),
            Err(e) => self.favorites_write_failed(e),
        }
    }

    fn favorites_write_failed(&mut self, e: crate::error::AppError) {
        error!("Failed to save favorites: {e}");
        self.post_notice(Notice::error(format!("Could not save favorites: {e}")));
    }

    // =========================================================================
    // Publishing
    // =========================================================================

    fn post_notice(&mut self, notice: Notice) {
        self.pending.push(AppEvent::Notice(notice.clone()));
        self.notice = Some(notice);
    }

    /// Rebuild the shared snapshot, then notify subscribers
    fn publish(&mut self) {
        let snapshot = AppSnapshot {
            is_authenticated: self.session.is_authenticated(),
            username: self.session.username().map(str::to_string),
            favorites: self.favorites.all().to_vec(),
            search_term: self.filter.search_term().to_string(),
            region: self.filter.region(),
            visible: self.filter.apply(&self.countries).into_iter().cloned().collect(),
            total_countries: self.countries.len(),
            detail: self.detail.clone(),
            borders: self.borders.clone(),
            notice: self.notice.clone(),
            login_required: self.login_required,
            last_error: self.last_error.clone(),
        };

        *self.shared_state.lock().unwrap_or_else(|e| e.into_inner()) = snapshot;

        for event in std::mem::take(&mut self.pending) {
            self.observers.notify(&event);
        }
    }
}
