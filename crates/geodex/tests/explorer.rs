//! End-to-end flow through the controller with file-backed storage

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::unbounded;

use geodex::app::{AppCommand, AppController, AppEvent, Notice};
use geodex::data::{
    BorderCountry, Country, CountryDetail, FavoriteEntry, FavoritesStore, FileStorage, Region,
    SessionStore, Storage,
};
use geodex::error::Result;
use geodex::providers::CountryProvider;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn temp_dir() -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("geodex_e2e_{}_{}", std::process::id(), n))
}

struct FixtureProvider;

impl FixtureProvider {
    fn directory() -> Vec<Country> {
        vec![
            Country::new("FR", "France")
                .with_region("Europe")
                .with_population(67_391_582)
                .with_capital(vec!["Paris".to_string()]),
            Country::new("DE", "Germany")
                .with_region("Europe")
                .with_population(83_240_525),
            Country::new("GF", "French Guiana").with_region("Americas"),
            Country::new("KE", "Kenya").with_region("Africa"),
        ]
    }
}

impl CountryProvider for FixtureProvider {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn all_countries(&self) -> Result<Vec<Country>> {
        Ok(Self::directory())
    }

    fn country(&self, code: &str) -> Result<Option<CountryDetail>> {
        Ok(Self::directory()
            .into_iter()
            .find(|c| c.code == code)
            .map(|c| {
                let mut detail = CountryDetail::from_country(c);
                if code == "FR" {
                    detail.borders = vec!["DEU".to_string(), "ESP".to_string()];
                }
                detail
            }))
    }

    fn border_countries(&self, codes: &[String]) -> Result<Vec<BorderCountry>> {
        Ok(codes
            .iter()
            .map(|code| BorderCountry {
                code: code.clone(),
                name: code.to_lowercase(),
            })
            .collect())
    }
}

fn open(dir: &PathBuf) -> AppController {
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(dir));
    let session = SessionStore::load(storage.clone()).unwrap();
    let favorites = FavoritesStore::load(storage).unwrap();
    AppController::new(session, favorites, Box::new(FixtureProvider))
}

fn login() -> AppCommand {
    AppCommand::Login {
        username: "testuser".to_string(),
        password: "password123".to_string(),
    }
}

#[test]
fn test_browse_favorite_and_restart() {
    let dir = temp_dir();

    {
        let mut app = open(&dir);
        app.handle_command(AppCommand::LoadCountries);
        app.handle_command(AppCommand::SetSearchTerm("fr".to_string()));
        app.handle_command(AppCommand::SetRegion(Some(Region::Europe)));

        let snap = app.snapshot();
        assert_eq!(snap.visible.len(), 1);
        let france = snap.visible[0].clone();

        // Refused while anonymous
        app.handle_command(AppCommand::AddFavorite(FavoriteEntry::from(&france)));
        let snap = app.snapshot();
        assert!(snap.login_required);
        assert!(snap.favorites.is_empty());

        app.handle_command(login());
        app.handle_command(AppCommand::AddFavorite(FavoriteEntry::from(&france)));
        app.handle_command(AppCommand::ShowCountry("FR".to_string()));

        let snap = app.snapshot();
        assert!(snap.is_favorite("FR"));
        assert_eq!(snap.borders.len(), 2);
        assert_eq!(snap.detail.map(|d| d.country.population), Some(67_391_582));
    }

    // Session and favorites rehydrate, filters do not
    let mut app = open(&dir);
    let snap = app.snapshot();
    assert_eq!(snap.username.as_deref(), Some("testuser"));
    assert_eq!(snap.favorites.len(), 1);
    assert_eq!(snap.favorites[0].capital, Some(vec!["Paris".to_string()]));
    assert_eq!(snap.region, None);

    // Logging out keeps the shared favorites
    app.handle_command(AppCommand::Logout);
    drop(app);
    let snap = open(&dir).snapshot();
    assert!(!snap.is_authenticated);
    assert!(snap.is_favorite("FR"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_controller_thread_serves_commands() {
    let dir = temp_dir();
    let mut app = open(&dir);
    let shared = app.shared_state();
    let events = app.subscribe();
    let (tx, rx) = unbounded();

    let handle = thread::spawn(move || app.run(&rx));

    tx.send(login()).unwrap();
    tx.send(AppCommand::ToggleFavorite(FavoriteEntry::new("KE", "Kenya")))
        .unwrap();
    tx.send(AppCommand::ToggleFavorite(FavoriteEntry::new("KE", "Kenya")))
        .unwrap();
    tx.send(AppCommand::Shutdown).unwrap();
    handle.join().unwrap();

    let snap = shared.lock().unwrap().clone();
    assert!(snap.favorites.is_empty());
    assert_eq!(
        snap.notice,
        Some(Notice::success("Kenya removed from favorites"))
    );

    let received: Vec<AppEvent> = events.try_iter().collect();
    let favorite_changes = received
        .iter()
        .filter(|e| **e == AppEvent::FavoritesChanged)
        .count();
    assert_eq!(favorite_changes, 2);

    let _ = std::fs::remove_dir_all(&dir);
}
