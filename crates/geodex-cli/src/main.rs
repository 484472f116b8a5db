//! geodex CLI — browse countries and manage favorites from the terminal

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use geodex::app::{AppCommand, AppController, AppSnapshot};
use geodex::data::format;
use geodex::data::{
    CountryDetail, FavoriteEntry, FavoritesStore, FileStorage, Region, SessionStore, Storage,
};
use geodex::providers::RestCountriesProvider;

#[derive(Parser)]
#[command(name = "geodex", about = "Country explorer", version)]
struct Cli {
    /// Directory holding the session and favorites files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// REST Countries base URL (overrides GEODEX_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List countries, optionally filtered
    List {
        /// Case-insensitive name substring
        #[arg(long)]
        search: Option<String>,
        /// One of Africa, Americas, Asia, Europe, Oceania
        #[arg(long)]
        region: Option<Region>,
    },
    /// Show details for a country code (requires login)
    Show { code: String },
    /// Log in with username and password
    Login { username: String, password: String },
    /// Log out of the current session
    Logout,
    /// Print the logged-in user
    Whoami,
    /// Manage favorite countries
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    List,
    Add { code: String },
    Remove { code: String },
    Toggle { code: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut controller = match build_controller(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let snapshot = match cli.command {
        Command::List { search, region } => {
            controller.handle_command(AppCommand::LoadCountries);
            if let Some(term) = search {
                controller.handle_command(AppCommand::SetSearchTerm(term));
            }
            controller.handle_command(AppCommand::SetRegion(region));
            let snap = controller.snapshot();
            print_listing(&snap);
            snap
        }
        Command::Show { code } => {
            controller.handle_command(AppCommand::ShowCountry(normalize(&code)));
            let snap = controller.snapshot();
            if let Some(detail) = &snap.detail {
                print_detail(detail, &snap);
            }
            snap
        }
        Command::Login { username, password } => {
            controller.handle_command(AppCommand::Login { username, password });
            controller.snapshot()
        }
        Command::Logout => {
            controller.handle_command(AppCommand::Logout);
            controller.snapshot()
        }
        Command::Whoami => {
            let snap = controller.snapshot();
            match &snap.username {
                Some(name) => println!("{}", name),
                None => println!("Not logged in"),
            }
            snap
        }
        Command::Favorites { action } => match action.unwrap_or(FavoritesAction::List) {
            FavoritesAction::List => {
                controller.handle_command(AppCommand::ShowFavorites);
                let snap = controller.snapshot();
                if !snap.login_required {
                    print_favorites(&snap);
                }
                snap
            }
            FavoritesAction::Add { code } => {
                let entry = resolve_entry(&mut controller, &normalize(&code));
                if let Some(entry) = entry {
                    controller.handle_command(AppCommand::AddFavorite(entry));
                }
                controller.snapshot()
            }
            FavoritesAction::Toggle { code } => {
                let code = normalize(&code);
                let existing = controller.favorites().get(&code).cloned();
                let entry = existing.or_else(|| resolve_entry(&mut controller, &code));
                if let Some(entry) = entry {
                    controller.handle_command(AppCommand::ToggleFavorite(entry));
                }
                controller.snapshot()
            }
            FavoritesAction::Remove { code } => {
                controller.handle_command(AppCommand::RemoveFavorite(normalize(&code)));
                controller.snapshot()
            }
        },
    };

    if let Some(notice) = &snapshot.notice {
        if notice.is_error() {
            eprintln!("Error: {}", notice.message);
            if let Some(detail) = &snapshot.last_error {
                eprintln!("  {}", detail);
            }
            std::process::exit(1);
        }
        println!("{}", notice.message);
    }

    Ok(())
}

fn build_controller(cli: &Cli) -> geodex::error::Result<AppController> {
    let storage: Arc<dyn Storage> = Arc::new(match &cli.data_dir {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::default_location()?,
    });

    let session = SessionStore::load(storage.clone())?;
    let favorites = FavoritesStore::load(storage)?;

    let provider = match &cli.api_url {
        Some(url) => RestCountriesProvider::with_base_url(url)?,
        None => RestCountriesProvider::new()?,
    };

    Ok(AppController::new(session, favorites, Box::new(provider)))
}

/// Country codes are stored upper-case
fn normalize(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Build a favorite entry for `code` from the detail endpoint.
///
/// While logged out the entry is a bare placeholder so the controller
/// refuses it with the usual notice instead of a lookup error.
fn resolve_entry(controller: &mut AppController, code: &str) -> Option<FavoriteEntry> {
    if !controller.session().is_authenticated() {
        return Some(FavoriteEntry::new(code, code));
    }
    controller.handle_command(AppCommand::ShowCountry(code.to_string()));
    controller.snapshot().detail.as_ref().map(FavoriteEntry::from)
}

// =============================================================================
// Output
// =============================================================================

fn print_listing(snap: &AppSnapshot) {
    for country in &snap.visible {
        let marker = if snap.is_favorite(&country.code) { "*" } else { " " };
        println!(
            "{} {:<3} {:<32} {:<9} {:>8}  {}",
            marker,
            country.code,
            country.name,
            country.region,
            format::compact_population(country.population),
            format::capitals(country.capital.as_deref()),
        );
    }
    println!(
        "{} of {} countries",
        snap.visible.len(),
        snap.total_countries
    );
}

fn print_detail(detail: &CountryDetail, snap: &AppSnapshot) {
    let country = &detail.country;
    let star = if snap.is_favorite(&country.code) { " *" } else { "" };
    println!("{} ({}){}", country.name, country.code, star);
    println!("  Official name:  {}", detail.official_name);
    println!(
        "  Native name:    {}",
        detail.native_name.as_deref().unwrap_or(format::NOT_AVAILABLE)
    );
    println!("  Region:         {}", country.region);
    println!(
        "  Subregion:      {}",
        detail.subregion.as_deref().unwrap_or(format::NOT_AVAILABLE)
    );
    println!(
        "  Capital:        {}",
        format::capitals(country.capital.as_deref())
    );
    println!("  Population:     {}", format::grouped(country.population));
    println!("  Area:           {}", format::area(detail.area));
    println!("  Currencies:     {}", format::currencies(&detail.currencies));
    println!("  Languages:      {}", format::languages(&detail.languages));
    println!("  Top-level dom.: {}", format::joined(&detail.tld));
    println!("  Timezones:      {}", format::joined(&detail.timezones));
    println!(
        "  Drives on:      {}",
        detail
            .driving_side
            .map(|s| s.as_str())
            .unwrap_or(format::NOT_AVAILABLE)
    );
    println!("  UN member:      {}", format::yes_no(detail.un_member));
    if !country.flag.svg.is_empty() {
        println!("  Flag:           {}", country.flag.svg);
    }

    if snap.borders.is_empty() {
        println!("  Borders:        none");
    } else {
        println!("  Borders:");
        for border in &snap.borders {
            println!("    {:<3} {}", border.code, border.name);
        }
    }
}

fn print_favorites(snap: &AppSnapshot) {
    if snap.favorites.is_empty() {
        println!("No favorites yet");
        return;
    }
    for fav in &snap.favorites {
        println!(
            "{:<3} {:<32} {:<9} {:>8}  {}",
            fav.code,
            fav.name,
            fav.region,
            format::compact_population(fav.population),
            format::capitals(fav.capital.as_deref()),
        );
    }
}
