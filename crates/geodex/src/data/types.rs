//! Common data types
//!
//! Country projections as consumed by the listing, detail and favorites
//! views, plus the fixed set of filter regions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Region
// =============================================================================

/// Coarse geographic grouping offered by the region filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Africa,
    Americas,
    Asia,
    Europe,
    Oceania,
}

impl Region {
    /// All selectable regions, in display order
    pub const ALL: [Region; 5] = [
        Region::Africa,
        Region::Americas,
        Region::Asia,
        Region::Europe,
        Region::Oceania,
    ];

    /// Label as it appears in API `region` fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Africa => "Africa",
            Region::Americas => "Americas",
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::Oceania => "Oceania",
        }
    }

    /// Parse a selector value where the empty string means "no region"
    pub fn parse_optional(s: &str) -> Result<Option<Region>, UnknownRegion> {
        if s.trim().is_empty() {
            Ok(None)
        } else {
            s.parse().map(Some)
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a region label is not one of [`Region::ALL`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRegion(pub String);

impl fmt::Display for UnknownRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected: Vec<&str> = Region::ALL.iter().map(Region::as_str).collect();
        write!(
            f,
            "unknown region '{}' (expected one of: {})",
            self.0,
            expected.join(", ")
        )
    }
}

impl std::error::Error for UnknownRegion {}

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Region::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

// =============================================================================
// Country - listing projection
// =============================================================================

/// Flag image references
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Flag {
    /// SVG image URL
    #[serde(default)]
    pub svg: String,
    /// PNG image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
    /// Alt text describing the flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// A country as shown in listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code, the unique key
    #[serde(rename = "cca2")]
    pub code: String,
    /// Common name
    pub name: String,
    #[serde(default)]
    pub flag: Flag,
    #[serde(default)]
    pub population: u64,
    /// Region label (e.g. "Europe")
    #[serde(default)]
    pub region: String,
    /// Capital cities, if the country has any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital: Option<Vec<String>>,
}

impl Country {
    /// Create a country with minimal info
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            flag: Flag::default(),
            population: 0,
            region: String::new(),
            capital: None,
        }
    }

    /// Set region label
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set population
    pub fn with_population(mut self, population: u64) -> Self {
        self.population = population;
        self
    }

    /// Set capitals
    pub fn with_capital(mut self, capital: Vec<String>) -> Self {
        self.capital = Some(capital);
        self
    }

    /// Set flag references
    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flag = flag;
        self
    }

    /// Whether the region label equals `region`
    pub fn in_region(&self, region: Region) -> bool {
        self.region == region.as_str()
    }
}

// =============================================================================
// CountryDetail - full projection for the detail view
// =============================================================================

/// A currency in use
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Currency {
    /// ISO 4217 code
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// Side of the road traffic drives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrivingSide {
    Left,
    Right,
}

impl DrivingSide {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "left" => Some(DrivingSide::Left),
            "right" => Some(DrivingSide::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DrivingSide::Left => "left",
            DrivingSide::Right => "right",
        }
    }
}

/// A country with every field the detail view shows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryDetail {
    #[serde(flatten)]
    pub country: Country,
    pub official_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subregion: Option<String>,
    #[serde(default)]
    pub tld: Vec<String>,
    #[serde(default)]
    pub currencies: Vec<Currency>,
    #[serde(default)]
    pub languages: Vec<String>,
    /// Alpha-3 codes of neighbouring countries
    #[serde(default)]
    pub borders: Vec<String>,
    #[serde(default)]
    pub timezones: Vec<String>,
    /// Area in km²
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub un_member: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driving_side: Option<DrivingSide>,
}

impl CountryDetail {
    /// Detail record with only the listing fields filled in
    pub fn from_country(country: Country) -> Self {
        let official_name = country.name.clone();
        Self {
            country,
            official_name,
            native_name: None,
            subregion: None,
            tld: Vec::new(),
            currencies: Vec::new(),
            languages: Vec::new(),
            borders: Vec::new(),
            timezones: Vec::new(),
            area: None,
            un_member: None,
            driving_side: None,
        }
    }

    pub fn code(&self) -> &str {
        &self.country.code
    }

    pub fn name(&self) -> &str {
        &self.country.name
    }
}

/// Neighbour link shown on the detail view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BorderCountry {
    #[serde(rename = "cca2")]
    pub code: String,
    pub name: String,
}

// =============================================================================
// FavoriteEntry - reduced projection stored by the user
// =============================================================================

/// A bookmarked country
///
/// Holds the listing fields only, so the favorites view renders without
/// touching the network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteEntry {
    #[serde(rename = "cca2")]
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub flag: Flag,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital: Option<Vec<String>>,
}

impl FavoriteEntry {
    /// Create an entry with minimal info
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self::from(Country::new(code, name))
    }
}

impl From<Country> for FavoriteEntry {
    fn from(c: Country) -> Self {
        Self {
            code: c.code,
            name: c.name,
            flag: c.flag,
            population: c.population,
            region: c.region,
            capital: c.capital,
        }
    }
}

impl From<&Country> for FavoriteEntry {
    fn from(c: &Country) -> Self {
        Self::from(c.clone())
    }
}

impl From<&CountryDetail> for FavoriteEntry {
    fn from(d: &CountryDetail) -> Self {
        Self::from(d.country.clone())
    }
}
