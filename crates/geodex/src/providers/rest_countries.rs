//! REST Countries API provider
//!
//! Implementation of `CountryProvider` for the REST Countries directory
//! (<https://restcountries.com/>).

use crate::config::providers::{api_base_url, BORDER_FIELDS, LISTING_FIELDS};
use crate::data::types::{BorderCountry, Country, CountryDetail, Currency, DrivingSide, Flag};
use crate::error::Result;
use crate::network::{HttpClient, RetryPolicy};

use super::traits::CountryProvider;

use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

// =============================================================================
// Internal API response types (serde)
// =============================================================================

#[derive(Debug, Deserialize)]
struct RcName {
    common: String,
    #[serde(default)]
    official: String,
    #[serde(default, rename = "nativeName")]
    native_name: BTreeMap<String, RcNativeName>,
}

#[derive(Debug, Deserialize)]
struct RcNativeName {
    #[serde(default)]
    official: String,
    #[serde(default)]
    common: String,
}

#[derive(Debug, Default, Deserialize)]
struct RcFlags {
    #[serde(default)]
    svg: String,
    #[serde(default)]
    png: String,
    #[serde(default)]
    alt: String,
}

#[derive(Debug, Deserialize)]
struct RcCurrency {
    #[serde(default)]
    name: String,
    #[serde(default)]
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct RcCar {
    #[serde(default)]
    side: String,
}

#[derive(Debug, Deserialize)]
struct RcCountry {
    cca2: String,
    name: RcName,
    #[serde(default)]
    flags: RcFlags,
    #[serde(default)]
    population: u64,
    #[serde(default)]
    region: String,
    #[serde(default)]
    subregion: String,
    #[serde(default)]
    capital: Option<Vec<String>>,
    #[serde(default)]
    tld: Vec<String>,
    #[serde(default)]
    currencies: BTreeMap<String, RcCurrency>,
    #[serde(default)]
    languages: BTreeMap<String, String>,
    #[serde(default)]
    borders: Vec<String>,
    #[serde(default)]
    timezones: Vec<String>,
    #[serde(default)]
    area: Option<f64>,
    #[serde(default, rename = "unMember")]
    un_member: Option<bool>,
    #[serde(default)]
    car: Option<RcCar>,
}

#[derive(Debug, Deserialize)]
struct RcBorder {
    cca2: String,
    name: RcName,
}

// =============================================================================
// RcCountry -> Country / CountryDetail conversion
// =============================================================================

/// Convert an empty string to None
fn non_empty(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// First native name (by language key), preferring the common form
fn native_name(names: &BTreeMap<String, RcNativeName>) -> Option<String> {
    names
        .values()
        .next()
        .and_then(|n| non_empty(&n.common).or_else(|| non_empty(&n.official)))
}

impl From<RcFlags> for Flag {
    fn from(rc: RcFlags) -> Self {
        Flag {
            svg: rc.svg,
            png: non_empty(&rc.png),
            alt: non_empty(&rc.alt),
        }
    }
}

impl From<RcCountry> for CountryDetail {
    fn from(rc: RcCountry) -> Self {
        let country = Country {
            code: rc.cca2,
            name: rc.name.common.clone(),
            flag: Flag::from(rc.flags),
            population: rc.population,
            region: rc.region,
            capital: rc.capital.filter(|c| !c.is_empty()),
        };

        let official_name = non_empty(&rc.name.official).unwrap_or_else(|| rc.name.common.clone());

        let currencies = rc
            .currencies
            .into_iter()
            .map(|(code, c)| Currency {
                code,
                name: c.name,
                symbol: non_empty(&c.symbol),
            })
            .collect();

        CountryDetail {
            country,
            official_name,
            native_name: native_name(&rc.name.native_name),
            subregion: non_empty(&rc.subregion),
            tld: rc.tld,
            currencies,
            languages: rc.languages.into_values().collect(),
            borders: rc.borders,
            timezones: rc.timezones,
            area: rc.area,
            un_member: rc.un_member,
            driving_side: rc.car.and_then(|car| DrivingSide::from_label(&car.side)),
        }
    }
}

impl From<RcCountry> for Country {
    fn from(rc: RcCountry) -> Self {
        CountryDetail::from(rc).country
    }
}

impl From<RcBorder> for BorderCountry {
    fn from(rc: RcBorder) -> Self {
        BorderCountry {
            code: rc.cca2,
            name: rc.name.common,
        }
    }
}

/// Country codes are short ASCII alphanumerics (cca2, cca3, ccn3)
fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code.len() <= 3 && code.chars().all(|c| c.is_ascii_alphanumeric())
}

// =============================================================================
// RestCountriesProvider
// =============================================================================

/// REST Countries API provider
///
/// Reads the public [REST Countries](https://restcountries.com/) v3.1 API.
/// Every request goes through the retrying client.
pub struct RestCountriesProvider {
    client: HttpClient,
    base_url: String,
    retry: RetryPolicy,
}

impl RestCountriesProvider {
    /// Create a provider using the configured base URL
    pub fn new() -> Result<Self> {
        Self::with_base_url(api_base_url())
    }

    /// Create a provider with a custom base URL (for testing or mirrors)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        })
    }

    /// Override the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full API URL from an endpoint path
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl CountryProvider for RestCountriesProvider {
    fn name(&self) -> &'static str {
        "REST Countries"
    }

    fn all_countries(&self) -> Result<Vec<Country>> {
        let url = self.url(&format!("/all?fields={}", LISTING_FIELDS));
        let countries: Vec<RcCountry> = self.client.get_json(&url, &self.retry)?;
        Ok(countries.into_iter().map(Country::from).collect())
    }

    fn country(&self, code: &str) -> Result<Option<CountryDetail>> {
        if !is_valid_code(code) {
            return Ok(None);
        }

        let url = self.url(&format!("/alpha/{}", code.to_ascii_lowercase()));
        let resp = self.client.fetch_with_retry(&url, &self.retry)?;
        if !resp.status().is_success() {
            debug!(code, status = resp.status().as_u16(), "country lookup returned no record");
            return Ok(None);
        }

        let countries: Vec<RcCountry> = resp.json()?;
        Ok(countries.into_iter().next().map(CountryDetail::from))
    }

    fn border_countries(&self, codes: &[String]) -> Result<Vec<BorderCountry>> {
        let codes: Vec<&str> = codes
            .iter()
            .map(String::as_str)
            .filter(|c| is_valid_code(c))
            .collect();
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.url(&format!(
            "/alpha?codes={}&fields={}",
            codes.join(","),
            BORDER_FIELDS
        ));
        let resp = self.client.fetch_with_retry(&url, &self.retry)?;
        if !resp.status().is_success() {
            debug!(status = resp.status().as_u16(), "border lookup returned no records");
            return Ok(Vec::new());
        }

        let borders: Vec<RcBorder> = resp.json()?;
        Ok(borders.into_iter().map(BorderCountry::from).collect())
    }
}

// =============================================================================
// Tests
// =============================================================================
