//! Listing filters
//!
//! Search text and region selection for the country listing. Lives only
//! in memory and resets with every new controller.

use crate::data::types::{Country, Region};

/// Current search text and region selector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search_term: String,
    region: Option<Region>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search_term(&mut self, text: impl Into<String>) {
        self.search_term = text.into();
    }

    pub fn set_region(&mut self, region: Option<Region>) {
        self.region = region;
    }

    /// Reset both criteria
    pub fn clear(&mut self) {
        self.search_term.clear();
        self.region = None;
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    /// Whether any criterion is set
    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty() || self.region.is_some()
    }

    /// Case-insensitive name substring match AND region equality
    pub fn matches(&self, country: &Country) -> bool {
        let matches_search = self.search_term.is_empty()
            || country
                .name
                .to_lowercase()
                .contains(&self.search_term.to_lowercase());
        let matches_region = self.region.map_or(true, |r| country.in_region(r));
        matches_search && matches_region
    }

    /// Countries passing the filter, in their original order
    pub fn apply<'a>(&self, countries: &'a [Country]) -> Vec<&'a Country> {
        countries.iter().filter(|c| self.matches(c)).collect()
    }
}
