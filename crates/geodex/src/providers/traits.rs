//! Country provider trait
//!
//! Defines the read-only interface to an upstream country directory.

use crate::data::types::{BorderCountry, Country, CountryDetail};
use crate::error::Result;

/// A source of country records
///
/// Implementations tolerate missing optional fields. A non-success HTTP
/// status is reported as "not found" or "empty" where the operation allows,
/// transport failures as errors.
pub trait CountryProvider: Send + Sync {
    /// Display name for the provider (e.g., "REST Countries")
    fn name(&self) -> &'static str;

    /// Every country, listing projection only
    fn all_countries(&self) -> Result<Vec<Country>>;

    /// Full record for one country code, `None` if the directory has no such code
    fn country(&self, code: &str) -> Result<Option<CountryDetail>>;

    /// Names for a set of border codes, empty when the lookup finds nothing
    fn border_countries(&self, codes: &[String]) -> Result<Vec<BorderCountry>>;
}
