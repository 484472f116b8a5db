//! Country data providers
//!
//! The `CountryProvider` trait and its REST Countries implementation.

pub mod rest_countries;
pub mod traits;

pub use rest_countries::RestCountriesProvider;
pub use traits::CountryProvider;
