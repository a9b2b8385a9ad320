//! Lookups against external collaborators: routing, geocoding and venue
//! discovery.
//!
//! The traits here are implemented over HTTP by `stammtisch-data` and by
//! deterministic stubs in [`crate::test_support`]. Every lookup reports one of
//! three failure kinds through [`LookupError`]: nothing was found, the provider
//! failed, or the input was unusable.
//!
//! Routing results are folded into a [`RouteOutcome`] before the ranking
//! engine sees them, so the great-circle fallback is an ordinary match rather
//! than error plumbing.

mod error;
mod outcome;
mod provider;

pub use error::{LookupError, ProviderError};
pub use outcome::RouteOutcome;
pub use provider::{
    GeocodedAddress, Geocoder, RouteEstimate, RouteProvider, RouteRequest, VenueSource,
};
