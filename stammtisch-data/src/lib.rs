//! HTTP adapters and static catalogues for the Stammtisch venue finder.
//!
//! Responsibilities:
//! - Implement the `stammtisch-core` provider traits against GraphHopper
//!   (routing and geocoding) and Overpass (venue discovery).
//! - Ship the built-in venue catalogue and sample roster.
//!
//! Boundaries:
//! - Do not encode ranking rules (live in `stammtisch-core`).
//! - One request per lookup; retries and fallbacks belong to the caller.
//!
//! Invariants:
//! - API keys never appear in log lines, error values or `Debug` output.
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod catalogue;
pub mod graphhopper;
pub mod overpass;
mod transport;

pub use catalogue::{
    CatalogueError, StaticVenueSource, builtin_roster, builtin_venues, load_roster, load_venues,
};
pub use graphhopper::{HttpGeocoder, HttpRouteProvider};
pub use overpass::{DiscoveryDefaults, HttpVenueSource, VenueQuery};
pub use transport::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpConfig, ProviderBuildError};
