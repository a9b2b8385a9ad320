//! Core domain types for the Stammtisch venue finder.
//!
//! The crate holds everything that does not talk to the network: venues and
//! participants, the great-circle and travel-time helpers, the provider traits
//! implemented by the HTTP adapters in `stammtisch-data`, the session object
//! carrying per-run choices, and the ranking engine itself.
//!
//! Coordinates are WGS84 [`geo::Coord`] values with `x = longitude` and
//! `y = latitude` throughout.

#![forbid(unsafe_code)]

pub mod geodesy;
pub mod lookup;
mod mode;
mod participant;
pub mod ranking;
mod session;
mod venue;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use geodesy::{EARTH_RADIUS_KM, estimate_travel_minutes, great_circle_km};
pub use lookup::{
    GeocodedAddress, Geocoder, LookupError, ProviderError, RouteEstimate, RouteOutcome,
    RouteProvider, RouteRequest, VenueSource,
};
pub use mode::{CalculationMethod, ParseOptionError, TransportMode};
pub use participant::{LocationOverride, Participant, ResolvedParticipant};
pub use ranking::{
    DEFAULT_CONCURRENCY, DistanceSample, RankingEngine, RankingRequest, SampleSource,
    VenueRanking,
};
pub use session::{Session, SessionError};
pub use venue::{Venue, VenueCategory};
