//! Facade crate for the Stammtisch venue finder.
//!
//! This crate re-exports the core domain types and ranking engine, and, behind
//! the `http` feature, the GraphHopper and Overpass adapters together with the
//! built-in catalogues.

#![forbid(unsafe_code)]

pub use stammtisch_core::{
    CalculationMethod, DEFAULT_CONCURRENCY, DistanceSample, EARTH_RADIUS_KM, GeocodedAddress,
    Geocoder, LocationOverride, LookupError, ParseOptionError, Participant, ProviderError,
    RankingEngine, RankingRequest, ResolvedParticipant, RouteEstimate, RouteOutcome,
    RouteProvider, RouteRequest, SampleSource, Session, SessionError, TransportMode, Venue,
    VenueCategory, VenueRanking, VenueSource, estimate_travel_minutes, great_circle_km,
};

#[cfg(feature = "test-support")]
pub use stammtisch_core::test_support;

#[cfg(feature = "http")]
pub use stammtisch_data::{
    CatalogueError, DiscoveryDefaults, HttpConfig, HttpGeocoder, HttpRouteProvider,
    HttpVenueSource, ProviderBuildError, StaticVenueSource, VenueQuery, builtin_roster,
    builtin_venues, load_roster, load_venues,
};
