//! GraphHopper request and response bodies.
//!
//! Only the fields the adapters read are modelled; everything else in the
//! response is ignored.
//!
//! See: <https://docs.graphhopper.com/>

use serde::{Deserialize, Serialize};
use stammtisch_core::{RouteRequest, TransportMode};

/// Body of a `POST /route` request.
#[derive(Debug, Serialize)]
pub struct RouteBody {
    /// Start and end as `[lng, lat]` pairs.
    pub points: [[f64; 2]; 2],
    /// Routing profile name.
    pub profile: &'static str,
    /// Locale for instructions.
    pub locale: &'static str,
    /// Whether to return the path geometry.
    pub calc_points: bool,
}

impl RouteBody {
    /// Build the body for `request`.
    #[must_use]
    pub fn from_request(request: &RouteRequest) -> Self {
        Self {
            points: [
                [request.origin.x, request.origin.y],
                [request.destination.x, request.destination.y],
            ],
            profile: profile(request.mode),
            locale: LOCALE,
            calc_points: false,
        }
    }
}

/// Locale sent with every request.
pub const LOCALE: &str = "de";

/// GraphHopper profile name for `mode`.
#[must_use]
pub const fn profile(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Walk => "foot",
        TransportMode::Bike => "bike",
        TransportMode::Car => "car",
    }
}

/// Response of `POST /route`.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Alternative paths, best first.
    #[serde(default)]
    pub paths: Vec<RoutePath>,
}

/// One routed path.
#[derive(Debug, Deserialize)]
pub struct RoutePath {
    /// Length in metres.
    pub distance: Option<f64>,
    /// Duration in milliseconds.
    pub time: Option<f64>,
}

/// Response of `GET /geocode`.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    /// Matches, best first.
    #[serde(default)]
    pub hits: Vec<GeocodeHit>,
}

/// One geocoding match.
#[derive(Debug, Deserialize)]
pub struct GeocodeHit {
    /// Matched position.
    pub point: GeocodePoint,
    /// Display name.
    pub name: Option<String>,
}

/// Position of a [`GeocodeHit`].
#[derive(Debug, Deserialize)]
pub struct GeocodePoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}
