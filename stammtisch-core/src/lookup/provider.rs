//! Provider traits and the values they exchange.

use async_trait::async_trait;
use geo::Coord;

use crate::{TransportMode, Venue};

use super::error::LookupError;

/// A single origin/destination routing query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    /// Start of the journey.
    pub origin: Coord<f64>,
    /// End of the journey.
    pub destination: Coord<f64>,
    /// How the journey is made.
    pub mode: TransportMode,
}

/// Distance and duration of one journey.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteEstimate {
    /// Distance in kilometres.
    pub distance_km: f64,
    /// Duration in minutes.
    pub time_min: f64,
}

impl RouteEstimate {
    /// Whether both values are finite and strictly positive.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.distance_km.is_finite()
            && self.time_min.is_finite()
            && self.distance_km > 0.0
            && self.time_min > 0.0
    }
}

/// The first match for a free-text address.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(into = "GeocodedRecord")
)]
pub struct GeocodedAddress {
    /// Matched position.
    pub location: Coord<f64>,
    /// Provider's display name for the match.
    pub display_name: String,
}

impl GeocodedAddress {
    /// Construct a geocoding match.
    pub fn new(location: Coord<f64>, display_name: impl Into<String>) -> Self {
        Self {
            location,
            display_name: display_name.into(),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize)]
struct GeocodedRecord {
    lat: f64,
    lng: f64,
    display_address: String,
}

#[cfg(feature = "serde")]
impl From<GeocodedAddress> for GeocodedRecord {
    fn from(value: GeocodedAddress) -> Self {
        Self {
            lat: value.location.y,
            lng: value.location.x,
            display_address: value.display_name,
        }
    }
}

/// Compute the road or path distance between two points.
///
/// Implementations perform one lookup per call with no retries; the ranking
/// engine owns fallback behaviour.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use stammtisch_core::{LookupError, RouteEstimate, RouteProvider, RouteRequest};
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl RouteProvider for FixedProvider {
///     async fn route(&self, _request: &RouteRequest) -> Result<RouteEstimate, LookupError> {
///         Ok(RouteEstimate { distance_km: 1.0, time_min: 12.0 })
///     }
/// }
/// ```
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Look up the first route for `request`.
    async fn route(&self, request: &RouteRequest) -> Result<RouteEstimate, LookupError>;
}

/// Resolve free-text addresses to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Return the first match for `address`.
    ///
    /// Implementations must return [`LookupError::InvalidInput`] for a blank
    /// address without contacting the provider.
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress, LookupError>;
}

/// Supply the candidate venues for a ranking.
#[async_trait]
pub trait VenueSource: Send + Sync {
    /// Load every known venue.
    async fn venues(&self) -> Result<Vec<Venue>, LookupError>;
}
