//! Deterministic provider doubles used by unit and behaviour tests.
//!
//! Nothing here touches the network. Each stub counts the calls it receives so
//! tests can assert that a provider was, or was not, consulted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use geo::Coord;

use crate::{
    GeocodedAddress, Geocoder, LookupError, Participant, ProviderError, RouteEstimate,
    RouteProvider, RouteRequest, Venue, VenueCategory, VenueSource, estimate_travel_minutes,
    great_circle_km,
};

#[derive(Debug, Clone)]
enum StubResponse {
    Fixed(RouteEstimate),
    Error(LookupError),
    /// Great-circle distance multiplied by a detour factor.
    Scaled(f64),
}

/// Stub [`RouteProvider`] returning pre-configured answers.
///
/// # Examples
/// ```
/// use stammtisch_core::RouteEstimate;
/// use stammtisch_core::test_support::StubRouteProvider;
///
/// let provider = StubRouteProvider::fixed(RouteEstimate { distance_km: 2.0, time_min: 10.0 });
/// assert_eq!(provider.calls(), 0);
/// ```
#[derive(Debug)]
pub struct StubRouteProvider {
    response: StubResponse,
    failing_origins: Vec<Coord<f64>>,
    calls: AtomicUsize,
}

impl StubRouteProvider {
    fn with_response(response: StubResponse) -> Self {
        Self {
            response,
            failing_origins: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer every request with `estimate`.
    #[must_use]
    pub fn fixed(estimate: RouteEstimate) -> Self {
        Self::with_response(StubResponse::Fixed(estimate))
    }

    /// Fail every request with `error`.
    #[must_use]
    pub fn failing(error: LookupError) -> Self {
        Self::with_response(StubResponse::Error(error))
    }

    /// Fail every request with a network error.
    #[must_use]
    pub fn unreachable() -> Self {
        Self::failing(LookupError::Provider(ProviderError::Network {
            url: "https://routing.invalid/route".to_owned(),
            message: "connection refused".to_owned(),
        }))
    }

    /// Answer with the great-circle distance times `factor`, travelled at the
    /// mode's average speed.
    #[must_use]
    pub fn detour(factor: f64) -> Self {
        Self::with_response(StubResponse::Scaled(factor))
    }

    /// Fail any request that starts at `origin`, answering the rest normally.
    #[must_use]
    pub fn failing_from(mut self, origin: Coord<f64>) -> Self {
        self.failing_origins.push(origin);
        self
    }

    /// Number of route requests received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RouteProvider for StubRouteProvider {
    async fn route(&self, request: &RouteRequest) -> Result<RouteEstimate, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_origins.contains(&request.origin) {
            return Err(LookupError::not_found("stubbed route"));
        }
        match &self.response {
            StubResponse::Fixed(estimate) => Ok(*estimate),
            StubResponse::Error(error) => Err(error.clone()),
            StubResponse::Scaled(factor) => {
                let distance_km = great_circle_km(request.origin, request.destination) * factor;
                Ok(RouteEstimate {
                    distance_km,
                    time_min: estimate_travel_minutes(distance_km, request.mode),
                })
            }
        }
    }
}

/// Stub [`Geocoder`] answering from a fixed table.
///
/// Unknown addresses yield [`LookupError::NotFound`]; blank ones are rejected
/// without counting as a call.
#[derive(Debug, Default)]
pub struct StubGeocoder {
    matches: HashMap<String, GeocodedAddress>,
    error: Option<LookupError>,
    calls: AtomicUsize,
}

impl StubGeocoder {
    /// Fail every non-blank lookup with `error`.
    #[must_use]
    pub fn failing(error: LookupError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Answer `address` with `matched`.
    #[must_use]
    pub fn with_match(mut self, address: impl Into<String>, matched: GeocodedAddress) -> Self {
        self.matches.insert(address.into(), matched);
        self
    }

    /// Number of non-blank lookups received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress, LookupError> {
        let query = address.trim();
        if query.is_empty() {
            return Err(LookupError::invalid_input("address must not be empty"));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        self.matches
            .get(query)
            .cloned()
            .ok_or_else(|| LookupError::not_found(query))
    }
}

/// In-memory [`VenueSource`].
#[derive(Debug, Clone, Default)]
pub struct MemoryVenueSource {
    venues: Vec<Venue>,
}

impl MemoryVenueSource {
    /// Serve `venues` in the given order.
    pub fn new(venues: impl IntoIterator<Item = Venue>) -> Self {
        Self {
            venues: venues.into_iter().collect(),
        }
    }
}

#[async_trait]
impl VenueSource for MemoryVenueSource {
    async fn venues(&self) -> Result<Vec<Venue>, LookupError> {
        Ok(self.venues.clone())
    }
}

/// Three participants spread across western Munich.
#[must_use]
pub fn sample_roster() -> Vec<Participant> {
    vec![
        Participant::new(
            1,
            "Joa",
            "Maxvorstadt, München",
            Coord { x: 11.54579, y: 48.162435 },
        ),
        Participant::new(
            2,
            "Björn",
            "Glockenbach, München",
            Coord { x: 11.568114, y: 48.128651 },
        ),
        Participant::new(6, "Timo", "Laim, München", Coord { x: 11.505471, y: 48.141357 }),
    ]
}

/// Three venues from the built-in catalogue, centre first.
#[must_use]
pub fn sample_venues() -> Vec<Venue> {
    vec![
        Venue::new(
            295_993_624,
            "Augustiner am Dom",
            Coord { x: 11.5740213, y: 48.1382031 },
            "Frauenplatz 8, 80331 München",
            VenueCategory::Restaurant,
        ),
        Venue::new(
            4_609_522,
            "Augustiner-Keller",
            Coord { x: 11.5515974, y: 48.1435335 },
            "Arnulfstraße 52, 80335 München",
            VenueCategory::Biergarten,
        ),
        Venue::new(
            2_701_880_121,
            "Augustiner Kurgarten",
            Coord { x: 11.5085254, y: 48.1494923 },
            "De-la-Paz-Straße 10, 80639 München",
            VenueCategory::Restaurant,
        ),
    ]
}
