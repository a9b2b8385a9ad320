//! Rank venues by how far the selected participants have to travel.
//!
//! For every participant and venue the engine asks the [`RouteProvider`] for a
//! routed estimate and falls back to the great-circle distance when the lookup
//! fails. Lookups run concurrently through an ordered, bounded stream so each
//! sample lands in its own slot; aggregation starts only after every lookup
//! has finished.

use futures_util::stream::{self, StreamExt};
use geo::Coord;
use log::{debug, info, warn};

use crate::{
    CalculationMethod, ResolvedParticipant, RouteEstimate, RouteOutcome, RouteProvider,
    RouteRequest, Session, TransportMode, Venue, estimate_travel_minutes, great_circle_km,
};

/// Maximum number of routing lookups in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Where a [`DistanceSample`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum SampleSource {
    /// The routing provider answered.
    Routed,
    /// Great-circle distance with a speed-based time.
    Estimated,
}

/// Distance and travel time from one participant to one venue.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceSample {
    /// Participant the sample belongs to.
    pub participant_id: u32,
    /// Participant display name.
    pub participant_name: String,
    /// Venue the sample points at.
    pub venue_id: u64,
    /// Distance in kilometres.
    pub distance_km: f64,
    /// Travel time in minutes.
    pub time_min: f64,
    /// Provenance of the values.
    pub source: SampleSource,
}

/// Aggregated travel figures for one venue.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VenueRanking {
    /// The venue being scored.
    pub venue: Venue,
    /// Arithmetic mean of the sample distances.
    pub mean_distance_km: f64,
    /// Longest single distance.
    pub max_distance_km: f64,
    /// Sum of every participant's travel time.
    pub total_time_min: f64,
    /// One sample per participant, in participant order.
    pub samples: Vec<DistanceSample>,
}

impl VenueRanking {
    /// Aggregate `samples` for `venue`.
    ///
    /// Returns `None` when there are no samples, so a venue never reports a
    /// mean over zero participants.
    #[must_use]
    pub fn aggregate(venue: Venue, samples: Vec<DistanceSample>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let (total_distance, max_distance_km, total_time_min) = samples.iter().fold(
            (0.0_f64, 0.0_f64, 0.0_f64),
            |(total, max, time), sample| {
                (
                    total + sample.distance_km,
                    max.max(sample.distance_km),
                    time + sample.time_min,
                )
            },
        );
        let count = samples.len() as f64;
        Some(Self {
            venue,
            mean_distance_km: total_distance / count,
            max_distance_km,
            total_time_min,
            samples,
        })
    }
}

/// Inputs to a single ranking run.
#[derive(Debug, Clone, Copy)]
pub struct RankingRequest<'a> {
    /// Participants with usable locations.
    pub participants: &'a [ResolvedParticipant],
    /// Candidate venues in tie-break order.
    pub venues: &'a [Venue],
    /// Travel mode for every sample.
    pub mode: TransportMode,
    /// Whether to consult the routing provider.
    pub method: CalculationMethod,
}

impl<'a> RankingRequest<'a> {
    /// Build a request taking mode and method from `session`.
    #[must_use]
    pub const fn from_session(
        session: &Session,
        participants: &'a [ResolvedParticipant],
        venues: &'a [Venue],
    ) -> Self {
        Self {
            participants,
            venues,
            mode: session.mode,
            method: session.method,
        }
    }
}

/// Computes venue rankings against a routing provider.
///
/// # Examples
/// ```
/// use async_trait::async_trait;
/// use geo::Coord;
/// use stammtisch_core::{
///     CalculationMethod, LookupError, Participant, RankingEngine, RankingRequest,
///     ResolvedParticipant, RouteEstimate, RouteProvider, RouteRequest, TransportMode, Venue,
///     VenueCategory,
/// };
///
/// struct Offline;
///
/// #[async_trait]
/// impl RouteProvider for Offline {
///     async fn route(&self, _request: &RouteRequest) -> Result<RouteEstimate, LookupError> {
///         Err(LookupError::not_found("offline"))
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let joa = Participant::new(1, "Joa", "Maxvorstadt", Coord { x: 11.546, y: 48.162 });
/// let participants = [ResolvedParticipant::resolve(&joa, None).unwrap()];
/// let venues = [
///     Venue::new(1, "Near", Coord { x: 11.55, y: 48.16 }, "München", VenueCategory::Pub),
///     Venue::new(2, "Far", Coord { x: 11.60, y: 48.10 }, "München", VenueCategory::Pub),
/// ];
/// let request = RankingRequest {
///     participants: &participants,
///     venues: &venues,
///     mode: TransportMode::Bike,
///     method: CalculationMethod::Routed,
/// };
///
/// let ranking = RankingEngine::new(&Offline).rank(&request).await;
/// assert_eq!(ranking[0].venue.name, "Near");
/// # });
/// ```
#[derive(Clone, Copy)]
pub struct RankingEngine<'a> {
    provider: Option<&'a dyn RouteProvider>,
    concurrency: usize,
}

impl std::fmt::Debug for RankingEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingEngine")
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

impl<'a> RankingEngine<'a> {
    /// Create an engine using [`DEFAULT_CONCURRENCY`].
    #[must_use]
    pub fn new(provider: &'a dyn RouteProvider) -> Self {
        Self {
            provider: Some(provider),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Create an engine without a routing provider.
    ///
    /// Every sample is a great-circle estimate whatever the request's method.
    #[must_use]
    pub const fn estimating() -> Self {
        Self {
            provider: None,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Bound the number of lookups in flight; values below one become one.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Configured fan-out limit.
    #[must_use]
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Rank `request.venues` by mean participant distance, nearest first.
    ///
    /// Routing failures never surface: the affected sample is estimated from
    /// the great-circle distance instead. Ties keep venue input order.
    pub async fn rank(&self, request: &RankingRequest<'_>) -> Vec<VenueRanking> {
        let participants = request.participants;
        if participants.is_empty() || request.venues.is_empty() {
            debug!(
                "nothing to rank: {} participants, {} venues",
                participants.len(),
                request.venues.len()
            );
            return Vec::new();
        }

        let pairs = request.venues.iter().flat_map(|venue| {
            participants
                .iter()
                .map(move |participant| (participant, venue))
        });
        let samples: Vec<DistanceSample> = stream::iter(pairs)
            .map(|(participant, venue)| self.sample(participant, venue, request))
            .buffered(self.concurrency)
            .collect()
            .await;

        let routed = samples
            .iter()
            .filter(|sample| sample.source == SampleSource::Routed)
            .count();
        info!(
            "ranked {} venues for {} participants by {} ({routed} routed, {} estimated)",
            request.venues.len(),
            participants.len(),
            request.mode,
            samples.len() - routed
        );

        let mut rankings: Vec<VenueRanking> = request
            .venues
            .iter()
            .zip(samples.chunks(participants.len()))
            .filter_map(|(venue, chunk)| VenueRanking::aggregate(venue.clone(), chunk.to_vec()))
            .collect();
        rankings.sort_by(|a, b| a.mean_distance_km.total_cmp(&b.mean_distance_km));
        rankings
    }

    async fn sample(
        &self,
        participant: &ResolvedParticipant,
        venue: &Venue,
        request: &RankingRequest<'_>,
    ) -> DistanceSample {
        let fallback =
            || great_circle_estimate(participant.location, venue.location, request.mode);
        let (estimate, routed) = match (request.method, self.provider) {
            (CalculationMethod::Approximate, _) | (CalculationMethod::Routed, None) => {
                (fallback(), false)
            }
            (CalculationMethod::Routed, Some(provider)) => {
                let route = RouteRequest {
                    origin: participant.location,
                    destination: venue.location,
                    mode: request.mode,
                };
                let outcome = RouteOutcome::from(provider.route(&route).await);
                match &outcome {
                    RouteOutcome::Routed(found) => debug!(
                        "routed {} -> {}: {:.2} km, {:.1} min",
                        participant.name, venue.name, found.distance_km, found.time_min
                    ),
                    RouteOutcome::Failed { reason } => warn!(
                        "routing {} -> {} failed, using great-circle estimate: {reason}",
                        participant.name, venue.name
                    ),
                }
                outcome.estimate_or_else(fallback)
            }
        };
        DistanceSample {
            participant_id: participant.id,
            participant_name: participant.name.clone(),
            venue_id: venue.id,
            distance_km: estimate.distance_km,
            time_min: estimate.time_min,
            source: if routed {
                SampleSource::Routed
            } else {
                SampleSource::Estimated
            },
        }
    }
}

fn great_circle_estimate(
    origin: Coord<f64>,
    destination: Coord<f64>,
    mode: TransportMode,
) -> RouteEstimate {
    let distance_km = great_circle_km(origin, destination);
    RouteEstimate {
        distance_km,
        time_min: estimate_travel_minutes(distance_km, mode),
    }
}
