//! Two-branch result of a routing lookup.

use super::error::LookupError;
use super::provider::RouteEstimate;

/// What a routing lookup produced, as seen by the ranking engine.
///
/// Any provider error and any estimate that is missing, zero or non-finite
/// becomes [`RouteOutcome::Failed`]; the engine then estimates the sample
/// from the great-circle distance instead.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// The provider supplied a usable estimate.
    Routed(RouteEstimate),
    /// The lookup failed for the given reason.
    Failed {
        /// Human-readable failure description.
        reason: String,
    },
}

impl RouteOutcome {
    /// Return the routed estimate, or compute one with `fallback`.
    ///
    /// The boolean is `true` when the estimate came from the provider.
    pub fn estimate_or_else<F>(self, fallback: F) -> (RouteEstimate, bool)
    where
        F: FnOnce() -> RouteEstimate,
    {
        match self {
            Self::Routed(estimate) => (estimate, true),
            Self::Failed { .. } => (fallback(), false),
        }
    }
}

impl From<Result<RouteEstimate, LookupError>> for RouteOutcome {
    fn from(result: Result<RouteEstimate, LookupError>) -> Self {
        match result {
            Ok(estimate) if estimate.is_usable() => Self::Routed(estimate),
            Ok(estimate) => Self::Failed {
                reason: format!(
                    "provider returned unusable distance {} km / time {} min",
                    estimate.distance_km, estimate.time_min
                ),
            },
            Err(err) => Self::Failed {
                reason: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderError;
    use rstest::rstest;

    const FALLBACK: RouteEstimate = RouteEstimate {
        distance_km: 2.0,
        time_min: 24.0,
    };

    #[rstest]
    fn usable_estimate_is_routed() {
        let estimate = RouteEstimate {
            distance_km: 3.2,
            time_min: 40.0,
        };
        let outcome = RouteOutcome::from(Ok(estimate));
        assert_eq!(outcome, RouteOutcome::Routed(estimate));
        assert_eq!(outcome.estimate_or_else(|| FALLBACK), (estimate, true));
    }

    #[rstest]
    fn zero_distance_falls_back() {
        let outcome = RouteOutcome::from(Ok(RouteEstimate {
            distance_km: 0.0,
            time_min: 0.0,
        }));
        assert!(matches!(outcome, RouteOutcome::Failed { .. }));
        assert_eq!(outcome.estimate_or_else(|| FALLBACK), (FALLBACK, false));
    }

    #[rstest]
    #[case(LookupError::not_found("route"))]
    #[case(LookupError::Provider(ProviderError::Timeout {
        url: "https://graphhopper.example/route".to_owned(),
        timeout_secs: 10,
    }))]
    fn lookup_errors_fall_back(#[case] error: LookupError) {
        let reason = error.to_string();
        let outcome = RouteOutcome::from(Err(error));
        assert_eq!(outcome, RouteOutcome::Failed { reason });
    }
}
