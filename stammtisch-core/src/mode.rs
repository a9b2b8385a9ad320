//! Transport modes and distance calculation methods.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// How participants travel to the venue.
///
/// Each mode carries a fixed average speed used when a routed travel time is
/// unavailable.
///
/// # Examples
/// ```
/// use stammtisch_core::TransportMode;
///
/// let mode: TransportMode = "bike".parse()?;
/// assert_eq!(mode.average_speed_kmh(), 15.0);
/// # Ok::<(), stammtisch_core::ParseOptionError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TransportMode {
    /// On foot.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "foot"))]
    Walk,
    /// By bicycle.
    Bike,
    /// By car.
    Car,
}

impl TransportMode {
    /// Every supported mode, slowest first.
    pub const ALL: [Self; 3] = [Self::Walk, Self::Bike, Self::Car];

    /// Average speed in km/h assumed for estimated travel times.
    #[must_use]
    pub const fn average_speed_kmh(self) -> f64 {
        match self {
            Self::Walk => 5.0,
            Self::Bike => 15.0,
            Self::Car => 30.0,
        }
    }

    /// Lower-case identifier used on the command line and in session files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Bike => "bike",
            Self::Car => "car",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = ParseOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "walk" | "foot" => Ok(Self::Walk),
            "bike" => Ok(Self::Bike),
            "car" => Ok(Self::Car),
            _ => Err(ParseOptionError::UnknownTransportMode {
                value: value.to_owned(),
            }),
        }
    }
}

/// Whether distances come from the routing provider or straight from the
/// great-circle estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum CalculationMethod {
    /// Ask the routing provider, estimating only when a lookup fails.
    #[default]
    Routed,
    /// Skip the routing provider and estimate every sample.
    Approximate,
}

impl CalculationMethod {
    /// Lower-case identifier used on the command line and in session files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Routed => "routed",
            Self::Approximate => "approximate",
        }
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculationMethod {
    type Err = ParseOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "routed" | "graphhopper" => Ok(Self::Routed),
            "approximate" | "haversine" => Ok(Self::Approximate),
            _ => Err(ParseOptionError::UnknownCalculationMethod {
                value: value.to_owned(),
            }),
        }
    }
}

/// Errors raised while parsing a [`TransportMode`] or [`CalculationMethod`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseOptionError {
    /// The transport mode is not one of `walk`, `bike` or `car`.
    #[error("unknown transport mode {value:?} (expected walk, bike or car)")]
    UnknownTransportMode {
        /// Rejected input.
        value: String,
    },
    /// The calculation method is not one of `routed` or `approximate`.
    #[error("unknown calculation method {value:?} (expected routed or approximate)")]
    UnknownCalculationMethod {
        /// Rejected input.
        value: String,
    },
}
