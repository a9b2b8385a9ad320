//! Per-run choices: who is coming, how they travel, and where they start.
//!
//! A [`Session`] replaces the mutable UI state of an interactive front end. It
//! is handed to the ranking step explicitly; nothing reads it implicitly.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};
use thiserror::Error;

use crate::participant::is_valid_position;
use crate::{
    CalculationMethod, Geocoder, LocationOverride, LookupError, Participant, ProviderError,
    ResolvedParticipant, TransportMode,
};

/// Errors raised while editing a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The participant id is not in the roster.
    #[error("participant {id} is not in the roster")]
    UnknownParticipant {
        /// Requested participant id.
        id: u32,
    },
    /// Geocoding the replacement address failed; the session is unchanged.
    #[error("could not relocate participant {id} to {address:?}: {source}")]
    Geocode {
        /// Participant being relocated.
        id: u32,
        /// Address that failed to geocode.
        address: String,
        /// Underlying lookup failure.
        #[source]
        source: LookupError,
    },
}

/// Selection, travel options and location overrides for one ranking run.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stammtisch_core::{Participant, Session, TransportMode};
///
/// let roster = vec![
///     Participant::new(1, "Joa", "Maxvorstadt", Coord { x: 11.546, y: 48.162 }),
///     Participant::new(2, "Björn", "Glockenbach", Coord { x: 11.568, y: 48.129 }),
/// ];
/// let session = Session::new(TransportMode::Bike).with_selection([2]);
/// let resolved = session.resolve(&roster);
/// assert_eq!(resolved.len(), 1);
/// assert_eq!(resolved[0].name, "Björn");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Session {
    /// Selected participant ids.
    pub selected: BTreeSet<u32>,
    /// Travel mode for every participant.
    pub mode: TransportMode,
    /// Whether to consult the routing provider.
    pub method: CalculationMethod,
    /// Replacement locations keyed by participant id.
    pub overrides: BTreeMap<u32, LocationOverride>,
}

impl Session {
    /// Create an empty session travelling by `mode`.
    #[must_use]
    pub fn new(mode: TransportMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Replace the selection with `ids`.
    #[must_use]
    pub fn with_selection(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.selected = ids.into_iter().collect();
        self
    }

    /// Set the calculation method.
    #[must_use]
    pub const fn with_method(mut self, method: CalculationMethod) -> Self {
        self.method = method;
        self
    }

    /// Select every participant in `roster`.
    #[must_use]
    pub fn select_all(mut self, roster: &[Participant]) -> Self {
        self.selected = roster.iter().map(|participant| participant.id).collect();
        self
    }

    /// Toggle whether `id` is selected, returning the new state.
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// The override currently applied to `id`, if any.
    #[must_use]
    pub fn override_for(&self, id: u32) -> Option<&LocationOverride> {
        self.overrides.get(&id)
    }

    /// Install `location_override` for `id`, returning any previous override.
    pub fn set_override(
        &mut self,
        id: u32,
        location_override: LocationOverride,
    ) -> Option<LocationOverride> {
        self.overrides.insert(id, location_override)
    }

    /// Drop the override for `id`, restoring the roster location.
    pub fn reset(&mut self, id: u32) -> Option<LocationOverride> {
        let removed = self.overrides.remove(&id);
        if removed.is_some() {
            debug!("reset location override for participant {id}");
        }
        removed
    }

    /// Geocode `address` and install it as the override for `id`.
    ///
    /// The address entered by the user is kept as the override's address; the
    /// provider's display name is only logged. On any failure the session is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownParticipant`] when `id` is not in
    /// `roster`, and [`SessionError::Geocode`] when the address is blank, the
    /// geocoder reports an error, or the matched position is out of range.
    pub async fn relocate(
        &mut self,
        geocoder: &dyn Geocoder,
        roster: &[Participant],
        id: u32,
        address: &str,
    ) -> Result<&LocationOverride, SessionError> {
        if !roster.iter().any(|participant| participant.id == id) {
            return Err(SessionError::UnknownParticipant { id });
        }
        let trimmed = address.trim();
        let geocode_error = |source: LookupError| SessionError::Geocode {
            id,
            address: trimmed.to_owned(),
            source,
        };
        if trimmed.is_empty() {
            return Err(geocode_error(LookupError::invalid_input(
                "address must not be empty",
            )));
        }
        let matched = geocoder.geocode(trimmed).await.map_err(geocode_error)?;
        if !is_valid_position(matched.location) {
            return Err(geocode_error(LookupError::Provider(ProviderError::Parse {
                message: format!(
                    "geocoder returned an invalid position (lat {}, lng {})",
                    matched.location.y, matched.location.x
                ),
            })));
        }
        info!(
            "relocated participant {id} to {trimmed:?} (matched {:?})",
            matched.display_name
        );
        let entry = self
            .overrides
            .entry(id)
            .and_modify(|existing| {
                *existing = LocationOverride::new(trimmed, matched.location);
            })
            .or_insert_with(|| LocationOverride::new(trimmed, matched.location));
        Ok(entry)
    }

    /// Selected participants in roster order, with overrides applied.
    ///
    /// Participants without a valid location are left out and logged; they
    /// never contribute placeholder samples.
    #[must_use]
    pub fn resolve(&self, roster: &[Participant]) -> Vec<ResolvedParticipant> {
        roster
            .iter()
            .filter(|participant| self.selected.contains(&participant.id))
            .filter_map(|participant| {
                let resolved =
                    ResolvedParticipant::resolve(participant, self.override_for(participant.id));
                if resolved.is_none() {
                    warn!(
                        "excluding participant {} ({}) without a valid location",
                        participant.id, participant.name
                    );
                }
                resolved
            })
            .collect()
    }
}
