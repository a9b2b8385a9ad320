//! Participants and their (possibly overridden) home locations.

use geo::Coord;

/// A person travelling to the venue.
///
/// Coordinates may be missing from configuration; such participants cannot be
/// ranked until a [`LocationOverride`] supplies a location.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "ParticipantRecord", into = "ParticipantRecord")
)]
pub struct Participant {
    /// Locally assigned identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Free-text home address.
    pub address: String,
    /// Home position, when known.
    pub location: Option<Coord<f64>>,
}

impl Participant {
    /// Construct a participant with a known home location.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        address: impl Into<String>,
        location: Coord<f64>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            location: Some(location),
        }
    }

    /// Construct a participant whose location has not been resolved.
    pub fn unresolved(id: u32, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            location: None,
        }
    }

    /// The home location if it is present and a valid WGS84 position.
    #[must_use]
    pub fn valid_location(&self) -> Option<Coord<f64>> {
        self.location.filter(|coord| is_valid_position(*coord))
    }
}

/// A per-session replacement of a participant's address and location.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "OverrideRecord", into = "OverrideRecord")
)]
pub struct LocationOverride {
    /// Address entered by the user.
    pub address: String,
    /// Geocoded position.
    pub location: Coord<f64>,
}

impl LocationOverride {
    /// Construct an override.
    pub fn new(address: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            address: address.into(),
            location,
        }
    }
}

/// A selected participant with a usable location, ready for ranking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(into = "ResolvedRecord")
)]
pub struct ResolvedParticipant {
    /// Participant identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Address the location was derived from.
    pub address: String,
    /// Position used for every sample.
    pub location: Coord<f64>,
    /// Whether the location came from a session override.
    pub overridden: bool,
}

impl ResolvedParticipant {
    /// Resolve `participant`, preferring `location_override` when given.
    ///
    /// Returns `None` when neither source yields a valid position.
    #[must_use]
    pub fn resolve(
        participant: &Participant,
        location_override: Option<&LocationOverride>,
    ) -> Option<Self> {
        match location_override {
            Some(replacement) if is_valid_position(replacement.location) => Some(Self {
                id: participant.id,
                name: participant.name.clone(),
                address: replacement.address.clone(),
                location: replacement.location,
                overridden: true,
            }),
            _ => participant.valid_location().map(|location| Self {
                id: participant.id,
                name: participant.name.clone(),
                address: participant.address.clone(),
                location,
                overridden: false,
            }),
        }
    }
}

pub(crate) fn is_valid_position(coord: Coord<f64>) -> bool {
    coord.x.is_finite()
        && coord.y.is_finite()
        && (-180.0..=180.0).contains(&coord.x)
        && (-90.0..=90.0).contains(&coord.y)
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct ParticipantRecord {
    id: u32,
    name: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
}

#[cfg(feature = "serde")]
impl From<ParticipantRecord> for Participant {
    fn from(record: ParticipantRecord) -> Self {
        let location = match (record.lat, record.lng) {
            (Some(lat), Some(lng)) => Some(Coord { x: lng, y: lat }),
            _ => None,
        };
        Self {
            id: record.id,
            name: record.name,
            address: record.address,
            location,
        }
    }
}

#[cfg(feature = "serde")]
impl From<Participant> for ParticipantRecord {
    fn from(participant: Participant) -> Self {
        Self {
            id: participant.id,
            name: participant.name,
            address: participant.address,
            lat: participant.location.map(|coord| coord.y),
            lng: participant.location.map(|coord| coord.x),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct OverrideRecord {
    address: String,
    lat: f64,
    lng: f64,
}

#[cfg(feature = "serde")]
impl From<OverrideRecord> for LocationOverride {
    fn from(record: OverrideRecord) -> Self {
        Self {
            address: record.address,
            location: Coord {
                x: record.lng,
                y: record.lat,
            },
        }
    }
}

#[cfg(feature = "serde")]
impl From<LocationOverride> for OverrideRecord {
    fn from(value: LocationOverride) -> Self {
        Self {
            address: value.address,
            lat: value.location.y,
            lng: value.location.x,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize)]
struct ResolvedRecord {
    id: u32,
    name: String,
    address: String,
    lat: f64,
    lng: f64,
    overridden: bool,
}

#[cfg(feature = "serde")]
impl From<ResolvedParticipant> for ResolvedRecord {
    fn from(value: ResolvedParticipant) -> Self {
        Self {
            id: value.id,
            name: value.name,
            address: value.address,
            lat: value.location.y,
            lng: value.location.x,
            overridden: value.overridden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn joa() -> Participant {
        Participant::new(
            1,
            "Joa",
            "Maxvorstadt, München",
            Coord {
                x: 11.54579,
                y: 48.162435,
            },
        )
    }

    #[rstest]
    fn resolves_base_location_without_override(joa: Participant) {
        let resolved = ResolvedParticipant::resolve(&joa, None).expect("valid location");
        assert_eq!(resolved.location, joa.location.expect("fixture has location"));
        assert!(!resolved.overridden);
        assert_eq!(resolved.address, "Maxvorstadt, München");
    }

    #[rstest]
    fn override_replaces_address_and_location(joa: Participant) {
        let replacement = LocationOverride::new("Marienplatz 1", Coord { x: 11.5755, y: 48.1374 });
        let resolved =
            ResolvedParticipant::resolve(&joa, Some(&replacement)).expect("valid override");
        assert!(resolved.overridden);
        assert_eq!(resolved.address, "Marienplatz 1");
        assert_eq!(resolved.location, replacement.location);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(Coord { x: f64::NAN, y: 48.0 }))]
    #[case(Some(Coord { x: 11.0, y: 91.0 }))]
    fn invalid_locations_do_not_resolve(#[case] location: Option<Coord<f64>>) {
        let participant = Participant {
            location,
            ..Participant::unresolved(9, "Nobody", "")
        };
        assert!(ResolvedParticipant::resolve(&participant, None).is_none());
    }

    #[rstest]
    fn decodes_participant_without_coordinates() {
        let json = r#"{ "id": 4, "name": "Stefan L.", "address": "Großhadern" }"#;
        let participant: Participant = serde_json::from_str(json).expect("participant decodes");
        assert_eq!(participant.location, None);
    }

    #[rstest]
    fn decodes_override_record() {
        let json = r#"{ "address": "Leopoldstraße 1", "lat": 48.16, "lng": 11.58 }"#;
        let value: LocationOverride = serde_json::from_str(json).expect("override decodes");
        assert_eq!(value.location, Coord { x: 11.58, y: 48.16 });
    }

    #[rstest]
    fn resolved_participant_encodes_flat_coordinates(joa: Participant) {
        let resolved = ResolvedParticipant::resolve(&joa, None).expect("valid location");
        let value = serde_json::to_value(&resolved).expect("encode resolved participant");
        assert_eq!(value["lat"], 48.162435);
        assert_eq!(value["lng"], 11.54579);
        assert_eq!(value["overridden"], false);
    }
}
