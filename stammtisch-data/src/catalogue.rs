//! Built-in venue and participant catalogues.
//!
//! Both catalogues are JSON arrays embedded at compile time. Files in the same
//! shape can replace them at run time.

use std::collections::BTreeSet;

use async_trait::async_trait;
use camino::Utf8Path;
use stammtisch_core::{LookupError, Participant, Venue, VenueSource};
use stammtisch_fs::{JsonFileError, read_json};
use thiserror::Error;

const BUILTIN_VENUES: &str = include_str!("../data/venues.json");
const BUILTIN_ROSTER: &str = include_str!("../data/roster.json");

/// Errors raised while loading a catalogue.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// An embedded catalogue failed to decode.
    #[error("built-in {catalogue} catalogue is malformed: {source}")]
    Builtin {
        /// Which catalogue.
        catalogue: &'static str,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// A catalogue file could not be read or decoded.
    #[error(transparent)]
    File(#[from] JsonFileError),
    /// Two participants share an id.
    #[error("participant id {id} appears more than once")]
    DuplicateParticipant {
        /// Repeated id.
        id: u32,
    },
}

/// The 22 Augustiner venues in and around Munich.
///
/// # Errors
///
/// Returns [`CatalogueError::Builtin`] if the embedded JSON is malformed.
pub fn builtin_venues() -> Result<Vec<Venue>, CatalogueError> {
    serde_json::from_str(BUILTIN_VENUES).map_err(|source| CatalogueError::Builtin {
        catalogue: "venue",
        source,
    })
}

/// The sample eight-person roster.
///
/// # Errors
///
/// Returns [`CatalogueError::Builtin`] if the embedded JSON is malformed.
pub fn builtin_roster() -> Result<Vec<Participant>, CatalogueError> {
    let roster = serde_json::from_str(BUILTIN_ROSTER).map_err(|source| {
        CatalogueError::Builtin {
            catalogue: "roster",
            source,
        }
    })?;
    check_unique_ids(roster)
}

/// Load a venue catalogue from `path`.
///
/// # Errors
///
/// Returns [`CatalogueError::File`] if the file is unreadable or malformed.
pub fn load_venues(path: &Utf8Path) -> Result<Vec<Venue>, CatalogueError> {
    Ok(read_json(path)?)
}

/// Load a participant roster from `path`.
///
/// # Errors
///
/// Returns [`CatalogueError::File`] if the file is unreadable or malformed and
/// [`CatalogueError::DuplicateParticipant`] if an id repeats.
pub fn load_roster(path: &Utf8Path) -> Result<Vec<Participant>, CatalogueError> {
    check_unique_ids(read_json(path)?)
}

fn check_unique_ids(roster: Vec<Participant>) -> Result<Vec<Participant>, CatalogueError> {
    let mut seen = BTreeSet::new();
    if let Some(repeat) = roster.iter().find(|participant| !seen.insert(participant.id)) {
        return Err(CatalogueError::DuplicateParticipant { id: repeat.id });
    }
    Ok(roster)
}

/// [`VenueSource`] serving a fixed list.
#[derive(Debug, Clone, Default)]
pub struct StaticVenueSource {
    venues: Vec<Venue>,
}

impl StaticVenueSource {
    /// Serve `venues` in the given order.
    #[must_use]
    pub fn new(venues: Vec<Venue>) -> Self {
        Self { venues }
    }

    /// Serve the built-in catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Builtin`] if the embedded JSON is malformed.
    pub fn builtin() -> Result<Self, CatalogueError> {
        builtin_venues().map(Self::new)
    }
}

#[async_trait]
impl VenueSource for StaticVenueSource {
    async fn venues(&self) -> Result<Vec<Venue>, LookupError> {
        Ok(self.venues.clone())
    }
}
