//! Venue discovery through the Overpass API.
//!
//! Discovery records are decoded as a tagged union over element kinds and
//! converted into [`stammtisch_core::Venue`] at this boundary.

mod query;
mod source;
mod wire;

pub use query::{BoundingBox, MUNICH, VenueQuery};
pub use source::{DEFAULT_ENDPOINT, DiscoveryDefaults, HttpVenueSource, normalise_elements};
pub use wire::{AreaElement, Bounds, LatLon, OverpassElement, OverpassResponse};
