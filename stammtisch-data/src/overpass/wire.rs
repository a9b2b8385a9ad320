//! Overpass API JSON response types.
//!
//! Elements are a tagged union on `type`. Nodes carry their own coordinates;
//! ways and relations carry a `center` when queried with `out center`, or
//! `bounds` when queried with `out geom`/`out bb`.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Overpass_QL#Print_(out)>

use std::collections::BTreeMap;

use geo::{Coord, Rect};
use serde::Deserialize;

/// Top-level Overpass response.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    /// Matched elements in server order.
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

/// One OpenStreetMap element.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OverpassElement {
    /// A point feature.
    Node {
        /// OSM id.
        id: Option<u64>,
        /// Latitude.
        lat: Option<f64>,
        /// Longitude.
        lon: Option<f64>,
        /// OSM tags.
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    /// A way, typically a building outline.
    Way(AreaElement),
    /// A relation, typically a multipolygon.
    Relation(AreaElement),
    /// Anything else, such as `area` or `count` rows.
    #[serde(other)]
    Unknown,
}

/// Fields shared by ways and relations.
#[derive(Debug, Deserialize)]
pub struct AreaElement {
    /// OSM id.
    pub id: Option<u64>,
    /// Centre point from `out center`.
    pub center: Option<LatLon>,
    /// Bounding box from `out geom` or `out bb`.
    pub bounds: Option<Bounds>,
    /// OSM tags.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLon {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

/// Bounding box of an area element.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Bounds {
    /// Southern latitude.
    pub minlat: f64,
    /// Western longitude.
    pub minlon: f64,
    /// Northern latitude.
    pub maxlat: f64,
    /// Eastern longitude.
    pub maxlon: f64,
}

impl OverpassElement {
    /// OSM id, when present.
    #[must_use]
    pub fn id(&self) -> Option<u64> {
        match self {
            Self::Node { id, .. } => *id,
            Self::Way(area) | Self::Relation(area) => area.id,
            Self::Unknown => None,
        }
    }

    /// Element tags; unknown elements have none.
    #[must_use]
    pub fn tags(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Node { tags, .. } => Some(tags),
            Self::Way(area) | Self::Relation(area) => Some(&area.tags),
            Self::Unknown => None,
        }
    }

    /// Representative position with `x = longitude`.
    ///
    /// Areas prefer `center` and fall back to the midpoint of `bounds`.
    #[must_use]
    pub fn position(&self) -> Option<Coord<f64>> {
        match self {
            Self::Node {
                lat: Some(lat),
                lon: Some(lon),
                ..
            } => Some(Coord { x: *lon, y: *lat }),
            Self::Node { .. } | Self::Unknown => None,
            Self::Way(area) | Self::Relation(area) => area.position(),
        }
    }
}

impl AreaElement {
    fn position(&self) -> Option<Coord<f64>> {
        if let Some(center) = self.center {
            return Some(Coord {
                x: center.lon,
                y: center.lat,
            });
        }
        self.bounds.map(|bounds| {
            Rect::new(
                Coord {
                    x: bounds.minlon,
                    y: bounds.minlat,
                },
                Coord {
                    x: bounds.maxlon,
                    y: bounds.maxlat,
                },
            )
            .center()
        })
    }
}
