//! Candidate meeting venues.

use std::fmt;

use geo::Coord;

/// Kind of venue, mirroring the OpenStreetMap amenity it was tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum VenueCategory {
    /// A brewery or brewery tap.
    Brewery,
    /// An open-air beer garden.
    Biergarten,
    /// A restaurant.
    Restaurant,
    /// A bar.
    Bar,
    /// A pub; the fallback for untagged discovery results.
    #[default]
    Pub,
}

impl VenueCategory {
    /// Map an OpenStreetMap `amenity` or `craft` tag value to a category.
    ///
    /// # Examples
    /// ```
    /// use stammtisch_core::VenueCategory;
    ///
    /// assert_eq!(VenueCategory::from_tag("biergarten"), Some(VenueCategory::Biergarten));
    /// assert_eq!(VenueCategory::from_tag("cafe"), None);
    /// ```
    #[must_use]
    pub fn from_tag(value: &str) -> Option<Self> {
        match value {
            "brewery" => Some(Self::Brewery),
            "biergarten" => Some(Self::Biergarten),
            "restaurant" => Some(Self::Restaurant),
            "bar" => Some(Self::Bar),
            "pub" => Some(Self::Pub),
            _ => None,
        }
    }

    /// Lower-case identifier matching the tag value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brewery => "brewery",
            Self::Biergarten => "biergarten",
            Self::Restaurant => "restaurant",
            Self::Bar => "bar",
            Self::Pub => "pub",
        }
    }
}

impl fmt::Display for VenueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A place the group could meet.
///
/// Identifiers come from the data source (usually OpenStreetMap) and may
/// collide across sources; they key display and selection only.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stammtisch_core::{Venue, VenueCategory};
///
/// let venue = Venue::new(
///     295993624,
///     "Augustiner am Dom",
///     Coord { x: 11.5740213, y: 48.1382031 },
///     "Frauenplatz 8, 80331 München",
///     VenueCategory::Restaurant,
/// );
/// assert_eq!(venue.lat(), 48.1382031);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "VenueRecord", into = "VenueRecord")
)]
pub struct Venue {
    /// Source-assigned identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Position with `x = longitude` and `y = latitude`.
    pub location: Coord<f64>,
    /// Free-text postal address.
    pub address: String,
    /// Venue kind.
    pub category: VenueCategory,
}

impl Venue {
    /// Construct a venue.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        location: Coord<f64>,
        address: impl Into<String>,
        category: VenueCategory,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            address: address.into(),
            category,
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.location.x
    }
}

/// Flat `lat`/`lng` wire shape shared by catalogues and JSON output.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct VenueRecord {
    id: u64,
    name: String,
    lat: f64,
    lng: f64,
    address: String,
    #[serde(alias = "type")]
    category: VenueCategory,
}

#[cfg(feature = "serde")]
impl From<VenueRecord> for Venue {
    fn from(record: VenueRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            location: Coord {
                x: record.lng,
                y: record.lat,
            },
            address: record.address,
            category: record.category,
        }
    }
}

#[cfg(feature = "serde")]
impl From<Venue> for VenueRecord {
    fn from(venue: Venue) -> Self {
        Self {
            id: venue.id,
            name: venue.name,
            lat: venue.location.y,
            lng: venue.location.x,
            address: venue.address,
            category: venue.category,
        }
    }
}
