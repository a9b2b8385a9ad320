//! Overpass QL for the venue search.

use std::fmt::Write as _;

/// Inclusive latitude/longitude box in Overpass `(south, west, north, east)`
/// order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Southern latitude.
    pub south: f64,
    /// Western longitude.
    pub west: f64,
    /// Northern latitude.
    pub north: f64,
    /// Eastern longitude.
    pub east: f64,
}

/// Greater Munich.
pub const MUNICH: BoundingBox = BoundingBox {
    south: 48.0,
    west: 11.3,
    north: 48.3,
    east: 11.8,
};

/// Name and amenity filters applied to nodes, ways and relations.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueQuery {
    /// Regular expression matched against the `name` tag.
    pub name_pattern: String,
    /// Regular expression matched against the `amenity` tag.
    pub amenity_pattern: String,
    /// Search area.
    pub bbox: BoundingBox,
    /// Server-side timeout in seconds.
    pub timeout_secs: u32,
}

impl Default for VenueQuery {
    fn default() -> Self {
        Self {
            name_pattern: "Augustiner".to_owned(),
            amenity_pattern: "pub|restaurant|bar".to_owned(),
            bbox: MUNICH,
            timeout_secs: 25,
        }
    }
}

impl VenueQuery {
    /// Render the query, asking for centre points of ways and relations.
    ///
    /// # Examples
    /// ```
    /// use stammtisch_data::overpass::VenueQuery;
    ///
    /// let ql = VenueQuery::default().to_overpass_ql();
    /// assert!(ql.starts_with("[out:json][timeout:25];"));
    /// assert!(ql.ends_with("out center;"));
    /// ```
    #[must_use]
    pub fn to_overpass_ql(&self) -> String {
        let BoundingBox {
            south,
            west,
            north,
            east,
        } = self.bbox;
        let mut ql = format!("[out:json][timeout:{}];(", self.timeout_secs);
        for kind in ["node", "way", "relation"] {
            // Writing into a String cannot fail.
            let _ = write!(
                ql,
                "{kind}[\"name\"~\"{}\"][\"amenity\"~\"{}\"]({south},{west},{north},{east});",
                escape(&self.name_pattern),
                escape(&self.amenity_pattern),
            );
        }
        ql.push_str(");out center;");
        ql
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
