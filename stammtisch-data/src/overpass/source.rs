//! [`VenueSource`] backed by the Overpass API.

use std::collections::BTreeMap;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use stammtisch_core::{LookupError, ProviderError, Venue, VenueCategory, VenueSource};

use super::query::VenueQuery;
use super::wire::{OverpassElement, OverpassResponse};
use crate::transport::{HttpConfig, ProviderBuildError};

/// Public Overpass interpreter endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Values substituted for tags missing from a discovered element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryDefaults {
    /// Name used when the element has no `name` tag.
    pub name: String,
    /// Address used when the element has no `addr:street` tag.
    pub address: String,
    /// Category used when neither `amenity` nor `craft` maps to one.
    pub category: VenueCategory,
}

impl Default for DiscoveryDefaults {
    fn default() -> Self {
        Self {
            name: "Augustiner Location".to_owned(),
            address: "Munich".to_owned(),
            category: VenueCategory::Pub,
        }
    }
}

/// Convert Overpass elements into venues.
///
/// Elements without a usable position are dropped with a warning. An element
/// without an id takes its index in `elements`.
#[must_use]
pub fn normalise_elements(
    elements: &[OverpassElement],
    defaults: &DiscoveryDefaults,
) -> Vec<Venue> {
    elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| {
            let Some(location) = element.position() else {
                warn!(
                    "dropping Overpass element {} without coordinates",
                    element
                        .id()
                        .map_or_else(|| format!("#{index}"), |id| id.to_string())
                );
                return None;
            };
            let empty = BTreeMap::new();
            let tags = element.tags().unwrap_or(&empty);
            let id = element.id().unwrap_or(index as u64);
            let name = tags
                .get("name")
                .filter(|name| !name.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| defaults.name.clone());
            let category = ["amenity", "craft"]
                .iter()
                .filter_map(|key| tags.get(*key))
                .find_map(|value| VenueCategory::from_tag(value))
                .unwrap_or(defaults.category);
            Some(Venue::new(
                id,
                name,
                location,
                address_from_tags(tags).unwrap_or_else(|| defaults.address.clone()),
                category,
            ))
        })
        .collect()
}

/// `"{street} {number}, {postcode} {city}"`, omitting absent parts.
fn address_from_tags(tags: &BTreeMap<String, String>) -> Option<String> {
    let street = tags.get("addr:street")?.trim();
    if street.is_empty() {
        return None;
    }
    let number = tags.get("addr:housenumber").map_or("", |n| n.trim());
    let mut address = format!("{street} {number}").trim_end().to_owned();
    let locality = [tags.get("addr:postcode"), tags.get("addr:city")]
        .into_iter()
        .flatten()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if !locality.is_empty() {
        address.push_str(", ");
        address.push_str(&locality);
    }
    Some(address)
}

/// Venue discovery adapter posting one Overpass query per call.
pub struct HttpVenueSource {
    client: Client,
    config: HttpConfig,
    query: VenueQuery,
    defaults: DiscoveryDefaults,
}

impl std::fmt::Debug for HttpVenueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpVenueSource")
            .field("config", &self.config)
            .field("query", &self.query)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl HttpVenueSource {
    /// Create a source posting to the interpreter at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid or the client fails to
    /// build.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpConfig::new(endpoint))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid or the client fails to
    /// build.
    pub fn with_config(config: HttpConfig) -> Result<Self, ProviderBuildError> {
        let client = config.build_client()?;
        Ok(Self {
            client,
            config,
            query: VenueQuery::default(),
            defaults: DiscoveryDefaults::default(),
        })
    }

    /// Replace the search query.
    #[must_use]
    pub fn with_query(mut self, query: VenueQuery) -> Self {
        self.query = query;
        self
    }

    /// Replace the fallback values for missing tags.
    #[must_use]
    pub fn with_defaults(mut self, defaults: DiscoveryDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}

#[async_trait]
impl VenueSource for HttpVenueSource {
    async fn venues(&self) -> Result<Vec<Venue>, LookupError> {
        let url = self.config.base_url.as_str();
        let ql = self.query.to_overpass_ql();
        debug!("POST {url} data={ql}");

        let response = self
            .client
            .post(url)
            .form(&[("data", ql.as_str())])
            .send()
            .await
            .map_err(|err| self.config.convert_reqwest_error(err, url))?
            .error_for_status()
            .map_err(|err| self.config.convert_reqwest_error(err, url))?;

        let parsed: OverpassResponse =
            response
                .json()
                .await
                .map_err(|err| ProviderError::Parse {
                    message: err.without_url().to_string(),
                })?;

        let venues = normalise_elements(&parsed.elements, &self.defaults);
        info!(
            "discovered {} venues from {} Overpass elements",
            venues.len(),
            parsed.elements.len()
        );
        Ok(venues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};

    #[fixture]
    fn elements() -> Vec<OverpassElement> {
        let json = r#"{ "elements": [
            { "type": "node", "id": 9047980483, "lat": 48.138091, "lon": 11.5741147,
              "tags": { "name": "Augustiner Stehausschank", "amenity": "bar",
                        "addr:street": "Frauenplatz", "addr:housenumber": "9",
                        "addr:postcode": "80331", "addr:city": "München" } },
            { "type": "way", "center": { "lat": 48.1435335, "lon": 11.5515974 },
              "tags": { "amenity": "biergarten" } },
            { "type": "node", "id": 42, "tags": { "name": "Lost" } },
            { "type": "relation", "id": 79817244,
              "bounds": { "minlat": 48.137, "minlon": 11.579, "maxlat": 48.138, "maxlon": 11.580 },
              "tags": { "name": "Augustiner am Platzl", "amenity": "restaurant",
                        "addr:street": "Orlandostraße" } },
            { "type": "node", "id": 7, "lat": 48.1, "lon": 11.5,
              "tags": { "name": "Augustiner Brauerei", "craft": "brewery", "amenity": "cafe" } }
        ] }"#;
        serde_json::from_str::<OverpassResponse>(json)
            .expect("fixture parses")
            .elements
    }

    #[rstest]
    fn drops_elements_without_coordinates(elements: Vec<OverpassElement>) {
        let venues = normalise_elements(&elements, &DiscoveryDefaults::default());
        assert_eq!(venues.len(), 4);
        assert!(venues.iter().all(|venue| venue.name != "Lost"));
    }

    #[rstest]
    fn builds_full_address_from_tags(elements: Vec<OverpassElement>) {
        let venues = normalise_elements(&elements, &DiscoveryDefaults::default());
        assert_eq!(venues[0].address, "Frauenplatz 9, 80331 München");
        assert_eq!(venues[0].category, VenueCategory::Bar);
        assert_eq!(venues[0].id, 9_047_980_483);
    }

    #[rstest]
    fn missing_tags_take_defaults(elements: Vec<OverpassElement>) {
        let venues = normalise_elements(&elements, &DiscoveryDefaults::default());
        let unnamed = &venues[1];
        assert_eq!(unnamed.id, 1, "id falls back to element index");
        assert_eq!(unnamed.name, "Augustiner Location");
        assert_eq!(unnamed.address, "Munich");
        assert_eq!(unnamed.category, VenueCategory::Biergarten);
    }

    #[rstest]
    fn street_without_number_or_locality(elements: Vec<OverpassElement>) {
        let venues = normalise_elements(&elements, &DiscoveryDefaults::default());
        let platzl = &venues[2];
        assert_eq!(platzl.address, "Orlandostraße");
        assert!((platzl.location.y - 48.1375).abs() < 1e-9);
        assert!((platzl.location.x - 11.5795).abs() < 1e-9);
    }

    #[rstest]
    fn craft_tag_maps_category_when_amenity_does_not(elements: Vec<OverpassElement>) {
        let venues = normalise_elements(&elements, &DiscoveryDefaults::default());
        assert_eq!(venues[3].category, VenueCategory::Brewery);
    }

    #[rstest]
    fn custom_defaults_are_honoured() {
        let json = r#"{ "elements": [ { "type": "node", "lat": 48.2, "lon": 11.6 } ] }"#;
        let elements = serde_json::from_str::<OverpassResponse>(json)
            .expect("fixture parses")
            .elements;
        let defaults = DiscoveryDefaults {
            name: "Unbenannt".to_owned(),
            address: "München".to_owned(),
            category: VenueCategory::Restaurant,
        };

        let venues = normalise_elements(&elements, &defaults);

        assert_eq!(
            venues,
            vec![Venue::new(
                0,
                "Unbenannt",
                Coord { x: 11.6, y: 48.2 },
                "München",
                VenueCategory::Restaurant
            )]
        );
    }
}
