//! [`Geocoder`] backed by the GraphHopper Geocoding API.

use async_trait::async_trait;
use geo::Coord;
use log::debug;
use reqwest::Client;
use stammtisch_core::{GeocodedAddress, Geocoder, LookupError, ProviderError};

use super::wire::{GeocodeResponse, LOCALE};
use crate::transport::{HttpConfig, ProviderBuildError};

/// Geocoding adapter issuing one `GET {base}/geocode` per lookup.
pub struct HttpGeocoder {
    client: Client,
    config: HttpConfig,
}

impl std::fmt::Debug for HttpGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGeocoder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpGeocoder {
    /// Create a geocoder for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpConfig::new(base_url))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client fails to
    /// build.
    pub fn with_config(config: HttpConfig) -> Result<Self, ProviderBuildError> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }
}

/// Take the first hit, falling back to `query` for the display name.
pub(crate) fn convert_geocode(
    response: GeocodeResponse,
    query: &str,
) -> Result<GeocodedAddress, LookupError> {
    let hit = response
        .hits
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::not_found(query))?;
    let location = Coord {
        x: hit.point.lng,
        y: hit.point.lat,
    };
    Ok(GeocodedAddress::new(
        location,
        hit.name.unwrap_or_else(|| query.to_owned()),
    ))
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress, LookupError> {
        let query = address.trim();
        if query.is_empty() {
            return Err(LookupError::invalid_input("address must not be empty"));
        }

        let url = self.config.endpoint("geocode");
        debug!("GET {url} q={query:?}");
        let mut params = vec![("q", query), ("limit", "1"), ("locale", LOCALE)];
        params.extend(self.config.key_query());

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|err| self.config.convert_reqwest_error(err, &url))?
            .error_for_status()
            .map_err(|err| self.config.convert_reqwest_error(err, &url))?;

        let parsed: GeocodeResponse =
            response
                .json()
                .await
                .map_err(|err| ProviderError::Parse {
                    message: err.without_url().to_string(),
                })?;

        convert_geocode(parsed, query)
    }
}
