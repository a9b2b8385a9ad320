//! [`RouteProvider`] backed by the GraphHopper Routing API.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use stammtisch_core::{LookupError, ProviderError, RouteEstimate, RouteProvider, RouteRequest};

use super::wire::{RouteBody, RouteResponse};
use crate::transport::{HttpConfig, ProviderBuildError};

const METRES_PER_KM: f64 = 1000.0;
const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Routing adapter issuing one `POST {base}/route` per request.
///
/// No retries are attempted; the ranking engine falls back to a great-circle
/// estimate on any error.
pub struct HttpRouteProvider {
    client: Client,
    config: HttpConfig,
}

impl std::fmt::Debug for HttpRouteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRouteProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpRouteProvider {
    /// Create a provider for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpConfig::new(base_url))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client fails to
    /// build.
    pub fn with_config(config: HttpConfig) -> Result<Self, ProviderBuildError> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    /// URL of the routing endpoint, without credentials.
    fn route_url(&self) -> String {
        self.config.endpoint("route")
    }
}

/// Convert the first path of `response` to kilometres and minutes.
pub(crate) fn convert_route(response: RouteResponse) -> Result<RouteEstimate, LookupError> {
    let path = response
        .paths
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::not_found("route"))?;
    let (Some(distance_m), Some(time_ms)) = (path.distance, path.time) else {
        return Err(ProviderError::Parse {
            message: "route path is missing distance or time".to_owned(),
        }
        .into());
    };
    Ok(RouteEstimate {
        distance_km: distance_m / METRES_PER_KM,
        time_min: time_ms / MILLIS_PER_MINUTE,
    })
}

#[async_trait]
impl RouteProvider for HttpRouteProvider {
    async fn route(&self, request: &RouteRequest) -> Result<RouteEstimate, LookupError> {
        let url = self.route_url();
        let body = RouteBody::from_request(request);
        debug!("POST {url} profile={}", body.profile);

        let response = self
            .client
            .post(&url)
            .query(&self.config.key_query())
            .json(&body)
            .send()
            .await
            .map_err(|err| self.config.convert_reqwest_error(err, &url))?
            .error_for_status()
            .map_err(|err| self.config.convert_reqwest_error(err, &url))?;

        let parsed: RouteResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::Parse {
                message: err.without_url().to_string(),
            })?;

        convert_route(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphhopper::wire::RoutePath;
    use rstest::rstest;

    fn response(paths: Vec<RoutePath>) -> RouteResponse {
        RouteResponse { paths }
    }

    #[rstest]
    fn converts_first_path_to_km_and_minutes() {
        let estimate = convert_route(response(vec![
            RoutePath {
                distance: Some(2500.0),
                time: Some(600_000.0),
            },
            RoutePath {
                distance: Some(9999.0),
                time: Some(1.0),
            },
        ]))
        .expect("route converts");

        assert_eq!(estimate.distance_km, 2.5);
        assert_eq!(estimate.time_min, 10.0);
    }

    #[rstest]
    fn empty_paths_are_not_found() {
        let err = convert_route(response(Vec::new())).expect_err("no paths");
        assert!(matches!(err, LookupError::NotFound { .. }));
    }

    #[rstest]
    #[case(None, Some(1.0))]
    #[case(Some(1.0), None)]
    fn incomplete_paths_are_parse_errors(#[case] distance: Option<f64>, #[case] time: Option<f64>) {
        let err = convert_route(response(vec![RoutePath { distance, time }]))
            .expect_err("incomplete path");
        assert!(matches!(
            err,
            LookupError::Provider(ProviderError::Parse { .. })
        ));
    }

    #[rstest]
    fn route_url_omits_credentials() {
        let provider = HttpRouteProvider::with_config(
            HttpConfig::new("https://graphhopper.com/api/1/").with_api_key("secret"),
        )
        .expect("provider should build");

        assert_eq!(provider.route_url(), "https://graphhopper.com/api/1/route");
    }

    #[rstest]
    fn rejects_invalid_base_url() {
        let err = HttpRouteProvider::new("graphhopper").expect_err("invalid URL");
        assert!(matches!(err, ProviderBuildError::InvalidBaseUrl { .. }));
    }
}
