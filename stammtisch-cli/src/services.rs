//! Provider construction and input helpers shared by the commands.

use std::future::Future;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use stammtisch_core::{Geocoder, RouteProvider, Venue, VenueSource};
use stammtisch_data::{
    DEFAULT_TIMEOUT_SECS, HttpConfig, HttpGeocoder, HttpRouteProvider, HttpVenueSource,
    builtin_venues, graphhopper, load_venues, overpass,
};
use tracing::info;

use crate::{ARG_DISCOVER, ARG_TIMEOUT_SECS, CliError};

/// Endpoints, credentials and timeout for the HTTP adapters.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct ProviderSettings {
    pub(crate) graphhopper_url: String,
    pub(crate) graphhopper_key: Option<String>,
    pub(crate) overpass_url: String,
    pub(crate) timeout: Duration,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("graphhopper_url", &self.graphhopper_url)
            .field(
                "graphhopper_key",
                &self.graphhopper_key.as_ref().map(|_| "<redacted>"),
            )
            .field("overpass_url", &self.overpass_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            graphhopper_url: graphhopper::DEFAULT_BASE_URL.to_owned(),
            graphhopper_key: None,
            overpass_url: overpass::DEFAULT_ENDPOINT.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ProviderSettings {
    /// Fill unset values from the defaults. A blank key counts as unset.
    pub(crate) fn resolve(
        graphhopper_url: Option<String>,
        graphhopper_key: Option<String>,
        overpass_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, CliError> {
        let defaults = Self::default();
        let timeout = match timeout_secs {
            Some(0) => {
                return Err(CliError::InvalidValue {
                    field: ARG_TIMEOUT_SECS,
                    value: "0".to_owned(),
                    reason: "timeout must be at least one second",
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.timeout,
        };
        Ok(Self {
            graphhopper_url: graphhopper_url.unwrap_or(defaults.graphhopper_url),
            graphhopper_key: graphhopper_key.filter(|key| !key.trim().is_empty()),
            overpass_url: overpass_url.unwrap_or(defaults.overpass_url),
            timeout,
        })
    }

    fn graphhopper_config(&self) -> HttpConfig {
        let config = HttpConfig::new(self.graphhopper_url.clone()).with_timeout(self.timeout);
        match &self.graphhopper_key {
            Some(key) => config.with_api_key(key.clone()),
            None => config,
        }
    }

    fn overpass_config(&self) -> HttpConfig {
        HttpConfig::new(self.overpass_url.clone()).with_timeout(self.timeout)
    }
}

/// Builds the network-backed providers for one command invocation.
pub(crate) trait ServiceBuilder {
    fn route_provider(
        &self,
        settings: &ProviderSettings,
    ) -> Result<Box<dyn RouteProvider>, CliError>;

    fn geocoder(&self, settings: &ProviderSettings) -> Result<Box<dyn Geocoder>, CliError>;

    fn discovery(&self, settings: &ProviderSettings) -> Result<Box<dyn VenueSource>, CliError>;
}

/// Builds the GraphHopper and Overpass adapters.
pub(crate) struct HttpServiceBuilder;

impl ServiceBuilder for HttpServiceBuilder {
    fn route_provider(
        &self,
        settings: &ProviderSettings,
    ) -> Result<Box<dyn RouteProvider>, CliError> {
        let provider = HttpRouteProvider::with_config(settings.graphhopper_config()).map_err(
            |source| CliError::BuildProvider {
                service: "routing",
                base_url: settings.graphhopper_url.clone(),
                source,
            },
        )?;
        Ok(Box::new(provider))
    }

    fn geocoder(&self, settings: &ProviderSettings) -> Result<Box<dyn Geocoder>, CliError> {
        let geocoder = HttpGeocoder::with_config(settings.graphhopper_config()).map_err(
            |source| CliError::BuildProvider {
                service: "geocoding",
                base_url: settings.graphhopper_url.clone(),
                source,
            },
        )?;
        Ok(Box::new(geocoder))
    }

    fn discovery(&self, settings: &ProviderSettings) -> Result<Box<dyn VenueSource>, CliError> {
        let source = HttpVenueSource::with_config(settings.overpass_config()).map_err(
            |source| CliError::BuildProvider {
                service: "discovery",
                base_url: settings.overpass_url.clone(),
                source,
            },
        )?;
        Ok(Box::new(source))
    }
}

/// Where candidate venues come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum VenueSourceKind {
    /// Built-in catalogue, or the `--venues` file when given.
    #[default]
    Static,
    /// Live Overpass query.
    Overpass,
}

impl VenueSourceKind {
    pub(crate) fn parse(value: &str) -> Result<Self, CliError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "static" | "builtin" => Ok(Self::Static),
            "overpass" => Ok(Self::Overpass),
            _ => Err(CliError::InvalidValue {
                field: ARG_DISCOVER,
                value: value.to_owned(),
                reason: "expected static or overpass",
            }),
        }
    }
}

/// Load the candidate venues for `kind`.
pub(crate) async fn collect_venues(
    kind: VenueSourceKind,
    venues_file: Option<&Utf8Path>,
    builder: &dyn ServiceBuilder,
    settings: &ProviderSettings,
) -> Result<Vec<Venue>, CliError> {
    let venues = match (kind, venues_file) {
        (VenueSourceKind::Static, Some(path)) => load_venues(path)?,
        (VenueSourceKind::Static, None) => builtin_venues()?,
        (VenueSourceKind::Overpass, _) => builder
            .discovery(settings)?
            .venues()
            .await
            .map_err(CliError::Discovery)?,
    };
    info!(count = venues.len(), source = ?kind, "loaded candidate venues");
    Ok(venues)
}

/// Drive `future` to completion on a fresh current-thread runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    Ok(runtime.block_on(future))
}

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match stammtisch_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Validate an optional input path.
pub(crate) fn require_optional(
    path: Option<&Utf8PathBuf>,
    field: &'static str,
) -> Result<(), CliError> {
    path.map_or(Ok(()), |path| require_existing(path, field))
}
