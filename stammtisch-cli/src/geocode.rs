//! Geocode command implementation for the Stammtisch CLI.

use std::io::Write;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stammtisch_core::GeocodedAddress;
use tracing::info;

use crate::output::write_json;
use crate::services::{HttpServiceBuilder, ProviderSettings, ServiceBuilder, block_on};
use crate::{
    ARG_GEOCODE_ADDRESS, ARG_GRAPHHOPPER_KEY, ARG_GRAPHHOPPER_URL, ARG_TIMEOUT_SECS, CliError,
    ENV_GEOCODE_ADDRESS,
};

/// CLI arguments for the `geocode` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Resolve a free-text address through the GraphHopper geocoding \
                 API and print the first match as JSON.",
    about = "Resolve an address to coordinates"
)]
#[ortho_config(prefix = "STAMMTISCH")]
pub(crate) struct GeocodeArgs {
    /// Address to look up, for example "Leopoldstraße 1, München".
    #[arg(value_name = "address")]
    #[serde(default)]
    pub(crate) address: Option<String>,
    /// Base URL of the GraphHopper API.
    #[arg(long = ARG_GRAPHHOPPER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) graphhopper_url: Option<String>,
    /// GraphHopper API key.
    #[arg(long = ARG_GRAPHHOPPER_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) graphhopper_key: Option<String>,
    /// HTTP timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl GeocodeArgs {
    fn into_config(self) -> Result<GeocodeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        GeocodeConfig::try_from(merged)
    }
}

/// Resolved `geocode` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GeocodeConfig {
    pub(crate) address: String,
    pub(crate) providers: ProviderSettings,
}

impl TryFrom<GeocodeArgs> for GeocodeConfig {
    type Error = CliError;

    fn try_from(args: GeocodeArgs) -> Result<Self, Self::Error> {
        let address = args
            .address
            .map(|address| address.trim().to_owned())
            .filter(|address| !address.is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_GEOCODE_ADDRESS,
                env: ENV_GEOCODE_ADDRESS,
            })?;
        let providers = ProviderSettings::resolve(
            args.graphhopper_url,
            args.graphhopper_key,
            None,
            args.timeout_secs,
        )?;
        Ok(Self { address, providers })
    }
}

pub(crate) fn run_geocode(args: GeocodeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_geocode_with(args, &HttpServiceBuilder, &mut stdout)
}

pub(crate) fn run_geocode_with(
    args: GeocodeArgs,
    builder: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let matched = execute_geocode(&config, builder)?;
    write_json(writer, &matched)
}

fn execute_geocode(
    config: &GeocodeConfig,
    builder: &dyn ServiceBuilder,
) -> Result<GeocodedAddress, CliError> {
    let geocoder = builder.geocoder(&config.providers)?;
    let matched = block_on(geocoder.geocode(&config.address))?.map_err(|source| {
        CliError::Geocode {
            address: config.address.clone(),
            source,
        }
    })?;
    info!(address = %config.address, matched = %matched.display_name, "geocoded address");
    Ok(matched)
}
