//! Venues command implementation for the Stammtisch CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::output::write_json;
use crate::services::{
    HttpServiceBuilder, ProviderSettings, ServiceBuilder, VenueSourceKind, block_on,
    collect_venues, require_optional,
};
use crate::{ARG_DISCOVER, ARG_OVERPASS_URL, ARG_TIMEOUT_SECS, ARG_VENUES, CliError};

/// CLI arguments for the `venues` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Print the candidate venues as JSON, either from the built-in \
                 catalogue, a catalogue file, or a live Overpass query.",
    about = "List candidate venues"
)]
#[ortho_config(prefix = "STAMMTISCH")]
pub(crate) struct VenuesArgs {
    /// Venue source: `static` (default) or `overpass`.
    #[arg(long = ARG_DISCOVER, value_name = "source")]
    #[serde(default)]
    pub(crate) discover: Option<String>,
    /// JSON venue catalogue replacing the built-in list.
    #[arg(long = ARG_VENUES, value_name = "path")]
    #[serde(default)]
    pub(crate) venues: Option<Utf8PathBuf>,
    /// Overpass interpreter endpoint.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// HTTP timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl VenuesArgs {
    fn into_config(self) -> Result<VenuesConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        VenuesConfig::try_from(merged)
    }
}

/// Resolved `venues` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VenuesConfig {
    pub(crate) source: VenueSourceKind,
    pub(crate) venues_file: Option<Utf8PathBuf>,
    pub(crate) providers: ProviderSettings,
}

impl TryFrom<VenuesArgs> for VenuesConfig {
    type Error = CliError;

    fn try_from(args: VenuesArgs) -> Result<Self, Self::Error> {
        let source = args
            .discover
            .as_deref()
            .map_or(Ok(VenueSourceKind::Static), VenueSourceKind::parse)?;
        let providers =
            ProviderSettings::resolve(None, None, args.overpass_url, args.timeout_secs)?;
        Ok(Self {
            source,
            venues_file: args.venues,
            providers,
        })
    }
}

pub(crate) fn run_venues(args: VenuesArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_venues_with(args, &HttpServiceBuilder, &mut stdout)
}

pub(crate) fn run_venues_with(
    args: VenuesArgs,
    builder: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_optional(config.venues_file.as_ref(), ARG_VENUES)?;
    let venues = block_on(collect_venues(
        config.source,
        config.venues_file.as_deref(),
        builder,
        &config.providers,
    ))??;
    write_json(writer, &venues)
}
