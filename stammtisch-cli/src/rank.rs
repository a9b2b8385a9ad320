//! Rank command implementation for the Stammtisch CLI.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stammtisch_core::{
    CalculationMethod, DEFAULT_CONCURRENCY, LocationOverride, Participant, RankingEngine,
    RankingRequest, ResolvedParticipant, Session, TransportMode, VenueRanking,
};
use stammtisch_data::{builtin_roster, load_roster};
use tracing::{info, warn};

use crate::output::write_json;
use crate::services::{
    HttpServiceBuilder, ProviderSettings, ServiceBuilder, VenueSourceKind, block_on,
    collect_venues, require_optional,
};
use crate::{
    ARG_CONCURRENCY, ARG_DISCOVER, ARG_GRAPHHOPPER_KEY, ARG_GRAPHHOPPER_URL, ARG_METHOD, ARG_MODE,
    ARG_OVERPASS_URL, ARG_PARTICIPANTS, ARG_ROSTER, ARG_SESSION, ARG_TIMEOUT_SECS, ARG_VENUES,
    CliError,
};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rank the candidate venues by the mean distance the selected \
                 participants have to travel. Distances come from the \
                 GraphHopper routing API and fall back to a great-circle \
                 estimate whenever a lookup fails. A session file may carry \
                 the selection, travel options, location overrides and \
                 addresses still to be geocoded.",
    about = "Rank venues for the selected participants"
)]
#[ortho_config(prefix = "STAMMTISCH")]
pub(crate) struct RankArgs {
    /// Comma-separated participant ids; defaults to everyone.
    #[arg(long = ARG_PARTICIPANTS, value_name = "ids")]
    #[serde(default)]
    pub(crate) participants: Option<String>,
    /// Travel mode: `walk` (or `foot`), `bike` or `car`.
    #[arg(long = ARG_MODE, value_name = "mode")]
    #[serde(default)]
    pub(crate) mode: Option<String>,
    /// Distance method: `routed` or `approximate`.
    #[arg(long = ARG_METHOD, value_name = "method")]
    #[serde(default)]
    pub(crate) method: Option<String>,
    /// JSON session file with selection, overrides and pending relocations.
    #[arg(long = ARG_SESSION, value_name = "path")]
    #[serde(default)]
    pub(crate) session: Option<Utf8PathBuf>,
    /// JSON venue catalogue replacing the built-in list.
    #[arg(long = ARG_VENUES, value_name = "path")]
    #[serde(default)]
    pub(crate) venues: Option<Utf8PathBuf>,
    /// JSON participant roster replacing the built-in one.
    #[arg(long = ARG_ROSTER, value_name = "path")]
    #[serde(default)]
    pub(crate) roster: Option<Utf8PathBuf>,
    /// Venue source: `static` (default) or `overpass`.
    #[arg(long = ARG_DISCOVER, value_name = "source")]
    #[serde(default)]
    pub(crate) discover: Option<String>,
    /// Base URL of the GraphHopper API.
    #[arg(long = ARG_GRAPHHOPPER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) graphhopper_url: Option<String>,
    /// GraphHopper API key.
    #[arg(long = ARG_GRAPHHOPPER_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) graphhopper_key: Option<String>,
    /// Overpass interpreter endpoint.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// Maximum routing lookups in flight.
    #[arg(long = ARG_CONCURRENCY, value_name = "n")]
    #[serde(default)]
    pub(crate) concurrency: Option<usize>,
    /// HTTP timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl RankArgs {
    fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

/// Resolved `rank` command configuration.
///
/// Mode, method and selection stay optional here so a session file can fill
/// whatever the flags leave unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RankConfig {
    pub(crate) participants: Option<Vec<u32>>,
    pub(crate) mode: Option<TransportMode>,
    pub(crate) method: Option<CalculationMethod>,
    pub(crate) session: Option<Utf8PathBuf>,
    pub(crate) venues: Option<Utf8PathBuf>,
    pub(crate) roster: Option<Utf8PathBuf>,
    pub(crate) source: VenueSourceKind,
    pub(crate) concurrency: usize,
    pub(crate) providers: ProviderSettings,
}

impl RankConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_optional(self.session.as_ref(), ARG_SESSION)?;
        require_optional(self.venues.as_ref(), ARG_VENUES)?;
        require_optional(self.roster.as_ref(), ARG_ROSTER)?;
        Ok(())
    }
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        let participants = args
            .participants
            .as_deref()
            .map(parse_participant_ids)
            .transpose()?;
        let mode = args
            .mode
            .as_deref()
            .map(str::parse::<TransportMode>)
            .transpose()
            .map_err(|source| CliError::InvalidOption {
                field: ARG_MODE,
                source,
            })?;
        let method = args
            .method
            .as_deref()
            .map(str::parse::<CalculationMethod>)
            .transpose()
            .map_err(|source| CliError::InvalidOption {
                field: ARG_METHOD,
                source,
            })?;
        let source = args
            .discover
            .as_deref()
            .map_or(Ok(VenueSourceKind::Static), VenueSourceKind::parse)?;
        let concurrency = match args.concurrency {
            Some(0) => {
                return Err(CliError::InvalidValue {
                    field: ARG_CONCURRENCY,
                    value: "0".to_owned(),
                    reason: "at least one lookup must be allowed in flight",
                });
            }
            Some(limit) => limit,
            None => DEFAULT_CONCURRENCY,
        };
        let providers = ProviderSettings::resolve(
            args.graphhopper_url,
            args.graphhopper_key,
            args.overpass_url,
            args.timeout_secs,
        )?;
        Ok(Self {
            participants,
            mode,
            method,
            session: args.session,
            venues: args.venues,
            roster: args.roster,
            source,
            concurrency,
            providers,
        })
    }
}

/// Parse `"1, 2,6"` into ids, ignoring empty entries.
pub(crate) fn parse_participant_ids(value: &str) -> Result<Vec<u32>, CliError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry.parse::<u32>().map_err(|_| CliError::InvalidValue {
                field: ARG_PARTICIPANTS,
                value: entry.to_owned(),
                reason: "participant ids must be non-negative integers",
            })
        })
        .collect()
}

/// On-disk session: every field is optional and flags take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SessionFile {
    pub(crate) selected: Option<BTreeSet<u32>>,
    pub(crate) mode: Option<TransportMode>,
    pub(crate) method: Option<CalculationMethod>,
    pub(crate) overrides: BTreeMap<u32, LocationOverride>,
    /// Addresses to geocode before ranking, keyed by participant id.
    pub(crate) relocations: BTreeMap<u32, String>,
}

pub(crate) fn load_session_file(path: &Utf8Path) -> Result<SessionFile, CliError> {
    stammtisch_fs::read_json(path).map_err(CliError::LoadSession)
}

/// A relocation that could not be geocoded; the participant keeps its
/// previous location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RelocationFailure {
    pub(crate) participant_id: u32,
    pub(crate) address: String,
    pub(crate) error: String,
}

/// Everything the `rank` command prints.
#[derive(Debug, Serialize)]
pub(crate) struct RankReport {
    pub(crate) mode: TransportMode,
    pub(crate) method: CalculationMethod,
    pub(crate) participants: Vec<ResolvedParticipant>,
    pub(crate) relocation_failures: Vec<RelocationFailure>,
    pub(crate) rankings: Vec<VenueRanking>,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_rank_with(args, &HttpServiceBuilder, &mut stdout)
}

pub(crate) fn run_rank_with(
    args: RankArgs,
    builder: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let report = execute_rank(args, builder)?;
    write_json(writer, &report)
}

fn execute_rank(args: RankArgs, builder: &dyn ServiceBuilder) -> Result<RankReport, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let roster = match &config.roster {
        Some(path) => load_roster(path)?,
        None => builtin_roster()?,
    };
    let session_file = config
        .session
        .as_deref()
        .map(load_session_file)
        .transpose()?
        .unwrap_or_default();
    let mut session = build_session(&config, &session_file, &roster)?;
    block_on(rank_session(
        &config,
        builder,
        &roster,
        &mut session,
        &session_file.relocations,
    ))?
}

/// Layer flags over the session file over defaults.
pub(crate) fn build_session(
    config: &RankConfig,
    file: &SessionFile,
    roster: &[Participant],
) -> Result<Session, CliError> {
    let mode = config.mode.or(file.mode).unwrap_or_default();
    let method = config.method.or(file.method).unwrap_or_default();
    let mut session = Session::new(mode).with_method(method);
    session = match (&config.participants, &file.selected) {
        (Some(ids), _) => session.with_selection(ids.iter().copied()),
        (None, Some(ids)) => session.with_selection(ids.iter().copied()),
        (None, None) => session.select_all(roster),
    };
    if let Some(&id) = session
        .selected
        .iter()
        .find(|&&id| !roster.iter().any(|participant| participant.id == id))
    {
        return Err(CliError::UnknownParticipant { id });
    }
    for (&id, location_override) in &file.overrides {
        if roster.iter().any(|participant| participant.id == id) {
            session.set_override(id, location_override.clone());
        } else {
            warn!(participant = id, "ignoring override for unknown participant");
        }
    }
    Ok(session)
}

async fn rank_session(
    config: &RankConfig,
    builder: &dyn ServiceBuilder,
    roster: &[Participant],
    session: &mut Session,
    relocations: &BTreeMap<u32, String>,
) -> Result<RankReport, CliError> {
    let mut relocation_failures = Vec::new();
    if !relocations.is_empty() {
        let geocoder = builder.geocoder(&config.providers)?;
        for (&id, address) in relocations {
            if let Err(err) = session.relocate(geocoder.as_ref(), roster, id, address).await {
                warn!(participant = id, error = %err, "relocation failed");
                relocation_failures.push(RelocationFailure {
                    participant_id: id,
                    address: address.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    let venues = collect_venues(
        config.source,
        config.venues.as_deref(),
        builder,
        &config.providers,
    )
    .await?;
    let participants = session.resolve(roster);
    let provider = match session.method {
        CalculationMethod::Routed => Some(builder.route_provider(&config.providers)?),
        CalculationMethod::Approximate => None,
    };
    let engine = match provider.as_deref() {
        Some(provider) => RankingEngine::new(provider),
        None => RankingEngine::estimating(),
    }
    .with_concurrency(config.concurrency);
    let request = RankingRequest::from_session(session, &participants, &venues);
    let rankings = engine.rank(&request).await;
    if let Some(best) = rankings.first() {
        info!(
            venue = %best.venue.name,
            mean_km = best.mean_distance_km,
            "best venue"
        );
    }

    Ok(RankReport {
        mode: session.mode,
        method: session.method,
        participants,
        relocation_failures,
        rankings,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RankConfig, CliError> {
    let merged = RankArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RankConfig::try_from(merged)
}
