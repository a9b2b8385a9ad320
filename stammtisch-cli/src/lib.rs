//! Command-line interface for the Stammtisch venue finder.
//!
//! Every subcommand layers its options through `ortho_config`: defaults, then
//! configuration files, then `STAMMTISCH_CMDS_<COMMAND>_<FIELD>` environment
//! variables, then flags. Results are printed to stdout as JSON; logs go to
//! stderr.
#![forbid(unsafe_code)]

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod error;
mod geocode;
mod output;
mod rank;
mod services;
mod venues;

pub use error::CliError;

use geocode::GeocodeArgs;
use rank::RankArgs;
use venues::VenuesArgs;

const ARG_PARTICIPANTS: &str = "participants";
const ARG_MODE: &str = "mode";
const ARG_METHOD: &str = "method";
const ARG_SESSION: &str = "session";
const ARG_VENUES: &str = "venues";
const ARG_ROSTER: &str = "roster";
const ARG_DISCOVER: &str = "discover";
const ARG_GRAPHHOPPER_URL: &str = "graphhopper-url";
const ARG_GRAPHHOPPER_KEY: &str = "graphhopper-key";
const ARG_OVERPASS_URL: &str = "overpass-url";
const ARG_CONCURRENCY: &str = "concurrency";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_GEOCODE_ADDRESS: &str = "address";
const ENV_GEOCODE_ADDRESS: &str = "STAMMTISCH_CMDS_GEOCODE_ADDRESS";

/// Install the stderr log subscriber.
///
/// Honours `RUST_LOG` and defaults to `info`. Records emitted through the
/// `log` facade by the library crates are captured as well. Calling this more
/// than once is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the Stammtisch CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] when arguments or configuration are invalid, an
/// input file cannot be read, a provider cannot be built, or a lookup the
/// command depends on fails.
pub fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => return Err(CliError::ArgumentParsing(err)),
    };
    match cli.command {
        Command::Rank(args) => rank::run_rank(args),
        Command::Geocode(args) => geocode::run_geocode(args),
        Command::Venues(args) => venues::run_venues(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "stammtisch",
    about = "Find the Augustiner venue that is fairest for everyone to reach",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank venues by mean travel distance for the selected participants.
    Rank(RankArgs),
    /// Resolve a free-text address to coordinates.
    Geocode(GeocodeArgs),
    /// List the candidate venues.
    Venues(VenuesArgs),
}

#[cfg(test)]
mod tests;
