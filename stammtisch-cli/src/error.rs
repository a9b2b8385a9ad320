//! Error types emitted by the Stammtisch CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use stammtisch_core::{LookupError, ParseOptionError};
use stammtisch_data::{CatalogueError, ProviderBuildError};
use stammtisch_fs::JsonFileError;
use thiserror::Error;

/// Errors emitted by the Stammtisch CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A transport mode or calculation method was not recognised.
    #[error("invalid --{field}: {source}")]
    InvalidOption {
        field: &'static str,
        #[source]
        source: ParseOptionError,
    },
    /// An option value is malformed or out of range.
    #[error("invalid --{field} {value:?}: {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
    /// A selected participant id is not in the roster.
    #[error("participant {id} is not in the roster")]
    UnknownParticipant { id: u32 },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A venue or roster catalogue failed to load.
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
    /// The session file could not be read or decoded.
    #[error("failed to load session: {0}")]
    LoadSession(#[source] JsonFileError),
    /// Constructing an HTTP adapter failed.
    #[error("failed to build {service} client for {base_url:?}: {source}")]
    BuildProvider {
        service: &'static str,
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Venue discovery failed.
    #[error("venue discovery failed: {0}")]
    Discovery(#[source] LookupError),
    /// Geocoding the requested address failed.
    #[error("failed to geocode {address:?}: {source}")]
    Geocode {
        address: String,
        #[source]
        source: LookupError,
    },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
