//! Focused unit tests covering rank configuration, session layering and
//! session files.

use std::collections::{BTreeMap, BTreeSet};

use geo::Coord;
use rstest::{fixture, rstest};
use stammtisch_core::test_support::sample_roster;
use stammtisch_core::{
    CalculationMethod, DEFAULT_CONCURRENCY, LocationOverride, Participant, TransportMode,
};

use super::helpers::Workspace;
use crate::rank::{
    RankArgs, RankConfig, SessionFile, build_session, config_from_layers_for_test,
    load_session_file, parse_participant_ids, run_rank_with,
};
use crate::services::{HttpServiceBuilder, ProviderSettings, VenueSourceKind};
use crate::{ARG_CONCURRENCY, ARG_METHOD, ARG_MODE, ARG_PARTICIPANTS, ARG_SESSION, CliError};

#[fixture]
fn roster() -> Vec<Participant> {
    sample_roster()
}

fn config(args: RankArgs) -> RankConfig {
    RankConfig::try_from(args).expect("config should build")
}

#[rstest]
fn rank_config_defaults() {
    let config = config(RankArgs::default());

    assert_eq!(config.participants, None);
    assert_eq!(config.mode, None);
    assert_eq!(config.method, None);
    assert_eq!(config.source, VenueSourceKind::Static);
    assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    assert_eq!(config.providers, ProviderSettings::default());
}

#[rstest]
fn rank_config_parses_options() {
    let config = config(RankArgs {
        participants: Some("1, 6".to_owned()),
        mode: Some("foot".to_owned()),
        method: Some("approximate".to_owned()),
        discover: Some("overpass".to_owned()),
        concurrency: Some(4),
        ..RankArgs::default()
    });

    assert_eq!(config.participants, Some(vec![1, 6]));
    assert_eq!(config.mode, Some(TransportMode::Walk));
    assert_eq!(config.method, Some(CalculationMethod::Approximate));
    assert_eq!(config.source, VenueSourceKind::Overpass);
    assert_eq!(config.concurrency, 4);
}

#[rstest]
#[case::mode(
    RankArgs { mode: Some("hovercraft".to_owned()), ..RankArgs::default() },
    ARG_MODE
)]
#[case::method(
    RankArgs { method: Some("telepathy".to_owned()), ..RankArgs::default() },
    ARG_METHOD
)]
fn rank_config_rejects_unknown_options(#[case] args: RankArgs, #[case] expected: &'static str) {
    let err = RankConfig::try_from(args).expect_err("unknown option");
    match err {
        CliError::InvalidOption { field, .. } => assert_eq!(field, expected),
        other => panic!("expected InvalidOption, found {other:?}"),
    }
}

#[rstest]
fn rank_config_rejects_zero_concurrency() {
    let err = RankConfig::try_from(RankArgs {
        concurrency: Some(0),
        ..RankArgs::default()
    })
    .expect_err("zero concurrency");
    match err {
        CliError::InvalidValue { field, .. } => assert_eq!(field, ARG_CONCURRENCY),
        other => panic!("expected InvalidValue, found {other:?}"),
    }
}

#[rstest]
#[case("1,2,3", vec![1, 2, 3])]
#[case(" 6 , ,1 ", vec![6, 1])]
#[case("", vec![])]
fn participant_ids_parse(#[case] value: &str, #[case] expected: Vec<u32>) {
    assert_eq!(parse_participant_ids(value).expect("ids parse"), expected);
}

#[rstest]
#[case("1,two")]
#[case("-3")]
fn malformed_participant_ids_are_rejected(#[case] value: &str) {
    let err = parse_participant_ids(value).expect_err("malformed ids");
    match err {
        CliError::InvalidValue { field, .. } => assert_eq!(field, ARG_PARTICIPANTS),
        other => panic!("expected InvalidValue, found {other:?}"),
    }
}

#[rstest]
fn session_defaults_select_everyone(roster: Vec<Participant>) {
    let session = build_session(&config(RankArgs::default()), &SessionFile::default(), &roster)
        .expect("session builds");

    assert_eq!(session.selected, BTreeSet::from([1, 2, 6]));
    assert_eq!(session.mode, TransportMode::Walk);
    assert_eq!(session.method, CalculationMethod::Routed);
}

#[rstest]
fn flags_take_precedence_over_session_file(roster: Vec<Participant>) {
    let file = SessionFile {
        selected: Some(BTreeSet::from([2])),
        mode: Some(TransportMode::Car),
        method: Some(CalculationMethod::Approximate),
        ..SessionFile::default()
    };
    let flags = config(RankArgs {
        participants: Some("1,6".to_owned()),
        mode: Some("bike".to_owned()),
        ..RankArgs::default()
    });

    let session = build_session(&flags, &file, &roster).expect("session builds");

    assert_eq!(session.selected, BTreeSet::from([1, 6]));
    assert_eq!(session.mode, TransportMode::Bike);
    assert_eq!(session.method, CalculationMethod::Approximate);
}

#[rstest]
fn unknown_selected_participant_is_rejected(roster: Vec<Participant>) {
    let file = SessionFile {
        selected: Some(BTreeSet::from([1, 42])),
        ..SessionFile::default()
    };

    let err = build_session(&config(RankArgs::default()), &file, &roster)
        .expect_err("unknown participant");

    assert!(matches!(err, CliError::UnknownParticipant { id: 42 }));
}

#[rstest]
fn overrides_for_unknown_participants_are_ignored(roster: Vec<Participant>) {
    let marienplatz = LocationOverride::new("Marienplatz", Coord { x: 11.5755, y: 48.1374 });
    let file = SessionFile {
        overrides: BTreeMap::from([(2, marienplatz.clone()), (99, marienplatz.clone())]),
        ..SessionFile::default()
    };

    let session =
        build_session(&config(RankArgs::default()), &file, &roster).expect("session builds");

    assert_eq!(session.override_for(2), Some(&marienplatz));
    assert_eq!(session.override_for(99), None);
}

#[rstest]
fn session_file_decodes_relocations_and_overrides() {
    let workspace = Workspace::new();
    let path = workspace.write(
        "session.json",
        r#"{
            "selected": [1, 2],
            "mode": "bike",
            "overrides": { "1": { "address": "Sendlinger Tor", "lat": 48.1339, "lng": 11.5668 } },
            "relocations": { "2": "Leopoldstraße 1, München" }
        }"#,
    );

    let file = load_session_file(&path).expect("session file decodes");

    assert_eq!(file.selected, Some(BTreeSet::from([1, 2])));
    assert_eq!(file.mode, Some(TransportMode::Bike));
    assert_eq!(file.method, None);
    assert_eq!(
        file.overrides.get(&1).map(|o| o.location),
        Some(Coord { x: 11.5668, y: 48.1339 })
    );
    assert_eq!(
        file.relocations.get(&2).map(String::as_str),
        Some("Leopoldstraße 1, München")
    );
}

#[rstest]
fn malformed_session_file_is_reported() {
    let workspace = Workspace::new();
    let path = workspace.write("session.json", r#"{ "mode": "hovercraft" }"#);

    let err = load_session_file(&path).expect_err("invalid mode");

    assert!(matches!(err, CliError::LoadSession(_)));
}

#[rstest]
fn validate_sources_reports_missing_session() {
    let workspace = Workspace::new();
    let config = config(RankArgs {
        session: Some(workspace.path("missing.json")),
        ..RankArgs::default()
    });

    match config.validate_sources().expect_err("missing session") {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_SESSION),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "concurrency": "many" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "mode": "car",
            "graphhopper_url": "http://from-file:8989",
            "concurrency": 2,
        }),
        None,
    );
    composer.push_environment(json!({
        "mode": "bike",
        "graphhopper_key": "from-env",
    }));
    composer.push_cli(json!({
        "mode": "walk",
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.mode, Some(TransportMode::Walk));
    assert_eq!(config.providers.graphhopper_url, "http://from-file:8989");
    assert_eq!(config.providers.graphhopper_key.as_deref(), Some("from-env"));
    assert_eq!(config.concurrency, 2);
}

fn unparseable_graphhopper(method: &str) -> RankArgs {
    RankArgs {
        method: Some(method.to_owned()),
        graphhopper_url: Some("not a url".to_owned()),
        ..RankArgs::default()
    }
}

#[rstest]
fn approximate_rank_never_builds_the_routing_client() {
    let mut stdout = Vec::new();

    run_rank_with(
        unparseable_graphhopper("approximate"),
        &HttpServiceBuilder,
        &mut stdout,
    )
    .expect("approximate ranking needs no routing client");

    let report: serde_json::Value = serde_json::from_slice(&stdout).expect("JSON report");
    let rankings = report["rankings"].as_array().expect("rankings array");
    assert_eq!(rankings.len(), 22);
    assert!(
        rankings
            .iter()
            .flat_map(|ranking| ranking["samples"].as_array().expect("samples array"))
            .all(|sample| sample["source"] == "estimated")
    );
}

#[rstest]
fn routed_rank_reports_unbuildable_routing_client() {
    let mut stdout = Vec::new();

    let err = run_rank_with(unparseable_graphhopper("routed"), &HttpServiceBuilder, &mut stdout)
        .expect_err("routed ranking needs the routing client");

    match err {
        CliError::BuildProvider { service, .. } => assert_eq!(service, "routing"),
        other => panic!("expected BuildProvider, found {other:?}"),
    }
    assert!(stdout.is_empty());
}
