//! Command execution against a data file on disk

use chrono::{TimeZone, Utc};
use eventboard_cli::cli::{ClassifyArgs, CostsArgs, RatingArgs, WatchArgs};
use eventboard_cli::commands::{self, Session};
use eventboard_cli::config::OutputFormat;
use eventboard_cli::{CliError, Clock, Formatter, JsonFileSource};
use eventboard_views::{names, DashboardViews, ViewConfig};
use std::fs;
use std::path::Path;

const DATA: &str = r#"{
    "events": [
        {"id": 1, "name": "Morning keynote", "start": "2024-01-01T10:00:00Z", "end": "2024-01-01T12:00:00Z"},
        {"id": 2, "name": "Afternoon fair", "start": "2024-01-01T13:00:00Z"},
        {"id": 3, "name": "Unscheduled"}
    ],
    "suppliers": [
        {"id": 1, "name": "Catering"},
        {"id": 2, "name": "Lighting"}
    ],
    "items": [
        {"id": 1, "supplier_id": 1, "event_id": 1, "quantity": 2, "unit_cost": 10.0},
        {"id": 2, "supplier_id": 2, "event_id": 1, "quantity": 1, "unit_cost": 5.0},
        {"id": 3, "supplier_id": 1, "event_id": 2, "quantity": 3, "unit_cost": 1.0},
        {"id": 4, "supplier_id": 9, "event_id": 2, "quantity": 1, "unit_cost": 1.0}
    ],
    "ratings": [
        {"id": 1, "supplier_id": 1, "event_id": 1, "score": 4.0},
        {"id": 2, "supplier_id": 1, "event_id": 1, "score": 5.0},
        {"id": 3, "supplier_id": 2, "event_id": 1, "score": 3.0}
    ]
}"#;

fn session(path: &Path, hour: u32) -> Session {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap();
    Session::new(
        JsonFileSource::new(path),
        Clock::from_option(Some(at)),
        DashboardViews::new(ViewConfig::default()).unwrap(),
    )
}

fn data_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("data.json");
    fs::write(&path, DATA).unwrap();
    path
}

fn quiet() -> Formatter {
    Formatter::new(OutputFormat::Quiet, false)
}

#[test]
fn test_in_progress_follows_the_clock() {
    let dir = tempfile::tempdir().unwrap();
    let path = data_file(&dir);

    let morning = commands::execute_in_progress(&mut session(&path, 11), &quiet()).unwrap();
    assert_eq!(morning, "1");

    let afternoon = commands::execute_in_progress(&mut session(&path, 14), &quiet()).unwrap();
    assert_eq!(afternoon, "2");
}

#[test]
fn test_classify() {
    let dir = tempfile::tempdir().unwrap();
    let path = data_file(&dir);
    let mut session = session(&path, 14);

    let past = commands::execute_classify(
        ClassifyArgs {
            class: Some("past".to_string()),
        },
        &mut session,
        &quiet(),
    )
    .unwrap();
    assert_eq!(past, "1");

    let all = commands::execute_classify(ClassifyArgs { class: None }, &mut session, &quiet()).unwrap();
    assert_eq!(all, "in_progress: 2\nupcoming: \npast: 1");

    let unknown = commands::execute_classify(
        ClassifyArgs {
            class: Some("cancelled".to_string()),
        },
        &mut session,
        &quiet(),
    );
    assert!(matches!(unknown, Err(CliError::View(_))));
}

#[test]
fn test_costs() {
    let dir = tempfile::tempdir().unwrap();
    let path = data_file(&dir);
    let mut session = session(&path, 11);

    let all = commands::execute_costs(CostsArgs { event: None }, &mut session, &quiet()).unwrap();
    assert_eq!(all, "1 25.00\n2 3.00\n3 0.00");

    let one = commands::execute_costs(CostsArgs { event: Some(2) }, &mut session, &quiet()).unwrap();
    assert_eq!(one, "2 3.00");

    let missing = commands::execute_costs(CostsArgs { event: Some(42) }, &mut session, &quiet());
    assert!(matches!(missing, Err(CliError::InvalidInput(_))));

    // Same file, same snapshot: the second and third lookups hit the cache
    let metrics = session.views().metrics().view(names::EVENT_COSTS);
    assert_eq!(metrics.misses, 1);
    assert_eq!(metrics.hits, 1);
}

#[test]
fn test_costs_table_reports_skipped_items() {
    let dir = tempfile::tempdir().unwrap();
    let path = data_file(&dir);
    let formatter = Formatter::new(OutputFormat::Table, false);

    let output = commands::execute_costs(CostsArgs { event: None }, &mut session(&path, 11), &formatter).unwrap();
    assert!(output.contains("Grand total: 28.00"));
    assert!(output.contains("dangling_supplier: 1"));
}

#[test]
fn test_rating() {
    let dir = tempfile::tempdir().unwrap();
    let path = data_file(&dir);
    let mut session = session(&path, 11);

    let all = commands::execute_rating(
        RatingArgs {
            event: 1,
            supplier: None,
        },
        &mut session,
        &quiet(),
    )
    .unwrap();
    assert_eq!(all, "1 4.50\n2 3.00");

    let repeated = commands::execute_rating(
        RatingArgs {
            event: 1,
            supplier: None,
        },
        &mut session,
        &quiet(),
    )
    .unwrap();
    assert_eq!(repeated, all);
    let metrics = session.views().metrics().view(names::SUPPLIER_RATINGS);
    assert_eq!((metrics.hits, metrics.misses), (1, 1));

    let none = commands::execute_rating(
        RatingArgs {
            event: 2,
            supplier: Some(1),
        },
        &mut session,
        &quiet(),
    )
    .unwrap();
    assert_eq!(none, "1 no data");
}

#[test]
fn test_integrity() {
    let dir = tempfile::tempdir().unwrap();
    let path = data_file(&dir);

    let output = commands::execute_integrity(&mut session(&path, 11), &quiet()).unwrap();
    assert!(output.contains("item 4 dangling_supplier"));
    assert!(output.contains("event 3 missing_start"));
}

#[test]
fn test_missing_data_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = commands::execute_in_progress(&mut session(&dir.path().join("none.json"), 11), &quiet());
    assert!(matches!(result, Err(CliError::Io(_))));
}

#[tokio::test]
async fn test_watch_runs_requested_cycles() {
    let dir = tempfile::tempdir().unwrap();
    let path = data_file(&dir);
    let config = ViewConfig {
        refresh_interval_secs: 1,
        ..ViewConfig::default()
    };
    let session = Session::new(
        JsonFileSource::new(&path),
        Clock::from_option(Some(Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap())),
        DashboardViews::new(config).unwrap(),
    );

    commands::execute_watch(
        WatchArgs {
            interval: None,
            cycles: Some(1),
        },
        session,
        &quiet(),
    )
    .await
    .unwrap();
}
