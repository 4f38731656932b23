//! Integration tests for the simulation-data import pipeline
//!
//! These tests drive the archive, extraction, and aggregation stages against
//! synthetic archives on disk. The catalog lookup is constructed in memory
//! (it is a plain immutable value), so no database is required; the
//! transactional commit itself is covered separately in
//! `datapoint_replace_tests.rs`.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;
use zip::write::SimpleFileOptions;

use episim_common::types::DateSpan;
use episim_server::import::catalog::{
    CatalogLookup, CompartmentRow, GroupRow, ModelRow, NodeRow, ScenarioRow,
};
use episim_server::import::pipeline::collect_extractions;
use episim_server::import::{archive, extract, FailureKind, ImportError, NewDatapoint};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn catalog(
    span: (NaiveDate, NaiveDate),
    groups: &[&str],
    compartments: &[&str],
    node_codes: &[&str],
) -> CatalogLookup {
    CatalogLookup {
        scenario: ScenarioRow {
            id: Uuid::new_v4(),
            name: "test scenario".to_string(),
            model_id: Uuid::new_v4(),
            node_list_id: Uuid::new_v4(),
            start_date: span.0,
            end_date: span.1,
        },
        model: ModelRow {
            id: Uuid::new_v4(),
            name: "test model".to_string(),
        },
        groups: groups
            .iter()
            .map(|name| GroupRow {
                id: Uuid::new_v4(),
                name: name.to_string(),
            })
            .collect(),
        compartments: compartments
            .iter()
            .map(|name| CompartmentRow {
                id: Uuid::new_v4(),
                name: name.to_string(),
            })
            .collect(),
        nodes: node_codes
            .iter()
            .map(|code| NodeRow {
                id: Uuid::new_v4(),
                code: code.to_string(),
            })
            .collect(),
    }
}

/// Unpack an archive and run every percentile extraction, returning the
/// aggregated result exactly as the pipeline would see it.
async fn run_stages(
    archive_bytes: &[u8],
    catalog: CatalogLookup,
    dest: &Path,
) -> Result<
    Result<Vec<NewDatapoint>, episim_server::import::ImportFailureReport>,
    ImportError,
> {
    archive::extract_zip(archive_bytes, dest)?;
    let folders = archive::percentile_folders(dest)?;

    let span = DateSpan::new(catalog.scenario.start_date, catalog.scenario.end_date).unwrap();
    let shared = Arc::new(catalog);

    let mut results = Vec::new();
    for (percentile, dir) in folders {
        results.push(extract::extract_percentile(percentile, dir, span, Arc::clone(&shared)).await);
    }

    Ok(collect_extractions(results))
}

const THREE_DAYS: (&str, &str) = ("2024-03-01", "2024-03-03");

fn three_day_span() -> (NaiveDate, NaiveDate) {
    (
        THREE_DAYS.0.parse().unwrap(),
        THREE_DAYS.1.parse().unwrap(),
    )
}

fn valid_series_3d() -> &'static [u8] {
    br#"{
        "11000": {
            "Time": [0, 1, 2],
            "age0-19": [[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0], [9.0, 10.0, 11.0, 12.0]]
        }
    }"#
}

#[tokio::test]
async fn valid_archive_produces_datapoints_for_all_percentiles() {
    let dir = tempfile::tempdir().unwrap();
    let data = build_zip(&[
        ("p25/11000.json", valid_series_3d()),
        ("p50/11000.json", valid_series_3d()),
    ]);
    let catalog = catalog(
        three_day_span(),
        &["age0-19"],
        &["MildInfections", "Hospitalized", "ICU", "Dead"],
        &["11000"],
    );

    let outcome = run_stages(&data, catalog, dir.path()).await.unwrap();
    let datapoints = outcome.unwrap();

    // 2 percentiles x 3 days x 1 group x 4 compartments
    assert_eq!(datapoints.len(), 24);
    let percentiles: std::collections::BTreeSet<i32> =
        datapoints.iter().map(|d| d.percentile).collect();
    assert_eq!(percentiles.into_iter().collect::<Vec<_>>(), vec![25, 50]);
}

#[tokio::test]
async fn day_count_mismatch_is_rejected_with_both_counts() {
    let dir = tempfile::tempdir().unwrap();
    // Two records for a three-day scenario.
    let short_series = br#"{
        "11000": {
            "age0-19": [[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]]
        }
    }"#;
    let data = build_zip(&[("p50/11000.json", short_series)]);
    let catalog = catalog(
        three_day_span(),
        &["age0-19"],
        &["MildInfections", "Hospitalized", "ICU", "Dead"],
        &["11000"],
    );

    let report = run_stages(&data, catalog, dir.path())
        .await
        .unwrap()
        .unwrap_err();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, FailureKind::DayCountMismatch);
    assert!(report.failures[0].detail.contains("expected 3"));
    assert!(report.failures[0].detail.contains("got 2"));
}

#[tokio::test]
async fn unknown_node_code_is_rejected_and_nothing_survives() {
    let dir = tempfile::tempdir().unwrap();
    let unknown_node = br#"{
        "99999": {
            "age0-19": [[1.0, 2.0, 3.0, 4.0], [1.0, 2.0, 3.0, 4.0], [1.0, 2.0, 3.0, 4.0]]
        }
    }"#;
    // p25 is entirely valid; the p50 failure must still abort everything.
    let data = build_zip(&[
        ("p25/11000.json", valid_series_3d()),
        ("p50/99999.json", unknown_node),
    ]);
    let catalog = catalog(
        three_day_span(),
        &["age0-19"],
        &["MildInfections", "Hospitalized", "ICU", "Dead"],
        &["11000"],
    );

    let report = run_stages(&data, catalog, dir.path())
        .await
        .unwrap()
        .unwrap_err();

    let by_percentile = report.by_percentile();
    assert_eq!(by_percentile.len(), 1);
    assert!(by_percentile[&50][0].contains("99999"));
    // The valid p25 output was discarded, not committed: collect_extractions
    // returned Err, so the caller has no datapoints at all.
}

#[tokio::test]
async fn compartment_ordinals_map_to_canonical_names() {
    let dir = tempfile::tempdir().unwrap();
    let single_day = br#"{"11000": {"age0-19": [[10.0, 5.0, 2.0, 1.0]]}}"#;
    let data = build_zip(&[("p50/11000.json", single_day)]);
    let span = (date(2024, 3, 1), date(2024, 3, 1));
    let catalog = catalog(
        span,
        &["age0-19"],
        &["MildInfections", "Hospitalized", "ICU", "Dead"],
        &["11000"],
    );
    let names_by_id: HashMap<Uuid, String> = catalog
        .compartments
        .iter()
        .map(|c| (c.id, c.name.clone()))
        .collect();

    let datapoints = run_stages(&data, catalog, dir.path())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(datapoints.len(), 4);
    let pairs: Vec<(String, f64)> = datapoints
        .iter()
        .map(|d| (names_by_id[&d.compartment_id].clone(), d.value))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("MildInfections".to_string(), 10.0),
            ("Hospitalized".to_string(), 5.0),
            ("ICU".to_string(), 2.0),
            ("Dead".to_string(), 1.0),
        ]
    );
}

#[tokio::test]
async fn mixed_validity_reports_only_the_failing_percentile() {
    let dir = tempfile::tempdir().unwrap();
    let short_series = br#"{
        "11000": {
            "age0-19": [[1.0, 2.0, 3.0, 4.0]]
        }
    }"#;
    let data = build_zip(&[
        ("p25/11000.json", valid_series_3d()),
        ("p75/11000.json", short_series),
    ]);
    let catalog = catalog(
        three_day_span(),
        &["age0-19"],
        &["MildInfections", "Hospitalized", "ICU", "Dead"],
        &["11000"],
    );

    let report = run_stages(&data, catalog, dir.path())
        .await
        .unwrap()
        .unwrap_err();

    let percentiles: Vec<u8> = report.failures.iter().map(|f| f.percentile).collect();
    assert_eq!(percentiles, vec![75]);
}

#[test]
fn malformed_folder_name_rejects_archive_before_opening_files() {
    let dir = tempfile::tempdir().unwrap();
    // The file inside the offending folder is intentionally corrupt: if the
    // layout gate ever opened it, extraction would produce an
    // UnreadableFile failure instead of the layout error asserted here.
    let data = build_zip(&[
        ("p25/11000.json", valid_series_3d()),
        ("percentile_50/garbage.json", b"\x00\xff not json".as_slice()),
    ]);

    archive::extract_zip(&data, dir.path()).unwrap();
    let result = archive::percentile_folders(dir.path());

    assert!(
        matches!(result, Err(ImportError::MalformedLayout(ref name)) if name == "percentile_50")
    );
}

#[test]
fn scratch_directories_do_not_accumulate_across_attempts() {
    let root = tempfile::tempdir().unwrap();

    for _ in 0..3 {
        let scratch = archive::ScratchDir::create(root.path(), "scenario-1").unwrap();
        std::fs::write(scratch.path().join("upload.zip"), b"payload").unwrap();
        drop(scratch);
    }

    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}
