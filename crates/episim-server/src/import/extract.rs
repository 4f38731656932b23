//! Per-percentile extraction and validation
//!
//! One extraction task runs per percentile folder. Each series file in the
//! folder is validated against the shared catalog lookup and flattened into
//! datapoints. Validation fails closed: any unknown node code, unknown group
//! name, day-count mismatch, or unknown compartment rejects the whole file's
//! contribution, naming the offending values. Failures are returned as
//! [`PercentileFailure`] values so that concurrently running sibling tasks
//! are unaffected and the aggregation step can report every problem at once.

use episim_common::types::DateSpan;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::catalog::CatalogLookup;
use super::models::{FailureKind, NewDatapoint, PercentileFailure};
use super::series::{self, GroupSeries};

/// Name-to-id maps derived once per extraction task from the shared lookup.
struct CatalogMaps<'a> {
    nodes: HashMap<String, Uuid>,
    groups: HashMap<&'a str, Uuid>,
    compartments: HashMap<&'a str, Uuid>,
}

impl<'a> CatalogMaps<'a> {
    fn new(catalog: &'a CatalogLookup) -> Self {
        Self {
            nodes: catalog.node_ids_by_code(),
            groups: catalog.group_ids_by_name(),
            compartments: catalog.compartment_ids_by_name(),
        }
    }
}

/// Extract and validate all series files of one percentile folder.
pub async fn extract_percentile(
    percentile: u8,
    dir: PathBuf,
    span: DateSpan,
    catalog: Arc<CatalogLookup>,
) -> Result<Vec<NewDatapoint>, PercentileFailure> {
    let maps = CatalogMaps::new(&catalog);

    let mut paths = Vec::new();
    let mut entries = tokio::fs::read_dir(&dir).await.map_err(|e| {
        PercentileFailure::new(
            percentile,
            FailureKind::UnreadableFile,
            format!("failed to list percentile folder: {}", e),
        )
    })?;
    while let Some(entry) = entries.next_entry().await.map_err(|e| {
        PercentileFailure::new(
            percentile,
            FailureKind::UnreadableFile,
            format!("failed to list percentile folder: {}", e),
        )
    })? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some(series::SERIES_FILE_EXT) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut rows = Vec::new();
    for path in paths {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content = tokio::fs::read(&path).await.map_err(|e| {
            PercentileFailure::new(
                percentile,
                FailureKind::UnreadableFile,
                format!("file '{}': {}", file_name, e),
            )
        })?;
        rows.extend(extract_file(percentile, &file_name, &content, span, &maps)?);
    }

    debug!(percentile, rows = rows.len(), "Percentile extraction complete");
    Ok(rows)
}

/// Validate and flatten one series file.
///
/// Checks run in order: node codes, group names, day counts, compartment
/// names. Each membership check runs once per file and reports every
/// offending value of its category.
fn extract_file(
    percentile: u8,
    file_name: &str,
    content: &[u8],
    span: DateSpan,
    maps: &CatalogMaps<'_>,
) -> Result<Vec<NewDatapoint>, PercentileFailure> {
    let fail = |kind, detail: String| PercentileFailure::new(percentile, kind, detail);

    let document = series::parse_series_document(content)
        .map_err(|e| fail(FailureKind::UnreadableFile, format!("file '{}': {}", file_name, e)))?;

    // The outer keys are node codes; checking them first means a file for a
    // foreign node is rejected without reading any of its payloads.
    let unknown_nodes: BTreeSet<String> = document
        .keys()
        .map(|code| series::pad_node_code(code))
        .filter(|code| !maps.nodes.contains_key(code))
        .collect();
    if !unknown_nodes.is_empty() {
        return Err(fail(
            FailureKind::UnknownNodes,
            format!(
                "file '{}' references node codes outside the scenario's node list: {}",
                file_name,
                join(&unknown_nodes)
            ),
        ));
    }

    // Parse every group payload up front so structural problems surface
    // before any row is produced.
    let mut parsed: Vec<(&str, &str, GroupSeries)> = Vec::new();
    for (node_code, groups) in &document {
        for (key, payload) in groups {
            if key == series::TIME_KEY {
                continue;
            }
            let group_series = series::parse_group_series(payload).map_err(|e| {
                fail(
                    FailureKind::UnreadableFile,
                    format!(
                        "file '{}', node {}, group '{}': {}",
                        file_name, node_code, key, e
                    ),
                )
            })?;
            parsed.push((node_code.as_str(), key.as_str(), group_series));
        }
    }

    let unknown_groups: BTreeSet<String> = parsed
        .iter()
        .map(|(_, group, _)| *group)
        .filter(|group| !maps.groups.contains_key(group))
        .map(str::to_string)
        .collect();
    if !unknown_groups.is_empty() {
        return Err(fail(
            FailureKind::UnknownGroups,
            format!(
                "file '{}' references groups not defined for the model: {}",
                file_name,
                join(&unknown_groups)
            ),
        ));
    }

    let expected_days = span.days() as usize;
    for (node_code, group, group_series) in &parsed {
        if group_series.len() != expected_days {
            return Err(fail(
                FailureKind::DayCountMismatch,
                format!(
                    "file '{}', node {}, group '{}': expected {} daily records, got {}",
                    file_name,
                    node_code,
                    group,
                    expected_days,
                    group_series.len()
                ),
            ));
        }
    }

    // The record width fixes which ordinals are produced; it is uniform
    // within a file.
    let record_width = parsed
        .iter()
        .find_map(|(_, _, group_series)| group_series.first())
        .map(|record| record.len())
        .unwrap_or(0);

    if record_width > series::COMPARTMENT_ORDINALS.len() {
        return Err(fail(
            FailureKind::UnknownCompartments,
            format!(
                "file '{}': record position {} has no canonical compartment name",
                file_name,
                series::COMPARTMENT_ORDINALS.len()
            ),
        ));
    }

    let produced = &series::COMPARTMENT_ORDINALS[..record_width];
    let unknown_compartments: BTreeSet<String> = produced
        .iter()
        .filter(|name| !maps.compartments.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !unknown_compartments.is_empty() {
        return Err(fail(
            FailureKind::UnknownCompartments,
            format!(
                "file '{}' produces compartments not defined for the model: {}",
                file_name,
                join(&unknown_compartments)
            ),
        ));
    }

    let mut rows = Vec::new();
    for (node_code, group, group_series) in &parsed {
        let padded = series::pad_node_code(node_code);
        let node_id = maps.nodes[&padded];
        let group_id = maps.groups[group];

        for (day_offset, record) in group_series.iter().enumerate() {
            if record.len() != record_width {
                return Err(fail(
                    FailureKind::UnreadableFile,
                    format!(
                        "file '{}', node {}, group '{}': daily record {} has {} values, expected {}",
                        file_name,
                        node_code,
                        group,
                        day_offset,
                        record.len(),
                        record_width
                    ),
                ));
            }

            let day = span.date_at(day_offset as i64);
            for (ordinal, value) in record.iter().enumerate() {
                let compartment_id = maps.compartments[produced[ordinal]];
                rows.push(NewDatapoint {
                    day,
                    node_id,
                    group_id,
                    compartment_id,
                    percentile: i32::from(percentile),
                    value: *value,
                });
            }
        }
    }

    Ok(rows)
}

fn join(values: &BTreeSet<String>) -> String {
    values.iter().cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::catalog::test_support::lookup;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn three_day_catalog() -> CatalogLookup {
        lookup(
            date(2024, 3, 1),
            date(2024, 3, 3),
            &["age0-19", "age20-39"],
            &["MildInfections", "Hospitalized", "ICU", "Dead"],
            &["11000", "1100"],
        )
    }

    fn run_extract(
        catalog: &CatalogLookup,
        content: &[u8],
    ) -> Result<Vec<NewDatapoint>, PercentileFailure> {
        let span = catalog.span().unwrap();
        let maps = CatalogMaps::new(catalog);
        extract_file(50, "node.json", content, span, &maps)
    }

    #[test]
    fn test_valid_file_produces_rows() {
        let catalog = three_day_catalog();
        let content = br#"{
            "11000": {
                "Time": [0, 1, 2],
                "age0-19": [[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0], [9.0, 10.0, 11.0, 12.0]]
            }
        }"#;

        let rows = run_extract(&catalog, content).unwrap();
        // 3 days x 1 group x 4 compartments
        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|row| row.percentile == 50));
        assert_eq!(rows[0].day, date(2024, 3, 1));
        assert_eq!(rows[11].day, date(2024, 3, 3));
    }

    #[test]
    fn test_compartment_ordinal_mapping() {
        let catalog = lookup(
            date(2024, 3, 1),
            date(2024, 3, 1),
            &["age0-19"],
            &["MildInfections", "Hospitalized", "ICU", "Dead"],
            &["11000"],
        );
        let content = br#"{"11000": {"age0-19": [[10.0, 5.0, 2.0, 1.0]]}}"#;

        let rows = run_extract(&catalog, content).unwrap();
        assert_eq!(rows.len(), 4);

        let names_by_id: HashMap<Uuid, &str> = catalog
            .compartments
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect();
        let pairs: Vec<(&str, f64)> = rows
            .iter()
            .map(|row| (names_by_id[&row.compartment_id], row.value))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("MildInfections", 10.0),
                ("Hospitalized", 5.0),
                ("ICU", 2.0),
                ("Dead", 1.0),
            ]
        );
    }

    #[test]
    fn test_short_node_code_is_padded_before_matching() {
        let catalog = three_day_catalog();
        // "1100" pads to "01100", which is in the node list as "1100".
        let content = br#"{
            "1100": {
                "age0-19": [[1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 1.0]]
            }
        }"#;

        let rows = run_extract(&catalog, content).unwrap();
        assert_eq!(rows.len(), 12);
    }

    #[test]
    fn test_unknown_node_code_rejected_by_name() {
        let catalog = three_day_catalog();
        let content = br#"{
            "99999": {
                "age0-19": [[1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 1.0]]
            }
        }"#;

        let failure = run_extract(&catalog, content).unwrap_err();
        assert_eq!(failure.kind, FailureKind::UnknownNodes);
        assert!(failure.detail.contains("99999"));
    }

    #[test]
    fn test_unknown_group_rejected_by_name() {
        let catalog = three_day_catalog();
        let content = br#"{
            "11000": {
                "total": [[1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 1.0]]
            }
        }"#;

        let failure = run_extract(&catalog, content).unwrap_err();
        assert_eq!(failure.kind, FailureKind::UnknownGroups);
        assert!(failure.detail.contains("total"));
    }

    #[test]
    fn test_day_count_mismatch_names_both_counts() {
        let catalog = three_day_catalog();
        let content = br#"{
            "11000": {
                "age0-19": [[1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 1.0]]
            }
        }"#;

        let failure = run_extract(&catalog, content).unwrap_err();
        assert_eq!(failure.kind, FailureKind::DayCountMismatch);
        assert!(failure.detail.contains("expected 3"));
        assert!(failure.detail.contains("got 2"));
    }

    #[test]
    fn test_compartment_outside_model_rejected() {
        // Model only permits the first two compartments; 4-wide records
        // produce ICU and Dead as well.
        let catalog = lookup(
            date(2024, 3, 1),
            date(2024, 3, 1),
            &["age0-19"],
            &["MildInfections", "Hospitalized"],
            &["11000"],
        );
        let content = br#"{"11000": {"age0-19": [[1.0, 2.0, 3.0, 4.0]]}}"#;

        let failure = run_extract(&catalog, content).unwrap_err();
        assert_eq!(failure.kind, FailureKind::UnknownCompartments);
        assert!(failure.detail.contains("ICU"));
        assert!(failure.detail.contains("Dead"));
    }

    #[test]
    fn test_record_wider_than_ordinal_table_rejected() {
        let catalog = three_day_catalog();
        let content = br#"{
            "11000": {
                "age0-19": [[1.0, 1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 1.0, 1.0]]
            }
        }"#;

        let failure = run_extract(&catalog, content).unwrap_err();
        assert_eq!(failure.kind, FailureKind::UnknownCompartments);
    }

    #[test]
    fn test_time_key_is_skipped() {
        let catalog = lookup(
            date(2024, 3, 1),
            date(2024, 3, 1),
            &["age0-19"],
            &["MildInfections", "Hospitalized", "ICU", "Dead"],
            &["11000"],
        );
        // "Time" carries the axis, not values; it must produce no rows and
        // must not be validated as a group name.
        let content = br#"{
            "11000": {
                "Time": [0],
                "age0-19": [[1.0, 2.0, 3.0, 4.0]]
            }
        }"#;

        let rows = run_extract(&catalog, content).unwrap();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_garbage_file_rejected_as_unreadable() {
        let catalog = three_day_catalog();
        let failure = run_extract(&catalog, b"not json at all").unwrap_err();
        assert_eq!(failure.kind, FailureKind::UnreadableFile);
    }
}
