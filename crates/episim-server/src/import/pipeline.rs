//! Import pipeline orchestration
//!
//! Runs the stages in dependency order: archive intake and layout
//! validation, catalog lookup, one concurrent extraction task per
//! percentile, aggregation, and the atomic replace. Extraction tasks are
//! never cancelled on sibling failure; the aggregation step collects every
//! failure so one request surfaces every problem in the archive.

use sqlx::PgPool;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use episim_common::checksum::{compute_bytes_checksum, ChecksumAlgorithm};

use super::archive::{self, ScratchDir};
use super::catalog::CatalogLookup;
use super::models::{ImportFailureReport, ImportOutcome, NewDatapoint, PercentileFailure};
use super::{extract, storage, ImportError, Result};

/// Scenario simulation-data import pipeline.
///
/// Stateless between runs; each invocation is a self-contained,
/// idempotent-by-replacement operation.
#[derive(Clone)]
pub struct ImportPipeline {
    db: PgPool,
    scratch_root: PathBuf,
}

impl ImportPipeline {
    pub fn new(db: PgPool, scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            db,
            scratch_root: scratch_root.into(),
        }
    }

    /// Run one import: validate, extract, cross-validate, atomically replace.
    ///
    /// On any validation failure the scenario's existing dataset is left
    /// untouched and the caller receives the union of all per-percentile
    /// failures; the corrected archive can be re-uploaded without cleanup.
    #[tracing::instrument(skip(self, payload), fields(scenario_id = %scenario_id, filename = %filename))]
    pub async fn run(
        &self,
        scenario_id: Uuid,
        filename: &str,
        payload: Vec<u8>,
    ) -> Result<ImportOutcome> {
        archive::validate_upload(filename, &payload)?;

        let checksum = compute_bytes_checksum(&payload, ChecksumAlgorithm::Sha256);
        info!(
            size_bytes = payload.len(),
            archive_sha256 = %checksum,
            "Received simulation data archive"
        );

        // Intake is blocking filesystem work; keep it off the runtime.
        let scratch_root = self.scratch_root.clone();
        let scratch_key = scenario_id.to_string();
        let (scratch, folders) = tokio::task::spawn_blocking(
            move || -> Result<(ScratchDir, BTreeMap<u8, PathBuf>)> {
                let scratch = ScratchDir::create(&scratch_root, &scratch_key)?;
                std::fs::write(scratch.path().join(archive::UPLOAD_FILE_NAME), &payload)?;

                let extract_root = scratch.path().join(archive::EXTRACT_DIR_NAME);
                archive::extract_zip(&payload, &extract_root)?;
                let folders = archive::percentile_folders(&extract_root)?;
                Ok((scratch, folders))
            },
        )
        .await
        .map_err(|e| ImportError::TaskJoin(e.to_string()))??;

        info!(percentiles = folders.len(), "Archive layout validated");

        let catalog = Arc::new(CatalogLookup::load(&self.db, scenario_id).await?);
        let span = catalog.span()?;
        info!(
            model = %catalog.model.name,
            groups = catalog.groups.len(),
            compartments = catalog.compartments.len(),
            nodes = catalog.nodes.len(),
            days = span.days(),
            "Catalog lookup complete"
        );

        let handles: Vec<_> = folders
            .iter()
            .map(|(percentile, dir)| {
                tokio::spawn(extract::extract_percentile(
                    *percentile,
                    dir.clone(),
                    span,
                    Arc::clone(&catalog),
                ))
            })
            .collect();

        // join_all waits for every task: siblings of a failed percentile run
        // to completion so the failure report is complete.
        let mut results = Vec::with_capacity(handles.len());
        for joined in futures::future::join_all(handles).await {
            results.push(joined.map_err(|e| ImportError::TaskJoin(e.to_string()))?);
        }

        let datapoints = match collect_extractions(results) {
            Ok(datapoints) => datapoints,
            Err(report) => {
                warn!(
                    failed_percentiles = report.by_percentile().len(),
                    "Import aborted; stored datapoints unchanged"
                );
                return Err(ImportError::Validation { report });
            },
        };

        let stored =
            storage::replace_scenario_datapoints(&self.db, scenario_id, &datapoints).await?;
        info!(datapoints = stored, "Import committed");

        drop(scratch);

        Ok(ImportOutcome {
            scenario_id,
            datapoints_stored: stored,
            percentiles: folders.keys().copied().collect(),
        })
    }

    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }
}

/// Aggregate per-percentile extraction results.
///
/// Succeeds only when every extraction succeeded; otherwise returns the
/// union of all failures, ordered by percentile. Row order across
/// percentiles carries no meaning, so results are concatenated as-is.
pub fn collect_extractions(
    results: Vec<std::result::Result<Vec<NewDatapoint>, PercentileFailure>>,
) -> std::result::Result<Vec<NewDatapoint>, ImportFailureReport> {
    let mut datapoints = Vec::new();
    let mut failures = Vec::new();

    for result in results {
        match result {
            Ok(rows) => datapoints.extend(rows),
            Err(failure) => failures.push(failure),
        }
    }

    if failures.is_empty() {
        Ok(datapoints)
    } else {
        failures.sort_by_key(|failure| failure.percentile);
        Err(ImportFailureReport { failures })
    }
}

/// Failure payload for the upload endpoint: percentile -> descriptions.
pub fn failure_payload(report: &ImportFailureReport) -> BTreeMap<String, Vec<String>> {
    report
        .by_percentile()
        .into_iter()
        .map(|(percentile, messages)| (format!("p{}", percentile), messages))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::models::FailureKind;
    use chrono::NaiveDate;

    fn row(value: f64) -> NewDatapoint {
        NewDatapoint {
            day: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            node_id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            compartment_id: Uuid::new_v4(),
            percentile: 50,
            value,
        }
    }

    #[test]
    fn test_all_successes_concatenate() {
        let results = vec![Ok(vec![row(1.0), row(2.0)]), Ok(vec![row(3.0)])];
        let datapoints = collect_extractions(results).unwrap();
        assert_eq!(datapoints.len(), 3);
    }

    #[test]
    fn test_single_failure_discards_valid_siblings() {
        let results = vec![
            Ok(vec![row(1.0), row(2.0)]),
            Err(PercentileFailure::new(
                75,
                FailureKind::DayCountMismatch,
                "expected 3 daily records, got 2",
            )),
        ];

        let report = collect_extractions(results).unwrap_err();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].percentile, 75);
        // The valid percentile's output is discarded along with the rest.
    }

    #[test]
    fn test_failures_are_ordered_and_complete() {
        let results = vec![
            Err(PercentileFailure::new(90, FailureKind::UnknownNodes, "codes 99999")),
            Ok(vec![row(1.0)]),
            Err(PercentileFailure::new(10, FailureKind::UnknownGroups, "groups total")),
        ];

        let report = collect_extractions(results).unwrap_err();
        let percentiles: Vec<u8> = report.failures.iter().map(|f| f.percentile).collect();
        assert_eq!(percentiles, vec![10, 90]);
    }

    #[test]
    fn test_failure_payload_keys() {
        let report = ImportFailureReport {
            failures: vec![PercentileFailure::new(
                5,
                FailureKind::UnknownNodes,
                "codes 99999",
            )],
        };
        let payload = failure_payload(&report);
        assert!(payload.contains_key("p5"));
    }
}
