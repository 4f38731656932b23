//! Data types produced and reported by the import pipeline

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// One flattened simulation result row, ready for insertion.
///
/// Produced per (day, node, group, compartment) quadruple of a percentile's
/// time series; `scenario_id` is supplied at commit time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDatapoint {
    pub day: NaiveDate,
    pub node_id: Uuid,
    pub group_id: Uuid,
    pub compartment_id: Uuid,
    pub percentile: i32,
    pub value: f64,
}

/// Summary returned to the caller after a successful import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub scenario_id: Uuid,
    pub datapoints_stored: usize,
    pub percentiles: Vec<u8>,
}

/// Validation failure category for a percentile extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnknownNodes,
    UnknownGroups,
    UnknownCompartments,
    DayCountMismatch,
    UnreadableFile,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureKind::UnknownNodes => "unknown nodes",
            FailureKind::UnknownGroups => "unknown groups",
            FailureKind::UnknownCompartments => "unknown compartments",
            FailureKind::DayCountMismatch => "day count mismatch",
            FailureKind::UnreadableFile => "unreadable file",
        };
        f.write_str(label)
    }
}

/// Structured failure of one percentile's extraction.
///
/// Returned as a value from the extraction task; never raised across the
/// task boundary. Carries everything the caller needs to report the problem
/// without re-opening any file.
#[derive(Debug, Clone, Serialize)]
pub struct PercentileFailure {
    pub percentile: u8,
    pub kind: FailureKind,
    pub detail: String,
}

impl PercentileFailure {
    pub fn new(percentile: u8, kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            percentile,
            kind,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for PercentileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}: {}: {}", self.percentile, self.kind, self.detail)
    }
}

/// Union of all percentile failures of one import attempt.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportFailureReport {
    pub failures: Vec<PercentileFailure>,
}

impl ImportFailureReport {
    /// Failure descriptions keyed by percentile, for the error payload.
    pub fn by_percentile(&self) -> BTreeMap<u8, Vec<String>> {
        let mut map: BTreeMap<u8, Vec<String>> = BTreeMap::new();
        for failure in &self.failures {
            map.entry(failure.percentile)
                .or_default()
                .push(format!("{}: {}", failure.kind, failure.detail));
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_groups_by_percentile() {
        let report = ImportFailureReport {
            failures: vec![
                PercentileFailure::new(50, FailureKind::UnknownNodes, "codes 99999"),
                PercentileFailure::new(50, FailureKind::DayCountMismatch, "expected 10, got 9"),
                PercentileFailure::new(25, FailureKind::UnknownGroups, "groups total"),
            ],
        };

        let by_percentile = report.by_percentile();
        assert_eq!(by_percentile.len(), 2);
        assert_eq!(by_percentile[&50].len(), 2);
        assert_eq!(by_percentile[&25].len(), 1);
        assert!(by_percentile[&25][0].contains("unknown groups"));
    }
}
