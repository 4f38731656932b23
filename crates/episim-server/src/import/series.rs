//! Hierarchical time-series file contract
//!
//! Each percentile folder contains one series file per node. A file is a
//! JSON document with a fixed 3-level hierarchy:
//!
//! ```json
//! {
//!   "11000": {
//!     "Time": [0, 1, 2],
//!     "age0-19": [[10.0, 5.0, 2.0, 1.0], [9.5, 5.1, 2.0, 1.2], ...]
//!   }
//! }
//! ```
//!
//! outer key: node code (digits, compared after left-zero-padding to
//! [`NODE_CODE_WIDTH`]); second level: group name or the reserved
//! [`TIME_KEY`]; third level: one record per simulated day, each an ordered
//! tuple of compartment values whose position maps through
//! [`COMPARTMENT_ORDINALS`].
//!
//! The ordinal table is a wire contract with the producers of the result
//! files, not general domain knowledge; it must not be reordered.

use serde_json::Value;
use std::collections::BTreeMap;

/// Canonical width of a node code; shorter codes are left-zero-padded.
pub const NODE_CODE_WIDTH: usize = 5;

/// Reserved second-level key carrying the time axis; never a group name.
pub const TIME_KEY: &str = "Time";

/// Extension of series files inside a percentile folder.
pub const SERIES_FILE_EXT: &str = "json";

/// Ordinal position -> canonical compartment name.
pub const COMPARTMENT_ORDINALS: [&str; 4] = ["MildInfections", "Hospitalized", "ICU", "Dead"];

/// Canonical compartment name for a record position, if one is defined.
pub fn compartment_name(ordinal: usize) -> Option<&'static str> {
    COMPARTMENT_ORDINALS.get(ordinal).copied()
}

/// Left-zero-pad a raw node code to the canonical width.
pub fn pad_node_code(raw: &str) -> String {
    format!("{:0>width$}", raw, width = NODE_CODE_WIDTH)
}

/// Parsed series file: node code -> (group name | "Time") -> raw payload.
pub type SeriesDocument = BTreeMap<String, BTreeMap<String, Value>>;

/// Daily records of one group: one row per day, one value per compartment.
pub type GroupSeries = Vec<Vec<f64>>;

/// Parse the raw bytes of a series file into its hierarchy.
pub fn parse_series_document(content: &[u8]) -> Result<SeriesDocument, serde_json::Error> {
    serde_json::from_slice(content)
}

/// Interpret one group's payload as daily records.
pub fn parse_group_series(payload: &Value) -> Result<GroupSeries, serde_json::Error> {
    serde_json::from_value(payload.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_table_is_stable() {
        // Wire contract with the simulation result files.
        assert_eq!(compartment_name(0), Some("MildInfections"));
        assert_eq!(compartment_name(1), Some("Hospitalized"));
        assert_eq!(compartment_name(2), Some("ICU"));
        assert_eq!(compartment_name(3), Some("Dead"));
        assert_eq!(compartment_name(4), None);
    }

    #[test]
    fn test_pad_node_code() {
        assert_eq!(pad_node_code("42"), "00042");
        assert_eq!(pad_node_code("11000"), "11000");
        assert_eq!(pad_node_code("123456"), "123456");
    }

    #[test]
    fn test_parse_series_document() {
        let content = br#"{
            "11000": {
                "Time": [0, 1],
                "age0-19": [[10.0, 5.0, 2.0, 1.0], [9.5, 5.1, 2.0, 1.2]]
            }
        }"#;

        let document = parse_series_document(content).unwrap();
        assert_eq!(document.len(), 1);
        let node = &document["11000"];
        assert!(node.contains_key(TIME_KEY));

        let series = parse_group_series(&node["age0-19"]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0], vec![10.0, 5.0, 2.0, 1.0]);
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(parse_series_document(b"[1, 2, 3]").is_err());
    }
}
