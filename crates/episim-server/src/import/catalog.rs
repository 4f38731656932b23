//! Catalog lookup for the import pipeline
//!
//! Loads everything the extraction tasks need to cross-validate a result
//! archive: the scenario, its model, the model's permitted groups and
//! compartments, and the scenario's ordered node list. The resulting
//! [`CatalogLookup`] is immutable and shared by reference (via `Arc`) across
//! all concurrently running extraction tasks; no locking is needed because
//! it is never mutated after construction.

use chrono::NaiveDate;
use episim_common::types::DateSpan;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::series::pad_node_code;
use super::{ImportError, Result};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScenarioRow {
    pub id: Uuid,
    pub name: String,
    pub model_id: Uuid,
    pub node_list_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ModelRow {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupRow {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompartmentRow {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NodeRow {
    pub id: Uuid,
    pub code: String,
}

/// Immutable lookup bundle resolved once per import.
#[derive(Debug, Clone)]
pub struct CatalogLookup {
    pub scenario: ScenarioRow,
    pub model: ModelRow,
    pub groups: Vec<GroupRow>,
    pub compartments: Vec<CompartmentRow>,
    pub nodes: Vec<NodeRow>,
}

impl CatalogLookup {
    /// Resolve the lookup bundle for a scenario.
    ///
    /// A missing scenario is a caller error; a scenario referencing a
    /// missing model is a catalog integrity fault, since scenario creation
    /// enforces the reference.
    pub async fn load(pool: &PgPool, scenario_id: Uuid) -> Result<Self> {
        let scenario = sqlx::query_as::<_, ScenarioRow>(
            "SELECT id, name, model_id, node_list_id, start_date, end_date \
             FROM scenarios WHERE id = $1",
        )
        .bind(scenario_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ImportError::ScenarioNotFound(scenario_id))?;

        let model = sqlx::query_as::<_, ModelRow>("SELECT id, name FROM models WHERE id = $1")
            .bind(scenario.model_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                ImportError::CatalogIntegrity(format!(
                    "scenario '{}' references missing model '{}'",
                    scenario.id, scenario.model_id
                ))
            })?;

        let groups = sqlx::query_as::<_, GroupRow>(
            "SELECT g.id, g.name FROM groups g \
             JOIN model_groups mg ON mg.group_id = g.id \
             WHERE mg.model_id = $1 ORDER BY g.name",
        )
        .bind(model.id)
        .fetch_all(pool)
        .await?;

        let compartments = sqlx::query_as::<_, CompartmentRow>(
            "SELECT c.id, c.name FROM compartments c \
             JOIN model_compartments mc ON mc.compartment_id = c.id \
             WHERE mc.model_id = $1 ORDER BY c.name",
        )
        .bind(model.id)
        .fetch_all(pool)
        .await?;

        let nodes = sqlx::query_as::<_, NodeRow>(
            "SELECT n.id, n.code FROM nodes n \
             JOIN node_list_nodes l ON l.node_id = n.id \
             WHERE l.node_list_id = $1 ORDER BY l.position",
        )
        .bind(scenario.node_list_id)
        .fetch_all(pool)
        .await?;

        Ok(Self {
            scenario,
            model,
            groups,
            compartments,
            nodes,
        })
    }

    /// The scenario's simulated day span.
    pub fn span(&self) -> Result<DateSpan> {
        DateSpan::new(self.scenario.start_date, self.scenario.end_date).map_err(|_| {
            ImportError::CatalogIntegrity(format!(
                "scenario '{}' has end date {} before start date {}",
                self.scenario.id, self.scenario.end_date, self.scenario.start_date
            ))
        })
    }

    /// Node ids keyed by canonical (padded) node code.
    pub fn node_ids_by_code(&self) -> HashMap<String, Uuid> {
        self.nodes
            .iter()
            .map(|node| (pad_node_code(&node.code), node.id))
            .collect()
    }

    /// Group ids keyed by group name.
    pub fn group_ids_by_name(&self) -> HashMap<&str, Uuid> {
        self.groups
            .iter()
            .map(|group| (group.name.as_str(), group.id))
            .collect()
    }

    /// Compartment ids keyed by canonical compartment name.
    pub fn compartment_ids_by_name(&self) -> HashMap<&str, Uuid> {
        self.compartments
            .iter()
            .map(|compartment| (compartment.name.as_str(), compartment.id))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build an in-memory lookup bundle for extraction tests.
    pub fn lookup(
        start: NaiveDate,
        end: NaiveDate,
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
                start_date: start,
                end_date: end,
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

    #[test]
    fn test_lookup_maps() {
        let catalog = lookup(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            &["age0-19"],
            &["MildInfections", "Dead"],
            &["1100", "11000"],
        );

        assert_eq!(catalog.span().unwrap().days(), 3);
        let nodes = catalog.node_ids_by_code();
        assert!(nodes.contains_key("01100"));
        assert!(nodes.contains_key("11000"));
        assert_eq!(catalog.group_ids_by_name().len(), 1);
        assert_eq!(catalog.compartment_ids_by_name().len(), 2);
    }
}
