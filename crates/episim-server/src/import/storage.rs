//! Atomic datapoint replacement
//!
//! The only write the pipeline performs: within a single transaction, every
//! existing datapoint of the scenario is deleted, the new set is inserted,
//! and the scenario's simulated timestamp is stamped. Readers never observe
//! an empty or partially populated dataset.

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::models::NewDatapoint;

/// Rows per INSERT statement; UNNEST keeps each statement at seven binds
/// regardless of chunk size.
const INSERT_CHUNK_SIZE: usize = 5_000;

/// Replace the scenario's stored datapoints with `datapoints` and stamp
/// `simulated_at`, all as one transaction.
///
/// Returns the number of rows inserted.
pub async fn replace_scenario_datapoints(
    pool: &PgPool,
    scenario_id: Uuid,
    datapoints: &[NewDatapoint],
) -> Result<usize, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM datapoints WHERE scenario_id = $1")
        .bind(scenario_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    debug!(scenario_id = %scenario_id, deleted, "Cleared previous datapoints");

    for chunk in datapoints.chunks(INSERT_CHUNK_SIZE) {
        let mut days: Vec<NaiveDate> = Vec::with_capacity(chunk.len());
        let mut node_ids: Vec<Uuid> = Vec::with_capacity(chunk.len());
        let mut group_ids: Vec<Uuid> = Vec::with_capacity(chunk.len());
        let mut compartment_ids: Vec<Uuid> = Vec::with_capacity(chunk.len());
        let mut percentiles: Vec<i32> = Vec::with_capacity(chunk.len());
        let mut values: Vec<f64> = Vec::with_capacity(chunk.len());

        for datapoint in chunk {
            days.push(datapoint.day);
            node_ids.push(datapoint.node_id);
            group_ids.push(datapoint.group_id);
            compartment_ids.push(datapoint.compartment_id);
            percentiles.push(datapoint.percentile);
            values.push(datapoint.value);
        }

        sqlx::query(
            r#"
            INSERT INTO datapoints
                (scenario_id, day, node_id, group_id, compartment_id, percentile, value)
            SELECT $1, t.day, t.node_id, t.group_id, t.compartment_id, t.percentile, t.value
            FROM UNNEST($2::date[], $3::uuid[], $4::uuid[], $5::uuid[], $6::int4[], $7::float8[])
                AS t(day, node_id, group_id, compartment_id, percentile, value)
            "#,
        )
        .bind(scenario_id)
        .bind(days)
        .bind(node_ids)
        .bind(group_ids)
        .bind(compartment_ids)
        .bind(percentiles)
        .bind(values)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("UPDATE scenarios SET simulated_at = now() WHERE id = $1")
        .bind(scenario_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(datapoints.len())
}
