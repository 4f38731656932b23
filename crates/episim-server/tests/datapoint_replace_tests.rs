//! Transactional replace tests for the import pipeline
//!
//! These tests exercise the full pipeline including the atomic
//! delete+insert+stamp against a real PostgreSQL instance. They are ignored
//! by default; run them with a migrated database available:
//!
//! ```text
//! DATABASE_URL=postgresql://localhost/episim_test cargo test -- --ignored
//! ```

use chrono::NaiveDate;
use sqlx::PgPool;
use std::io::{Cursor, Write};
use uuid::Uuid;
use zip::write::SimpleFileOptions;

use episim_server::import::{ImportError, ImportPipeline};

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

async fn connect() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for ignored tests");
    let pool = PgPool::connect(&url).await.expect("failed to connect");
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("failed to migrate");
    pool
}

/// Seed a minimal catalog: one group, the four canonical compartments, one
/// node, and a two-day scenario. Returns the scenario id.
async fn seed_scenario(pool: &PgPool) -> Uuid {
    let suffix = Uuid::new_v4().simple().to_string();

    let group_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO groups (name) VALUES ($1) RETURNING id",
    )
    .bind(format!("age0-19-{}", suffix))
    .fetch_one(pool)
    .await
    .unwrap();

    let model_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO models (name) VALUES ($1) RETURNING id",
    )
    .bind(format!("model-{}", suffix))
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO model_groups (model_id, group_id) VALUES ($1, $2)")
        .bind(model_id)
        .bind(group_id)
        .execute(pool)
        .await
        .unwrap();

    for name in ["MildInfections", "Hospitalized", "ICU", "Dead"] {
        let compartment_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO compartments (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING id",
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO model_compartments (model_id, compartment_id) VALUES ($1, $2)",
        )
        .bind(model_id)
        .bind(compartment_id)
        .execute(pool)
        .await
        .unwrap();
    }

    let node_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO nodes (name, code) VALUES ($1, $2) \
         ON CONFLICT (code) DO UPDATE SET name = EXCLUDED.name RETURNING id",
    )
    .bind("district")
    .bind("11000")
    .fetch_one(pool)
    .await
    .unwrap();

    let node_list_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO node_lists (name) VALUES ($1) RETURNING id",
    )
    .bind(format!("districts-{}", suffix))
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO node_list_nodes (node_list_id, node_id, position) VALUES ($1, $2, 0)",
    )
    .bind(node_list_id)
    .bind(node_id)
    .execute(pool)
    .await
    .unwrap();

    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO scenarios \
             (name, model_id, node_list_id, start_date, end_date) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(format!("scenario-{}", suffix))
    .bind(model_id)
    .bind(node_list_id)
    .bind(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    .bind(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap())
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn stored_values(pool: &PgPool, scenario_id: Uuid) -> Vec<f64> {
    sqlx::query_scalar::<_, f64>(
        "SELECT value FROM datapoints WHERE scenario_id = $1 ORDER BY day, percentile, value",
    )
    .bind(scenario_id)
    .fetch_all(pool)
    .await
    .unwrap()
}

fn two_day_series(scale: f64) -> Vec<u8> {
    format!(
        r#"{{"11000": {{"age0-19": [[{}, {}, {}, {}], [{}, {}, {}, {}]]}}}}"#,
        1.0 * scale,
        2.0 * scale,
        3.0 * scale,
        4.0 * scale,
        5.0 * scale,
        6.0 * scale,
        7.0 * scale,
        8.0 * scale
    )
    .into_bytes()
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn successful_reimport_fully_replaces_previous_dataset() {
    let pool = connect().await;
    let scenario_id = seed_scenario(&pool).await;
    let scratch = tempfile::tempdir().unwrap();
    let pipeline = ImportPipeline::new(pool.clone(), scratch.path());

    let first = build_zip(&[("p50/11000.json", &two_day_series(1.0))]);
    let outcome = pipeline
        .run(scenario_id, "results.zip", first)
        .await
        .unwrap();
    assert_eq!(outcome.datapoints_stored, 8);

    // Same keys, different values: after the second import only the second
    // dataset may remain.
    let second = build_zip(&[("p50/11000.json", &two_day_series(10.0))]);
    let outcome = pipeline
        .run(scenario_id, "results.zip", second)
        .await
        .unwrap();
    assert_eq!(outcome.datapoints_stored, 8);

    let values = stored_values(&pool, scenario_id).await;
    assert_eq!(values.len(), 8);
    assert!(values.iter().all(|v| *v >= 10.0));

    let simulated_at: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT simulated_at FROM scenarios WHERE id = $1")
            .bind(scenario_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(simulated_at.is_some());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn failed_import_leaves_existing_dataset_untouched() {
    let pool = connect().await;
    let scenario_id = seed_scenario(&pool).await;
    let scratch = tempfile::tempdir().unwrap();
    let pipeline = ImportPipeline::new(pool.clone(), scratch.path());

    let valid = build_zip(&[("p50/11000.json", &two_day_series(1.0))]);
    pipeline
        .run(scenario_id, "results.zip", valid)
        .await
        .unwrap();
    let before = stored_values(&pool, scenario_id).await;

    // One day short: the attempt must fail and change nothing.
    let short_series = br#"{"11000": {"age0-19": [[1.0, 2.0, 3.0, 4.0]]}}"#;
    let invalid = build_zip(&[("p50/11000.json", short_series.as_slice())]);
    let err = pipeline
        .run(scenario_id, "results.zip", invalid)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::Validation { .. }));

    let after = stored_values(&pool, scenario_id).await;
    assert_eq!(before, after);
}
