//! Shared test utilities for mealplan integration tests.
//!
//! Provides a PostgreSQL instance shared across the tests of one binary.
//! Each test gets its own migrated database within the instance.
//!
//! Two modes:
//! - **`MEALPLAN_TEST_PG_URL`** set: use that server directly (e.g. one
//!   started by a CI setup step). The URL must not include a database name.
//! - **No env var**: start a container via testcontainers, shared per binary
//!   through a `OnceCell`.

use std::time::Duration;

use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use testcontainers::ContainerAsync;
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use mealplan_db::pool;

struct SharedPg {
    base_url: String,
    /// Held to keep the container alive. `None` when using an external URL.
    _container: Option<ContainerAsync<Postgres>>,
}

static SHARED_PG: OnceCell<SharedPg> = OnceCell::const_new();

async fn init_shared_pg() -> SharedPg {
    if let Ok(url) = std::env::var("MEALPLAN_TEST_PG_URL") {
        return SharedPg {
            base_url: url.trim_end_matches('/').to_owned(),
            _container: None,
        };
    }

    let container = Postgres::default()
        .with_tag("17")
        .start()
        .await
        .expect("failed to start PostgreSQL container");

    let host = container.get_host().await.expect("failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("failed to get mapped port");

    SharedPg {
        base_url: format!("postgresql://postgres:postgres@{host}:{port}"),
        _container: Some(container),
    }
}

/// Base URL for the shared PostgreSQL server (no database name appended).
pub async fn pg_url() -> &'static str {
    let shared = SHARED_PG.get_or_init(init_shared_pg).await;
    &shared.base_url
}

async fn maintenance_pool(base_url: &str) -> PgPool {
    PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&format!("{base_url}/postgres"))
        .await
        .expect("failed to connect to maintenance database")
}

/// Create a temporary database with migrations applied.
///
/// Returns `(pool, db_name)`. Call [`drop_test_db`] with the returned name
/// when the test is done.
pub async fn create_test_db() -> (PgPool, String) {
    let (pool, db_name) = fresh_db(5).await;
    pool::run_migrations(&pool)
        .await
        .expect("migrations should succeed");
    (pool, db_name)
}

/// Create a temporary database without running migrations.
pub async fn create_empty_test_db() -> (PgPool, String) {
    fresh_db(2).await
}

/// URL of a database on the shared server, e.g. for driving the CLI binary.
pub async fn test_db_url(db_name: &str) -> String {
    format!("{}/{db_name}", pg_url().await)
}

async fn fresh_db(max_connections: u32) -> (PgPool, String) {
    let base_url = pg_url().await;
    let db_name = format!("mealplan_test_{}", Uuid::new_v4().simple());

    let maint_pool = maintenance_pool(base_url).await;
    maint_pool
        .execute(format!("CREATE DATABASE {db_name}").as_str())
        .await
        .unwrap_or_else(|e| panic!("failed to create temp database {db_name}: {e}"));
    maint_pool.close().await;

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&format!("{base_url}/{db_name}"))
        .await
        .unwrap_or_else(|e| panic!("failed to connect to temp database {db_name}: {e}"));

    (pool, db_name)
}

/// Drop a temporary database, disconnecting anything still attached.
/// Safe to call if the database is already gone.
pub async fn drop_test_db(db_name: &str) {
    let maint_pool = maintenance_pool(pg_url().await).await;
    let _ = maint_pool
        .execute(format!("DROP DATABASE IF EXISTS {db_name} WITH (FORCE)").as_str())
        .await;
    maint_pool.close().await;
}

/// Shorthand for a calendar date in test fixtures.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}
