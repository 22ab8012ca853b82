use anyhow::{Context, Result, bail};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tracing::info;

use crate::config::DbConfig;

/// Schema migrations, compiled in from `crates/mealplan-db/migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Tables owned by the schema, parents before children.
pub const TABLES: [&str; 4] = ["meal_plans", "recipes", "ingredients", "recipe_ingredients"];

pub async fn create_pool(config: &DbConfig) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await
        .with_context(|| {
            let db = config.database_name().unwrap_or("<server>");
            format!("failed to connect to database {db}")
        })
}

/// Apply pending migrations. Already-applied ones are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("failed to run database migrations")?;
    info!(migrations = MIGRATOR.iter().count(), "schema up to date");
    Ok(())
}

/// Create the database named by `config` if the server does not have it.
pub async fn ensure_database_exists(config: &DbConfig) -> Result<()> {
    let db_name = config
        .database_name()
        .context("database URL does not name a database")?;
    let db_name = checked_identifier(db_name)?;

    let maint_pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.maintenance_url())
        .await
        .context("failed to connect to the postgres maintenance database")?;

    let result: Result<()> = async {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
                .bind(db_name)
                .fetch_one(&maint_pool)
                .await
                .context("failed to query pg_database")?;
        if exists {
            info!(db = db_name, "database already exists");
            return Ok(());
        }

        maint_pool
            .execute(format!("CREATE DATABASE {db_name}").as_str())
            .await
            .with_context(|| format!("failed to create database {db_name}"))?;
        info!(db = db_name, "database created");
        Ok(())
    }
    .await;

    maint_pool.close().await;
    result
}

/// `CREATE DATABASE` takes no bind parameters, so names are restricted to
/// lowercase unquoted identifiers.
fn checked_identifier(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid_start || !valid_rest || name.len() > 63 {
        bail!("database name {name:?} is not a plain lowercase identifier");
    }
    Ok(name)
}

/// Row count of every table in [`TABLES`], in that order.
pub async fn table_counts(pool: &PgPool) -> Result<Vec<(String, i64)>> {
    let mut counts = Vec::with_capacity(TABLES.len());
    for table in TABLES {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .with_context(|| format!("failed to count rows in {table}"))?;
        counts.push((table.to_owned(), count));
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_generated_and_default_names() {
        for name in ["mealplan", "mealplan_test_0f3a9c", "_scratch"] {
            assert_eq!(checked_identifier(name).unwrap(), name);
        }
    }

    #[test]
    fn rejects_names_needing_quotes() {
        let too_long = "a".repeat(64);
        for name in ["", "Meal", "9lives", "meal-plan", "x; DROP DATABASE y", too_long.as_str()] {
            assert!(checked_identifier(name).is_err(), "{name:?} should be rejected");
        }
    }

    #[test]
    fn tables_list_parents_first() {
        let pos = |t| TABLES.iter().position(|&x| x == t).unwrap();
        assert!(pos("meal_plans") < pos("recipes"));
        assert!(pos("recipes") < pos("recipe_ingredients"));
        assert!(pos("ingredients") < pos("recipe_ingredients"));
    }
}
