//! Database query functions for the `ingredients` table.

use anyhow::{Context, Result};
use sqlx::PgExecutor;

use crate::models::{Ingredient, NewIngredient};

pub async fn insert_ingredient(
    executor: impl PgExecutor<'_>,
    ingredient: &NewIngredient,
) -> Result<Ingredient> {
    let ingredient = sqlx::query_as::<_, Ingredient>(
        "INSERT INTO ingredients (name, unit, calories_per_unit) \
         VALUES ($1, $2, $3) \
         RETURNING *",
    )
    .bind(&ingredient.name)
    .bind(&ingredient.unit)
    .bind(ingredient.calories_per_unit)
    .fetch_one(executor)
    .await
    .context("failed to insert ingredient")?;

    Ok(ingredient)
}

pub async fn get_ingredient(executor: impl PgExecutor<'_>, id: i32) -> Result<Option<Ingredient>> {
    let ingredient = sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch ingredient")?;

    Ok(ingredient)
}

/// Fetch an ingredient and lock its row for a non-key update. Links being
/// created against it in parallel are not blocked.
pub async fn lock_ingredient(executor: impl PgExecutor<'_>, id: i32) -> Result<Option<Ingredient>> {
    let ingredient = sqlx::query_as::<_, Ingredient>(
        "SELECT * FROM ingredients WHERE id = $1 FOR NO KEY UPDATE",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .context("failed to lock ingredient")?;

    Ok(ingredient)
}

/// Check that an ingredient exists and hold a key-share lock on it until
/// the transaction ends.
pub async fn hold_ingredient(executor: impl PgExecutor<'_>, id: i32) -> Result<bool> {
    let row: Option<(i32,)> =
        sqlx::query_as("SELECT id FROM ingredients WHERE id = $1 FOR KEY SHARE")
            .bind(id)
            .fetch_optional(executor)
            .await
            .context("failed to check ingredient")?;

    Ok(row.is_some())
}

pub async fn list_ingredients(executor: impl PgExecutor<'_>) -> Result<Vec<Ingredient>> {
    let ingredients = sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients ORDER BY id")
        .fetch_all(executor)
        .await
        .context("failed to list ingredients")?;

    Ok(ingredients)
}

/// Overwrite name, unit and calories. Returns the number of rows affected.
pub async fn update_ingredient(executor: impl PgExecutor<'_>, ingredient: &Ingredient) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE ingredients SET name = $1, unit = $2, calories_per_unit = $3 WHERE id = $4",
    )
    .bind(&ingredient.name)
    .bind(&ingredient.unit)
    .bind(ingredient.calories_per_unit)
    .bind(ingredient.id)
    .execute(executor)
    .await
    .context("failed to update ingredient")?;

    Ok(result.rows_affected())
}

/// Delete an ingredient; its recipe links cascade.
pub async fn delete_ingredient(executor: impl PgExecutor<'_>, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await
        .context("failed to delete ingredient")?;

    Ok(result.rows_affected())
}
