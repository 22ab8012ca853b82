//! Database query functions for the `recipe_ingredients` association table.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use sqlx::PgExecutor;

use crate::models::{RecipeIngredient, RecipeIngredientLine};

/// Insert an association record.
///
/// No `ON CONFLICT` clause: a second link for the same pair fails with the
/// `recipe_ingredients_pair_key` unique violation so callers can tell a
/// duplicate apart from success.
pub async fn insert_link(
    executor: impl PgExecutor<'_>,
    recipe_id: i32,
    ingredient_id: i32,
    quantity: Decimal,
    unit: &str,
) -> Result<RecipeIngredient> {
    let link = sqlx::query_as::<_, RecipeIngredient>(
        "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, unit) \
         VALUES ($1, $2, $3, $4) \
         RETURNING *",
    )
    .bind(recipe_id)
    .bind(ingredient_id)
    .bind(quantity)
    .bind(unit)
    .fetch_one(executor)
    .await
    .context("failed to link ingredient to recipe")?;

    Ok(link)
}

/// Fetch the association record for a (recipe, ingredient) pair.
pub async fn get_link(
    executor: impl PgExecutor<'_>,
    recipe_id: i32,
    ingredient_id: i32,
) -> Result<Option<RecipeIngredient>> {
    let link = sqlx::query_as::<_, RecipeIngredient>(
        "SELECT * FROM recipe_ingredients WHERE recipe_id = $1 AND ingredient_id = $2",
    )
    .bind(recipe_id)
    .bind(ingredient_id)
    .fetch_optional(executor)
    .await
    .context("failed to fetch recipe ingredient link")?;

    Ok(link)
}

/// Delete the association record for a pair. Returns the number of rows
/// affected (0 means the pair was not linked).
pub async fn delete_link(
    executor: impl PgExecutor<'_>,
    recipe_id: i32,
    ingredient_id: i32,
) -> Result<u64> {
    let result =
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1 AND ingredient_id = $2")
            .bind(recipe_id)
            .bind(ingredient_id)
            .execute(executor)
            .await
            .context("failed to unlink ingredient from recipe")?;

    Ok(result.rows_affected())
}

/// List the ingredients of a recipe, projected through the association so
/// that `unit` and `quantity` are the recipe's own.
pub async fn list_lines_for_recipe(
    executor: impl PgExecutor<'_>,
    recipe_id: i32,
) -> Result<Vec<RecipeIngredientLine>> {
    let lines = sqlx::query_as::<_, RecipeIngredientLine>(
        "SELECT i.id AS ingredient_id, i.name, i.calories_per_unit, ri.quantity, ri.unit \
         FROM recipe_ingredients ri \
         JOIN ingredients i ON i.id = ri.ingredient_id \
         WHERE ri.recipe_id = $1 \
         ORDER BY ri.id",
    )
    .bind(recipe_id)
    .fetch_all(executor)
    .await
    .context("failed to list ingredients for recipe")?;

    Ok(lines)
}

/// Count association records, optionally restricted to one recipe.
pub async fn count_links(executor: impl PgExecutor<'_>, recipe_id: Option<i32>) -> Result<i64> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM recipe_ingredients WHERE $1::integer IS NULL OR recipe_id = $1",
    )
    .bind(recipe_id)
    .fetch_one(executor)
    .await
    .context("failed to count recipe ingredient links")?;

    Ok(row.0)
}
