//! Database query functions for the `recipes` table.
//!
//! Reads that return [`RecipeDetail`] join `meal_plans` explicitly; nothing
//! here fetches the owning plan lazily.

use anyhow::{Context, Result};
use sqlx::PgExecutor;

use crate::models::{NewRecipe, Recipe, RecipeDetail};

const DETAIL_SELECT: &str = "SELECT r.id, r.name, r.cuisine, r.meal_plan_id, mp.name AS meal_plan_name \
     FROM recipes r \
     JOIN meal_plans mp ON mp.id = r.meal_plan_id";

/// Insert a new recipe. The caller is responsible for having checked that
/// `meal_plan_id` exists; the foreign key rejects it otherwise.
pub async fn insert_recipe(executor: impl PgExecutor<'_>, recipe: &NewRecipe) -> Result<Recipe> {
    let recipe = sqlx::query_as::<_, Recipe>(
        "INSERT INTO recipes (name, cuisine, meal_plan_id) \
         VALUES ($1, $2, $3) \
         RETURNING *",
    )
    .bind(&recipe.name)
    .bind(&recipe.cuisine)
    .bind(recipe.meal_plan_id)
    .fetch_one(executor)
    .await
    .context("failed to insert recipe")?;

    Ok(recipe)
}

/// Fetch a stored recipe row by ID, without the plan join.
pub async fn get_recipe(executor: impl PgExecutor<'_>, id: i32) -> Result<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch recipe")?;

    Ok(recipe)
}

/// Fetch a recipe and lock its row for a non-key update.
pub async fn lock_recipe(executor: impl PgExecutor<'_>, id: i32) -> Result<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>(
        "SELECT * FROM recipes WHERE id = $1 FOR NO KEY UPDATE",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .context("failed to lock recipe")?;

    Ok(recipe)
}

/// Check that a recipe exists and hold a key-share lock on it until the
/// transaction ends.
pub async fn hold_recipe(executor: impl PgExecutor<'_>, id: i32) -> Result<bool> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM recipes WHERE id = $1 FOR KEY SHARE")
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to check recipe")?;

    Ok(row.is_some())
}

/// Fetch a recipe joined with its meal plan's name.
pub async fn get_recipe_detail(
    executor: impl PgExecutor<'_>,
    id: i32,
) -> Result<Option<RecipeDetail>> {
    let query = format!("{DETAIL_SELECT} WHERE r.id = $1");
    let recipe = sqlx::query_as::<_, RecipeDetail>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch recipe detail")?;

    Ok(recipe)
}

/// List every recipe joined with its meal plan's name, ordered by id.
pub async fn list_recipe_details(executor: impl PgExecutor<'_>) -> Result<Vec<RecipeDetail>> {
    let query = format!("{DETAIL_SELECT} ORDER BY r.id");
    let recipes = sqlx::query_as::<_, RecipeDetail>(&query)
        .fetch_all(executor)
        .await
        .context("failed to list recipes")?;

    Ok(recipes)
}

/// List the recipes belonging to one meal plan, joined with the plan name.
///
/// Returns an empty list both when the plan has no recipes and when the plan
/// does not exist.
pub async fn list_recipe_details_for_meal_plan(
    executor: impl PgExecutor<'_>,
    meal_plan_id: i32,
) -> Result<Vec<RecipeDetail>> {
    let query = format!("{DETAIL_SELECT} WHERE r.meal_plan_id = $1 ORDER BY r.id");
    let recipes = sqlx::query_as::<_, RecipeDetail>(&query)
        .bind(meal_plan_id)
        .fetch_all(executor)
        .await
        .context("failed to list recipes for meal plan")?;

    Ok(recipes)
}

/// Overwrite name, cuisine and owning plan. Returns the number of rows
/// affected.
pub async fn update_recipe(executor: impl PgExecutor<'_>, recipe: &Recipe) -> Result<u64> {
    let result =
        sqlx::query("UPDATE recipes SET name = $1, cuisine = $2, meal_plan_id = $3 WHERE id = $4")
            .bind(&recipe.name)
            .bind(&recipe.cuisine)
            .bind(recipe.meal_plan_id)
            .bind(recipe.id)
            .execute(executor)
            .await
            .context("failed to update recipe")?;

    Ok(result.rows_affected())
}

/// Delete a recipe; its ingredient links cascade.
pub async fn delete_recipe(executor: impl PgExecutor<'_>, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await
        .context("failed to delete recipe")?;

    Ok(result.rows_affected())
}

/// Count recipes, optionally restricted to one meal plan.
pub async fn count_recipes(executor: impl PgExecutor<'_>, meal_plan_id: Option<i32>) -> Result<i64> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM recipes WHERE $1::integer IS NULL OR meal_plan_id = $1",
    )
    .bind(meal_plan_id)
    .fetch_one(executor)
    .await
    .context("failed to count recipes")?;

    Ok(row.0)
}
