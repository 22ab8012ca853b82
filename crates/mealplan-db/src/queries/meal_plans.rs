//! Database query functions for the `meal_plans` table.

use anyhow::{Context, Result};
use sqlx::PgExecutor;

use crate::models::{MealPlan, NewMealPlan};

/// Insert a new meal plan. Returns the stored row with its assigned id.
pub async fn insert_meal_plan(executor: impl PgExecutor<'_>, plan: &NewMealPlan) -> Result<MealPlan> {
    let plan = sqlx::query_as::<_, MealPlan>(
        "INSERT INTO meal_plans (name, date) VALUES ($1, $2) RETURNING *",
    )
    .bind(&plan.name)
    .bind(plan.date)
    .fetch_one(executor)
    .await
    .context("failed to insert meal plan")?;

    Ok(plan)
}

/// Fetch a meal plan by its ID.
pub async fn get_meal_plan(executor: impl PgExecutor<'_>, id: i32) -> Result<Option<MealPlan>> {
    let plan = sqlx::query_as::<_, MealPlan>("SELECT * FROM meal_plans WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch meal plan")?;

    Ok(plan)
}

/// Fetch a meal plan and lock its row for the rest of the transaction.
///
/// Blocks concurrent updates and deletes of the same plan until commit. The
/// lock does not conflict with [`hold_meal_plan`], so recipes can still be
/// added to the plan while it is being renamed.
pub async fn lock_meal_plan(executor: impl PgExecutor<'_>, id: i32) -> Result<Option<MealPlan>> {
    let plan = sqlx::query_as::<_, MealPlan>(
        "SELECT * FROM meal_plans WHERE id = $1 FOR NO KEY UPDATE",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .context("failed to lock meal plan")?;

    Ok(plan)
}

/// Check that a meal plan exists and hold a key-share lock on it.
///
/// The lock keeps the plan from being deleted before the transaction
/// commits, while still letting other callers read or reference it.
pub async fn hold_meal_plan(executor: impl PgExecutor<'_>, id: i32) -> Result<bool> {
    let row: Option<(i32,)> =
        sqlx::query_as("SELECT id FROM meal_plans WHERE id = $1 FOR KEY SHARE")
            .bind(id)
            .fetch_optional(executor)
            .await
            .context("failed to check meal plan")?;

    Ok(row.is_some())
}

/// List all meal plans, ordered by id.
pub async fn list_meal_plans(executor: impl PgExecutor<'_>) -> Result<Vec<MealPlan>> {
    let plans = sqlx::query_as::<_, MealPlan>("SELECT * FROM meal_plans ORDER BY id")
        .fetch_all(executor)
        .await
        .context("failed to list meal plans")?;

    Ok(plans)
}

/// Overwrite the name and date of a meal plan. Returns the number of rows
/// affected (0 means the plan no longer exists).
pub async fn update_meal_plan(executor: impl PgExecutor<'_>, plan: &MealPlan) -> Result<u64> {
    let result = sqlx::query("UPDATE meal_plans SET name = $1, date = $2 WHERE id = $3")
        .bind(&plan.name)
        .bind(plan.date)
        .bind(plan.id)
        .execute(executor)
        .await
        .context("failed to update meal plan")?;

    Ok(result.rows_affected())
}

/// Delete a meal plan. Its recipes go with it through `ON DELETE CASCADE`.
///
/// Returns the number of rows affected.
pub async fn delete_meal_plan(executor: impl PgExecutor<'_>, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM meal_plans WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await
        .context("failed to delete meal plan")?;

    Ok(result.rows_affected())
}
