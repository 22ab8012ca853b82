//! Recipe service.
//!
//! A recipe always belongs to exactly one meal plan. `add` and `update`
//! confirm the referenced plan exists, and hold a key-share lock on it, in
//! the same transaction that writes the recipe, so a recipe is never stored
//! pointing at a plan that is gone. Linking ingredients to recipes lives in
//! the `ingredients` submodule.

mod ingredients;

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::{debug, info};

use mealplan_db::models::{NewRecipe, Recipe, RecipeDetail};
use mealplan_db::queries::{meal_plans, recipes as db};

use crate::response::ServiceResponse;
use crate::transaction::{TxScope, report_conflict};

const NOT_FOUND: &str = "Recipe not found.";
const NOT_FOUND_FOR_DELETE: &str = "Recipe not found. Cannot be deleted.";
const MEAL_PLAN_NOT_FOUND: &str = "Meal Plan not found.";
const ASSOCIATED_MEAL_PLAN_NOT_FOUND: &str = "Associated Meal Plan not found.";
const ADD_FAILED: &str = "An error occurred while adding the recipe.";
const UPDATE_FAILED: &str = "An error occurred while updating the recipe.";
const DELETE_FAILED: &str = "An error occurred while deleting the recipe.";

#[derive(Debug, Clone)]
pub struct RecipeService {
    scope: TxScope,
}

impl RecipeService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            scope: TxScope::new(pool),
        }
    }

    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.scope.set_lock_timeout(lock_timeout);
        self
    }

    /// Every recipe, each with the name of its meal plan.
    pub async fn list(&self) -> Result<Vec<RecipeDetail>> {
        db::list_recipe_details(self.scope.pool()).await
    }

    pub async fn find(&self, id: i32) -> Result<Option<RecipeDetail>> {
        db::get_recipe_detail(self.scope.pool(), id).await
    }

    /// The recipes of one meal plan.
    ///
    /// Returns `None` when the plan does not exist and `Some(vec![])` when it
    /// exists but owns no recipes. Both reads share one snapshot, so a plan
    /// deleted in between is still reported with the recipes it had.
    pub async fn list_for_meal_plan(&self, meal_plan_id: i32) -> Result<Option<Vec<RecipeDetail>>> {
        let mut tx = self.scope.snapshot().await?;
        if meal_plans::get_meal_plan(&mut *tx, meal_plan_id).await?.is_none() {
            return Ok(None);
        }
        let recipes = db::list_recipe_details_for_meal_plan(&mut *tx, meal_plan_id).await?;
        tx.commit().await.context("failed to commit transaction")?;
        Ok(Some(recipes))
    }

    /// Create a recipe under `data.meal_plan_id`.
    ///
    /// Returns `NotFound` without writing anything when the plan is missing.
    pub async fn add(&self, data: &NewRecipe) -> Result<ServiceResponse> {
        let result = self.try_add(data).await;
        report_conflict(result, ADD_FAILED)
    }

    async fn try_add(&self, data: &NewRecipe) -> Result<ServiceResponse> {
        let mut tx = self.scope.begin().await?;

        if !meal_plans::hold_meal_plan(&mut *tx, data.meal_plan_id).await? {
            debug!(
                meal_plan_id = data.meal_plan_id,
                "add rejected: meal plan not found"
            );
            return Ok(ServiceResponse::not_found(MEAL_PLAN_NOT_FOUND));
        }

        let recipe = db::insert_recipe(&mut *tx, data).await?;

        tx.commit().await.context("failed to commit transaction")?;
        info!(
            recipe_id = recipe.id,
            meal_plan_id = recipe.meal_plan_id,
            name = %recipe.name,
            "recipe created"
        );
        Ok(ServiceResponse::created(recipe.id))
    }

    /// Overwrite name, cuisine and meal plan of the recipe `data.id`.
    ///
    /// Both the recipe and the new meal plan must exist; either check failing
    /// leaves the stored recipe untouched.
    pub async fn update(&self, data: &Recipe) -> Result<ServiceResponse> {
        let result = self.try_update(data).await;
        report_conflict(result, UPDATE_FAILED)
    }

    async fn try_update(&self, data: &Recipe) -> Result<ServiceResponse> {
        let mut tx = self.scope.begin().await?;

        if db::lock_recipe(&mut *tx, data.id).await?.is_none() {
            debug!(recipe_id = data.id, "update rejected: recipe not found");
            return Ok(ServiceResponse::not_found(NOT_FOUND));
        }

        if !meal_plans::hold_meal_plan(&mut *tx, data.meal_plan_id).await? {
            debug!(
                recipe_id = data.id,
                meal_plan_id = data.meal_plan_id,
                "update rejected: meal plan not found"
            );
            return Ok(ServiceResponse::not_found(ASSOCIATED_MEAL_PLAN_NOT_FOUND));
        }

        if db::update_recipe(&mut *tx, data).await? == 0 {
            return Ok(ServiceResponse::error(UPDATE_FAILED));
        }

        tx.commit().await.context("failed to commit transaction")?;
        info!(
            recipe_id = data.id,
            meal_plan_id = data.meal_plan_id,
            "recipe updated"
        );
        Ok(ServiceResponse::updated())
    }

    /// Delete a recipe together with its ingredient links.
    pub async fn delete(&self, id: i32) -> Result<ServiceResponse> {
        let result = self.try_delete(id).await;
        report_conflict(result, DELETE_FAILED)
    }

    async fn try_delete(&self, id: i32) -> Result<ServiceResponse> {
        let mut tx = self.scope.begin().await?;

        if db::delete_recipe(&mut *tx, id).await? == 0 {
            debug!(recipe_id = id, "delete rejected: recipe not found");
            return Ok(ServiceResponse::not_found(NOT_FOUND_FOR_DELETE));
        }

        tx.commit().await.context("failed to commit transaction")?;
        info!(recipe_id = id, "recipe deleted");
        Ok(ServiceResponse::deleted())
    }
}
