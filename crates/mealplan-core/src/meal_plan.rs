//! Meal plan service.

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::{debug, info};

use mealplan_db::models::{MealPlan, NewMealPlan};
use mealplan_db::queries::meal_plans as db;

use crate::response::ServiceResponse;
use crate::transaction::{TxScope, report_conflict};

const NOT_FOUND: &str = "Meal Plan not found.";
const NOT_FOUND_FOR_DELETE: &str = "Meal Plan not found. Cannot be deleted.";
const ADD_FAILED: &str = "An error occurred while adding the meal plan.";
const UPDATE_FAILED: &str = "An error occurred while updating the meal plan.";
const DELETE_FAILED: &str = "An error occurred while deleting the meal plan.";

/// CRUD over meal plans. Plans have no outbound references, so the only
/// consistency rule enforced here is that updates and deletes target a plan
/// that exists. Deleting a plan deletes its recipes (schema cascade).
#[derive(Debug, Clone)]
pub struct MealPlanService {
    scope: TxScope,
}

impl MealPlanService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            scope: TxScope::new(pool),
        }
    }

    /// Override how long mutations wait on a locked row before reporting
    /// [`ServiceStatus::Error`](crate::ServiceStatus::Error).
    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.scope.set_lock_timeout(lock_timeout);
        self
    }

    pub async fn list(&self) -> Result<Vec<MealPlan>> {
        db::list_meal_plans(self.scope.pool()).await
    }

    pub async fn find(&self, id: i32) -> Result<Option<MealPlan>> {
        db::get_meal_plan(self.scope.pool(), id).await
    }

    /// Insert a plan. Returns `Created` with the assigned id.
    pub async fn add(&self, data: &NewMealPlan) -> Result<ServiceResponse> {
        let result = self.try_add(data).await;
        report_conflict(result, ADD_FAILED)
    }

    async fn try_add(&self, data: &NewMealPlan) -> Result<ServiceResponse> {
        let plan = db::insert_meal_plan(self.scope.pool(), data).await?;
        info!(meal_plan_id = plan.id, name = %plan.name, "meal plan created");
        Ok(ServiceResponse::created(plan.id))
    }

    /// Overwrite the name and date of the plan identified by `data.id`.
    pub async fn update(&self, data: &MealPlan) -> Result<ServiceResponse> {
        let result = self.try_update(data).await;
        report_conflict(result, UPDATE_FAILED)
    }

    async fn try_update(&self, data: &MealPlan) -> Result<ServiceResponse> {
        let mut tx = self.scope.begin().await?;

        if db::lock_meal_plan(&mut *tx, data.id).await?.is_none() {
            debug!(meal_plan_id = data.id, "update rejected: meal plan not found");
            return Ok(ServiceResponse::not_found(NOT_FOUND));
        }

        if db::update_meal_plan(&mut *tx, data).await? == 0 {
            return Ok(ServiceResponse::error(UPDATE_FAILED));
        }

        tx.commit().await.context("failed to commit transaction")?;
        info!(meal_plan_id = data.id, "meal plan updated");
        Ok(ServiceResponse::updated())
    }

    /// Delete a plan and, through the cascade, all of its recipes.
    pub async fn delete(&self, id: i32) -> Result<ServiceResponse> {
        let result = self.try_delete(id).await;
        report_conflict(result, DELETE_FAILED)
    }

    async fn try_delete(&self, id: i32) -> Result<ServiceResponse> {
        let mut tx = self.scope.begin().await?;

        if db::delete_meal_plan(&mut *tx, id).await? == 0 {
            debug!(meal_plan_id = id, "delete rejected: meal plan not found");
            return Ok(ServiceResponse::not_found(NOT_FOUND_FOR_DELETE));
        }

        tx.commit().await.context("failed to commit transaction")?;
        info!(meal_plan_id = id, "meal plan deleted");
        Ok(ServiceResponse::deleted())
    }
}
