//! Ingredient service.

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::{debug, info};

use mealplan_db::models::{Ingredient, NewIngredient};
use mealplan_db::queries::ingredients as db;

use crate::response::ServiceResponse;
use crate::transaction::{TxScope, report_conflict};

const NOT_FOUND: &str = "Ingredient not found.";
const NOT_FOUND_FOR_DELETE: &str = "Ingredient not found. Cannot be deleted.";
const ADD_FAILED: &str = "An error occurred while adding the ingredient.";
const UPDATE_FAILED: &str = "An error occurred while updating the ingredient.";
const DELETE_FAILED: &str = "An error occurred while deleting the ingredient.";

/// CRUD over ingredients. Deleting an ingredient removes every recipe link
/// that uses it.
#[derive(Debug, Clone)]
pub struct IngredientService {
    scope: TxScope,
}

impl IngredientService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            scope: TxScope::new(pool),
        }
    }

    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.scope.set_lock_timeout(lock_timeout);
        self
    }

    pub async fn list(&self) -> Result<Vec<Ingredient>> {
        db::list_ingredients(self.scope.pool()).await
    }

    pub async fn find(&self, id: i32) -> Result<Option<Ingredient>> {
        db::get_ingredient(self.scope.pool(), id).await
    }

    pub async fn add(&self, data: &NewIngredient) -> Result<ServiceResponse> {
        let result = self.try_add(data).await;
        report_conflict(result, ADD_FAILED)
    }

    async fn try_add(&self, data: &NewIngredient) -> Result<ServiceResponse> {
        let ingredient = db::insert_ingredient(self.scope.pool(), data).await?;
        info!(
            ingredient_id = ingredient.id,
            name = %ingredient.name,
            "ingredient created"
        );
        Ok(ServiceResponse::created(ingredient.id))
    }

    /// Overwrite name, unit and calories of the ingredient `data.id`.
    pub async fn update(&self, data: &Ingredient) -> Result<ServiceResponse> {
        let result = self.try_update(data).await;
        report_conflict(result, UPDATE_FAILED)
    }

    async fn try_update(&self, data: &Ingredient) -> Result<ServiceResponse> {
        let mut tx = self.scope.begin().await?;

        if db::lock_ingredient(&mut *tx, data.id).await?.is_none() {
            debug!(ingredient_id = data.id, "update rejected: ingredient not found");
            return Ok(ServiceResponse::not_found(NOT_FOUND));
        }

        if db::update_ingredient(&mut *tx, data).await? == 0 {
            return Ok(ServiceResponse::error(UPDATE_FAILED));
        }

        tx.commit().await.context("failed to commit transaction")?;
        info!(ingredient_id = data.id, "ingredient updated");
        Ok(ServiceResponse::updated())
    }

    pub async fn delete(&self, id: i32) -> Result<ServiceResponse> {
        let result = self.try_delete(id).await;
        report_conflict(result, DELETE_FAILED)
    }

    async fn try_delete(&self, id: i32) -> Result<ServiceResponse> {
        let mut tx = self.scope.begin().await?;

        if db::delete_ingredient(&mut *tx, id).await? == 0 {
            debug!(ingredient_id = id, "delete rejected: ingredient not found");
            return Ok(ServiceResponse::not_found(NOT_FOUND_FOR_DELETE));
        }

        tx.commit().await.context("failed to commit transaction")?;
        info!(ingredient_id = id, "ingredient deleted");
        Ok(ServiceResponse::deleted())
    }
}
