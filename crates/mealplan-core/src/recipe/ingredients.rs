//! Linking ingredients to recipes.
//!
//! A link carries the quantity and the unit the recipe measures the
//! ingredient in. Each (recipe, ingredient) pair is linked at most once.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::{debug, info};

use mealplan_db::models::RecipeIngredientLine;
use mealplan_db::queries::{ingredients, recipe_ingredients as db, recipes};

use crate::failure::StoreFailure;
use crate::response::ServiceResponse;
use crate::transaction::report_conflict;

use super::{NOT_FOUND as RECIPE_NOT_FOUND, RecipeService};

const INGREDIENT_NOT_FOUND: &str = "Ingredient not found.";
const ALREADY_LINKED: &str = "This ingredient is already linked to the recipe.";
const NOT_LINKED: &str = "Ingredient is not linked to this recipe.";
const LINK_FAILED: &str = "An error occurred while linking the ingredient to the recipe.";
const UNLINK_FAILED: &str = "An error occurred while unlinking the ingredient from the recipe.";

impl RecipeService {
    /// Link an ingredient to a recipe with a recipe-specific quantity and
    /// unit.
    ///
    /// - `NotFound` with one message per missing parent.
    /// - `Duplicate` if the pair is already linked, including when another
    ///   caller links it first while this call is running.
    /// - `Success` otherwise.
    ///
    /// `quantity` is stored as given; zero and negative values are accepted.
    pub async fn link(
        &self,
        recipe_id: i32,
        ingredient_id: i32,
        quantity: Decimal,
        unit: &str,
    ) -> Result<ServiceResponse> {
        let result = self.try_link(recipe_id, ingredient_id, quantity, unit).await;
        report_conflict(result, LINK_FAILED)
    }

    async fn try_link(
        &self,
        recipe_id: i32,
        ingredient_id: i32,
        quantity: Decimal,
        unit: &str,
    ) -> Result<ServiceResponse> {
        let mut tx = self.scope.begin().await?;

        let recipe_found = recipes::hold_recipe(&mut *tx, recipe_id).await?;
        let ingredient_found = ingredients::hold_ingredient(&mut *tx, ingredient_id).await?;

        let missing: Vec<&str> = [
            (!recipe_found).then_some(RECIPE_NOT_FOUND),
            (!ingredient_found).then_some(INGREDIENT_NOT_FOUND),
        ]
        .into_iter()
        .flatten()
        .collect();
        if let Some((first, rest)) = missing.split_first() {
            debug!(recipe_id, ingredient_id, ?missing, "link rejected: parent not found");
            let response = rest
                .iter()
                .fold(ServiceResponse::not_found(*first), |response, message| {
                    response.with_message(*message)
                });
            return Ok(response);
        }

        if db::get_link(&mut *tx, recipe_id, ingredient_id)
            .await?
            .is_some()
        {
            debug!(recipe_id, ingredient_id, "link rejected: already linked");
            return Ok(ServiceResponse::duplicate(ALREADY_LINKED));
        }

        let link = match db::insert_link(&mut *tx, recipe_id, ingredient_id, quantity, unit).await {
            Ok(link) => link,
            Err(err) => {
                return match StoreFailure::classify(&err) {
                    Some(StoreFailure::UniqueViolation { .. }) => {
                        debug!(recipe_id, ingredient_id, "link rejected: linked concurrently");
                        Ok(ServiceResponse::duplicate(ALREADY_LINKED))
                    }
                    _ => Err(err),
                };
            }
        };

        tx.commit().await.context("failed to commit transaction")?;
        info!(
            link_id = link.id,
            recipe_id,
            ingredient_id,
            quantity = %link.quantity,
            unit = %link.unit,
            "ingredient linked to recipe"
        );
        Ok(ServiceResponse::success())
    }

    /// Remove the link between a recipe and an ingredient.
    ///
    /// Returns `NotFound` when the pair is not linked, whether or not the
    /// recipe and ingredient themselves exist.
    pub async fn unlink(&self, recipe_id: i32, ingredient_id: i32) -> Result<ServiceResponse> {
        let result = self.try_unlink(recipe_id, ingredient_id).await;
        report_conflict(result, UNLINK_FAILED)
    }

    async fn try_unlink(&self, recipe_id: i32, ingredient_id: i32) -> Result<ServiceResponse> {
        let mut tx = self.scope.begin().await?;

        if db::delete_link(&mut *tx, recipe_id, ingredient_id).await? == 0 {
            debug!(recipe_id, ingredient_id, "unlink rejected: not linked");
            return Ok(ServiceResponse::not_found(NOT_LINKED));
        }

        tx.commit().await.context("failed to commit transaction")?;
        info!(recipe_id, ingredient_id, "ingredient unlinked from recipe");
        Ok(ServiceResponse::success())
    }

    /// The ingredients of a recipe, each reported in the recipe's own unit
    /// and quantity.
    ///
    /// Returns `None` when the recipe does not exist and `Some(vec![])` when
    /// it has no ingredients. The existence check and the listing read one
    /// snapshot.
    pub async fn list_ingredients_for_recipe(
        &self,
        recipe_id: i32,
    ) -> Result<Option<Vec<RecipeIngredientLine>>> {
        let mut tx = self.scope.snapshot().await?;
        if recipes::get_recipe(&mut *tx, recipe_id).await?.is_none() {
            return Ok(None);
        }
        let lines = db::list_lines_for_recipe(&mut *tx, recipe_id).await?;
        tx.commit().await.context("failed to commit transaction")?;
        Ok(Some(lines))
    }
}
