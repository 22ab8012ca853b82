//! CLI handlers for `mealplan recipe` subcommands, including the
//! ingredient links of a recipe.

use anyhow::Result;
use sqlx::PgPool;

use mealplan_core::RecipeService;
use mealplan_db::models::{NewRecipe, Recipe};

use crate::RecipeCommands;
use crate::output::{print_found, print_json, print_response};

/// Dispatch a `RecipeCommands` variant to the appropriate handler.
pub async fn run_recipe_command(command: RecipeCommands, pool: &PgPool) -> Result<()> {
    let service = RecipeService::new(pool.clone());
    match command {
        RecipeCommands::List => print_json(&service.list().await?),
        RecipeCommands::Show { id } => {
            print_found(service.find(id).await?, &format!("recipe {id}"))
        }
        RecipeCommands::Add {
            name,
            cuisine,
            meal_plan_id,
        } => print_response(
            &service
                .add(&NewRecipe::new(name, cuisine, meal_plan_id))
                .await?,
        ),
        RecipeCommands::Update {
            id,
            name,
            cuisine,
            meal_plan_id,
        } => print_response(
            &service
                .update(&Recipe {
                    id,
                    name,
                    cuisine,
                    meal_plan_id,
                })
                .await?,
        ),
        RecipeCommands::Delete { id } => print_response(&service.delete(id).await?),
        RecipeCommands::Link {
            recipe_id,
            ingredient_id,
            quantity,
            unit,
        } => print_response(
            &service
                .link(recipe_id, ingredient_id, quantity, &unit)
                .await?,
        ),
        RecipeCommands::Unlink {
            recipe_id,
            ingredient_id,
        } => print_response(&service.unlink(recipe_id, ingredient_id).await?),
        RecipeCommands::Ingredients { id } => print_found(
            service.list_ingredients_for_recipe(id).await?,
            &format!("recipe {id}"),
        ),
    }
}
