//! CLI handlers for `mealplan ingredient` subcommands.

use anyhow::Result;
use sqlx::PgPool;

use mealplan_core::IngredientService;
use mealplan_db::models::{Ingredient, NewIngredient};

use crate::IngredientCommands;
use crate::output::{print_found, print_json, print_response};

/// Dispatch an `IngredientCommands` variant to the appropriate handler.
pub async fn run_ingredient_command(command: IngredientCommands, pool: &PgPool) -> Result<()> {
    let service = IngredientService::new(pool.clone());
    match command {
        IngredientCommands::List => print_json(&service.list().await?),
        IngredientCommands::Show { id } => {
            print_found(service.find(id).await?, &format!("ingredient {id}"))
        }
        IngredientCommands::Add {
            name,
            unit,
            calories_per_unit,
        } => print_response(
            &service
                .add(&NewIngredient::new(name, unit, calories_per_unit))
                .await?,
        ),
        IngredientCommands::Update {
            id,
            name,
            unit,
            calories_per_unit,
        } => print_response(
            &service
                .update(&Ingredient {
                    id,
                    name,
                    unit,
                    calories_per_unit,
                })
                .await?,
        ),
        IngredientCommands::Delete { id } => print_response(&service.delete(id).await?),
    }
}
