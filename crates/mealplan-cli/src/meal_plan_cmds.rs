//! CLI handlers for `mealplan meal-plan` subcommands.

use anyhow::Result;
use sqlx::PgPool;

use mealplan_core::{MealPlanService, RecipeService};
use mealplan_db::models::{MealPlan, NewMealPlan};

use crate::MealPlanCommands;
use crate::output::{print_found, print_json, print_response};

/// Dispatch a `MealPlanCommands` variant to the appropriate handler.
pub async fn run_meal_plan_command(command: MealPlanCommands, pool: &PgPool) -> Result<()> {
    let service = MealPlanService::new(pool.clone());
    match command {
        MealPlanCommands::List => print_json(&service.list().await?),
        MealPlanCommands::Show { id } => {
            print_found(service.find(id).await?, &format!("meal plan {id}"))
        }
        MealPlanCommands::Add { name, date } => {
            print_response(&service.add(&NewMealPlan::new(name, date)).await?)
        }
        MealPlanCommands::Update { id, name, date } => {
            print_response(&service.update(&MealPlan { id, name, date }).await?)
        }
        MealPlanCommands::Delete { id } => print_response(&service.delete(id).await?),
        MealPlanCommands::Recipes { id } => {
            let recipes = RecipeService::new(pool.clone());
            print_found(
                recipes.list_for_meal_plan(id).await?,
                &format!("meal plan {id}"),
            )
        }
    }
}
