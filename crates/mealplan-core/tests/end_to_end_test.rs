//! A plan, a recipe in it, and an ingredient linked in the recipe's unit,
//! driven through the public services only.

use rust_decimal::Decimal;

use mealplan_core::{IngredientService, MealPlanService, RecipeService, ServiceStatus};
use mealplan_db::models::{NewIngredient, NewMealPlan, NewRecipe};
use mealplan_test_utils::{create_test_db, date, drop_test_db};

#[tokio::test]
async fn plan_recipe_and_ingredient_lifecycle() {
    let (pool, db_name) = create_test_db().await;
    let plans = MealPlanService::new(pool.clone());
    let recipes = RecipeService::new(pool.clone());
    let ingredients = IngredientService::new(pool.clone());

    let plan = plans
        .add(&NewMealPlan::new("Weight Loss Plan", date(2025, 2, 1)))
        .await
        .unwrap();
    assert_eq!(plan.status, ServiceStatus::Created);
    let plan_id = plan.created_id.unwrap();

    let recipe = recipes
        .add(&NewRecipe::new("Avocado Salad", "Mexican", plan_id))
        .await
        .unwrap();
    assert_eq!(recipe.status, ServiceStatus::Created);
    let recipe_id = recipe.created_id.unwrap();

    let listed = recipes
        .list_for_meal_plan(plan_id)
        .await
        .unwrap()
        .expect("plan exists");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, recipe_id);
    assert_eq!(listed[0].name, "Avocado Salad");
    assert_eq!(listed[0].cuisine, "Mexican");
    assert_eq!(listed[0].meal_plan_name, "Weight Loss Plan");

    let avocado = ingredients
        .add(&NewIngredient::new("Avocado", "grams", 2))
        .await
        .unwrap()
        .created_id
        .unwrap();
    let linked = recipes
        .link(recipe_id, avocado, Decimal::new(2, 0), "cups")
        .await
        .unwrap();
    assert!(linked.is_success());

    let lines = recipes
        .list_ingredients_for_recipe(recipe_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].name, "Avocado");
    assert_eq!(lines[0].unit, "cups");

    assert_eq!(
        plans.delete(plan_id).await.unwrap().status,
        ServiceStatus::Deleted
    );
    assert!(recipes.find(recipe_id).await.unwrap().is_none());
    assert_eq!(
        recipes.list_ingredients_for_recipe(recipe_id).await.unwrap(),
        None
    );
    assert!(ingredients.find(avocado).await.unwrap().is_some());

    pool.close().await;
    drop_test_db(&db_name).await;
}
