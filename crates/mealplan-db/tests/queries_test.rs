//! Integration tests for the table-level query functions.
//!
//! Each test runs against its own temporary database.

use rust_decimal::Decimal;

use mealplan_db::models::{NewIngredient, NewMealPlan, NewRecipe};
use mealplan_db::queries::{ingredients, meal_plans, recipe_ingredients, recipes};
use mealplan_test_utils::{create_test_db, date, drop_test_db};

// -----------------------------------------------------------------------
// Meal plans
// -----------------------------------------------------------------------

#[tokio::test]
async fn insert_get_update_delete_meal_plan() {
    let (pool, db_name) = create_test_db().await;

    let new_plan = NewMealPlan::new("High Protein Plan", date(2025, 2, 3));
    let plan = meal_plans::insert_meal_plan(&pool, &new_plan)
        .await
        .expect("insert should succeed");
    assert!(plan.id > 0);
    assert_eq!((plan.name.as_str(), plan.date), ("High Protein Plan", date(2025, 2, 3)));

    let fetched = meal_plans::get_meal_plan(&pool, plan.id)
        .await
        .unwrap()
        .expect("plan should exist");
    assert_eq!(fetched, plan);

    let mut renamed = plan.clone();
    renamed.name = "Bulking Plan".to_owned();
    renamed.date = date(2025, 3, 1);
    let affected = meal_plans::update_meal_plan(&pool, &renamed).await.unwrap();
    assert_eq!(affected, 1);
    assert_eq!(
        meal_plans::get_meal_plan(&pool, plan.id).await.unwrap(),
        Some(renamed)
    );

    assert_eq!(meal_plans::delete_meal_plan(&pool, plan.id).await.unwrap(), 1);
    assert_eq!(meal_plans::delete_meal_plan(&pool, plan.id).await.unwrap(), 0);
    assert!(meal_plans::get_meal_plan(&pool, plan.id).await.unwrap().is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn hold_meal_plan_reports_existence() {
    let (pool, db_name) = create_test_db().await;

    let plan = meal_plans::insert_meal_plan(&pool, &NewMealPlan::new("Plan", date(2025, 1, 1)))
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    assert!(meal_plans::hold_meal_plan(&mut *tx, plan.id).await.unwrap());
    assert!(!meal_plans::hold_meal_plan(&mut *tx, plan.id + 100).await.unwrap());
    tx.rollback().await.unwrap();

    pool.close().await;
    drop_test_db(&db_name).await;
}

// -----------------------------------------------------------------------
// Recipes
// -----------------------------------------------------------------------

#[tokio::test]
async fn recipe_detail_joins_meal_plan_name() {
    let (pool, db_name) = create_test_db().await;

    let plan = meal_plans::insert_meal_plan(
        &pool,
        &NewMealPlan::new("Weight Loss Plan", date(2025, 2, 1)),
    )
    .await
    .unwrap();
    let other = meal_plans::insert_meal_plan(&pool, &NewMealPlan::new("Other", date(2025, 2, 2)))
        .await
        .unwrap();

    let salad = recipes::insert_recipe(&pool, &NewRecipe::new("Avocado Salad", "Mexican", plan.id))
        .await
        .unwrap();
    recipes::insert_recipe(&pool, &NewRecipe::new("Smoothie", "Mixed", other.id))
        .await
        .unwrap();

    let detail = recipes::get_recipe_detail(&pool, salad.id)
        .await
        .unwrap()
        .expect("recipe should exist");
    assert_eq!(detail.meal_plan_name, "Weight Loss Plan");
    assert_eq!(
        (detail.id, detail.name.as_str(), detail.cuisine.as_str(), detail.meal_plan_id),
        (salad.id, salad.name.as_str(), salad.cuisine.as_str(), salad.meal_plan_id)
    );

    let all = recipes::list_recipe_details(&pool).await.unwrap();
    assert_eq!(all.len(), 2);

    let for_plan = recipes::list_recipe_details_for_meal_plan(&pool, plan.id)
        .await
        .unwrap();
    assert_eq!(for_plan, vec![detail]);

    let none = recipes::list_recipe_details_for_meal_plan(&pool, other.id + 100)
        .await
        .unwrap();
    assert!(none.is_empty());

    assert_eq!(recipes::count_recipes(&pool, None).await.unwrap(), 2);
    assert_eq!(recipes::count_recipes(&pool, Some(plan.id)).await.unwrap(), 1);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn insert_recipe_with_missing_plan_violates_foreign_key() {
    let (pool, db_name) = create_test_db().await;

    let result = recipes::insert_recipe(&pool, &NewRecipe::new("Orphan", "None", 4242)).await;
    assert!(result.is_err(), "foreign key should reject the insert");
    assert_eq!(recipes::count_recipes(&pool, None).await.unwrap(), 0);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn deleting_meal_plan_cascades_to_recipes() {
    let (pool, db_name) = create_test_db().await;

    let plan = meal_plans::insert_meal_plan(&pool, &NewMealPlan::new("Plan", date(2025, 2, 1)))
        .await
        .unwrap();
    let recipe = recipes::insert_recipe(&pool, &NewRecipe::new("Soup", "French", plan.id))
        .await
        .unwrap();

    meal_plans::delete_meal_plan(&pool, plan.id).await.unwrap();
    assert!(recipes::get_recipe(&pool, recipe.id).await.unwrap().is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

// -----------------------------------------------------------------------
// Ingredients and links
// -----------------------------------------------------------------------

#[tokio::test]
async fn ingredient_crud() {
    let (pool, db_name) = create_test_db().await;

    let rice = ingredients::insert_ingredient(&pool, &NewIngredient::new("Rice", "grams", 130))
        .await
        .unwrap();
    assert_eq!(rice.calories_per_unit, 130);

    let mut brown = rice.clone();
    brown.name = "Brown Rice".to_owned();
    brown.calories_per_unit = 110;
    assert_eq!(ingredients::update_ingredient(&pool, &brown).await.unwrap(), 1);

    let listed = ingredients::list_ingredients(&pool).await.unwrap();
    assert_eq!(listed, vec![brown]);

    assert_eq!(ingredients::delete_ingredient(&pool, rice.id).await.unwrap(), 1);
    assert!(ingredients::get_ingredient(&pool, rice.id).await.unwrap().is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn link_lines_use_association_unit() {
    let (pool, db_name) = create_test_db().await;

    let plan = meal_plans::insert_meal_plan(&pool, &NewMealPlan::new("Plan", date(2025, 2, 1)))
        .await
        .unwrap();
    let recipe = recipes::insert_recipe(&pool, &NewRecipe::new("Pilaf", "Turkish", plan.id))
        .await
        .unwrap();
    let rice = ingredients::insert_ingredient(&pool, &NewIngredient::new("Rice", "grams", 130))
        .await
        .unwrap();

    let link = recipe_ingredients::insert_link(&pool, recipe.id, rice.id, Decimal::new(2, 0), "cups")
        .await
        .unwrap();
    assert_eq!(link.recipe_id, recipe.id);
    assert_eq!(link.ingredient_id, rice.id);

    let lines = recipe_ingredients::list_lines_for_recipe(&pool, recipe.id)
        .await
        .unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].unit, "cups");
    assert_eq!(lines[0].name, "Rice");
    assert_eq!(lines[0].quantity, Decimal::new(2, 0));

    let second =
        recipe_ingredients::insert_link(&pool, recipe.id, rice.id, Decimal::new(1, 0), "grams")
            .await;
    assert!(second.is_err(), "unique constraint should reject the pair");

    assert_eq!(
        recipe_ingredients::delete_link(&pool, recipe.id, rice.id)
            .await
            .unwrap(),
        1
    );
    assert!(
        recipe_ingredients::get_link(&pool, recipe.id, rice.id)
            .await
            .unwrap()
            .is_none()
    );

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn deleting_either_parent_cascades_to_links() {
    let (pool, db_name) = create_test_db().await;

    let plan = meal_plans::insert_meal_plan(&pool, &NewMealPlan::new("Plan", date(2025, 2, 1)))
        .await
        .unwrap();
    let recipe = recipes::insert_recipe(&pool, &NewRecipe::new("Chili", "Tex-Mex", plan.id))
        .await
        .unwrap();
    let beans = ingredients::insert_ingredient(&pool, &NewIngredient::new("Beans", "grams", 3))
        .await
        .unwrap();
    let onion = ingredients::insert_ingredient(&pool, &NewIngredient::new("Onion", "pieces", 40))
        .await
        .unwrap();

    recipe_ingredients::insert_link(&pool, recipe.id, beans.id, Decimal::new(400, 0), "grams")
        .await
        .unwrap();
    recipe_ingredients::insert_link(&pool, recipe.id, onion.id, Decimal::new(1, 0), "pieces")
        .await
        .unwrap();
    assert_eq!(recipe_ingredients::count_links(&pool, None).await.unwrap(), 2);

    ingredients::delete_ingredient(&pool, onion.id).await.unwrap();
    assert_eq!(recipe_ingredients::count_links(&pool, None).await.unwrap(), 1);

    recipes::delete_recipe(&pool, recipe.id).await.unwrap();
    assert_eq!(recipe_ingredients::count_links(&pool, None).await.unwrap(), 0);
    assert!(
        ingredients::get_ingredient(&pool, beans.id)
            .await
            .unwrap()
            .is_some(),
        "ingredients outlive their links"
    );

    pool.close().await;
    drop_test_db(&db_name).await;
}
