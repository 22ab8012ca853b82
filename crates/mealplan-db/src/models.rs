use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Meal plans
// ---------------------------------------------------------------------------

/// A named, dated grouping that owns recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MealPlan {
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
}

/// Fields of a meal plan before the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMealPlan {
    pub name: String,
    pub date: NaiveDate,
}

impl NewMealPlan {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
        }
    }
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

/// A recipe row as stored. `meal_plan_id` always references an existing plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: i32,
    pub name: String,
    pub cuisine: String,
    pub meal_plan_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    pub cuisine: String,
    pub meal_plan_id: i32,
}

impl NewRecipe {
    pub fn new(name: impl Into<String>, cuisine: impl Into<String>, meal_plan_id: i32) -> Self {
        Self {
            name: name.into(),
            cuisine: cuisine.into(),
            meal_plan_id,
        }
    }
}

/// A recipe joined with the name of the meal plan that owns it.
///
/// `meal_plan_name` is not stored on the recipe; it is read through the join
/// every time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RecipeDetail {
    pub id: i32,
    pub name: String,
    pub cuisine: String,
    pub meal_plan_id: i32,
    pub meal_plan_name: String,
}

// ---------------------------------------------------------------------------
// Ingredients
// ---------------------------------------------------------------------------

/// A reusable ingredient with a calorie-per-unit rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    /// Base unit of measure, e.g. "grams".
    pub unit: String,
    pub calories_per_unit: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub unit: String,
    pub calories_per_unit: i32,
}

impl NewIngredient {
    pub fn new(name: impl Into<String>, unit: impl Into<String>, calories_per_unit: i32) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            calories_per_unit,
        }
    }
}

// ---------------------------------------------------------------------------
// Recipe <-> ingredient association
// ---------------------------------------------------------------------------

/// One row of `recipe_ingredients`: an ingredient used by a recipe, in a
/// quantity and unit chosen by the recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RecipeIngredient {
    pub id: i32,
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub quantity: Decimal,
    pub unit: String,
}

/// An ingredient as it appears in a recipe.
///
/// `unit` and `quantity` come from the association record; the rest comes
/// from the ingredient. The ingredient's own base unit is not exposed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RecipeIngredientLine {
    pub ingredient_id: i32,
    pub name: String,
    pub calories_per_unit: i32,
    pub quantity: Decimal,
    pub unit: String,
}
