pub mod ingredients;
pub mod meal_plans;
pub mod recipe_ingredients;
pub mod recipes;
