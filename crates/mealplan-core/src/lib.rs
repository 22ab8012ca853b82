//! Service layer for meal plans, recipes, and ingredients.
//!
//! Each service holds a [`sqlx::PgPool`] handed to it at construction. Read
//! operations return rows or `None`; mutating operations return a
//! [`ServiceResponse`] describing the outcome. `Err` is reserved for store
//! failures the services do not know how to classify.

pub mod failure;
pub mod ingredient;
pub mod meal_plan;
pub mod recipe;
pub mod response;
mod transaction;

pub use failure::StoreFailure;
pub use ingredient::IngredientService;
pub use meal_plan::MealPlanService;
pub use recipe::RecipeService;
pub use response::{ServiceResponse, ServiceStatus, ServiceStatusParseError};
pub use transaction::DEFAULT_LOCK_TIMEOUT;
