//! PostgreSQL persistence for meal plans, recipes, and ingredients.
//!
//! Query functions take any [`sqlx::PgExecutor`], so callers can run them
//! directly against a pool or inside a transaction they own.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
