mod config;
mod ingredient_cmds;
mod meal_plan_cmds;
mod output;
mod recipe_cmds;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sqlx::PgPool;

use mealplan_db::config::DbConfig;
use mealplan_db::pool;

use config::MealplanConfig;

#[derive(Parser)]
#[command(name = "mealplan", about = "Meal plans, recipes, and the ingredients they use")]
struct Cli {
    /// Database URL (overrides MEALPLAN_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a mealplan config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = DbConfig::DEFAULT_URL)]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create the database if needed and apply migrations
    DbInit,
    /// Meal plan management
    MealPlan {
        #[command(subcommand)]
        command: MealPlanCommands,
    },
    /// Recipe management and ingredient links
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Ingredient management
    Ingredient {
        #[command(subcommand)]
        command: IngredientCommands,
    },
}

#[derive(Subcommand)]
pub enum MealPlanCommands {
    /// List all meal plans
    List,
    /// Show one meal plan
    Show { id: i32 },
    /// Create a meal plan
    Add {
        #[arg(long)]
        name: String,
        /// Plan date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Overwrite a meal plan's name and date
    Update {
        id: i32,
        #[arg(long)]
        name: String,
        /// Plan date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Delete a meal plan and all of its recipes
    Delete { id: i32 },
    /// List the recipes of a meal plan
    Recipes { id: i32 },
}

#[derive(Subcommand)]
pub enum RecipeCommands {
    /// List all recipes with their meal plan names
    List,
    /// Show one recipe
    Show { id: i32 },
    /// Create a recipe in an existing meal plan
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        cuisine: String,
        #[arg(long)]
        meal_plan_id: i32,
    },
    /// Overwrite a recipe, possibly moving it to another meal plan
    Update {
        id: i32,
        #[arg(long)]
        name: String,
        #[arg(long)]
        cuisine: String,
        #[arg(long)]
        meal_plan_id: i32,
    },
    /// Delete a recipe and its ingredient links
    Delete { id: i32 },
    /// Link an ingredient to a recipe
    Link {
        recipe_id: i32,
        ingredient_id: i32,
        /// Amount used by the recipe (decimal)
        #[arg(long, allow_negative_numbers = true)]
        quantity: Decimal,
        /// Unit the recipe measures the ingredient in
        #[arg(long)]
        unit: String,
    },
    /// Remove an ingredient link from a recipe
    Unlink { recipe_id: i32, ingredient_id: i32 },
    /// List a recipe's ingredients in the recipe's units
    Ingredients { id: i32 },
}

#[derive(Subcommand)]
pub enum IngredientCommands {
    /// List all ingredients
    List,
    /// Show one ingredient
    Show { id: i32 },
    /// Create an ingredient
    Add {
        #[arg(long)]
        name: String,
        /// Default unit of measure
        #[arg(long)]
        unit: String,
        /// Calories per default unit
        #[arg(long)]
        calories_per_unit: i32,
    },
    /// Overwrite an ingredient
    Update {
        id: i32,
        #[arg(long)]
        name: String,
        #[arg(long)]
        unit: String,
        /// Calories per default unit
        #[arg(long)]
        calories_per_unit: i32,
    },
    /// Delete an ingredient and its recipe links
    Delete { id: i32 },
}

/// Execute the `mealplan init` command: write config file.
fn cmd_init(db_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_owned(),
        },
    };
    config::save_config(&cfg)?;

    eprintln!("Config written to {}", path.display());
    eprintln!("Next: run `mealplan db-init` to create and migrate the database.");
    Ok(())
}

/// Execute the `mealplan db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = MealplanConfig::resolve(cli_db_url);

    pool::ensure_database_exists(&resolved.db_config).await?;
    let db_pool = pool::create_pool(&resolved.db_config).await?;

    let result: anyhow::Result<Vec<(String, i64)>> = async {
        pool::run_migrations(&db_pool).await?;
        pool::table_counts(&db_pool).await
    }
    .await;
    db_pool.close().await;

    let counts = result?;
    eprintln!("Database ready. Tables:");
    for (table, count) in &counts {
        eprintln!("  {table}: {count} rows");
    }
    Ok(())
}

/// Resolve the database URL and open a pool against an initialized database.
async fn connect(cli_db_url: Option<&str>) -> anyhow::Result<PgPool> {
    let resolved = MealplanConfig::resolve(cli_db_url);
    tracing::debug!(
        database = resolved.db_config.database_name().unwrap_or("<none>"),
        "connecting"
    );
    pool::create_pool(&resolved.db_config).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries JSON output only.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_url, force } => {
            cmd_init(&db_url, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::MealPlan { command } => {
            let db_pool = connect(cli.database_url.as_deref()).await?;
            let result = meal_plan_cmds::run_meal_plan_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Recipe { command } => {
            let db_pool = connect(cli.database_url.as_deref()).await?;
            let result = recipe_cmds::run_recipe_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Ingredient { command } => {
            let db_pool = connect(cli.database_url.as_deref()).await?;
            let result = ingredient_cmds::run_ingredient_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
