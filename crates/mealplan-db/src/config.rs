use std::env;
use std::time::Duration;

/// Connection settings for the mealplan database.
///
/// The URL comes from `MEALPLAN_DATABASE_URL` when set, otherwise
/// [`DbConfig::DEFAULT_URL`]. Pool sizing defaults suit a CLI process and can
/// be raised by embedders.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full PostgreSQL connection URL.
    pub database_url: String,
    pub max_connections: u32,
    /// How long to wait for a free pooled connection.
    pub acquire_timeout: Duration,
}

impl DbConfig {
    pub const URL_ENV: &str = "MEALPLAN_DATABASE_URL";
    pub const MAX_CONNECTIONS_ENV: &str = "MEALPLAN_DB_MAX_CONNECTIONS";

    pub const DEFAULT_URL: &str = "postgresql://localhost:5432/mealplan";
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
    pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

    /// Build a config from `MEALPLAN_DATABASE_URL` and
    /// `MEALPLAN_DB_MAX_CONNECTIONS`, using defaults for anything unset or
    /// unparseable.
    pub fn from_env() -> Self {
        let database_url = env::var(Self::URL_ENV).unwrap_or_else(|_| Self::DEFAULT_URL.to_owned());
        let max_connections = env::var(Self::MAX_CONNECTIONS_ENV)
            .ok()
            .and_then(|raw| raw.parse().ok())
            .filter(|&n: &u32| n > 0)
            .unwrap_or(Self::DEFAULT_MAX_CONNECTIONS);
        Self {
            max_connections,
            ..Self::new(database_url)
        }
    }

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Self::DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    /// The database named in the URL path, without any query string.
    ///
    /// `None` for a server URL such as `postgresql://host:5432`.
    pub fn database_name(&self) -> Option<&str> {
        let (_, rest) = self.database_url.split_once("://")?;
        let (_, path) = rest.split_once('/')?;
        let name = path.split_once('?').map_or(path, |(name, _)| name);
        (!name.is_empty()).then_some(name)
    }

    /// The same server's `postgres` maintenance database, keeping any query
    /// string. `CREATE DATABASE` is issued from there.
    pub fn maintenance_url(&self) -> String {
        let (base, query) = match self.database_url.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (self.database_url.as_str(), None),
        };
        let server = match base.split_once("://") {
            Some((scheme, rest)) => {
                let authority = rest.split_once('/').map_or(rest, |(authority, _)| authority);
                format!("{scheme}://{authority}")
            }
            None => base.trim_end_matches('/').to_owned(),
        };
        match query {
            Some(query) => format!("{server}/postgres?{query}"),
            None => format!("{server}/postgres"),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
