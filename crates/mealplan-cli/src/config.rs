//! Configuration file management for mealplan.
//!
//! Provides a TOML-based config file at `~/.config/mealplan/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mealplan_db::config::DbConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the mealplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/mealplan` or
/// `~/.config/mealplan`, on every platform.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("mealplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("mealplan")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    toml::from_str(&contents).context("failed to parse config file")
}

/// Serialize and write the config file, creating parent dirs as needed.
///
/// The URL may carry a password, so the file is made owner-only on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

#[derive(Debug)]
pub struct MealplanConfig {
    pub db_config: DbConfig,
}

impl MealplanConfig {
    /// DB URL: `cli_db_url` > `MEALPLAN_DATABASE_URL` env >
    /// `config_file.database.url` > `DbConfig::DEFAULT_URL`.
    pub fn resolve(cli_db_url: Option<&str>) -> Self {
        let db_url = if let Some(url) = cli_db_url {
            url.to_owned()
        } else if let Ok(url) = std::env::var(DbConfig::URL_ENV) {
            url
        } else if let Ok(cfg) = load_config() {
            cfg.database.url
        } else {
            DbConfig::DEFAULT_URL.to_owned()
        };

        Self {
            db_config: DbConfig::new(db_url),
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_util::{lock_env, restore_var};

    #[test]
    fn resolve_with_cli_flag_overrides_all() {
        let _lock = lock_env();
        let prev = std::env::var(DbConfig::URL_ENV).ok();

        unsafe { std::env::set_var(DbConfig::URL_ENV, "postgresql://env:5432/envdb") };
        let config = MealplanConfig::resolve(Some("postgresql://cli:5432/clidb"));
        restore_var(DbConfig::URL_ENV, prev);

        assert_eq!(config.db_config.database_url, "postgresql://cli:5432/clidb");
    }

    #[test]
    fn resolve_with_env_var_overrides_config_file() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let prev_url = std::env::var(DbConfig::URL_ENV).ok();
        let prev_xdg = std::env::var("XDG_CONFIG_HOME").ok();

        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        let saved = save_config(&ConfigFile {
            database: DatabaseSection {
                url: "postgresql://file:5432/filedb".to_owned(),
            },
        });
        unsafe { std::env::set_var(DbConfig::URL_ENV, "postgresql://env:5432/envdb") };
        let config = MealplanConfig::resolve(None);

        restore_var(DbConfig::URL_ENV, prev_url);
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        saved.unwrap();
        assert_eq!(config.db_config.database_url, "postgresql://env:5432/envdb");
    }

    #[test]
    fn resolve_reads_config_file_when_env_unset() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let prev_url = std::env::var(DbConfig::URL_ENV).ok();
        let prev_xdg = std::env::var("XDG_CONFIG_HOME").ok();

        unsafe { std::env::remove_var(DbConfig::URL_ENV) };
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        let saved = save_config(&ConfigFile {
            database: DatabaseSection {
                url: "postgresql://file:5432/filedb".to_owned(),
            },
        });
        let config = MealplanConfig::resolve(None);

        restore_var(DbConfig::URL_ENV, prev_url);
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        saved.unwrap();
        assert_eq!(config.db_config.database_url, "postgresql://file:5432/filedb");
    }

    #[test]
    fn resolve_defaults_db_url_when_nothing_set() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let prev_url = std::env::var(DbConfig::URL_ENV).ok();
        let prev_xdg = std::env::var("XDG_CONFIG_HOME").ok();

        unsafe { std::env::remove_var(DbConfig::URL_ENV) };
        // An empty config home: no file to read.
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        let config = MealplanConfig::resolve(None);

        restore_var(DbConfig::URL_ENV, prev_url);
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        assert_eq!(config.db_config.database_url, DbConfig::DEFAULT_URL);
    }

    #[cfg(unix)]
    #[test]
    fn save_config_sets_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let prev_xdg = std::env::var("XDG_CONFIG_HOME").ok();

        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        let saved = save_config(&ConfigFile {
            database: DatabaseSection {
                url: "postgresql://user:secret@db:5432/mealplan".to_owned(),
            },
        });
        let path = config_path();
        restore_var("XDG_CONFIG_HOME", prev_xdg);

        saved.unwrap();
        let meta = std::fs::metadata(&path).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);

        let loaded: ConfigFile =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.database.url, "postgresql://user:secret@db:5432/mealplan");
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let _lock = lock_env();
        let path = config_path();
        assert!(
            path.ends_with("mealplan/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
