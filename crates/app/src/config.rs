use std::path::PathBuf;

use recipebook_core::auth::DEFAULT_PASSWORD_MIN_LENGTH;
use recipebook_core::category::CategoryCatalog;
use recipebook_core::error::CoreError;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection string of the recipe store. Only commands that
    /// touch the store need it; see [`database_url`](Self::database_url).
    pub database_url: Option<String>,
    /// Upper bound of the connection pool (default: `5`).
    pub db_max_connections: u32,
    /// Directory for images and the remember-me file.
    pub data_dir: PathBuf,
    /// Optional JSON file overriding the built-in category catalog.
    pub categories_path: Option<PathBuf>,
    /// Minimum sign-up password length (default: `6`).
    pub password_min_length: usize,
    /// Emit JSON log lines instead of human-readable ones.
    pub log_json: bool,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                       |
    /// |------------------------|-------------------------------|
    /// | `DATABASE_URL`         | required by store commands    |
    /// | `DB_MAX_CONNECTIONS`   | `5`                           |
    /// | `RECIPEBOOK_DATA_DIR`  | `<platform data dir>/recipebook` |
    /// | `RECIPEBOOK_CATEGORIES`| built-in catalog              |
    /// | `PASSWORD_MIN_LENGTH`  | `6`                           |
    /// | `RECIPEBOOK_LOG_JSON`  | `0`                           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL");

        let db_max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(raw) => parse_positive("DB_MAX_CONNECTIONS", &raw)?,
            None => 5,
        };

        let data_dir = match var("RECIPEBOOK_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir().ok_or(ConfigError::Missing("RECIPEBOOK_DATA_DIR"))?,
        };

        let password_min_length = match var("PASSWORD_MIN_LENGTH") {
            Some(raw) => parse_positive("PASSWORD_MIN_LENGTH", &raw)?,
            None => DEFAULT_PASSWORD_MIN_LENGTH,
        };

        let log_json = match var("RECIPEBOOK_LOG_JSON") {
            Some(raw) => parse_flag("RECIPEBOOK_LOG_JSON", &raw)?,
            None => false,
        };

        Ok(Self {
            database_url,
            db_max_connections,
            data_dir,
            categories_path: var("RECIPEBOOK_CATEGORIES").map(PathBuf::from),
            password_min_length,
            log_json,
        })
    }

    /// The store connection string, or [`ConfigError::Missing`] when unset.
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }

    /// Where imported recipe images are copied.
    pub fn image_dir(&self) -> PathBuf {
        self.data_dir.join("images")
    }

    /// The configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<CategoryCatalog, CoreError> {
        match &self.categories_path {
            Some(path) => CategoryCatalog::load(path),
            None => Ok(CategoryCatalog::default()),
        }
    }
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join("recipebook"))
}

fn parse_positive<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.trim().parse::<T>() {
        Ok(n) if n > T::default() => Ok(n),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
        }),
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/recipes"),
            ("RECIPEBOOK_DATA_DIR", "/var/lib/recipebook"),
        ])
        .unwrap();

        assert_eq!(config.database_url(), Ok("postgres://localhost/recipes"));
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.password_min_length, DEFAULT_PASSWORD_MIN_LENGTH);
        assert!(!config.log_json);
        assert!(config.categories_path.is_none());
        assert_eq!(config.image_dir(), PathBuf::from("/var/lib/recipebook/images"));
    }

    #[test]
    fn database_url_is_only_required_on_use() {
        let config = load(&[("RECIPEBOOK_DATA_DIR", "/tmp")]).unwrap();
        assert_eq!(config.database_url(), Err(ConfigError::Missing("DATABASE_URL")));
        assert_eq!(config.data_dir, PathBuf::from("/tmp"));

        let blank = load(&[("DATABASE_URL", "  "), ("RECIPEBOOK_DATA_DIR", "/tmp")]).unwrap();
        assert_eq!(blank.database_url(), Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn invalid_numbers_and_flags_are_rejected() {
        let base = [("DATABASE_URL", "postgres://x"), ("RECIPEBOOK_DATA_DIR", "/tmp")];

        assert_matches!(
            load(&[base[0], base[1], ("DB_MAX_CONNECTIONS", "zero")]),
            Err(ConfigError::Invalid { var: "DB_MAX_CONNECTIONS", .. })
        );
        assert_matches!(
            load(&[base[0], base[1], ("PASSWORD_MIN_LENGTH", "0")]),
            Err(ConfigError::Invalid { var: "PASSWORD_MIN_LENGTH", .. })
        );
        assert_matches!(
            load(&[base[0], base[1], ("RECIPEBOOK_LOG_JSON", "maybe")]),
            Err(ConfigError::Invalid { var: "RECIPEBOOK_LOG_JSON", .. })
        );

        let config = load(&[
            base[0],
            base[1],
            ("DB_MAX_CONNECTIONS", "12"),
            ("PASSWORD_MIN_LENGTH", "10"),
            ("RECIPEBOOK_LOG_JSON", "true"),
        ])
        .unwrap();
        assert_eq!(config.db_max_connections, 12);
        assert_eq!(config.password_min_length, 10);
        assert!(config.log_json);
    }

    #[test]
    fn catalog_comes_from_file_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        std::fs::write(&path, r#"[{"name":"Soup"},{"name":"Salad"}]"#).unwrap();

        // No store connection needed to read the catalog.
        let config = load(&[
            ("RECIPEBOOK_DATA_DIR", "/tmp"),
            ("RECIPEBOOK_CATEGORIES", path.to_str().unwrap()),
        ])
        .unwrap();
        let catalog = config.load_catalog().unwrap();
        assert_eq!(catalog.labels(), ["Soup", "Salad"]);

        let builtin = load(&[("DATABASE_URL", "postgres://x"), ("RECIPEBOOK_DATA_DIR", "/tmp")])
            .unwrap()
            .load_catalog()
            .unwrap();
        assert_eq!(builtin.labels(), ["Appetizer", "Main Course", "Dessert"]);
    }
}
