//! Application configuration.
//!
//! Configuration is loaded once at startup from a YAML file with environment
//! variable overrides, then passed by value to the components that need it.
//! The file path defaults to `inventory.yaml` and can be changed with `-f` or
//! the `INVENTORY_CONFIG` environment variable.
//!
//! ## Loading priority
//!
//! 1. **YAML config file** - base values (a missing file yields defaults)
//! 2. **Environment variables** - `INVENTORY_` prefix, `__` for nesting
//!
//! ```bash
//! INVENTORY_DATABASE__DATABASE=/var/lib/inventory/items.sqlite3
//! INVENTORY_DATABASE__CONNECT_TIMEOUT=10s
//! INVENTORY_LOGGING__LEVEL=debug
//! ```
//!
//! ## Example file
//!
//! ```yaml
//! database:
//!   host: localhost
//!   port: 3306
//!   database: inventory.sqlite3
//!   user: inventory
//!   connect_timeout: 5s
//! logging:
//!   level: info
//!   dir: /var/log/inventory
//! ```

use clap::Parser;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::default_log_level;

const IN_MEMORY_DATABASE: &str = ":memory:";

/// Command-line arguments for the inventory dashboard.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(
        short = 'f',
        long,
        env = "INVENTORY_CONFIG",
        default_value = "inventory.yaml"
    )]
    pub config: PathBuf,

    /// Validate configuration and exit without opening the dashboard.
    #[arg(long)]
    pub validate: bool,
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Storage connection settings.
///
/// `database` names the SQLite file. `host`, `port` and `user` identify the
/// target in diagnostics only.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    /// Never logged or printed.
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// How long a connection waits on a locked database before failing.
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            database: "inventory.sqlite3".to_string(),
            user: "inventory".to_string(),
            password: None,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl DatabaseConfig {
    /// Convenience constructor for a database file with default settings.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            database: path.into().to_string_lossy().into_owned(),
            ..Self::default()
        }
    }

    /// Human-readable target description without credentials.
    pub fn target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Logging settings. Without `dir`, warnings and errors go to stderr.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

/// Configuration loading or validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Load(Box<figment::Error>),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "failed to load configuration: {err}"),
            Self::Invalid(message) => write!(f, "invalid configuration: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err.as_ref()),
            Self::Invalid(_) => None,
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        Self::Load(Box::new(value))
    }
}

impl Config {
    /// Loads and validates configuration from file and environment.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(args).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            // INVENTORY_CONFIG names the file itself, not a setting.
            .merge(Env::prefixed("INVENTORY_").ignore(&["config"]).split("__"))
    }

    /// Rejects settings the store cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let database = self.database.database.trim();
        if database.is_empty() {
            return Err(ConfigError::Invalid(
                "database.database cannot be empty".to_string(),
            ));
        }
        // Each operation opens its own connection, so an in-memory database
        // would be dropped after every statement.
        if database == IN_MEMORY_DATABASE {
            return Err(ConfigError::Invalid(
                "database.database cannot be `:memory:`; use a file path".to_string(),
            ));
        }
        if self.database.port == 0 {
            return Err(ConfigError::Invalid(
                "database.port must be greater than zero".to_string(),
            ));
        }
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn args(path: &str) -> Args {
        Args {
            config: PathBuf::from(path),
            validate: false,
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let config = Config::load(&args("absent.yaml")).unwrap();
            assert_eq!(config.database.database, "inventory.sqlite3");
            assert_eq!(config.database.connect_timeout, Duration::from_secs(5));
            assert!(config.logging.dir.is_none());
            Ok(())
        });
    }

    #[test]
    fn file_values_are_read() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
database:
  host: db.internal
  port: 5433
  database: stock.sqlite3
  user: clerk
  password: hunter2
  connect_timeout: 250ms
logging:
  level: warn
"#,
            )?;

            let config = Config::load(&args("test.yaml")).unwrap();
            assert_eq!(config.database.host, "db.internal");
            assert_eq!(config.database.port, 5433);
            assert_eq!(config.database.database, "stock.sqlite3");
            assert_eq!(config.database.user, "clerk");
            assert_eq!(config.database.password.as_deref(), Some("hunter2"));
            assert_eq!(config.database.connect_timeout, Duration::from_millis(250));
            assert_eq!(config.logging.level, "warn");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("test.yaml", "database:\n  database: from-file.sqlite3\n")?;
            jail.set_env("INVENTORY_DATABASE__DATABASE", "from-env.sqlite3");
            jail.set_env("INVENTORY_DATABASE__PORT", "4000");

            let config = Config::load(&args("test.yaml")).unwrap();
            assert_eq!(config.database.database, "from-env.sqlite3");
            assert_eq!(config.database.port, 4000);
            Ok(())
        });
    }

    #[test]
    fn unknown_fields_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("test.yaml", "database:\n  hostname: nope\n")?;
            let result = Config::load(&args("test.yaml"));
            assert!(matches!(result, Err(ConfigError::Load(_))));
            Ok(())
        });
    }

    #[test]
    fn in_memory_database_is_rejected() {
        let mut config = Config::default();
        config.database.database = ":memory:".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains(":memory:"));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let mut config = Config::default();
        config.logging.dir = Some(PathBuf::from("logs"));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = DatabaseConfig {
            password: Some("hunter2".to_string()),
            ..DatabaseConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
        assert!(!config.target().contains("hunter2"));
    }
}
