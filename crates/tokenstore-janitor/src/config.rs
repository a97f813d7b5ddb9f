use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokenstore_core::MAX_TOKEN_EXPIRY_TIME;
use tokenstore_postgres::PostgresConfig;

/// Janitor configuration.
///
/// Every section is optional in the file; missing keys take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub postgres: PostgresConfig,
    pub cleanup: CleanupConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Seconds between cleanup passes in `run` mode.
    pub interval_secs: u64,
    /// Tokens older than this many milliseconds are deleted.
    pub retention_ms: i64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
            retention_ms: MAX_TOKEN_EXPIRY_TIME,
        }
    }
}

impl CleanupConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.postgres.url.trim().is_empty() {
            anyhow::bail!("postgres.url must not be empty");
        }
        if self.postgres.pool_size == 0 {
            anyhow::bail!("postgres.pool_size must be at least 1");
        }
        if self.cleanup.interval_secs == 0 {
            anyhow::bail!("cleanup.interval_secs must be greater than 0");
        }
        if self.cleanup.retention_ms <= 0 {
            anyhow::bail!("cleanup.retention_ms must be greater than 0");
        }
        Ok(())
    }
}

pub mod loader {
    use std::path::{Path, PathBuf};

    use anyhow::Context;
    use config::{Config, Environment, File, FileFormat};

    use super::AppConfig;

    const DEFAULT_PATH: &str = "tokenstore.toml";

    /// Loads the config file (if any) and applies `TOKENSTORE__SECTION__KEY`
    /// environment overrides, e.g. `TOKENSTORE__POSTGRES__URL`.
    pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
        load_config_with_env(path, None)
    }

    /// Like [`load_config`], reading overrides from `env` instead of the
    /// process environment when given.
    pub fn load_config_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> anyhow::Result<AppConfig> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                if !p.exists() {
                    anyhow::bail!("config file not found: {}", p.display());
                }
                builder = builder.add_source(File::from(p.to_path_buf()).format(FileFormat::Toml));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_PATH);
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path).format(FileFormat::Toml));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("TOKENSTORE")
                .try_parsing(true)
                .separator("__")
                .source(env),
        );

        let merged: AppConfig = builder
            .build()
            .context("config build error")?
            .try_deserialize()
            .context("config deserialize error")?;

        merged.validate()?;
        Ok(merged)
    }
}
