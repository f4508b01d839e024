//! Repository configuration file support.
//!
//! `repository.toml` holds one table per environment profile. The active
//! profile is chosen by the `APP_ENV` environment variable:
//!
//! ```toml
//! [development]
//! type = "local"
//!
//! [production]
//! type = "postgres"
//! use_env_variable = "DATABASE_URL"
//! max_connections = 20
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;
use crate::db::PostgresConfig;

/// Profile used when `APP_ENV` is unset.
pub const DEFAULT_PROFILE: &str = "development";

/// Repository configuration from file, keyed by profile name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(flatten)]
    pub profiles: BTreeMap<String, ProfileSettings>,
}

/// Settings for a single profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSettings {
    #[serde(rename = "type")]
    pub repo_type: String,
    #[serde(default)]
    pub database_url: String,
    /// Name of an environment variable holding the connection string.
    /// Takes precedence over `database_url` when set.
    #[serde(default)]
    pub use_env_variable: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_retry_delay_ms() -> u64 {
    100
}

/// Name of the active profile, from `APP_ENV`.
pub fn active_profile() -> String {
    std::env::var("APP_ENV")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
}

impl FromStr for RepositoryConfig {
    type Err = RepositoryError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        content.parse()
    }

    /// Load repository configuration from the default location.
    ///
    /// Uses `BLOG_CONFIG` when set, otherwise searches for `repository.toml`
    /// in the current directory, then `backend/`, then the parent directory.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        if let Ok(path) = std::env::var("BLOG_CONFIG") {
            return Self::from_file(path);
        }

        Self::find_default_file()
            .map(Self::from_file)
            .unwrap_or_else(|| {
                Err(RepositoryError::configuration(
                    "No repository.toml found in standard locations",
                ))
            })
    }

    /// First `repository.toml` found in the standard locations, if any.
    pub fn find_default_file() -> Option<PathBuf> {
        [
            PathBuf::from("repository.toml"),
            PathBuf::from("backend/repository.toml"),
            PathBuf::from("../repository.toml"),
        ]
        .into_iter()
        .find(|p| p.exists())
    }

    /// Settings for the named profile.
    pub fn profile(&self, name: &str) -> Result<&ProfileSettings, RepositoryError> {
        self.profiles.get(name).ok_or_else(|| {
            RepositoryError::configuration(format!(
                "Profile '{}' not found in repository config (available: {})",
                name,
                self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
            ))
        })
    }
}

impl ProfileSettings {
    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, RepositoryError> {
        RepositoryType::from_str(&self.repo_type).map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })
    }

    /// Resolve the connection string, honouring `use_env_variable`.
    pub fn resolve_database_url(&self) -> Result<String, RepositoryError> {
        if let Some(ref var) = self.use_env_variable {
            return std::env::var(var).map_err(|_| {
                RepositoryError::configuration(format!(
                    "Environment variable '{}' named by use_env_variable is not set",
                    var
                ))
            });
        }

        if self.database_url.is_empty() {
            return Err(RepositoryError::configuration(
                "Postgres profile requires 'database_url' or 'use_env_variable'",
            ));
        }

        Ok(self.database_url.clone())
    }

    /// Convert to PostgresConfig if this is a Postgres profile.
    #[cfg(feature = "postgres-repo")]
    pub fn to_postgres_config(&self) -> Result<Option<PostgresConfig>, RepositoryError> {
        if self.repository_type()? != RepositoryType::Postgres {
            return Ok(None);
        }

        Ok(Some(PostgresConfig {
            database_url: self.resolve_database_url()?,
            max_pool_size: self.max_connections,
            min_pool_size: self.min_connections,
            connection_timeout_sec: self.connect_timeout,
            idle_timeout_sec: self.idle_timeout,
            max_retries: self.max_retries,
            retry_delay_ms: self.retry_delay_ms,
        }))
    }

    /// Convert to PostgresConfig when the feature is disabled.
    #[cfg(not(feature = "postgres-repo"))]
    pub fn to_postgres_config(&self) -> Result<Option<PostgresConfig>, RepositoryError> {
        if self.repository_type()? == RepositoryType::Postgres {
            return Err(RepositoryError::configuration(
                "Postgres repository feature not enabled",
            ));
        }

        Ok(None)
    }
}
