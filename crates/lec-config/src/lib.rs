//! # lec-config
//!
//! Layered configuration loading for Lectern using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LECTERN_*` prefix, `__` as separator)
//! 2. Project-level `.lectern/config.toml`
//! 3. User-level `~/.config/lectern/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LECTERN_TOOLCHAIN__BINARY` -> `toolchain.binary`,
//! `LECTERN_WORKSPACE__ROOT` -> `workspace.root`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use lec_config::LecternConfig;
//!
//! let config = LecternConfig::load_with_dotenv().expect("config");
//! println!("workspaces under {}", config.workspace.root);
//! ```

mod database;
mod error;
mod toolchain;
mod workspace;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use toolchain::ToolchainConfig;
pub use workspace::WorkspaceConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LecternConfig {
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl LecternConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".lectern/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("LECTERN_").split("__"))
    }

    /// Reject values the orchestration layer cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.toolchain.binary.trim().is_empty() {
            return Err(invalid("toolchain.binary", "must not be empty"));
        }
        if self.toolchain.compile_timeout_secs == 0 {
            return Err(invalid("toolchain.compile_timeout_secs", "must be > 0"));
        }
        if self.toolchain.test_timeout_secs == 0 {
            return Err(invalid("toolchain.test_timeout_secs", "must be > 0"));
        }
        if self.workspace.root.trim().is_empty() {
            return Err(invalid("workspace.root", "must not be empty"));
        }
        if let Some(dep) = self
            .workspace
            .dependencies
            .iter()
            .find(|d| d.is_empty() || d.contains(['/', '\\']) || d.starts_with('.'))
        {
            return Err(invalid(
                "workspace.dependencies",
                &format!("'{dep}' is not a plain directory name"),
            ));
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lectern").join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LecternConfig::default();
        config.validate().expect("defaults should validate");
        assert_eq!(config.toolchain.binary, "forge");
        assert_eq!(config.workspace.root, "./workspaces");
    }

    #[test]
    fn figment_builds_without_files() {
        let config: LecternConfig = LecternConfig::figment()
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.toolchain.compile_timeout_secs, 30);
        assert_eq!(config.toolchain.test_timeout_secs, 60);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = LecternConfig::default();
        config.toolchain.test_timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "toolchain.test_timeout_secs")
        );
    }

    #[test]
    fn dependency_names_must_be_plain() {
        let mut config = LecternConfig::default();
        config.workspace.dependencies = vec!["../escape".into()];
        assert!(config.validate().is_err());
    }
}
