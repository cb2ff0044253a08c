//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading service
//! settings and seed data from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{SeedData, ServiceConfig};

/// Environment variable naming the configuration directory.
pub const CONFIG_DIR_ENV: &str = "PAYROLL_CONFIG_DIR";

/// Configuration directory used when [`CONFIG_DIR_ENV`] is unset.
pub const DEFAULT_CONFIG_DIR: &str = "./config";

/// Loads and provides access to service configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── service.yaml   # Server settings (required)
/// └── seed.yaml      # Assignments and attendance loaded at start-up (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// println!("Listening on {}", loader.service().server.bind_address);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    service: ServiceConfig,
    seed: SeedData,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `service.yaml` is missing
    /// - Any present file contains invalid YAML
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let service = Self::load_yaml::<ServiceConfig>(&path.join("service.yaml"))?;

        let seed_path = path.join("seed.yaml");
        let seed = if seed_path.exists() {
            Self::load_yaml::<SeedData>(&seed_path)?
        } else {
            SeedData::default()
        };

        Ok(Self { service, seed })
    }

    /// Loads configuration from `PAYROLL_CONFIG_DIR`, or `./config` if unset.
    pub fn from_env() -> EngineResult<Self> {
        let dir = std::env::var(CONFIG_DIR_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
        Self::load(dir)
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the service settings.
    pub fn service(&self) -> &ServiceConfig {
        &self.service
    }

    /// Returns the seed data (empty when `seed.yaml` is absent).
    pub fn seed(&self) -> &SeedData {
        &self.seed
    }
}
