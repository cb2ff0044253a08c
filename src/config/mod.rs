//! Configuration loading for the payroll service.
//!
//! This module loads the server settings and the optional start-up seed data
//! from YAML files. Social charges rates are fixed in code and are not
//! configurable.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Seeding {} assignments", config.seed().assignments.len());
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_DIR_ENV, ConfigLoader, DEFAULT_CONFIG_DIR};
pub use types::{SeedAssignment, SeedAttendance, SeedData, ServerConfig, ServiceConfig};
