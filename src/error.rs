//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the payroll, ledger and payment operations can report.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// Every fallible operation in the engine returns this error type, so the
/// HTTP layer can translate it into a response in a single place.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::NotFound {
///     entity: "ledger entry".to_string(),
///     key: "42".to_string(),
/// };
/// assert_eq!(error.to_string(), "ledger entry not found: 42");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// An input value was missing or malformed.
    #[error("Invalid value for '{field}': {message}")]
    Validation {
        /// The input field that failed validation.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// No record matched the given keys.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: String,
        /// The key used for the lookup.
        key: String,
    },

    /// The ledger rows of a pair could not be loaded for balance propagation.
    #[error("Balance recalculation failed for employee '{employee_id}' on project '{project_id}': {message}")]
    Recalculation {
        /// The employee of the ledger chain.
        employee_id: String,
        /// The project of the ledger chain.
        project_id: String,
        /// A description of the underlying failure.
        message: String,
    },

    /// The storage layer failed.
    #[error("Persistence error: {message}")]
    Persistence {
        /// A description of the storage failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::NotFound`] error.
    pub fn not_found(entity: impl Into<String>, key: impl ToString) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    /// Shorthand for a [`EngineError::Persistence`] error.
    pub fn persistence(message: impl Into<String>) -> Self {
        EngineError::Persistence {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = EngineError::validation("month", "must be between 1 and 12");
        assert_eq!(
            error.to_string(),
            "Invalid value for 'month': must be between 1 and 12"
        );
    }

    #[test]
    fn test_not_found_displays_entity_and_key() {
        let error = EngineError::not_found("Payment", "pay_001");
        assert_eq!(error.to_string(), "Payment not found: pay_001");
    }

    #[test]
    fn test_recalculation_displays_pair() {
        let error = EngineError::Recalculation {
            employee_id: "emp_001".to_string(),
            project_id: "prj_001".to_string(),
            message: "store offline".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Balance recalculation failed for employee 'emp_001' on project 'prj_001': store offline"
        );
    }

    #[test]
    fn test_persistence_displays_message() {
        let error = EngineError::persistence("lock poisoned");
        assert_eq!(error.to_string(), "Persistence error: lock poisoned");
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/service.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/service.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::not_found("Assignment", "emp_001/prj_001"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
