//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading tax tables or
//! calculating payroll.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use paye_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/registry.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/registry.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
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

    /// A tax table violated one of the structural rules of a statutory table.
    #[error("Invalid tax table for year {year}: {message}")]
    InvalidTaxTable {
        /// The tax year of the offending table.
        year: i32,
        /// A description of the violated rule.
        message: String,
    },

    /// The payroll input was rejected before calculation.
    ///
    /// Every problem found is listed, not just the first one.
    #[error("Validation failed: {}", errors.join(" "))]
    ValidationFailed {
        /// Human-readable validation messages.
        errors: Vec<String>,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
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
    fn test_invalid_tax_table_displays_year_and_message() {
        let error = EngineError::InvalidTaxTable {
            year: 2026,
            message: "brackets are not contiguous".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid tax table for year 2026: brackets are not contiguous"
        );
    }

    #[test]
    fn test_validation_failed_lists_every_message() {
        let error = EngineError::ValidationFailed {
            errors: vec![
                "Please enter at least one income component.".to_string(),
                "overtime cannot be negative.".to_string(),
            ],
        };
        assert_eq!(
            error.to_string(),
            "Validation failed: Please enter at least one income component. overtime cannot be negative."
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_config_not_found() -> EngineResult<()> {
            Err(EngineError::ConfigNotFound {
                path: "/test".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_config_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
