//! Unified error types for Letterbox

use std::time::Duration;
use thiserror::Error;

/// Unified error type for all Letterbox operations
#[derive(Error, Debug)]
pub enum LetterboxError {
    // Page contract errors
    #[error("Element not found: {field} ({selector}): {reason}")]
    ElementNotFound {
        field: String,
        selector: String,
        reason: String,
    },

    #[error("Timed out after {waited:?} waiting for {condition}")]
    Timeout { condition: String, waited: Duration },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    // Driver errors
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    // Suite plumbing
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl LetterboxError {
    /// Field is absent from the rendered page
    pub fn missing(field: impl Into<String>, selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            field: field.into(),
            selector: selector.into(),
            reason: "no matching element".to_string(),
        }
    }

    /// Page handle outlived the document it was resolved against
    pub fn stale(field: impl Into<String>, selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            field: field.into(),
            selector: selector.into(),
            reason: "handle is stale after navigation".to_string(),
        }
    }

    /// Whether this error terminates the scenario as a contract failure
    /// rather than an environment problem
    pub fn is_scenario_failure(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::Timeout { .. } | Self::AssertionFailed(_)
        )
    }
}

/// Result type alias using LetterboxError
pub type Result<T> = std::result::Result<T, LetterboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_not_found_message() {
        let err = LetterboxError::missing("email input", "#email");
        assert_eq!(
            err.to_string(),
            "Element not found: email input (#email): no matching element"
        );
        assert!(err.is_scenario_failure());
    }

    #[test]
    fn test_stale_is_element_not_found() {
        let err = LetterboxError::stale("submit button", ".submit-btn");
        assert!(matches!(err, LetterboxError::ElementNotFound { .. }));
        assert!(err.to_string().contains("stale"));
    }

    #[test]
    fn test_environment_errors_are_not_scenario_failures() {
        assert!(!LetterboxError::Browser("crashed".to_string()).is_scenario_failure());
        assert!(!LetterboxError::Config("bad".to_string()).is_scenario_failure());
    }
}
