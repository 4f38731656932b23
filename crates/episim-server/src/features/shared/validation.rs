//! Shared validation utilities
//!
//! Common input validation used by commands and queries across the feature
//! slices.

use thiserror::Error;

/// Errors that can occur during name validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    #[error("Name is required and cannot be empty")]
    Required,

    #[error("Name must be between 1 and {max_length} characters")]
    TooLong { max_length: usize },
}

/// Errors that can occur during node code validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeCodeValidationError {
    #[error("Node code is required and cannot be empty")]
    Required,

    #[error("Node code must contain only decimal digits")]
    InvalidFormat,

    #[error("Node code must not exceed {max_length} digits")]
    TooLong { max_length: usize },
}

/// Validate a display name: non-empty after trimming, bounded length.
pub fn validate_name(name: &str, max_length: usize) -> Result<(), NameValidationError> {
    if name.trim().is_empty() {
        return Err(NameValidationError::Required);
    }
    if name.len() > max_length {
        return Err(NameValidationError::TooLong { max_length });
    }
    Ok(())
}

/// Validate a raw node code: decimal digits only, at most `max_length` wide.
///
/// Codes shorter than the canonical width are accepted; they are
/// left-zero-padded on storage.
pub fn validate_node_code(code: &str, max_length: usize) -> Result<(), NodeCodeValidationError> {
    if code.is_empty() {
        return Err(NodeCodeValidationError::Required);
    }
    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(NodeCodeValidationError::InvalidFormat);
    }
    if code.len() > max_length {
        return Err(NodeCodeValidationError::TooLong { max_length });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Age 0-19", 255).is_ok());
        assert_eq!(validate_name("", 255), Err(NameValidationError::Required));
        assert_eq!(
            validate_name("   ", 255),
            Err(NameValidationError::Required)
        );
        assert_eq!(
            validate_name(&"x".repeat(300), 255),
            Err(NameValidationError::TooLong { max_length: 255 })
        );
    }

    #[test]
    fn test_validate_node_code() {
        assert!(validate_node_code("11000", 5).is_ok());
        assert!(validate_node_code("42", 5).is_ok());
        assert_eq!(
            validate_node_code("", 5),
            Err(NodeCodeValidationError::Required)
        );
        assert_eq!(
            validate_node_code("11-00", 5),
            Err(NodeCodeValidationError::InvalidFormat)
        );
        assert_eq!(
            validate_node_code("123456", 5),
            Err(NodeCodeValidationError::TooLong { max_length: 5 })
        );
    }
}
