//! Error types for mppi_nav

use std::fmt;

/// Main error type for the navigation stack
#[derive(Debug)]
pub enum NavError {
    /// Invalid configuration parameter
    InvalidParameter(String),
    /// Occupancy map construction failed
    MapError(String),
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            NavError::MapError(msg) => write!(f, "Map error: {}", msg),
        }
    }
}

impl std::error::Error for NavError {}

/// Result type alias for navigation operations
pub type NavResult<T> = Result<T, NavError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NavError::InvalidParameter("lambda must be positive".to_string());
        assert_eq!(format!("{}", err), "Invalid parameter: lambda must be positive");
    }
}
