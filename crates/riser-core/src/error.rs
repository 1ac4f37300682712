//! Unified error types for the riser workspace
//!
//! [`RiserError`] covers everything that can go wrong before the optimizer
//! runs (file access, parsing, input validation) as well as the solver-side
//! failures that the algorithm crate converts into it at API boundaries.
//!
//! # Example
//!
//! ```ignore
//! use riser_core::{Building, BuildingInput, RiserResult};
//!
//! fn load(path: &str) -> RiserResult<Building> {
//!     let input = BuildingInput::from_path(path)?;
//!     Building::from_input(input)
//! }
//! ```

use thiserror::Error;

use crate::keys::{ApartmentKey, OutletKey};

/// Unified error type for all riser operations.
#[derive(Error, Debug)]
pub enum RiserError {
    /// I/O errors (file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// An outlet was declared but its cable length is missing
    #[error("missing outlet cable length for {0}")]
    MissingOutletCable(OutletKey),

    /// An apartment with outlets has no tap-to-splitter cable length
    #[error("missing tap-to-splitter cable length for {0}")]
    MissingApartmentCable(ApartmentKey),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Floor partitioning errors
    #[error("Topology error: {0}")]
    Topology(String),

    /// Solver/algorithm errors
    #[error("Solver error: {0}")]
    Solver(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results using RiserError.
pub type RiserResult<T> = Result<T, RiserError>;

impl From<serde_json::Error> for RiserError {
    fn from(err: serde_json::Error) -> Self {
        RiserError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for RiserError {
    fn from(err: toml::de::Error) -> Self {
        RiserError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for RiserError {
    fn from(err: toml::ser::Error) -> Self {
        RiserError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_key() {
        let err = RiserError::MissingOutletCable(OutletKey::new(3, 2, 1));
        let msg = err.to_string();
        assert!(msg.contains("floor 3"));
        assert!(msg.contains("apartment 2"));
        assert!(msg.contains("outlet 1"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RiserError = io_err.into();
        assert!(matches!(err, RiserError::Io(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> RiserResult<()> {
            Err(RiserError::Validation("test".into()))
        }

        fn outer() -> RiserResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
