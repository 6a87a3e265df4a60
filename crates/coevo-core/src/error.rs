//! Error types for coevolution operations.
//!
//! Provides structured error handling instead of panics. Geometry and
//! kinematics failures are fatal for the individual being evaluated and
//! propagate to the caller unchanged.

use crate::types::RobotId;
use thiserror::Error;

/// Result type for coevolution operations.
pub type Result<T> = std::result::Result<T, EvolutionError>;

/// Errors that can occur while building, evaluating, or evolving paths.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvolutionError {
    /// A path or control polyline cannot be turned into a valid genotype.
    #[error("Invalid genotype: {0}")]
    InvalidGenotype(String),

    /// An operator was called on input that breaks its contract
    /// (empty population, unsorted population, unevaluated individual).
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// The forward-kinematics collaborator failed or returned a malformed chain.
    #[error("Kinematics error for {robot}: {reason}")]
    Kinematics { robot: RobotId, reason: String },

    /// A geometric predicate failed.
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// Invalid configuration value.
    #[error("Invalid value for {field}: {value} ({reason})")]
    Config {
        field: String,
        value: String,
        reason: String,
    },

    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for EvolutionError {
    fn from(e: std::io::Error) -> Self {
        EvolutionError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for EvolutionError {
    fn from(e: serde_json::Error) -> Self {
        EvolutionError::Serialization(e.to_string())
    }
}

// Convenience constructors
impl EvolutionError {
    pub fn invalid_genotype(msg: impl Into<String>) -> Self {
        EvolutionError::InvalidGenotype(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        EvolutionError::PreconditionViolation(msg.into())
    }

    pub fn kinematics(robot: RobotId, reason: impl Into<String>) -> Self {
        EvolutionError::Kinematics {
            robot,
            reason: reason.into(),
        }
    }

    pub fn invalid_config(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        EvolutionError::Config {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
