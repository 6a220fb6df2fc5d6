//! Error types for the taguchi-doe library.
//!
//! This module provides error handling using the `thiserror` crate, with
//! variants for design capacity validation, configuration, and analysis.

use thiserror::Error;

/// The main error type for the taguchi-doe library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============ Capacity Errors ============
    /// A factor was declared with fewer than two levels.
    #[error("factor {factor} must have at least 2 levels, got {levels}")]
    TooFewLevels {
        /// Name of the offending factor.
        factor: String,
        /// Number of levels declared.
        levels: usize,
    },

    /// More factors were declared than the array has columns.
    #[error("{array} can only accommodate {max} factors, but {factors} were provided")]
    TooManyFactors {
        /// Number of factors declared.
        factors: usize,
        /// Column count of the array.
        max: usize,
        /// Name of the array.
        array: &'static str,
    },

    /// A factor has more levels than the array can express.
    #[error("{array} can only accommodate {max} levels per factor, but factor {factor} has {levels}")]
    TooManyLevels {
        /// Name of the offending factor.
        factor: String,
        /// Number of levels declared.
        levels: usize,
        /// Maximum cell value of the array.
        max: usize,
        /// Name of the array.
        array: &'static str,
    },

    // ============ Configuration Errors ============
    /// Two factors share the same name.
    #[error("factor {0} is declared more than once")]
    DuplicateFactor(String),

    /// A factor lists the same level value more than once.
    #[error("level {level} of factor {factor} duplicates an earlier level")]
    DuplicateLevel {
        /// Name of the offending factor.
        factor: String,
        /// Index of the repeated level.
        level: usize,
    },

    /// Nominal-is-best analysis was configured without a target value.
    #[error("nominal-is-best S/N ratio requires a target value")]
    MissingTarget,

    /// An S/N ratio type name outside the supported set.
    #[error("invalid S/N ratio type {0:?} (expected LARGER_IS_BETTER, SMALLER_IS_BETTER or NOMINAL_IS_BEST)")]
    InvalidSNType(String),

    /// An array name outside the catalogue.
    #[error("unknown standard array: {0}")]
    UnknownArray(String),

    /// Invalid configuration or input parameters.
    #[error("invalid parameters: {message}")]
    InvalidParams {
        /// Description of what is invalid.
        message: String,
    },

    // ============ Generation Errors ============
    /// A plan was requested for a design with no factors.
    #[error("at least one factor must be configured before generating experiments")]
    EmptyConfiguration,

    // ============ Analysis Errors ============
    /// The factor degrees of freedom leave nothing for the error term.
    #[error(
        "insufficient degrees of freedom: {results} results leave {error_df} error df after {factor_df} factor df"
    )]
    InsufficientDegreesOfFreedom {
        /// Number of results supplied.
        results: usize,
        /// Sum of factor degrees of freedom.
        factor_df: usize,
        /// Remaining error degrees of freedom (zero or negative).
        error_df: i64,
    },
}

/// A specialized `Result` type for taguchi-doe operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Create a new `InvalidParams` error.
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Whether this error reports a factor set that does not fit an array.
    #[must_use]
    pub fn is_capacity_error(&self) -> bool {
        matches!(
            self,
            Self::TooFewLevels { .. } | Self::TooManyFactors { .. } | Self::TooManyLevels { .. }
        )
    }
}
