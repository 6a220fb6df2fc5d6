//! Builder pattern for constructing Taguchi designs.
//!
//! The builder collects factors and analysis settings and hands them to
//! [`TaguchiDesign::new`], so every check happens in one place.
//!
//! # Example
//!
//! ```
//! use taguchi_doe::{ArrayType, DesignBuilder, SNRatioType};
//!
//! let design = DesignBuilder::new()
//!     .factor("Temperature", vec![150, 175, 200])
//!     .factor("Pressure", vec![10, 20, 30])
//!     .factor("Speed", vec![1000, 1200, 1500])
//!     .sn_ratio_type(SNRatioType::SmallerIsBetter)
//!     .build()
//!     .unwrap();
//!
//! // No array requested: the smallest fitting array is chosen
//! assert_eq!(design.array(), ArrayType::L9);
//! ```
//!
//! # Array Selection
//!
//! Without an explicit [`DesignBuilder::array`], the builder walks the
//! catalogue from the fewest runs upward and picks the first array that
//! holds every factor in a column with enough levels and still leaves
//! error degrees of freedom for a single replicate.

use crate::catalogue::ArrayType;
use crate::design::{validate_capacity, TaguchiDesign};
use crate::doe::{AnalysisConfig, SNRatioType};
use crate::error::{Error, Result};
use crate::factor::Factor;

/// Builder for constructing Taguchi designs.
#[derive(Debug, Clone)]
pub struct DesignBuilder<V> {
    array: Option<ArrayType>,
    factors: Vec<(String, Vec<V>)>,
    config: AnalysisConfig,
}

impl<V> Default for DesignBuilder<V> {
    fn default() -> Self {
        Self {
            array: None,
            factors: Vec::new(),
            config: AnalysisConfig::default(),
        }
    }
}

impl<V> DesignBuilder<V> {
    /// Create a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific catalogued array.
    #[must_use]
    pub fn array(mut self, array: ArrayType) -> Self {
        self.array = Some(array);
        self
    }

    /// Add a factor. Factors take array columns in the order they are added.
    ///
    /// Level checks are deferred to [`build`](Self::build).
    #[must_use]
    pub fn factor(mut self, name: impl Into<String>, levels: Vec<V>) -> Self {
        self.factors.push((name.into(), levels));
        self
    }

    /// Set the S/N objective (default: larger-is-better).
    #[must_use]
    pub fn sn_ratio_type(mut self, sn_ratio_type: SNRatioType) -> Self {
        self.config.sn_ratio_type = sn_ratio_type;
        self
    }

    /// Set the nominal-is-best target.
    #[must_use]
    pub fn target_value(mut self, target: f64) -> Self {
        self.config.target_value = Some(target);
        self
    }

    /// Set the F-ratio below which factors are pooled into error.
    #[must_use]
    pub fn pooling_threshold(mut self, threshold: f64) -> Self {
        self.config.pooling_threshold = threshold;
        self
    }

    /// Stop pooling once this many factors remain unpooled.
    #[must_use]
    pub fn min_unpooled_factors(mut self, count: usize) -> Self {
        self.config.min_unpooled_factors = count;
        self
    }

    /// Set the confidence level for intervals (0.90, 0.95 or 0.99).
    #[must_use]
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.config.confidence_level = level;
        self
    }

    /// Replace the whole analysis configuration.
    #[must_use]
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

}

impl<V: PartialEq> DesignBuilder<V> {
    /// Build the design.
    ///
    /// # Errors
    ///
    /// Returns an error if a factor has fewer than two levels or repeats a
    /// level, if no catalogued array fits the factors, or if the design is
    /// rejected by [`TaguchiDesign::new`].
    pub fn build(self) -> Result<TaguchiDesign<V>> {
        let factors = self
            .factors
            .into_iter()
            .map(|(name, levels)| Factor::new(name, levels))
            .collect::<Result<Vec<_>>>()?;

        let array = match self.array {
            Some(array) => array,
            None => select_array(&factors)?,
        };

        TaguchiDesign::new(array, factors, self.config)
    }
}

/// Smallest catalogued array that fits `factors`.
///
/// An array fits when the factor set passes [`validate_capacity`], each
/// factor's column has at least as many levels as the factor, and the
/// factor degrees of freedom leave at least one error degree of freedom
/// for a single replicate.
///
/// # Errors
///
/// Returns [`Error::EmptyConfiguration`] for an empty factor set and
/// [`Error::InvalidParams`] when no array fits.
pub fn select_array<V>(factors: &[Factor<V>]) -> Result<ArrayType> {
    if factors.is_empty() {
        return Err(Error::EmptyConfiguration);
    }

    let factor_df: usize = factors.iter().map(|f| f.num_levels() - 1).sum();

    ArrayType::ALL
        .into_iter()
        .find(|&array| {
            validate_capacity(array, factors).is_ok()
                && factor_df < array.runs() - 1
                && factors.iter().enumerate().all(|(col, f)| {
                    column_levels(array, col) >= f.num_levels()
                })
        })
        .ok_or_else(|| {
            Error::invalid_params(format!(
                "no standard array fits {} factors with {} degrees of freedom",
                factors.len(),
                factor_df
            ))
        })
}

fn column_levels(array: ArrayType, col: usize) -> usize {
    array
        .table()
        .iter()
        .map(|row| row[col])
        .max()
        .unwrap_or(0) as usize
}
