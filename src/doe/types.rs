//! DOE analysis types.
//!
//! Core types for Taguchi Design of Experiments analysis.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Signal-to-noise objective for Taguchi analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SNRatioType {
    /// Maximize the response.
    /// S/N = -10 * log10(mean(1/y^2))
    #[default]
    LargerIsBetter,
    /// Minimize the response.
    /// S/N = -10 * log10(mean(y^2))
    SmallerIsBetter,
    /// Hit a target value T.
    /// S/N = -10 * log10(mean((y - T)^2))
    NominalIsBest,
}

impl SNRatioType {
    /// The configuration name, e.g. `LARGER_IS_BETTER`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LargerIsBetter => "LARGER_IS_BETTER",
            Self::SmallerIsBetter => "SMALLER_IS_BETTER",
            Self::NominalIsBest => "NOMINAL_IS_BEST",
        }
    }
}

impl fmt::Display for SNRatioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SNRatioType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "LARGER_IS_BETTER" => Ok(Self::LargerIsBetter),
            "SMALLER_IS_BETTER" => Ok(Self::SmallerIsBetter),
            "NOMINAL_IS_BEST" => Ok(Self::NominalIsBest),
            _ => Err(Error::InvalidSNType(s.to_string())),
        }
    }
}

/// An S/N objective with everything needed to evaluate it.
///
/// Produced by [`AnalysisConfig::objective`], which is where a missing
/// nominal target is rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SNObjective {
    /// See [`SNRatioType::LargerIsBetter`].
    LargerIsBetter,
    /// See [`SNRatioType::SmallerIsBetter`].
    SmallerIsBetter,
    /// See [`SNRatioType::NominalIsBest`].
    NominalIsBest {
        /// Target response value.
        target: f64,
    },
}

/// Main effect analysis result for a single factor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MainEffect {
    /// Factor name.
    pub factor: String,
    /// Mean response at each level.
    pub level_means: Vec<f64>,
    /// Effect at each level (level_mean - grand_mean).
    pub level_effects: Vec<f64>,
    /// Number of results observed at each level.
    pub level_counts: Vec<usize>,
    /// Range of level means (max - min).
    pub range: f64,
    /// Rank by importance (1 = largest range).
    pub rank: usize,
}

/// Signal-to-Noise ratio analysis result for a single factor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SNRatioEffect {
    /// Factor name.
    pub factor: String,
    /// S/N ratio of the responses observed at each level.
    pub level_sn_ratios: Vec<f64>,
    /// Level with the highest S/N ratio (lowest index on ties).
    pub optimal_level: usize,
}

/// Confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfidenceInterval {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
    /// Confidence level (e.g., 0.95 for 95%).
    pub level: f64,
}

impl ConfidenceInterval {
    /// Interval `center ± margin`.
    #[must_use]
    pub fn around(center: f64, margin: f64, level: f64) -> Self {
        Self {
            lower: center - margin,
            upper: center + margin,
            level,
        }
    }

    /// Half-width of the interval.
    #[must_use]
    pub fn margin(&self) -> f64 {
        (self.upper - self.lower) / 2.0
    }
}

/// ANOVA table entry for a single factor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ANOVAEntry {
    /// Factor name.
    pub factor: String,
    /// Between-level sum of squares.
    pub sum_of_squares: f64,
    /// Degrees of freedom (levels - 1).
    pub degrees_of_freedom: usize,
    /// Mean square (SS / df).
    pub mean_square: f64,
    /// F-ratio (MS / MS_error); 0 if pooled.
    pub f_ratio: f64,
    /// P-value from the F-distribution, None if pooled.
    pub p_value: Option<f64>,
    /// Percent of explained variance among non-pooled factors; 0 if pooled.
    pub contribution_percent: f64,
    /// Whether this factor was pooled into error.
    pub pooled: bool,
    /// Symmetric interval for the factor effect, None if pooled.
    pub confidence_interval: Option<ConfidenceInterval>,
}

/// The error (residual) row of the ANOVA table after pooling.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorTerm {
    /// Error sum of squares.
    pub sum_of_squares: f64,
    /// Error degrees of freedom.
    pub degrees_of_freedom: usize,
    /// Error mean square (floored above zero).
    pub mean_square: f64,
    /// Factors folded into the error term, in pooling order.
    pub pooled_factors: Vec<String>,
}

/// Complete ANOVA result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ANOVAResult {
    /// ANOVA entries for each factor.
    pub entries: Vec<ANOVAEntry>,
    /// Error term.
    pub error: ErrorTerm,
    /// Total sum of squares about the grand mean.
    pub total_ss: f64,
    /// Total degrees of freedom.
    pub total_df: usize,
}

/// Optimal settings prediction result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimalSettings {
    /// Optimal level index for each factor, in factor order.
    pub factor_levels: Vec<usize>,
    /// Predicted mean response at the optimal levels (additive model over
    /// non-pooled factors).
    pub predicted_mean: f64,
    /// Confidence interval for the predicted mean.
    pub confidence_interval: ConfidenceInterval,
}

/// Complete DOE analysis result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DOEAnalysis {
    /// Grand mean of all responses.
    pub grand_mean: f64,
    /// Number of results analyzed.
    pub total_results: usize,
    /// Main effects for each factor.
    pub main_effects: Vec<MainEffect>,
    /// S/N ratio effects for each factor.
    pub sn_ratio_effects: Vec<SNRatioEffect>,
    /// ANOVA result.
    pub anova: ANOVAResult,
    /// Optimal settings prediction.
    pub optimal_settings: OptimalSettings,
}

impl DOEAnalysis {
    fn position(&self, factor: &str) -> Option<usize> {
        self.main_effects.iter().position(|e| e.factor == factor)
    }

    /// Optimal level index for a factor.
    #[must_use]
    pub fn optimal_level(&self, factor: &str) -> Option<usize> {
        self.position(factor)
            .map(|i| self.optimal_settings.factor_levels[i])
    }

    /// Main effect of a factor.
    #[must_use]
    pub fn main_effect(&self, factor: &str) -> Option<&MainEffect> {
        self.position(factor).map(|i| &self.main_effects[i])
    }

    /// S/N ratios of a factor.
    #[must_use]
    pub fn sn_ratio_effect(&self, factor: &str) -> Option<&SNRatioEffect> {
        self.position(factor).map(|i| &self.sn_ratio_effects[i])
    }

    /// ANOVA row of a factor.
    #[must_use]
    pub fn anova_entry(&self, factor: &str) -> Option<&ANOVAEntry> {
        self.position(factor).map(|i| &self.anova.entries[i])
    }
}

/// Configuration for DOE analysis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalysisConfig {
    /// S/N objective (default: larger-is-better).
    pub sn_ratio_type: SNRatioType,
    /// Target value; required for nominal-is-best.
    pub target_value: Option<f64>,
    /// F-ratio threshold for pooling factors into error (default: 2.0).
    pub pooling_threshold: f64,
    /// Stop pooling once this many factors remain unpooled (default: 0).
    pub min_unpooled_factors: usize,
    /// Confidence level for intervals: 0.90, 0.95 or 0.99 (default: 0.95).
    pub confidence_level: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sn_ratio_type: SNRatioType::LargerIsBetter,
            target_value: None,
            pooling_threshold: 2.0,
            min_unpooled_factors: 0,
            confidence_level: 0.95,
        }
    }
}

impl AnalysisConfig {
    /// Resolve the S/N objective.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTarget`] for nominal-is-best without a target.
    pub fn objective(&self) -> Result<SNObjective> {
        match self.sn_ratio_type {
            SNRatioType::LargerIsBetter => Ok(SNObjective::LargerIsBetter),
            SNRatioType::SmallerIsBetter => Ok(SNObjective::SmallerIsBetter),
            SNRatioType::NominalIsBest => self
                .target_value
                .map(|target| SNObjective::NominalIsBest { target })
                .ok_or(Error::MissingTarget),
        }
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing nominal target, a non-finite target,
    /// a negative or non-finite pooling threshold, or a confidence level
    /// without a t-table.
    pub fn validate(&self) -> Result<()> {
        self.objective()?;

        if let Some(target) = self.target_value {
            if !target.is_finite() {
                return Err(Error::invalid_params(format!(
                    "target value must be finite, got {target}"
                )));
            }
        }

        if !self.pooling_threshold.is_finite() || self.pooling_threshold < 0.0 {
            return Err(Error::invalid_params(format!(
                "pooling threshold must be a finite value >= 0, got {}",
                self.pooling_threshold
            )));
        }

        if !super::stats::has_t_table(self.confidence_level) {
            return Err(Error::invalid_params(format!(
                "confidence level must be 0.90, 0.95 or 0.99, got {}",
                self.confidence_level
            )));
        }

        Ok(())
    }
}
