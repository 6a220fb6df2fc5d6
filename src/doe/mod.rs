//! DOE (Design of Experiments) analysis module.
//!
//! This module provides the Taguchi statistics engine:
//! - Main effects calculation
//! - Signal-to-Noise ratio analysis
//! - ANOVA with iterative factor pooling
//! - Effect confidence intervals and optimal level selection
//!
//! ## Quick Start
//!
//! ```rust
//! use taguchi_doe::doe::{analyze, AnalysisConfig};
//! use taguchi_doe::{Experiment, ExperimentResult, Factor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let factors = vec![
//!     Factor::new("A", vec![1, 2])?,
//!     Factor::new("B", vec![1, 2])?,
//! ];
//!
//! let run = |a, b, y| ExperimentResult::new(Experiment::new().with("A", a).with("B", b), y);
//! let results = vec![run(1, 1, 10.0), run(1, 2, 12.0), run(2, 1, 22.0), run(2, 2, 20.0)];
//!
//! let analysis = analyze(&factors, &results, &AnalysisConfig::default())?;
//!
//! assert_eq!(analysis.optimal_level("A"), Some(1));
//! assert!(analysis.anova_entry("B").unwrap().pooled);
//! # Ok(())
//! # }
//! ```
//!
//! ## Analysis Types
//!
//! ### Main Effects
//!
//! Mean response at each level of each factor. Factors are ranked by their
//! effect range (larger range = more influence).
//!
//! ### S/N Ratios
//!
//! Signal-to-Noise ratios over the responses observed at each level:
//! - **Larger-is-better**: Maximize response
//! - **Smaller-is-better**: Minimize response
//! - **Nominal-is-best**: Hit a target with minimum deviation
//!
//! ### ANOVA
//!
//! Partitions the total variation into factor and error sums of squares.
//! Factors whose F-ratio stays below the pooling threshold are folded into
//! the error term one at a time, weakest first, recomputing the error mean
//! square after each step.
//!
//! ### Optimal Settings
//!
//! The best level of each factor comes from its main-effect means, with the
//! lowest index winning ties. The predicted mean uses the additive model
//! over non-pooled factors.

mod anova;
mod main_effects;
mod optimal;
mod sn_ratios;
mod stats;
mod types;

pub use anova::ERROR_MS_FLOOR;
pub use optimal::select_optimal_level;
pub use sn_ratios::{calculate_sn_ratio, SN_EPSILON};
pub use stats::{
    f_distribution_p_value, has_t_table, ln_gamma, regularized_incomplete_beta, t_value,
};
pub use types::{
    ANOVAEntry, ANOVAResult, AnalysisConfig, ConfidenceInterval, DOEAnalysis, ErrorTerm,
    MainEffect, OptimalSettings, SNObjective, SNRatioEffect, SNRatioType,
};

use tracing::debug;

use crate::error::{Error, Result};
use crate::factor::Factor;
use crate::plan::ExperimentResult;

/// Responses of one factor, grouped by level index.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FactorResponses {
    pub name: String,
    pub levels: Vec<Vec<f64>>,
}

impl FactorResponses {
    /// Group results by the level they record for `factor`.
    ///
    /// Results that don't record one of the factor's levels belong to no
    /// group.
    fn collect<V: PartialEq>(factor: &Factor<V>, results: &[ExperimentResult<V>]) -> Self {
        let levels = factor
            .levels()
            .iter()
            .map(|level| {
                results
                    .iter()
                    .filter(|r| r.factors.get(factor.name()) == Some(level))
                    .map(|r| r.response)
                    .collect()
            })
            .collect();

        Self {
            name: factor.name().to_string(),
            levels,
        }
    }
}

/// Run the complete Taguchi analysis on a set of measured results.
///
/// # Errors
/// * [`Error::EmptyConfiguration`] if `factors` is empty
/// * [`Error::MissingTarget`] or [`Error::InvalidParams`] for an invalid
///   `config`
/// * [`Error::InvalidParams`] if a response is not finite or the responses
///   are large enough to overflow the sums of squares
/// * [`Error::DuplicateLevel`] if a factor lists the same level twice
/// * [`Error::InsufficientDegreesOfFreedom`] if the results leave no error
///   degrees of freedom
pub fn analyze<V: PartialEq>(
    factors: &[Factor<V>],
    results: &[ExperimentResult<V>],
    config: &AnalysisConfig,
) -> Result<DOEAnalysis> {
    config.validate()?;
    let objective = config.objective()?;

    if factors.is_empty() {
        return Err(Error::EmptyConfiguration);
    }
    for factor in factors {
        factor.check_distinct()?;
    }

    if let Some(i) = results.iter().position(|r| !r.response.is_finite()) {
        return Err(Error::invalid_params(format!(
            "response of result {} is not finite: {}",
            i + 1,
            results[i].response
        )));
    }

    debug!(
        factors = factors.len(),
        results = results.len(),
        sn_ratio_type = %config.sn_ratio_type,
        "analyzing responses"
    );

    let responses: Vec<f64> = results.iter().map(|r| r.response).collect();
    let grand_mean = if responses.is_empty() {
        0.0
    } else {
        responses.iter().sum::<f64>() / responses.len() as f64
    };

    let groups: Vec<FactorResponses> = factors
        .iter()
        .map(|f| FactorResponses::collect(f, results))
        .collect();

    let anova_config = anova::ANOVAConfig {
        pooling_threshold: config.pooling_threshold,
        min_unpooled_factors: config.min_unpooled_factors,
        confidence_level: config.confidence_level,
    };
    let anova = anova::calculate_anova(&groups, &responses, grand_mean, &anova_config)?;

    let main_effects = main_effects::calculate_main_effects(&groups, grand_mean);
    let sn_ratio_effects = sn_ratios::calculate_sn_ratios(&groups, objective);

    let optimal_settings = optimal::predict_optimal(
        &main_effects,
        &anova,
        grand_mean,
        responses.len(),
        config.sn_ratio_type,
        config.confidence_level,
    );

    Ok(DOEAnalysis {
        grand_mean,
        total_results: responses.len(),
        main_effects,
        sn_ratio_effects,
        anova,
        optimal_settings,
    })
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;
    use crate::catalogue::ArrayType;
    use crate::design::TaguchiDesign;

    fn l9_design(threshold: f64) -> TaguchiDesign<u32> {
        let factors = ["A", "B", "C"]
            .iter()
            .map(|name| Factor::new(*name, vec![1, 2, 3]).unwrap())
            .collect();
        let config = AnalysisConfig {
            pooling_threshold: threshold,
            ..Default::default()
        };
        TaguchiDesign::new(ArrayType::L9, factors, config).unwrap()
    }

    fn analyze_l9(responses: &[f64], threshold: f64) -> (DOEAnalysis, Vec<ExperimentResult<u32>>) {
        let design = l9_design(threshold);
        let plan = design.generate().unwrap();
        let runs: Vec<Vec<f64>> = responses.chunks(2).map(<[f64]>::to_vec).collect();
        let results = plan.with_responses(&runs).unwrap();
        (design.analyze(&results).unwrap(), results)
    }

    proptest! {
        #[test]
        fn ss_additivity(responses in prop::collection::vec(-100.0f64..100.0, 18)) {
            let (analysis, _) = analyze_l9(&responses, 2.0);
            let anova = &analysis.anova;
            let factor_ss: f64 = anova.entries.iter().map(|e| e.sum_of_squares).sum();
            let tol = 1e-8 * (1.0 + anova.total_ss);
            prop_assert!((anova.total_ss - factor_ss - anova.error.sum_of_squares).abs() < tol);
        }

        #[test]
        fn contribution_normalized(
            responses in prop::collection::vec(-100.0f64..100.0, 18),
            threshold in 0.0f64..5.0,
        ) {
            let (analysis, _) = analyze_l9(&responses, threshold);
            let entries = &analysis.anova.entries;
            let active_ss: f64 = entries
                .iter()
                .filter(|e| !e.pooled)
                .map(|e| e.sum_of_squares)
                .sum();
            let total: f64 = entries.iter().map(|e| e.contribution_percent).sum();

            if active_ss > 0.0 {
                prop_assert!((total - 100.0).abs() < 0.1);
            }
            for e in entries.iter().filter(|e| e.pooled) {
                prop_assert_eq!(e.contribution_percent, 0.0);
            }
        }

        #[test]
        fn confidence_intervals_symmetric(
            responses in prop::collection::vec(-100.0f64..100.0, 18),
        ) {
            let (analysis, _) = analyze_l9(&responses, 2.0);
            for entry in &analysis.anova.entries {
                match entry.confidence_interval {
                    Some(ci) => {
                        prop_assert!(!entry.pooled);
                        prop_assert!(ci.upper.is_finite() && ci.lower.is_finite());
                        prop_assert_eq!(-ci.lower, ci.upper);
                    }
                    None => prop_assert!(entry.pooled),
                }
            }
        }

        #[test]
        fn pooling_leaves_significant_factors(
            responses in prop::collection::vec(-100.0f64..100.0, 18),
            threshold in 0.0f64..5.0,
        ) {
            let (analysis, _) = analyze_l9(&responses, threshold);
            for entry in analysis.anova.entries.iter().filter(|e| !e.pooled) {
                prop_assert!(entry.f_ratio >= threshold);
            }
            let pooled: Vec<&str> = analysis
                .anova
                .entries
                .iter()
                .filter(|e| e.pooled)
                .map(|e| e.factor.as_str())
                .collect();
            prop_assert_eq!(pooled.len(), analysis.anova.error.pooled_factors.len());
        }

        #[test]
        fn main_effects_are_level_means(responses in prop::collection::vec(-100.0f64..100.0, 18)) {
            let (analysis, results) = analyze_l9(&responses, 2.0);
            for effect in &analysis.main_effects {
                for (level, &mean) in effect.level_means.iter().enumerate() {
                    let value = level as u32 + 1;
                    let observed: Vec<f64> = results
                        .iter()
                        .filter(|r| r.factors.get(&effect.factor) == Some(&value))
                        .map(|r| r.response)
                        .collect();
                    let expected = observed.iter().sum::<f64>() / observed.len() as f64;
                    prop_assert!((mean - expected).abs() < 1e-9);
                }
            }
        }
    }
}
