//! Optimal settings prediction for DOE.
//!
//! Picks the best level of each factor from its main-effect means and
//! predicts the response there with Taguchi's additive model.

use super::stats::t_value;
use super::types::{ANOVAResult, ConfidenceInterval, MainEffect, OptimalSettings, SNRatioType};

/// Index of the best level mean.
///
/// Maximum for larger-is-better and nominal-is-best, minimum for
/// smaller-is-better. When several levels share the best value the lowest
/// index is returned.
///
/// # Example
///
/// ```
/// use taguchi_doe::doe::select_optimal_level;
/// use taguchi_doe::SNRatioType;
///
/// let means = [12.0, 30.0, 30.0];
/// assert_eq!(select_optimal_level(&means, SNRatioType::LargerIsBetter), 1);
/// assert_eq!(select_optimal_level(&means, SNRatioType::SmallerIsBetter), 0);
/// ```
#[must_use]
pub fn select_optimal_level(level_means: &[f64], sn_ratio_type: SNRatioType) -> usize {
    let better = |candidate: f64, best: f64| match sn_ratio_type {
        SNRatioType::LargerIsBetter | SNRatioType::NominalIsBest => candidate > best,
        SNRatioType::SmallerIsBetter => candidate < best,
    };

    level_means
        .iter()
        .enumerate()
        .skip(1)
        .fold(0, |best, (i, &mean)| {
            if better(mean, level_means[best]) {
                i
            } else {
                best
            }
        })
}

/// Calculate optimal settings from the main effects and the pooled ANOVA.
///
/// # Formula
/// ŷ = ȳ + Σ effect(optimal level), over non-pooled factors
///
/// CI = ŷ ± t(α, df_error) · sqrt(MS_error / n_eff), where
/// n_eff = N / (1 + Σ df of non-pooled factors)
pub(crate) fn predict_optimal(
    main_effects: &[MainEffect],
    anova: &ANOVAResult,
    grand_mean: f64,
    num_results: usize,
    sn_ratio_type: SNRatioType,
    confidence_level: f64,
) -> OptimalSettings {
    let factor_levels: Vec<usize> = main_effects
        .iter()
        .map(|me| select_optimal_level(&me.level_means, sn_ratio_type))
        .collect();

    let predicted_mean = grand_mean
        + main_effects
            .iter()
            .zip(&anova.entries)
            .zip(&factor_levels)
            .filter(|((_, entry), _)| !entry.pooled)
            .map(|((me, _), &level)| me.level_effects[level])
            .sum::<f64>();

    let df_sum: usize = anova
        .entries
        .iter()
        .filter(|e| !e.pooled)
        .map(|e| e.degrees_of_freedom)
        .sum();
    let n_eff = num_results as f64 / (1.0 + df_sum as f64);

    let t = t_value(confidence_level, anova.error.degrees_of_freedom);
    let margin = t * (anova.error.mean_square / n_eff).sqrt();

    OptimalSettings {
        factor_levels,
        predicted_mean,
        confidence_interval: ConfidenceInterval::around(predicted_mean, margin, confidence_level),
    }
}
