//! Signal-to-Noise ratio calculations for DOE analysis.
//!
//! Taguchi's S/N ratios fold both the location and the spread of the
//! responses into one log-scale figure that is always maximized.

use super::types::{SNObjective, SNRatioEffect};
use super::FactorResponses;

/// Floor applied inside the S/N formulas to guard against `log(0)` and
/// division by zero.
pub const SN_EPSILON: f64 = 1e-10;

/// Calculate the S/N ratio (dB) of a set of replicate responses.
///
/// # Formulas
/// - Larger-is-better: η = -10 · log₁₀(mean(1 / max(|y|, ε)²))
/// - Smaller-is-better: η = -10 · log₁₀(max(mean(y²), ε))
/// - Nominal-is-best: η = -10 · log₁₀(max(mean((y - T)²), ε))
///
/// An empty slice yields 0.0.
///
/// # Example
///
/// ```
/// use taguchi_doe::doe::{calculate_sn_ratio, SNObjective};
///
/// let sn = calculate_sn_ratio(&[10.0, 10.0], SNObjective::LargerIsBetter);
/// assert!((sn - 20.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn calculate_sn_ratio(values: &[f64], objective: SNObjective) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let n = values.len() as f64;

    match objective {
        SNObjective::LargerIsBetter => {
            let mean_inv_sq = values
                .iter()
                .map(|y| {
                    let y = y.abs().max(SN_EPSILON);
                    1.0 / (y * y)
                })
                .sum::<f64>()
                / n;
            -10.0 * mean_inv_sq.log10()
        }
        SNObjective::SmallerIsBetter => {
            let mean_sq = values.iter().map(|y| y * y).sum::<f64>() / n;
            -10.0 * mean_sq.max(SN_EPSILON).log10()
        }
        SNObjective::NominalIsBest { target } => {
            let msd = values.iter().map(|y| (y - target).powi(2)).sum::<f64>() / n;
            -10.0 * msd.max(SN_EPSILON).log10()
        }
    }
}

/// Calculate per-level S/N ratios for every factor.
///
/// Each level's ratio is computed over all responses recorded at that
/// level. The optimal level is the highest ratio, first index on ties.
pub(crate) fn calculate_sn_ratios(
    groups: &[FactorResponses],
    objective: SNObjective,
) -> Vec<SNRatioEffect> {
    groups
        .iter()
        .map(|group| {
            let level_sn_ratios: Vec<f64> = group
                .levels
                .iter()
                .map(|responses| calculate_sn_ratio(responses, objective))
                .collect();

            let optimal_level = level_sn_ratios
                .iter()
                .enumerate()
                .fold(0, |best, (i, &sn)| {
                    if sn > level_sn_ratios[best] {
                        i
                    } else {
                        best
                    }
                });

            SNRatioEffect {
                factor: group.name.clone(),
                level_sn_ratios,
                optimal_level,
            }
        })
        .collect()
}
