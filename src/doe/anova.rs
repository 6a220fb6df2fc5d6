//! ANOVA (Analysis of Variance) for DOE.
//!
//! Calculates sum of squares, F-ratios, p-values, contribution percentages
//! and effect confidence intervals. Factors whose F-ratio falls below the
//! pooling threshold are folded into the error term one at a time.

use tracing::{debug, trace};

use super::main_effects::level_mean;
use super::stats::{f_distribution_p_value, t_value};
use super::types::{ANOVAEntry, ANOVAResult, ConfidenceInterval, ErrorTerm};
use super::FactorResponses;
use crate::error::{Error, Result};

/// Lower bound on the error mean square.
pub const ERROR_MS_FLOOR: f64 = 1e-10;

/// Configuration for ANOVA calculation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ANOVAConfig {
    /// F-ratio threshold for pooling factors (default: 2.0).
    pub pooling_threshold: f64,
    /// Stop pooling once this many factors remain unpooled (default: 0).
    pub min_unpooled_factors: usize,
    /// Confidence level for effect intervals (default: 0.95).
    pub confidence_level: f64,
}

impl Default for ANOVAConfig {
    fn default() -> Self {
        Self {
            pooling_threshold: 2.0,
            min_unpooled_factors: 0,
            confidence_level: 0.95,
        }
    }
}

fn error_mean_square(ss: f64, df: usize) -> f64 {
    if df == 0 {
        return ERROR_MS_FLOOR;
    }
    (ss / df as f64).max(ERROR_MS_FLOOR)
}

/// Calculate the ANOVA table with adaptive pooling.
///
/// # Algorithm
/// 1. Total SS = Σ(yᵢ - ȳ)², total df = n - 1
/// 2. Factor SS = Σ nⱼ(ȳⱼ - ȳ)², df = levels - 1
/// 3. Error SS = total SS - Σ factor SS, error df = total df - Σ factor df
/// 4. Pool the weakest factor while its F-ratio is below the threshold
/// 5. Final F-ratios, p-values, contributions and intervals
///
/// # Errors
///
/// Returns [`Error::InsufficientDegreesOfFreedom`] when the factors use up
/// every degree of freedom before pooling, and [`Error::InvalidParams`] when
/// a sum of squares overflows.
pub(crate) fn calculate_anova(
    groups: &[FactorResponses],
    responses: &[f64],
    grand_mean: f64,
    config: &ANOVAConfig,
) -> Result<ANOVAResult> {
    let n = responses.len();

    let factor_df: Vec<usize> = groups.iter().map(|g| g.levels.len() - 1).collect();
    let factor_df_total: usize = factor_df.iter().sum();
    let error_df = n as i64 - 1 - factor_df_total as i64;
    if error_df <= 0 {
        return Err(Error::InsufficientDegreesOfFreedom {
            results: n,
            factor_df: factor_df_total,
            error_df,
        });
    }
    let mut error_df = error_df as usize;

    let total_ss: f64 = responses.iter().map(|y| (y - grand_mean).powi(2)).sum();
    if !total_ss.is_finite() {
        return Err(Error::invalid_params(format!(
            "total sum of squares overflows: {total_ss}"
        )));
    }
    let total_df = n - 1;

    let mut entries: Vec<ANOVAEntry> = groups
        .iter()
        .zip(&factor_df)
        .map(|(group, &df)| {
            // Empty levels sit at the grand mean and add nothing
            let ss: f64 = group
                .levels
                .iter()
                .map(|level| {
                    level.len() as f64 * (level_mean(level, grand_mean) - grand_mean).powi(2)
                })
                .sum();
            trace!(factor = %group.name, ss, df, "factor sum of squares");

            ANOVAEntry {
                factor: group.name.clone(),
                sum_of_squares: ss,
                degrees_of_freedom: df,
                mean_square: ss / df as f64,
                f_ratio: 0.0,
                p_value: None,
                contribution_percent: 0.0,
                pooled: false,
                confidence_interval: None,
            }
        })
        .collect();

    if let Some(entry) = entries.iter().find(|e| !e.sum_of_squares.is_finite()) {
        return Err(Error::invalid_params(format!(
            "sum of squares of factor {} is not finite",
            entry.factor
        )));
    }

    let mut error_ss = total_ss - entries.iter().map(|e| e.sum_of_squares).sum::<f64>();

    let pooled_factors = pool_factors(
        &mut entries,
        &mut error_ss,
        &mut error_df,
        config.pooling_threshold,
        config.min_unpooled_factors,
    );
    let error_ms = error_mean_square(error_ss, error_df);

    for entry in entries.iter_mut().filter(|e| !e.pooled) {
        entry.f_ratio = entry.mean_square / error_ms;
        entry.p_value = Some(f_distribution_p_value(
            entry.f_ratio,
            entry.degrees_of_freedom,
            error_df,
        ));
    }

    assign_contributions(&mut entries);

    let t = t_value(config.confidence_level, error_df);
    for (entry, group) in entries.iter_mut().zip(groups) {
        if entry.pooled {
            continue;
        }
        let replicates_per_level = n as f64 / group.levels.len() as f64;
        let margin = t * (2.0 * error_ms / replicates_per_level).sqrt();
        entry.confidence_interval = Some(ConfidenceInterval::around(
            0.0,
            margin,
            config.confidence_level,
        ));
    }

    Ok(ANOVAResult {
        entries,
        error: ErrorTerm {
            sum_of_squares: error_ss,
            degrees_of_freedom: error_df,
            mean_square: error_ms,
            pooled_factors,
        },
        total_ss,
        total_df,
    })
}

/// Pool factors with low F-ratios into error.
///
/// Each pass recomputes every F-ratio against the current error mean
/// square and pools only the weakest factor (lowest index on ties). Returns
/// the pooled factor names in pooling order.
fn pool_factors(
    entries: &mut [ANOVAEntry],
    error_ss: &mut f64,
    error_df: &mut usize,
    pooling_threshold: f64,
    min_unpooled: usize,
) -> Vec<String> {
    let mut pooled = Vec::new();

    loop {
        let unpooled_count = entries.iter().filter(|e| !e.pooled).count();
        if unpooled_count == 0 || unpooled_count <= min_unpooled {
            break;
        }

        let error_ms = error_mean_square(*error_ss, *error_df);

        let weakest = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.pooled)
            .map(|(idx, e)| (idx, e.mean_square / error_ms))
            .fold(None, |best: Option<(usize, f64)>, (idx, f)| match best {
                Some((_, best_f)) if f >= best_f => best,
                _ => Some((idx, f)),
            });

        let Some((idx, f_ratio)) = weakest else {
            break;
        };
        if f_ratio >= pooling_threshold {
            break;
        }

        let entry = &mut entries[idx];
        entry.pooled = true;
        *error_ss += entry.sum_of_squares;
        *error_df += entry.degrees_of_freedom;
        debug!(
            factor = %entry.factor,
            f_ratio,
            error_df = *error_df,
            "pooled factor into error"
        );
        pooled.push(entry.factor.clone());
    }

    pooled
}

/// Percent contribution over non-pooled factors, renormalized to sum to 100.
fn assign_contributions(entries: &mut [ANOVAEntry]) {
    let active_ss: f64 = entries
        .iter()
        .filter(|e| !e.pooled)
        .map(|e| e.sum_of_squares)
        .sum();

    if active_ss <= 0.0 {
        return;
    }

    for entry in entries.iter_mut().filter(|e| !e.pooled) {
        entry.contribution_percent = entry.sum_of_squares / active_ss * 100.0;
    }

    let total: f64 = entries.iter().map(|e| e.contribution_percent).sum();
    if total > 0.0 {
        for entry in entries.iter_mut() {
            entry.contribution_percent *= 100.0 / total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str, levels: Vec<Vec<f64>>) -> FactorResponses {
        FactorResponses {
            name: name.to_string(),
            levels,
        }
    }

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    #[test]
    fn test_anova_pools_near_constant_factor() {
        // L4 rows: (A1,B1)=10, (A1,B2)=12, (A2,B1)=22, (A2,B2)=20
        let responses = [10.0, 12.0, 22.0, 20.0];
        let groups = vec![
            group("A", vec![vec![10.0, 12.0], vec![22.0, 20.0]]),
            group("B", vec![vec![10.0, 22.0], vec![12.0, 20.0]]),
        ];

        let result =
            calculate_anova(&groups, &responses, mean(&responses), &ANOVAConfig::default())
                .unwrap();

        let a = &result.entries[0];
        let b = &result.entries[1];

        assert!(!a.pooled);
        assert!((a.sum_of_squares - 100.0).abs() < 1e-10);
        assert!((a.contribution_percent - 100.0).abs() < 1e-10);
        assert!(a.p_value.is_some());
        assert!(a.confidence_interval.is_some());

        assert!(b.pooled);
        assert_eq!(b.f_ratio, 0.0);
        assert_eq!(b.contribution_percent, 0.0);
        assert!(b.p_value.is_none());
        assert!(b.confidence_interval.is_none());

        assert_eq!(result.error.pooled_factors, vec!["B".to_string()]);
        assert_eq!(result.error.degrees_of_freedom, 2);
        assert!((result.error.sum_of_squares - 4.0).abs() < 1e-10);
        assert!((result.error.mean_square - 2.0).abs() < 1e-10);
        assert!((a.f_ratio - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_anova_confidence_interval_margin() {
        let responses = [10.0, 12.0, 22.0, 20.0];
        let groups = vec![
            group("A", vec![vec![10.0, 12.0], vec![22.0, 20.0]]),
            group("B", vec![vec![10.0, 22.0], vec![12.0, 20.0]]),
        ];
        let result =
            calculate_anova(&groups, &responses, mean(&responses), &ANOVAConfig::default())
                .unwrap();

        // error df 2 → t = 4.303; replicates per level = 4 / 2
        let ci = result.entries[0].confidence_interval.unwrap();
        let expected = 4.303 * (2.0 * 2.0 / 2.0_f64).sqrt();
        assert!((ci.upper - expected).abs() < 1e-9);
        assert!((ci.lower + expected).abs() < 1e-9);
        assert!((ci.level - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn test_anova_ss_additivity() {
        // L9-style grouping with three 3-level factors over 9 runs
        let responses = [85.0, 92.0, 78.0, 91.0, 88.0, 82.0, 89.0, 86.0, 94.0];
        let columns: [[usize; 9]; 3] = [
            [0, 0, 0, 1, 1, 1, 2, 2, 2],
            [0, 1, 2, 0, 1, 2, 0, 1, 2],
            [0, 1, 2, 1, 2, 0, 2, 0, 1],
        ];
        let groups: Vec<FactorResponses> = columns
            .iter()
            .enumerate()
            .map(|(f, column)| {
                let mut levels = vec![Vec::new(); 3];
                for (run, &level) in column.iter().enumerate() {
                    levels[level].push(responses[run]);
                }
                group(&format!("F{f}"), levels)
            })
            .collect();

        let result =
            calculate_anova(&groups, &responses, mean(&responses), &ANOVAConfig::default())
                .unwrap();

        let factor_ss: f64 = result.entries.iter().map(|e| e.sum_of_squares).sum();
        assert!((result.total_ss - factor_ss - result.error.sum_of_squares).abs() < 1e-8);
        assert_eq!(result.total_df, 8);

        let pooled_df: usize = result
            .entries
            .iter()
            .filter(|e| e.pooled)
            .map(|e| e.degrees_of_freedom)
            .sum();
        assert_eq!(result.error.degrees_of_freedom, 2 + pooled_df);
    }

    #[test]
    fn test_anova_insufficient_degrees_of_freedom() {
        // Three 2-level factors on 4 runs leave no error df
        let responses = [1.0, 2.0, 3.0, 4.0];
        let groups = vec![
            group("A", vec![vec![1.0, 2.0], vec![3.0, 4.0]]),
            group("B", vec![vec![1.0, 3.0], vec![2.0, 4.0]]),
            group("C", vec![vec![1.0, 4.0], vec![2.0, 3.0]]),
        ];

        let err = calculate_anova(&groups, &responses, 2.5, &ANOVAConfig::default()).unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientDegreesOfFreedom {
                results: 4,
                factor_df: 3,
                error_df: 0,
            }
        );
    }

    #[test]
    fn test_anova_no_results() {
        let groups = vec![group("A", vec![vec![], vec![]])];
        let err = calculate_anova(&groups, &[], 0.0, &ANOVAConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientDegreesOfFreedom { error_df: -2, .. }
        ));
    }

    #[test]
    fn test_anova_rejects_overflowing_sum_of_squares() {
        let responses = [1e200, -1e200, 3e200, 5.0];
        let groups = vec![
            group("A", vec![vec![1e200, -1e200], vec![3e200, 5.0]]),
            group("B", vec![vec![1e200, 3e200], vec![-1e200, 5.0]]),
        ];
        let grand_mean = mean(&responses);
        assert!(grand_mean.is_finite());

        let err = calculate_anova(&groups, &responses, grand_mean, &ANOVAConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParams { .. }));
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn test_anova_min_unpooled_stops_pooling() {
        // Flat responses: every factor has F = 0
        let responses = [5.0, 5.0, 5.0, 5.0, 5.0];
        let groups = vec![
            group("A", vec![vec![5.0, 5.0], vec![5.0, 5.0, 5.0]]),
            group("B", vec![vec![5.0, 5.0, 5.0], vec![5.0, 5.0]]),
        ];

        let config = ANOVAConfig {
            min_unpooled_factors: 1,
            ..Default::default()
        };
        let result = calculate_anova(&groups, &responses, 5.0, &config).unwrap();
        assert_eq!(result.error.pooled_factors, vec!["A".to_string()]);
        assert!(!result.entries[1].pooled);

        let result = calculate_anova(&groups, &responses, 5.0, &ANOVAConfig::default()).unwrap();
        assert_eq!(
            result.error.pooled_factors,
            vec!["A".to_string(), "B".to_string()]
        );
        assert!(result.entries.iter().all(|e| e.contribution_percent == 0.0));
        assert!((result.error.mean_square - ERROR_MS_FLOOR).abs() < 1e-20);
    }

    #[test]
    fn test_anova_zero_threshold_never_pools() {
        let responses = [10.0, 12.0, 22.0, 20.0];
        let groups = vec![
            group("A", vec![vec![10.0, 12.0], vec![22.0, 20.0]]),
            group("B", vec![vec![10.0, 22.0], vec![12.0, 20.0]]),
        ];
        let config = ANOVAConfig {
            pooling_threshold: 0.0,
            ..Default::default()
        };
        let result = calculate_anova(&groups, &responses, 16.0, &config).unwrap();

        assert!(result.error.pooled_factors.is_empty());
        let total: f64 = result.entries.iter().map(|e| e.contribution_percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!(result.entries[1].contribution_percent.abs() < 1e-12);
    }

    #[test]
    fn test_contribution_renormalized() {
        let mut entries: Vec<ANOVAEntry> = [1.0, 2.0, 4.0]
            .iter()
            .enumerate()
            .map(|(i, &ss)| ANOVAEntry {
                factor: format!("F{i}"),
                sum_of_squares: ss,
                degrees_of_freedom: 1,
                mean_square: ss,
                f_ratio: 0.0,
                p_value: None,
                contribution_percent: 0.0,
                pooled: i == 0,
                confidence_interval: None,
            })
            .collect();

        assign_contributions(&mut entries);
        assert_eq!(entries[0].contribution_percent, 0.0);
        assert!((entries[1].contribution_percent - 100.0 / 3.0).abs() < 1e-10);
        assert!((entries[2].contribution_percent - 200.0 / 3.0).abs() < 1e-10);
    }
}
