//! Main effects calculation for DOE analysis.
//!
//! Calculates the effect of each factor level on the response variable.

use super::types::MainEffect;
use super::FactorResponses;

/// Mean of a level group, or `fallback` when the group is empty.
pub(crate) fn level_mean(responses: &[f64], fallback: f64) -> f64 {
    if responses.is_empty() {
        fallback
    } else {
        responses.iter().sum::<f64>() / responses.len() as f64
    }
}

/// Calculate main effects for each factor.
///
/// Main effects measure how changing a factor level moves the response
/// relative to the grand mean. Factors are ranked by their range.
///
/// # Algorithm
/// For each factor:
/// 1. Mean response at each level (grand mean for an empty level)
/// 2. Effect = level_mean - grand_mean
/// 3. Range = max(level_means) - min(level_means)
///
/// Then rank factors by range, descending; equal ranges keep factor order.
pub(crate) fn calculate_main_effects(
    groups: &[FactorResponses],
    grand_mean: f64,
) -> Vec<MainEffect> {
    let mut effects: Vec<MainEffect> = groups
        .iter()
        .map(|group| {
            let level_means: Vec<f64> = group
                .levels
                .iter()
                .map(|responses| level_mean(responses, grand_mean))
                .collect();

            let level_effects = level_means.iter().map(|m| m - grand_mean).collect();
            let level_counts = group.levels.iter().map(Vec::len).collect();

            let min_mean = level_means.iter().copied().fold(f64::INFINITY, f64::min);
            let max_mean = level_means
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);

            MainEffect {
                factor: group.name.clone(),
                level_means,
                level_effects,
                level_counts,
                range: max_mean - min_mean,
                rank: 0,
            }
        })
        .collect();

    // Stable sort keeps factor order among equal ranges
    let mut order: Vec<usize> = (0..effects.len()).collect();
    order.sort_by(|&a, &b| {
        effects[b]
            .range
            .partial_cmp(&effects[a].range)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (rank, idx) in order.into_iter().enumerate() {
        effects[idx].rank = rank + 1;
    }

    effects
}
