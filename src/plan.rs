//! Experiment plans and measured results.

use crate::catalogue::ArrayType;
use crate::error::{Error, Result};

/// One experiment: a level value for each factor, in factor order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Experiment<V> {
    assignments: Vec<(String, V)>,
}

impl<V> Experiment<V> {
    /// An experiment with no assignments.
    #[must_use]
    pub fn new() -> Self {
        Self {
            assignments: Vec::new(),
        }
    }

    /// Add or replace the level recorded for a factor.
    #[must_use]
    pub fn with(mut self, factor: impl Into<String>, value: V) -> Self {
        self.set(factor.into(), value);
        self
    }

    fn set(&mut self, factor: String, value: V) {
        match self.assignments.iter_mut().find(|(name, _)| *name == factor) {
            Some((_, slot)) => *slot = value,
            None => self.assignments.push((factor, value)),
        }
    }

    /// The level recorded for a factor.
    #[must_use]
    pub fn get(&self, factor: &str) -> Option<&V> {
        self.assignments
            .iter()
            .find(|(name, _)| name == factor)
            .map(|(_, value)| value)
    }

    /// Iterate over `(factor, level)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.assignments.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of assigned factors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// True if no factor is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl<V> Default for Experiment<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Into<String>, V> FromIterator<(S, V)> for Experiment<V> {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut experiment = Self::new();
        for (factor, value) in iter {
            experiment.set(factor.into(), value);
        }
        experiment
    }
}

/// A measured response for one experiment.
///
/// Several results may share the same factor assignment (replicates).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentResult<V> {
    /// The factor levels the response was measured at.
    pub factors: Experiment<V>,
    /// The measured response.
    pub response: f64,
}

impl<V> ExperimentResult<V> {
    /// Pair an experiment with its measured response.
    #[must_use]
    pub fn new(factors: Experiment<V>, response: f64) -> Self {
        Self { factors, response }
    }
}

/// The ordered experiments generated from one orthogonal array.
///
/// Experiment `i` corresponds to row `i` of the array.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentPlan<V> {
    array: ArrayType,
    experiments: Vec<Experiment<V>>,
}

impl<V> ExperimentPlan<V> {
    pub(crate) fn new(array: ArrayType, experiments: Vec<Experiment<V>>) -> Self {
        Self { array, experiments }
    }

    /// The array the plan was generated from.
    #[must_use]
    pub fn array(&self) -> ArrayType {
        self.array
    }

    /// The experiments in run order.
    #[must_use]
    pub fn experiments(&self) -> &[Experiment<V>] {
        &self.experiments
    }

    /// Number of experiments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    /// True if the plan has no experiments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    /// Experiment for a run.
    #[must_use]
    pub fn get(&self, run: usize) -> Option<&Experiment<V>> {
        self.experiments.get(run)
    }

    /// Iterate over experiments in run order.
    pub fn iter(&self) -> std::slice::Iter<'_, Experiment<V>> {
        self.experiments.iter()
    }
}

impl<V: Clone> ExperimentPlan<V> {
    /// Attach measured responses to the plan.
    ///
    /// `responses` is organized as runs × replicates: one inner vector per
    /// experiment, each holding that run's replicate measurements.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of runs doesn't match the plan or a
    /// run has no measurements.
    pub fn with_responses(&self, responses: &[Vec<f64>]) -> Result<Vec<ExperimentResult<V>>> {
        if responses.len() != self.experiments.len() {
            return Err(Error::invalid_params(format!(
                "response data length ({}) doesn't match plan runs ({})",
                responses.len(),
                self.experiments.len()
            )));
        }

        if let Some(run) = responses.iter().position(Vec::is_empty) {
            return Err(Error::invalid_params(format!(
                "response data for run {} is empty",
                run + 1
            )));
        }

        Ok(self
            .experiments
            .iter()
            .zip(responses)
            .flat_map(|(experiment, replicates)| {
                replicates
                    .iter()
                    .map(|&y| ExperimentResult::new(experiment.clone(), y))
            })
            .collect())
    }
}

impl<'a, V> IntoIterator for &'a ExperimentPlan<V> {
    type Item = &'a Experiment<V>;
    type IntoIter = std::slice::Iter<'a, Experiment<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.experiments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experiment_lookup() {
        let e = Experiment::new().with("A", 1).with("B", 2);
        assert_eq!(e.get("A"), Some(&1));
        assert_eq!(e.get("C"), None);
        assert_eq!(e.len(), 2);

        let e = e.with("A", 5);
        assert_eq!(e.get("A"), Some(&5));
        assert_eq!(e.len(), 2);
    }

    #[test]
    fn test_experiment_from_iter_keeps_order() {
        let e: Experiment<&str> = [("Time", "30"), ("Material", "Steel")].into_iter().collect();
        let names: Vec<&str> = e.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Time", "Material"]);
    }

    #[test]
    fn test_with_responses() {
        let plan = ExperimentPlan::new(
            ArrayType::L4,
            (1..=4).map(|i| Experiment::new().with("A", i)).collect(),
        );

        let results = plan
            .with_responses(&[vec![1.0, 2.0], vec![3.0], vec![4.0], vec![5.0]])
            .unwrap();
        assert_eq!(results.len(), 5);
        assert_eq!(results[1].factors.get("A"), Some(&1));
        assert_eq!(results[2].factors.get("A"), Some(&2));

        assert!(plan.with_responses(&[vec![1.0]]).is_err());
        assert!(plan
            .with_responses(&[vec![1.0], vec![], vec![1.0], vec![1.0]])
            .is_err());
    }
}
