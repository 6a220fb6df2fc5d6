//! Taguchi designs: a catalogued array, the factors placed on it, and the
//! analysis configuration.
//!
//! A [`TaguchiDesign`] is validated once at construction and is read-only
//! afterwards. It generates the experiment plan and analyzes measured
//! results against it.

use tracing::{debug, warn};

use crate::catalogue::ArrayType;
use crate::doe::{self, AnalysisConfig, DOEAnalysis};
use crate::error::{Error, Result};
use crate::factor::Factor;
use crate::oa::OA;
use crate::plan::{Experiment, ExperimentPlan, ExperimentResult};

/// Check that a factor set fits an array.
///
/// Every factor needs at least two levels, the factor count must not exceed
/// the array's column count, and no factor may have more levels than the
/// largest level value in the array.
///
/// # Errors
///
/// Returns [`Error::TooFewLevels`], [`Error::TooManyFactors`] or
/// [`Error::TooManyLevels`].
pub fn validate_capacity<V>(array: ArrayType, factors: &[Factor<V>]) -> Result<()> {
    for factor in factors {
        factor.check_levels()?;
    }

    if factors.len() > array.max_factors() {
        return Err(Error::TooManyFactors {
            factors: factors.len(),
            max: array.max_factors(),
            array: array.name(),
        });
    }

    let max_levels = array.max_levels();
    if let Some(factor) = factors.iter().find(|f| f.num_levels() > max_levels) {
        return Err(Error::TooManyLevels {
            factor: factor.name().to_string(),
            levels: factor.num_levels(),
            max: max_levels,
            array: array.name(),
        });
    }

    Ok(())
}

/// A validated Taguchi experiment design.
///
/// # Example
///
/// ```
/// use taguchi_doe::{AnalysisConfig, ArrayType, Factor, TaguchiDesign};
///
/// let design = TaguchiDesign::new(
///     ArrayType::L4,
///     vec![
///         Factor::new("Material", vec!["Steel", "Aluminum"]).unwrap(),
///         Factor::new("Temperature", vec!["100", "150"]).unwrap(),
///     ],
///     AnalysisConfig::default(),
/// )
/// .unwrap();
///
/// let plan = design.generate().unwrap();
/// assert_eq!(plan.len(), 4);
/// assert_eq!(plan.experiments()[0].get("Material"), Some(&"Steel"));
/// ```
#[derive(Debug, Clone)]
pub struct TaguchiDesign<V> {
    array: ArrayType,
    oa: OA,
    factors: Vec<Factor<V>>,
    config: AnalysisConfig,
}

impl<V> TaguchiDesign<V> {
    /// Create a design, validating the factors against the array and the
    /// analysis configuration.
    ///
    /// # Errors
    ///
    /// Returns a capacity error from [`validate_capacity`],
    /// [`Error::DuplicateFactor`] if two factors share a name, or a
    /// configuration error from [`AnalysisConfig::validate`].
    pub fn new(array: ArrayType, factors: Vec<Factor<V>>, config: AnalysisConfig) -> Result<Self> {
        validate_capacity(array, &factors)?;

        for (i, factor) in factors.iter().enumerate() {
            if factors[..i].iter().any(|f| f.name() == factor.name()) {
                return Err(Error::DuplicateFactor(factor.name().to_string()));
            }
        }

        config.validate()?;
        let oa = array.oa()?;

        for (col, factor) in factors.iter().enumerate() {
            let column_levels = oa.levels_for(col) as usize;
            if factor.num_levels() > column_levels {
                warn!(
                    factor = factor.name(),
                    levels = factor.num_levels(),
                    column_levels,
                    "factor has more levels than its column; some levels will never be run"
                );
            }
        }

        debug!(
            array = %array,
            factors = factors.len(),
            sn_ratio_type = %config.sn_ratio_type,
            "created design"
        );

        Ok(Self {
            array,
            oa,
            factors,
            config,
        })
    }

    /// The catalogued array.
    #[must_use]
    pub fn array(&self) -> ArrayType {
        self.array
    }

    /// The orthogonal array backing the plan.
    #[must_use]
    pub fn oa(&self) -> &OA {
        &self.oa
    }

    /// Factors in column order.
    #[must_use]
    pub fn factors(&self) -> &[Factor<V>] {
        &self.factors
    }

    /// Analysis configuration.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}

impl<V: Clone> TaguchiDesign<V> {
    /// Generate the experiment plan: one experiment per array row.
    ///
    /// Factor `j` takes column `j`. A cell selects the factor level with the
    /// same index; a factor with fewer levels than its column wraps around
    /// (dummy-level assignment).
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyConfiguration`] if the design has no factors.
    pub fn generate(&self) -> Result<ExperimentPlan<V>> {
        if self.factors.is_empty() {
            return Err(Error::EmptyConfiguration);
        }

        let experiments = self
            .oa
            .rows()
            .map(|row| {
                self.factors
                    .iter()
                    .zip(row.iter())
                    .map(|(factor, &cell)| {
                        let idx = cell as usize % factor.num_levels();
                        (factor.name(), factor.levels()[idx].clone())
                    })
                    .collect::<Experiment<V>>()
            })
            .collect();

        Ok(ExperimentPlan::new(self.array, experiments))
    }
}

impl<V: PartialEq> TaguchiDesign<V> {
    /// Analyze measured results with the design's configuration.
    ///
    /// # Errors
    ///
    /// See [`doe::analyze`].
    pub fn analyze(&self, results: &[ExperimentResult<V>]) -> Result<DOEAnalysis> {
        doe::analyze(&self.factors, results, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doe::SNRatioType;

    fn two_level(name: &str) -> Factor<i32> {
        Factor::new(name, vec![1, 2]).unwrap()
    }

    #[test]
    fn test_too_many_factors() {
        let factors = vec![two_level("A"), two_level("B"), two_level("C"), two_level("D")];
        let err = TaguchiDesign::new(ArrayType::L4, factors, AnalysisConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::TooManyFactors { max: 3, .. }));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_too_many_levels() {
        let factors = vec![Factor::new("A", vec![1, 2, 3]).unwrap()];
        let err = TaguchiDesign::new(ArrayType::L4, factors, AnalysisConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::TooManyLevels { max: 2, .. }));
        assert!(err.to_string().contains('2'));

        let factors = vec![Factor::new("A", vec![1, 2, 3, 4]).unwrap()];
        assert!(validate_capacity(ArrayType::L18, &factors).is_err());
    }

    #[test]
    fn test_duplicate_factor() {
        let err = TaguchiDesign::new(
            ArrayType::L8,
            vec![two_level("A"), two_level("A")],
            AnalysisConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, Error::DuplicateFactor("A".into()));
    }

    #[test]
    fn test_missing_target_at_construction() {
        let config = AnalysisConfig {
            sn_ratio_type: SNRatioType::NominalIsBest,
            ..Default::default()
        };
        let err = TaguchiDesign::new(ArrayType::L4, vec![two_level("A")], config).unwrap_err();
        assert_eq!(err, Error::MissingTarget);
    }

    #[test]
    fn test_empty_design_cannot_generate() {
        let design =
            TaguchiDesign::<i32>::new(ArrayType::L4, vec![], AnalysisConfig::default()).unwrap();
        assert_eq!(design.generate().unwrap_err(), Error::EmptyConfiguration);
    }

    #[test]
    fn test_generate_l4() {
        let design = TaguchiDesign::new(
            ArrayType::L4,
            vec![
                Factor::new("Material", vec!["Steel", "Aluminum"]).unwrap(),
                Factor::new("Temperature", vec!["100", "150"]).unwrap(),
                Factor::new("Time", vec!["30", "60"]).unwrap(),
            ],
            AnalysisConfig::default(),
        )
        .unwrap();

        let plan = design.generate().unwrap();
        assert_eq!(plan.len(), 4);
        assert_eq!(plan.array(), ArrayType::L4);

        let first = plan.get(0).unwrap();
        assert_eq!(first.get("Material"), Some(&"Steel"));
        assert_eq!(first.get("Temperature"), Some(&"100"));
        assert_eq!(first.get("Time"), Some(&"30"));

        // Row 4 of L4 is [2, 2, 1]
        let last = plan.get(3).unwrap();
        assert_eq!(last.get("Material"), Some(&"Aluminum"));
        assert_eq!(last.get("Temperature"), Some(&"150"));
        assert_eq!(last.get("Time"), Some(&"30"));
    }

    #[test]
    fn test_plan_shape_for_every_array() {
        for array in ArrayType::ALL {
            let factors: Vec<Factor<u32>> = (0..array.max_factors())
                .map(|i| Factor::new(format!("F{i}"), vec![1, 2]).unwrap())
                .collect();
            let design = TaguchiDesign::new(array, factors, AnalysisConfig::default()).unwrap();
            let plan = design.generate().unwrap();

            assert_eq!(plan.len(), array.runs(), "{array}");
            for experiment in &plan {
                assert_eq!(experiment.len(), array.max_factors());
                for (name, value) in experiment.iter() {
                    assert!(name.starts_with('F'));
                    assert!(*value == 1 || *value == 2);
                }
            }
        }
    }

    #[test]
    fn test_plan_follows_table_rows() {
        let factors: Vec<Factor<u32>> = ["A", "B", "C", "D"]
            .iter()
            .map(|name| Factor::new(*name, vec![10, 20, 30]).unwrap())
            .collect();
        let design = TaguchiDesign::new(ArrayType::L9, factors, AnalysisConfig::default()).unwrap();
        let plan = design.generate().unwrap();

        for (experiment, row) in plan.iter().zip(ArrayType::L9.table()) {
            for (name, &cell) in ["A", "B", "C", "D"].iter().zip(row.iter()) {
                assert_eq!(experiment.get(name), Some(&(cell * 10)));
            }
        }
    }

    #[test]
    fn test_l18_two_level_factor_in_three_level_column() {
        let factors = vec![
            Factor::new("Coating", vec!["none", "hard"]).unwrap(),
            Factor::new("Cure", vec!["short", "long"]).unwrap(),
        ];
        let design =
            TaguchiDesign::new(ArrayType::L18, factors, AnalysisConfig::default()).unwrap();
        let plan = design.generate().unwrap();

        // Column 2 levels 1, 2, 3 map to short, long, short
        let cure: Vec<&str> = plan.iter().map(|e| *e.get("Cure").unwrap()).collect();
        assert_eq!(
            &cure[..9],
            &["short", "short", "short", "long", "long", "long", "short", "short", "short"]
        );

        let short = cure.iter().filter(|c| **c == "short").count();
        assert_eq!(short, 12);
    }

    #[test]
    fn test_l9_mock_responses() {
        let factors: Vec<Factor<i32>> = ["A", "B", "C"]
            .iter()
            .map(|name| Factor::new(*name, vec![1, 2, 3]).unwrap())
            .collect();
        let design = TaguchiDesign::new(ArrayType::L9, factors, AnalysisConfig::default()).unwrap();
        let plan = design.generate().unwrap();

        // Response grows with A and is nearly flat in B and C
        let responses: Vec<Vec<f64>> = plan
            .iter()
            .enumerate()
            .map(|(run, e)| {
                let a = f64::from(*e.get("A").unwrap());
                vec![10.0 * a + 0.01 * run as f64]
            })
            .collect();
        let results = plan.with_responses(&responses).unwrap();
        let analysis = design.analyze(&results).unwrap();

        assert_eq!(analysis.optimal_level("A"), Some(2));
        assert_eq!(analysis.main_effect("A").unwrap().rank, 1);
        assert!(!analysis.anova_entry("A").unwrap().pooled);
        assert!(analysis.anova_entry("A").unwrap().contribution_percent > 99.0);
        assert!(analysis.anova.error.degrees_of_freedom >= 2);
    }

    #[test]
    fn test_design_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TaguchiDesign<String>>();
    }
}
