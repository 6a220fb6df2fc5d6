//! # Taguchi DOE
//!
//! Taguchi robust parameter design: experiment plans from standard
//! orthogonal arrays and statistical analysis of the measured responses.
//!
//! ## Overview
//!
//! Given controllable factors with discrete levels, this library:
//! - places them on a catalogued orthogonal array (L4, L8, L9, L16, L18)
//!   and generates the minimal experiment plan;
//! - analyzes measured responses with S/N ratios, main effects and ANOVA
//!   with adaptive pooling of insignificant factors;
//! - reports contribution percentages, effect confidence intervals and the
//!   optimal level of every factor.
//!
//! ## Quick Start
//!
//! ```rust
//! use taguchi_doe::{ArrayType, DesignBuilder, SNRatioType};
//!
//! let design = DesignBuilder::new()
//!     .array(ArrayType::L9)
//!     .factor("Temperature", vec![150, 175, 200])
//!     .factor("Pressure", vec![10, 20, 30])
//!     .factor("Speed", vec![1000, 1200, 1500])
//!     .sn_ratio_type(SNRatioType::LargerIsBetter)
//!     .build()
//!     .unwrap();
//!
//! let plan = design.generate().unwrap();
//! assert_eq!(plan.len(), 9);
//!
//! // One measurement per run
//! let responses: Vec<Vec<f64>> = plan
//!     .iter()
//!     .map(|e| vec![f64::from(*e.get("Temperature").unwrap()) / 10.0])
//!     .collect();
//! let results = plan.with_responses(&responses).unwrap();
//!
//! let analysis = design.analyze(&results).unwrap();
//! assert_eq!(analysis.optimal_level("Temperature"), Some(2));
//! ```
//!
//! ## Notation
//!
//! An orthogonal array is denoted as OA(N, k, s, t) where:
//! - **N**: Number of runs (rows)
//! - **k**: Number of factors (columns)
//! - **s**: Number of levels per column
//! - **t**: Strength (every t-column subarray contains all tuples equally)
//!
//! ## Features
//!
//! - `serde`: Serialization of configuration, plans and analysis results
//! - `parallel`: Analyze several response sets at once using rayon

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod builder;
pub mod catalogue;
pub mod design;
pub mod doe;
pub mod error;
pub mod factor;
pub mod oa;
pub mod plan;

#[cfg(feature = "parallel")]
pub mod parallel;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::builder::{select_array, DesignBuilder};
    pub use crate::catalogue::{get_by_name, list_standard_arrays, ArrayType};
    pub use crate::design::{validate_capacity, TaguchiDesign};
    pub use crate::doe::{
        analyze, ANOVAEntry, ANOVAResult, AnalysisConfig, ConfidenceInterval, DOEAnalysis,
        ErrorTerm, MainEffect, OptimalSettings, SNRatioEffect, SNRatioType,
    };
    pub use crate::error::{Error, Result};
    pub use crate::factor::Factor;
    pub use crate::oa::{verify_strength, BalanceReport, OAParams, OA};
    pub use crate::plan::{Experiment, ExperimentPlan, ExperimentResult};
}

// Re-export commonly used items at crate root
pub use builder::DesignBuilder;
pub use catalogue::{get_by_name as get_standard_oa, ArrayType};
pub use design::TaguchiDesign;
pub use doe::{AnalysisConfig, DOEAnalysis, SNRatioType};
pub use error::{Error, Result};
pub use factor::Factor;
pub use plan::{Experiment, ExperimentPlan, ExperimentResult};
