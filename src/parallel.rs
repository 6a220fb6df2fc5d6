//! Parallel analysis support.
//!
//! This module analyzes several independent response sets measured on the
//! same plan (for example, several quality characteristics) across the
//! Rayon thread pool. Enable with the `parallel` feature flag.
//!
//! # Usage
//!
//! ```
//! use taguchi_doe::{ArrayType, DesignBuilder};
//!
//! let design = DesignBuilder::new()
//!     .array(ArrayType::L8)
//!     .factor("A", vec![1, 2])
//!     .factor("B", vec![1, 2])
//!     .build()
//!     .unwrap();
//! let plan = design.generate().unwrap();
//!
//! let strength = plan.with_responses(&[
//!     vec![10.0], vec![12.0], vec![20.0], vec![22.0],
//!     vec![11.0], vec![13.0], vec![21.0], vec![23.0],
//! ]).unwrap();
//! let finish = plan.with_responses(&[
//!     vec![3.0], vec![1.0], vec![3.5], vec![1.2],
//!     vec![2.9], vec![1.1], vec![3.4], vec![1.0],
//! ]).unwrap();
//!
//! let analyses = design.par_analyze(&[strength, finish]).unwrap();
//! assert_eq!(analyses.len(), 2);
//! ```
//!
//! # Performance
//!
//! A single analysis is cheap; parallelism pays off with many response
//! sets or large replicate counts.

use rayon::prelude::*;

use crate::design::TaguchiDesign;
use crate::doe::DOEAnalysis;
use crate::error::Result;
use crate::plan::ExperimentResult;

impl<V: PartialEq + Sync> TaguchiDesign<V> {
    /// Analyze independent response sets in parallel.
    ///
    /// Output order matches input order and every element equals what
    /// [`TaguchiDesign::analyze`] returns for the same set.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing set, in input order.
    pub fn par_analyze(
        &self,
        response_sets: &[Vec<ExperimentResult<V>>],
    ) -> Result<Vec<DOEAnalysis>> {
        response_sets
            .par_iter()
            .map(|results| self.analyze(results))
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }
}
