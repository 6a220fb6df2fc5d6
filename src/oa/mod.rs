//! Orthogonal array core types.
//!
//! ## Overview
//!
//! - [`OA`]: an immutable orthogonal array matrix
//! - [`OAParams`]: the shape of an array (runs, per-column levels, strength)
//!
//! Cells are stored 0-indexed: column `j` holds values in `0..levels[j]`.
//! Standard Taguchi tables are written 1-indexed; [`OA::from_one_indexed`]
//! performs the conversion.

mod verify;

pub use verify::{verify_strength, BalanceReport, VerificationIssue, VerificationResult};

use ndarray::{Array2, ArrayView1};
use std::fmt;

use crate::error::{Error, Result};

/// Parameters describing an orthogonal array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OAParams {
    /// Number of runs (rows).
    pub runs: usize,
    /// Number of levels for each column.
    pub levels: Vec<u32>,
    /// Strength (orthogonality degree).
    pub strength: u32,
}

impl OAParams {
    /// Create parameters for an array with the given per-column levels.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no columns, any column has fewer than
    /// two levels, or the strength exceeds the column count.
    pub fn new(runs: usize, levels: Vec<u32>, strength: u32) -> Result<Self> {
        if levels.is_empty() {
            return Err(Error::invalid_params("array must have at least one column"));
        }

        if let Some(col) = levels.iter().position(|&s| s < 2) {
            return Err(Error::invalid_params(format!(
                "column {} must have at least 2 levels, got {}",
                col, levels[col]
            )));
        }

        if strength as usize > levels.len() {
            return Err(Error::invalid_params(format!(
                "strength {} cannot exceed columns {}",
                strength,
                levels.len()
            )));
        }

        Ok(Self {
            runs,
            levels,
            strength,
        })
    }

    /// Number of columns.
    #[must_use]
    pub fn factors(&self) -> usize {
        self.levels.len()
    }

    /// Check if every column has the same number of levels.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.levels.windows(2).all(|w| w[0] == w[1])
    }
}

impl fmt::Display for OAParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_symmetric() {
            return write!(
                f,
                "OA({}, {}, {}, {})",
                self.runs,
                self.factors(),
                self.levels[0],
                self.strength
            );
        }

        // Mixed arrays are written as runs-by-level-groups, e.g. OA(18, 2^1 3^7, 2)
        let mut groups: Vec<(u32, usize)> = Vec::new();
        for &s in &self.levels {
            match groups.iter_mut().find(|(level, _)| *level == s) {
                Some((_, count)) => *count += 1,
                None => groups.push((s, 1)),
            }
        }
        groups.sort_by_key(|&(s, _)| s);

        let levels_str: Vec<String> = groups
            .into_iter()
            .map(|(s, k)| format!("{s}^{k}"))
            .collect();

        write!(
            f,
            "OA({}, {}, {})",
            self.runs,
            levels_str.join(" "),
            self.strength
        )
    }
}

/// An orthogonal array.
///
/// The data is a `runs × factors` matrix of 0-indexed level numbers.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OA {
    data: Array2<u32>,
    params: OAParams,
}

impl OA {
    /// Create an array from 0-indexed data, checking shape and cell range.
    ///
    /// # Errors
    ///
    /// Returns an error if the data shape disagrees with the parameters or
    /// a cell is outside its column's level range.
    pub fn try_new(data: Array2<u32>, params: OAParams) -> Result<Self> {
        if data.nrows() != params.runs || data.ncols() != params.factors() {
            return Err(Error::invalid_params(format!(
                "data shape {}x{} does not match {}",
                data.nrows(),
                data.ncols(),
                params
            )));
        }

        for ((row, col), &value) in data.indexed_iter() {
            if value >= params.levels[col] {
                return Err(Error::invalid_params(format!(
                    "cell ({row}, {col}) holds level {value}, column has {} levels",
                    params.levels[col]
                )));
            }
        }

        Ok(Self { data, params })
    }

    /// Build an array from a 1-indexed table as printed in the standard
    /// Taguchi tables. Each column's level count is its largest cell value.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is empty, ragged, or contains a zero.
    pub fn from_one_indexed<R: AsRef<[u32]>>(table: &[R], strength: u32) -> Result<Self> {
        let runs = table.len();
        let cols = table.first().map_or(0, |r| r.as_ref().len());
        if runs == 0 || cols == 0 {
            return Err(Error::invalid_params("table must have at least one cell"));
        }

        let mut cells = Vec::with_capacity(runs * cols);
        let mut levels = vec![0u32; cols];
        for (row_idx, row) in table.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::invalid_params(format!(
                    "row {} has {} cells, expected {}",
                    row_idx,
                    row.len(),
                    cols
                )));
            }
            for (col, &cell) in row.iter().enumerate() {
                if cell == 0 {
                    return Err(Error::invalid_params(format!(
                        "row {row_idx} column {col} is 0; table cells are 1-indexed"
                    )));
                }
                levels[col] = levels[col].max(cell);
                cells.push(cell - 1);
            }
        }

        let data = Array2::from_shape_vec((runs, cols), cells)
            .map_err(|e| Error::invalid_params(e.to_string()))?;
        Self::try_new(data, OAParams::new(runs, levels, strength)?)
    }

    /// Number of runs (rows).
    #[must_use]
    pub fn runs(&self) -> usize {
        self.params.runs
    }

    /// Number of columns.
    #[must_use]
    pub fn factors(&self) -> usize {
        self.params.factors()
    }

    /// Level counts for all columns.
    #[must_use]
    pub fn levels_vec(&self) -> &[u32] {
        &self.params.levels
    }

    /// Level count of one column.
    #[must_use]
    pub fn levels_for(&self, col: usize) -> u32 {
        self.params.levels[col]
    }

    /// Largest level count across all columns.
    #[must_use]
    pub fn max_levels(&self) -> u32 {
        self.params.levels.iter().copied().max().unwrap_or(0)
    }

    /// Strength of the array.
    #[must_use]
    pub fn strength(&self) -> u32 {
        self.params.strength
    }

    /// The array parameters.
    #[must_use]
    pub fn params(&self) -> &OAParams {
        &self.params
    }

    /// The underlying 0-indexed matrix.
    #[must_use]
    pub fn data(&self) -> &Array2<u32> {
        &self.data
    }

    /// The 0-indexed level at a position.
    ///
    /// # Panics
    ///
    /// Panics if the indices are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.data[[row, col]]
    }

    /// A single row.
    #[must_use]
    pub fn row(&self, idx: usize) -> ArrayView1<'_, u32> {
        self.data.row(idx)
    }

    /// A single column.
    #[must_use]
    pub fn column(&self, idx: usize) -> ArrayView1<'_, u32> {
        self.data.column(idx)
    }

    /// Iterate over rows in run order.
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, u32>> {
        self.data.rows().into_iter()
    }

    /// Verify that this array has its declared strength.
    #[must_use]
    pub fn verify(&self) -> VerificationResult {
        verify_strength(self, self.strength())
    }
}

impl fmt::Debug for OA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} with data {:?}", self.params, self.data)
    }
}

impl fmt::Display for OA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.params)?;
        for row in self.data.rows() {
            // Printed 1-indexed, the way the tables are published
            let row_str: Vec<String> = row.iter().map(|v| (v + 1).to_string()).collect();
            writeln!(f, "  {}", row_str.join(" "))?;
        }
        Ok(())
    }
}
