//! Orthogonal array verification.
//!
//! Checks the balance property of an array: for strength t, every selection
//! of t columns contains each level tuple equally often. The analysis engine
//! never calls this at runtime; it exists to check catalogue data.

use std::collections::HashMap;

use super::OA;

/// Result of verifying an orthogonal array.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    /// Whether the array has at least the claimed strength.
    pub is_valid: bool,
    /// The claimed strength.
    pub claimed_strength: u32,
    /// Highest t (up to the claimed strength) for which the array is balanced.
    pub actual_strength: u32,
    /// Details about any issues found.
    pub issues: Vec<VerificationIssue>,
}

/// A specific issue found during verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationIssue {
    /// Run count is not a multiple of the product of the columns' levels.
    IndivisibleRuns {
        /// The columns examined.
        columns: Vec<usize>,
        /// Product of their level counts.
        tuples: usize,
    },
    /// Some level tuple appears more or less often than expected.
    ImbalancedSubarray {
        /// The columns examined.
        columns: Vec<usize>,
        /// Expected occurrences per tuple.
        expected_count: usize,
        /// Observed occurrences per tuple.
        tuple_counts: HashMap<Vec<u32>, usize>,
    },
}

/// Per-column level balance of an array.
#[derive(Debug, Clone)]
pub struct BalanceReport {
    /// Whether each column uses every level equally often.
    pub factor_balance: Vec<bool>,
    /// Occurrences of each level, per column.
    pub level_counts: Vec<Vec<usize>>,
}

impl BalanceReport {
    /// True if every column is balanced.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.factor_balance.iter().all(|&b| b)
    }
}

impl OA {
    /// Count how often each level appears in each column.
    #[must_use]
    pub fn balance_report(&self) -> BalanceReport {
        let mut factor_balance = Vec::with_capacity(self.factors());
        let mut level_counts = Vec::with_capacity(self.factors());

        for col in 0..self.factors() {
            let mut counts = vec![0usize; self.levels_for(col) as usize];
            for &level in self.column(col) {
                counts[level as usize] += 1;
            }
            let balanced = counts.windows(2).all(|w| w[0] == w[1]);
            factor_balance.push(balanced);
            level_counts.push(counts);
        }

        BalanceReport {
            factor_balance,
            level_counts,
        }
    }
}

/// Verify that an orthogonal array has the claimed strength.
///
/// Strengths are checked from 1 upward; the first failing t stops the scan.
/// Time complexity is O(N · C(k, t) · t).
#[must_use]
pub fn verify_strength(oa: &OA, strength: u32) -> VerificationResult {
    let mut issues = Vec::new();
    let levels = oa.levels_vec();
    let mut verified_strength = 0;

    for t in 1..=strength.min(oa.factors() as u32) {
        let mut balanced_at_t = true;

        for columns in combinations(oa.factors(), t as usize) {
            let tuples: usize = columns.iter().map(|&c| levels[c] as usize).product();
            if oa.runs() % tuples != 0 {
                balanced_at_t = false;
                issues.push(VerificationIssue::IndivisibleRuns { columns, tuples });
                continue;
            }

            let expected_count = oa.runs() / tuples;
            let mut tuple_counts: HashMap<Vec<u32>, usize> = HashMap::new();
            for row in oa.rows() {
                let tuple: Vec<u32> = columns.iter().map(|&c| row[c]).collect();
                *tuple_counts.entry(tuple).or_insert(0) += 1;
            }

            let complete = tuple_counts.len() == tuples;
            if !complete || tuple_counts.values().any(|&c| c != expected_count) {
                balanced_at_t = false;
                issues.push(VerificationIssue::ImbalancedSubarray {
                    columns,
                    expected_count,
                    tuple_counts,
                });
            }
        }

        if !balanced_at_t {
            break;
        }
        verified_strength = t;
    }

    VerificationResult {
        is_valid: issues.is_empty() && verified_strength >= strength,
        claimed_strength: strength,
        actual_strength: verified_strength,
        issues,
    }
}

/// All k-subsets of `0..n` in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    if k > n {
        return result;
    }

    let mut current: Vec<usize> = (0..k).collect();
    loop {
        result.push(current.clone());

        // Rightmost position that can still advance
        let Some(i) = (0..k).rev().find(|&i| current[i] < n - k + i) else {
            return result;
        };
        current[i] += 1;
        for j in i + 1..k {
            current[j] = current[j - 1] + 1;
        }
    }
}
