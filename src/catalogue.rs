//! Catalogue of standard Taguchi orthogonal arrays.
//!
//! The arrays are stored exactly as they appear in the standard Taguchi
//! tables (1-indexed, fixed row order). Consumers rely on that row order
//! for reproducible plans, so the tables must never be regenerated or
//! reordered.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::oa::OA;

const L4: &[&[u32]] = &[
    &[1, 1, 1],
    &[1, 2, 2],
    &[2, 1, 2],
    &[2, 2, 1],
];

const L8: &[&[u32]] = &[
    &[1, 1, 1, 1, 1, 1, 1],
    &[1, 1, 1, 2, 2, 2, 2],
    &[1, 2, 2, 1, 1, 2, 2],
    &[1, 2, 2, 2, 2, 1, 1],
    &[2, 1, 2, 1, 2, 1, 2],
    &[2, 1, 2, 2, 1, 2, 1],
    &[2, 2, 1, 1, 2, 2, 1],
    &[2, 2, 1, 2, 1, 1, 2],
];

const L9: &[&[u32]] = &[
    &[1, 1, 1, 1],
    &[1, 2, 2, 2],
    &[1, 3, 3, 3],
    &[2, 1, 2, 3],
    &[2, 2, 3, 1],
    &[2, 3, 1, 2],
    &[3, 1, 3, 2],
    &[3, 2, 1, 3],
    &[3, 3, 2, 1],
];

const L16: &[&[u32]] = &[
    &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    &[1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
    &[1, 1, 2, 2, 1, 1, 2, 2, 2, 2, 1, 1, 1, 1, 2],
    &[1, 1, 2, 2, 2, 2, 1, 1, 1, 1, 2, 2, 2, 2, 1],
    &[1, 2, 1, 2, 1, 2, 1, 2, 2, 1, 2, 1, 2, 1, 2],
    &[1, 2, 1, 2, 2, 1, 2, 1, 1, 2, 1, 2, 1, 2, 1],
    &[1, 2, 2, 1, 1, 2, 2, 1, 1, 2, 2, 1, 1, 2, 1],
    &[1, 2, 2, 1, 2, 1, 1, 2, 2, 1, 1, 2, 2, 1, 2],
    &[2, 1, 1, 2, 1, 2, 2, 1, 2, 1, 1, 2, 2, 1, 1],
    &[2, 1, 1, 2, 2, 1, 1, 2, 1, 2, 2, 1, 1, 2, 2],
    &[2, 1, 2, 1, 1, 2, 1, 2, 1, 2, 2, 1, 2, 1, 1],
    &[2, 1, 2, 1, 2, 1, 2, 1, 2, 1, 1, 2, 1, 2, 2],
    &[2, 2, 1, 2, 1, 1, 2, 2, 1, 1, 2, 2, 1, 2, 1],
    &[2, 2, 1, 2, 2, 2, 1, 1, 2, 2, 1, 1, 2, 1, 2],
    &[2, 2, 2, 1, 1, 1, 1, 2, 2, 2, 1, 2, 2, 1, 2],
    &[2, 2, 2, 1, 2, 2, 2, 1, 1, 1, 2, 1, 1, 2, 1],
];

const L18: &[&[u32]] = &[
    &[1, 1, 1, 1, 1, 1, 1, 1],
    &[1, 1, 2, 2, 2, 2, 2, 2],
    &[1, 1, 3, 3, 3, 3, 3, 3],
    &[1, 2, 1, 1, 2, 2, 3, 3],
    &[1, 2, 2, 2, 3, 3, 1, 1],
    &[1, 2, 3, 3, 1, 1, 2, 2],
    &[1, 3, 1, 2, 1, 3, 2, 3],
    &[1, 3, 2, 3, 2, 1, 3, 1],
    &[1, 3, 3, 1, 3, 2, 1, 2],
    &[2, 1, 1, 3, 3, 2, 2, 1],
    &[2, 1, 2, 1, 1, 3, 3, 2],
    &[2, 1, 3, 2, 2, 1, 1, 3],
    &[2, 2, 1, 2, 3, 1, 3, 2],
    &[2, 2, 2, 3, 1, 2, 1, 3],
    &[2, 2, 3, 1, 2, 3, 2, 1],
    &[2, 3, 1, 3, 2, 3, 1, 2],
    &[2, 3, 2, 1, 3, 1, 2, 3],
    &[2, 3, 3, 2, 1, 2, 3, 1],
];

/// A standard Taguchi orthogonal array.
///
/// | Array | Runs | Columns | Levels |
/// |-------|------|---------|--------|
/// | L4    | 4    | 3       | 2      |
/// | L8    | 8    | 7       | 2      |
/// | L9    | 9    | 4       | 3      |
/// | L16   | 16   | 15      | 2      |
/// | L18   | 18   | 8       | 2 (first column), 3 (rest) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArrayType {
    /// OA(4, 2^3)
    L4,
    /// OA(8, 2^7)
    L8,
    /// OA(9, 3^4)
    L9,
    /// OA(16, 2^15)
    L16,
    /// OA(18, 2^1 3^7)
    L18,
}

impl ArrayType {
    /// Every catalogued array, smallest first.
    pub const ALL: [ArrayType; 5] = [Self::L4, Self::L8, Self::L9, Self::L16, Self::L18];

    /// The standard name, e.g. `"L9"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::L4 => "L4",
            Self::L8 => "L8",
            Self::L9 => "L9",
            Self::L16 => "L16",
            Self::L18 => "L18",
        }
    }

    /// The 1-indexed rows of the standard table.
    #[must_use]
    pub fn table(self) -> &'static [&'static [u32]] {
        match self {
            Self::L4 => L4,
            Self::L8 => L8,
            Self::L9 => L9,
            Self::L16 => L16,
            Self::L18 => L18,
        }
    }

    /// Number of experiments (rows).
    #[must_use]
    pub fn runs(self) -> usize {
        self.table().len()
    }

    /// Maximum number of factors (columns).
    #[must_use]
    pub fn max_factors(self) -> usize {
        self.table()[0].len()
    }

    /// Maximum levels per factor: the largest cell value in the table.
    #[must_use]
    pub fn max_levels(self) -> usize {
        self.table()
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0) as usize
    }

    /// Declared strength of the table.
    ///
    /// The L16 row set is kept verbatim for plan compatibility; it is
    /// balanced per column but not across every column pair.
    #[must_use]
    pub fn strength(self) -> u32 {
        match self {
            Self::L16 => 1,
            _ => 2,
        }
    }

    /// Build the array as an [`OA`] with 0-indexed cells.
    ///
    /// # Errors
    ///
    /// Never fails for catalogued tables; the `Result` comes from
    /// [`OA::from_one_indexed`].
    pub fn oa(self) -> Result<OA> {
        OA::from_one_indexed(self.table(), self.strength())
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArrayType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownArray(s.to_string()))
    }
}

/// Retrieve an orthogonal array by its standard Taguchi name.
///
/// # Example
///
/// ```
/// use taguchi_doe::catalogue::get_by_name;
///
/// let oa = get_by_name("L9").unwrap();
/// assert_eq!(oa.runs(), 9);
/// assert_eq!(oa.max_levels(), 3);
/// ```
///
/// # Errors
///
/// Returns [`Error::UnknownArray`] for names outside the catalogue.
pub fn get_by_name(name: &str) -> Result<OA> {
    name.parse::<ArrayType>()?.oa()
}

/// List all available standard arrays.
#[must_use]
pub fn list_standard_arrays() -> Vec<&'static str> {
    ArrayType::ALL.iter().map(|a| a.name()).collect()
}
