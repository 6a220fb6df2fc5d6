//! Controllable factors and their levels.

use crate::error::{Error, Result};

/// A controllable experimental variable with an ordered set of levels.
///
/// Level order is significant: it defines the level indices `0..k` used by
/// every analysis result. Levels are matched by value equality.
///
/// # Example
///
/// ```
/// use taguchi_doe::Factor;
///
/// let temperature = Factor::new("Temperature", vec![150, 175, 200]).unwrap();
/// assert_eq!(temperature.num_levels(), 3);
/// assert_eq!(temperature.level_index(&175), Some(1));
///
/// assert!(Factor::new("Pressure", vec![10]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Factor<V> {
    name: String,
    levels: Vec<V>,
}

impl<V> Factor<V> {
    /// Factor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Levels in declaration order.
    #[must_use]
    pub fn levels(&self) -> &[V] {
        &self.levels
    }

    /// Number of levels.
    #[must_use]
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub(crate) fn check_levels(&self) -> Result<()> {
        if self.levels.len() < 2 {
            return Err(Error::TooFewLevels {
                factor: self.name.clone(),
                levels: self.levels.len(),
            });
        }
        Ok(())
    }
}

impl<V: PartialEq> Factor<V> {
    /// Create a factor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooFewLevels`] if fewer than two levels are given
    /// and [`Error::DuplicateLevel`] if a level value repeats.
    pub fn new(name: impl Into<String>, levels: Vec<V>) -> Result<Self> {
        let factor = Self {
            name: name.into(),
            levels,
        };
        factor.check_levels()?;
        factor.check_distinct()?;
        Ok(factor)
    }

    pub(crate) fn check_distinct(&self) -> Result<()> {
        for (i, level) in self.levels.iter().enumerate() {
            if self.levels[..i].contains(level) {
                return Err(Error::DuplicateLevel {
                    factor: self.name.clone(),
                    level: i,
                });
            }
        }
        Ok(())
    }

    /// Index of the first level equal to `value`.
    #[must_use]
    pub fn level_index(&self, value: &V) -> Option<usize> {
        self.levels.iter().position(|l| l == value)
    }
}
