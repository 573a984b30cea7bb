//! Construction-time parameters of a `StringTable`.

use crate::error::{Error, Result};

/// Smallest slot array a table will ever hold.
pub const MIN_CAPACITY: usize = 3;

/// Growth threshold for `len / capacity`.
pub const MAX_LOAD_FACTOR: f64 = 0.7;

/// Fixed parameters of a table. Defaults to [`MIN_CAPACITY`] and
/// [`MAX_LOAD_FACTOR`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub min_capacity: usize,
    pub max_load_factor: f64,
}

impl TableConfig {
    pub const fn new() -> Self {
        Self {
            min_capacity: MIN_CAPACITY,
            max_load_factor: MAX_LOAD_FACTOR,
        }
    }

    pub const fn with_min_capacity(mut self, min_capacity: usize) -> Self {
        self.min_capacity = min_capacity;
        self
    }

    pub const fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    /// Check the parameters. A load factor must lie in `(0, 1]`; at least one
    /// slot is required.
    pub fn validate(&self) -> Result<()> {
        if self.min_capacity == 0 {
            return Err(Error::InvalidConfig("min_capacity must be at least 1"));
        }
        // Written so NaN fails too.
        if !(self.max_load_factor > 0.0 && self.max_load_factor <= 1.0) {
            return Err(Error::InvalidConfig(
                "max_load_factor must be in (0, 1]",
            ));
        }
        Ok(())
    }

    /// Clamp a requested capacity up to `min_capacity`.
    #[inline]
    pub fn clamp_capacity(&self, requested: usize) -> usize {
        requested.max(self.min_capacity)
    }

    /// Would holding `len` entries in `capacity` slots reach the threshold?
    #[inline]
    pub(crate) fn over_threshold(&self, len: usize, capacity: usize) -> bool {
        len as f64 / capacity as f64 >= self.max_load_factor
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}
