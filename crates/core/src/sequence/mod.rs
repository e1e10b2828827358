use rand::Rng;

use crate::{Result, SortVizError};

/// Fixed-length, mutable container of bar magnitudes.
///
/// The length is fixed at construction; values are generated once and
/// thereafter only reordered or overwritten by the engine. Ownership stays
/// with the controller, which lends the engine exclusive mutable access for
/// the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    values: Vec<u32>,
}

impl Sequence {
    /// Generates `len` values drawn uniformly from `[min, max)` with fresh
    /// randomness on every call.
    pub fn generate(len: usize, min: u32, max: u32) -> Result<Self> {
        if len == 0 {
            return Err(SortVizError::InvalidConfig(
                "sequence must contain at least one bar".to_string(),
            ));
        }
        if min >= max {
            return Err(SortVizError::InvalidConfig(format!(
                "value range [{min}, {max}) is empty"
            )));
        }

        let mut rng = rand::rng();
        let values = (0..len).map(|_| rng.random_range(min..max)).collect();
        Ok(Self { values })
    }

    /// Wraps an existing set of values, typically for deterministic runs.
    pub fn from_values(values: Vec<u32>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read-only view of the current state.
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [u32] {
        &mut self.values
    }
}
