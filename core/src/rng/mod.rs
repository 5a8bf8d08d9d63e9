//! Deterministic random number generation
//!
//! Uses L'Ecuyer's two-LCG combination with a Bays-Durham shuffle table.
//! Bounded integer draws are derived from the floating deviate through
//! [`DeviateSource`], so they carry no state of their own.

mod shuffled;

pub(crate) use shuffled::clock_seed;

pub use shuffled::{
    Deviates, ShuffledLcg, AM, EPS, IA1, IA2, IM1, IM2, IQ1, IQ2, IR1, IR2, LEGACY_DEFAULT_SEED,
    NDIV, NTAB, RNMX,
};

use thiserror::Error;

/// Errors raised by the generator and the integer draw adapter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RngError {
    /// `next_int` needs a strictly positive bound
    #[error("bound must be positive, got {bound}")]
    InvalidBound { bound: i64 },

    /// `range` needs `min < max`
    #[error("empty range: min {min} must be less than max {max}")]
    EmptyRange { min: i64, max: i64 },

    /// The wall clock reads earlier than the Unix epoch
    #[error("system clock is set before the Unix epoch")]
    ClockBeforeEpoch,
}

/// A source of uniform deviates in `[0, 1)`.
///
/// Implementors supply [`next_deviate`](DeviateSource::next_deviate); the
/// bounded integer draws are provided on top of it.
///
/// # Example
/// ```
/// use shuffled_lcg_core_rs::{DeviateSource, ShuffledLcg};
///
/// let mut rng = ShuffledLcg::new(-7);
/// let face = rng.next_int(6).unwrap();
/// assert!(face >= 0 && face < 6);
///
/// assert!(rng.next_int(0).is_err());
/// ```
pub trait DeviateSource {
    /// Draw the next deviate. Must return a value in `[0, 1)`.
    fn next_deviate(&mut self) -> f64;

    /// Draw an integer in `[0, n)` by scaling the next deviate
    ///
    /// # Errors
    /// [`RngError::InvalidBound`] if `n <= 0`. No deviate is consumed in
    /// that case.
    fn next_int(&mut self, n: i64) -> Result<i64, RngError> {
        if n <= 0 {
            return Err(RngError::InvalidBound { bound: n });
        }

        // Deviate is non-negative, so truncation is floor
        let value = (self.next_deviate() * n as f64) as i64;

        // Rounding of d * n for very large n could land on n itself
        Ok(value.min(n - 1))
    }

    /// Draw an integer in `[min, max)`
    ///
    /// Any `min < max` is accepted, including spans wider than `i64::MAX`.
    ///
    /// # Errors
    /// [`RngError::EmptyRange`] if `min >= max`.
    ///
    /// # Example
    /// ```
    /// use shuffled_lcg_core_rs::{DeviateSource, ShuffledLcg};
    ///
    /// let mut rng = ShuffledLcg::new(-12345);
    /// let amount = rng.range(10_000, 100_000).unwrap();
    /// assert!((10_000..100_000).contains(&amount));
    /// ```
    fn range(&mut self, min: i64, max: i64) -> Result<i64, RngError> {
        if min >= max {
            return Err(RngError::EmptyRange { min, max });
        }

        let span = max.abs_diff(min);
        let offset = ((self.next_deviate() * span as f64) as u64).min(span - 1);

        // offset < span, so the wrapped sum lands in [min, max)
        Ok(min.wrapping_add(offset as i64))
    }
}
