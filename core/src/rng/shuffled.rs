//! L'Ecuyer combined LCG with Bays-Durham shuffle
//!
//! Two multiplicative congruential generators with moduli `IM1` and `IM2`
//! run side by side. Their difference is combined through a 32-entry
//! shuffle table, which removes the low-order serial correlations of
//! either generator alone. The period exceeds 2 × 10^18.
//!
//! # Algorithm
//!
//! Each LCG step computes `(a·x) mod m` with Schrage's decomposition
//! `m = a·q + r`, so intermediate values stay below `m`. All arithmetic is
//! carried out in `i64`.
//!
//! # Determinism
//!
//! Same seed → same sequence of deviates, bit for bit. Seeding with `-1`
//! reproduces the published `ran2` reference trace.
//!
//! # Not for security
//!
//! The generator is fully predictable from a handful of outputs. Do not use
//! it for keys, tokens or anything else an adversary must not guess.

use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use serde::{Deserialize, Serialize};

use super::{DeviateSource, RngError};
use crate::checkpoint::GeneratorSnapshot;

/// Modulus of LCG #1
pub const IM1: i64 = 2_147_483_563;
/// Modulus of LCG #2
pub const IM2: i64 = 2_147_483_399;
/// Multiplier of LCG #1
pub const IA1: i64 = 40_014;
/// Multiplier of LCG #2
pub const IA2: i64 = 40_692;
/// Schrage quotient `IM1 / IA1`
pub const IQ1: i64 = 53_668;
/// Schrage quotient `IM2 / IA2`
pub const IQ2: i64 = 52_774;
/// Schrage remainder `IM1 % IA1`
pub const IR1: i64 = 12_211;
/// Schrage remainder `IM2 % IA2`
pub const IR2: i64 = 3_791;
/// Shuffle table length
pub const NTAB: usize = 32;
/// Divisor mapping a raw output onto a table index
pub const NDIV: i64 = 1 + (IM1 - 1) / NTAB as i64;
/// Scale from raw output to `[0, 1)`
pub const AM: f64 = 1.0 / IM1 as f64;
/// Gap kept below 1.0
pub const EPS: f64 = 1.2e-7;
/// Largest deviate ever returned
pub const RNMX: f64 = 1.0 - EPS;

/// Seed the original program used when the caller never seeded
pub const LEGACY_DEFAULT_SEED: i64 = -36;

/// Number of discarded LCG #1 outputs before the table is filled
const WARM_UP: usize = 8;

/// Deterministic uniform generator (`ran2`)
///
/// Every constructor seeds the generator, so an instance is always ready to
/// draw. Instances are independent values: clone one to fork a stream at the
/// current position.
///
/// Serde goes through [`GeneratorSnapshot`], so deserialized state is
/// validated before it can be drawn from.
///
/// # Example
/// ```
/// use shuffled_lcg_core_rs::{DeviateSource, ShuffledLcg};
///
/// let mut rng = ShuffledLcg::new(-1);
/// let first = rng.next_deviate();
/// assert_eq!(first, 0.2853808990946861);
/// assert!(first >= 0.0 && first < 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GeneratorSnapshot", into = "GeneratorSnapshot")]
pub struct ShuffledLcg {
    /// LCG #1 state, always in `(0, IM1)`
    seed1: i64,
    /// LCG #2 state, always in `(0, IM2)`
    seed2: i64,
    /// Bays-Durham table, entries in `(0, IM1)`
    shuffle_table: [i64; NTAB],
    /// Previous combined output, selects the next table slot
    last_output: i64,
}

impl ShuffledLcg {
    /// Create a generator seeded with `seed`
    ///
    /// The sign of `seed` does not matter: `new(v)` and `new(-v)` produce the
    /// same sequence, and `0` behaves like `1`.
    ///
    /// # Example
    /// ```
    /// use shuffled_lcg_core_rs::{DeviateSource, ShuffledLcg};
    ///
    /// let mut a = ShuffledLcg::new(-42);
    /// let mut b = ShuffledLcg::new(42);
    /// assert_eq!(a.next_deviate(), b.next_deviate());
    /// ```
    pub fn new(seed: i64) -> Self {
        let mut rng = Self {
            seed1: 1,
            seed2: 1,
            shuffle_table: [0; NTAB],
            last_output: 0,
        };
        rng.reseed(seed);
        rng
    }

    /// Create a generator seeded from the wall clock
    ///
    /// Two generators created within the same second share a sequence.
    ///
    /// # Errors
    /// [`RngError::ClockBeforeEpoch`] if the system clock reads before 1970.
    pub fn from_clock() -> Result<Self, RngError> {
        Ok(Self::new(clock_seed()?))
    }

    /// Reseed in place, discarding the current stream
    ///
    /// Runs the LCG #1 warm-up and refills the shuffle table. `seed2` starts
    /// from the same normalized seed as `seed1`.
    pub fn reseed(&mut self, seed: i64) {
        let mut state = normalize_seed(seed);
        debug!("reseeding shuffled LCG: seed={} normalized={}", seed, state);

        self.seed2 = state;
        for j in (0..NTAB + WARM_UP).rev() {
            state = schrage_step(state, IA1, IQ1, IR1, IM1);
            if j < NTAB {
                self.shuffle_table[j] = state;
            }
        }
        self.seed1 = state;
        self.last_output = self.shuffle_table[0];
    }

    /// Reseed in place from the wall clock (whole seconds)
    ///
    /// # Errors
    /// [`RngError::ClockBeforeEpoch`] if the system clock reads before 1970.
    /// The generator is left untouched in that case.
    pub fn randomize(&mut self) -> Result<(), RngError> {
        let seed = clock_seed()?;
        self.reseed(seed);
        Ok(())
    }

    /// Endless iterator over deviates, borrowing the generator
    ///
    /// # Example
    /// ```
    /// use shuffled_lcg_core_rs::ShuffledLcg;
    ///
    /// let mut rng = ShuffledLcg::new(-3);
    /// let sample: Vec<f64> = rng.deviates().take(4).collect();
    /// assert_eq!(sample.len(), 4);
    /// ```
    pub fn deviates(&mut self) -> Deviates<'_> {
        Deviates { rng: self }
    }

    /// Current LCG #1 state
    pub fn seed1(&self) -> i64 {
        self.seed1
    }

    /// Current LCG #2 state
    pub fn seed2(&self) -> i64 {
        self.seed2
    }

    /// Current shuffle table
    pub fn shuffle_table(&self) -> &[i64; NTAB] {
        &self.shuffle_table
    }

    /// Most recent raw output (before scaling)
    pub fn last_output(&self) -> i64 {
        self.last_output
    }

    /// Rebuild a generator from raw parts
    ///
    /// Callers are responsible for the invariants; see
    /// [`crate::checkpoint::validate_snapshot`].
    pub(crate) fn from_parts(
        seed1: i64,
        seed2: i64,
        shuffle_table: [i64; NTAB],
        last_output: i64,
    ) -> Self {
        Self {
            seed1,
            seed2,
            shuffle_table,
            last_output,
        }
    }
}

impl DeviateSource for ShuffledLcg {
    /// Draw the next deviate in `[0, 1)`
    ///
    /// Advances both LCGs, swaps the selected table slot for the newest
    /// LCG #1 output and scales the combined value.
    fn next_deviate(&mut self) -> f64 {
        self.seed1 = schrage_step(self.seed1, IA1, IQ1, IR1, IM1);
        self.seed2 = schrage_step(self.seed2, IA2, IQ2, IR2, IM2);

        let j = (self.last_output / NDIV) as usize;
        debug_assert!(j < NTAB, "shuffle index {} out of range", j);

        self.last_output = self.shuffle_table[j] - self.seed2;
        self.shuffle_table[j] = self.seed1;
        if self.last_output < 1 {
            self.last_output += IM1 - 1;
        }

        let deviate = AM * self.last_output as f64;
        if deviate > RNMX {
            RNMX
        } else {
            deviate
        }
    }
}

/// Iterator returned by [`ShuffledLcg::deviates`]
#[derive(Debug)]
pub struct Deviates<'a> {
    rng: &'a mut ShuffledLcg,
}

impl Iterator for Deviates<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.rng.next_deviate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// One step of `x ← (a·x) mod m` via Schrage's method
fn schrage_step(x: i64, a: i64, q: i64, r: i64, m: i64) -> i64 {
    let k = x / q;
    let next = a * (x - k * q) - k * r;
    if next < 0 {
        next + m
    } else {
        next
    }
}

/// Map any seed onto a valid LCG #1 state in `[1, IM1)`
///
/// For `|seed| < IM1` this is `max(-(-|seed|), 1)`, matching the reference.
/// Larger magnitudes are reduced modulo `IM1`; a multiple of `IM1` would
/// otherwise pin LCG #1 at zero.
fn normalize_seed(seed: i64) -> i64 {
    let magnitude = (seed.unsigned_abs() % IM1 as u64) as i64;
    magnitude.max(1)
}

/// Negated Unix time in seconds
pub(crate) fn clock_seed() -> Result<i64, RngError> {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| RngError::ClockBeforeEpoch)?
        .as_secs();
    let seed = -(secs.min(i64::MAX as u64) as i64);
    debug!("clock seed derived: {}", seed);
    Ok(seed)
}
