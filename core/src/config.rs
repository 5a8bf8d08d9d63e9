//! Generator configuration
//!
//! Describes where a generator's seed comes from, in a form that can be
//! loaded from JSON alongside the rest of a host program's settings.
//!
//! # Example
//!
//! ```
//! use shuffled_lcg_core_rs::{DeviateSource, GeneratorConfig};
//!
//! let config = GeneratorConfig::from_json(r#"{"seed": {"type": "fixed", "value": -1}}"#).unwrap();
//! let mut rng = config.build().unwrap();
//! assert_eq!(rng.next_deviate(), 0.2853808990946861);
//! ```

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rng::{clock_seed, RngError, ShuffledLcg, LEGACY_DEFAULT_SEED};

/// Errors raised while loading or resolving a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse generator config: {0}")]
    Parse(String),

    #[error(transparent)]
    Rng(#[from] RngError),
}

/// Where the seed of a generator comes from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeedSource {
    /// An explicit seed; its sign is ignored
    Fixed { value: i64 },

    /// The seed the original program fell back to (-36)
    #[default]
    LegacyDefault,

    /// Negated wall-clock seconds at resolve time
    Clock,
}

impl SeedSource {
    /// Produce the seed value this source stands for
    ///
    /// # Errors
    /// [`RngError::ClockBeforeEpoch`] for [`SeedSource::Clock`] when the
    /// system clock reads before 1970.
    pub fn resolve(&self) -> Result<i64, RngError> {
        match self {
            SeedSource::Fixed { value } => Ok(*value),
            SeedSource::LegacyDefault => Ok(LEGACY_DEFAULT_SEED),
            SeedSource::Clock => clock_seed(),
        }
    }
}

/// Top-level generator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Seed source; defaults to [`SeedSource::LegacyDefault`]
    #[serde(default)]
    pub seed: SeedSource,
}

impl GeneratorConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Build a seeded generator
    pub fn build(&self) -> Result<ShuffledLcg, ConfigError> {
        let seed = self.seed.resolve()?;
        debug!("building generator from {:?} (seed={})", self.seed, seed);
        Ok(ShuffledLcg::new(seed))
    }
}
