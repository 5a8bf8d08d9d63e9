//! Shuffled LCG Core - Rust Engine
//!
//! Deterministic uniform deviates in `[0, 1)` from L'Ecuyer's combined
//! linear congruential generator with a Bays-Durham shuffle (`ran2`).
//!
//! # Architecture
//!
//! - **rng**: Generator state machine and the integer draw adapter
//! - **config**: Seed source configuration (fixed, legacy default, clock)
//! - **checkpoint**: Save/restore generator state with integrity digest
//!
//! # Critical Invariants
//!
//! 1. Same seed → same sequence, bit for bit
//! 2. Every deviate `d` satisfies `0.0 <= d < 1.0`
//! 3. A generator is always seeded; there is no "not yet initialized" state
//!
//! # Example
//! ```
//! use shuffled_lcg_core_rs::{DeviateSource, ShuffledLcg};
//!
//! let mut rng = ShuffledLcg::new(-1);
//! assert_eq!(rng.next_deviate(), 0.2853808990946861);
//!
//! let die = rng.next_int(6).unwrap();
//! assert!((0..6).contains(&die));
//! ```

// Module declarations
pub mod checkpoint;
pub mod config;
pub mod rng;

// Re-exports for convenience
pub use checkpoint::{load_checkpoint, save_checkpoint, CheckpointError, GeneratorSnapshot};
pub use config::{ConfigError, GeneratorConfig, SeedSource};
pub use rng::{DeviateSource, Deviates, RngError, ShuffledLcg, LEGACY_DEFAULT_SEED, RNMX};
