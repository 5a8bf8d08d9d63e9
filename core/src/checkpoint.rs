//! Checkpoint - Save/Load Generator State
//!
//! Serializes the complete generator state to JSON so a stream can be
//! paused and resumed exactly where it left off.
//!
//! # Critical Invariants
//!
//! - **Determinism**: A restored generator continues the original sequence
//!   bit for bit
//! - **Integrity**: The stored SHA-256 digest must match the state fields
//! - **Validity**: Every restored value lies in the range the algorithm
//!   can produce, so a restored table index is always in bounds
//!
//! `ShuffledLcg` itself serializes through [`GeneratorSnapshot`], so the same
//! checks apply when it is embedded in a larger serde document.

use crate::rng::{ShuffledLcg, IM1, IM2, NDIV, NTAB};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Checkpoint error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckpointError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("state digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("invalid generator state: {0}")]
    InvalidState(String),
}

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete generator state snapshot
///
/// # Example
/// ```
/// use shuffled_lcg_core_rs::{DeviateSource, GeneratorSnapshot, ShuffledLcg};
///
/// let mut rng = ShuffledLcg::new(-1);
/// rng.next_deviate();
///
/// let snapshot = GeneratorSnapshot::capture(&rng);
/// let mut restored = snapshot.restore().unwrap();
/// assert_eq!(rng.next_deviate(), restored.next_deviate());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// LCG #1 state
    pub seed1: i64,

    /// LCG #2 state
    pub seed2: i64,

    /// Bays-Durham table, `NTAB` entries
    pub shuffle_table: Vec<i64>,

    /// Previous combined output
    pub last_output: i64,

    /// SHA256 hex digest over the fields above
    pub digest: String,
}

impl GeneratorSnapshot {
    /// Capture the state of `rng`
    pub fn capture(rng: &ShuffledLcg) -> Self {
        let mut snapshot = Self {
            version: SNAPSHOT_VERSION,
            seed1: rng.seed1(),
            seed2: rng.seed2(),
            shuffle_table: rng.shuffle_table().to_vec(),
            last_output: rng.last_output(),
            digest: String::new(),
        };
        snapshot.digest = snapshot.compute_digest();
        snapshot
    }

    /// SHA256 over the state fields, hex encoded
    ///
    /// Hashes the little-endian bytes of `version`, `seed1`, `seed2`, the
    /// table length, each table entry and `last_output`, in that order. The
    /// stored `digest` field is not part of the input.
    pub fn compute_digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.seed1.to_le_bytes());
        hasher.update(self.seed2.to_le_bytes());
        hasher.update((self.shuffle_table.len() as u64).to_le_bytes());
        for entry in &self.shuffle_table {
            hasher.update(entry.to_le_bytes());
        }
        hasher.update(self.last_output.to_le_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Validate and turn the snapshot back into a generator
    pub fn restore(self) -> Result<ShuffledLcg, CheckpointError> {
        if let Err(e) = validate_snapshot(&self) {
            warn!("rejecting generator snapshot: {}", e);
            return Err(e);
        }

        let mut table = [0i64; NTAB];
        table.copy_from_slice(&self.shuffle_table);

        debug!(
            "restored generator snapshot (seed1={}, seed2={})",
            self.seed1, self.seed2
        );
        Ok(ShuffledLcg::from_parts(
            self.seed1,
            self.seed2,
            table,
            self.last_output,
        ))
    }
}

impl From<&ShuffledLcg> for GeneratorSnapshot {
    fn from(rng: &ShuffledLcg) -> Self {
        GeneratorSnapshot::capture(rng)
    }
}

impl From<ShuffledLcg> for GeneratorSnapshot {
    fn from(rng: ShuffledLcg) -> Self {
        GeneratorSnapshot::capture(&rng)
    }
}

impl TryFrom<GeneratorSnapshot> for ShuffledLcg {
    type Error = CheckpointError;

    fn try_from(snapshot: GeneratorSnapshot) -> Result<Self, Self::Error> {
        snapshot.restore()
    }
}

// ============================================================================
// Save / Load
// ============================================================================

/// Serialize the generator state to a JSON string
pub fn save_checkpoint(rng: &ShuffledLcg) -> Result<String, CheckpointError> {
    let snapshot = GeneratorSnapshot::capture(rng);
    let json = serde_json::to_string(&snapshot)
        .map_err(|e| CheckpointError::Serialization(e.to_string()))?;
    debug!("saved generator checkpoint ({} bytes)", json.len());
    Ok(json)
}

/// Restore a generator from a JSON string produced by [`save_checkpoint`]
///
/// # Errors
/// Malformed JSON, an unknown version, a digest mismatch or any value
/// outside the generator's reachable range.
pub fn load_checkpoint(json: &str) -> Result<ShuffledLcg, CheckpointError> {
    let snapshot: GeneratorSnapshot = serde_json::from_str(json)
        .map_err(|e| CheckpointError::Serialization(e.to_string()))?;
    snapshot.restore()
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validate snapshot integrity
///
/// Checks, in order:
/// 1. Format version
/// 2. Digest
/// 3. Table length and value ranges
pub fn validate_snapshot(snapshot: &GeneratorSnapshot) -> Result<(), CheckpointError> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(CheckpointError::UnsupportedVersion(snapshot.version));
    }

    let actual = snapshot.compute_digest();
    if actual != snapshot.digest {
        return Err(CheckpointError::DigestMismatch {
            expected: snapshot.digest.clone(),
            actual,
        });
    }

    if snapshot.shuffle_table.len() != NTAB {
        return Err(CheckpointError::InvalidState(format!(
            "shuffle table has {} entries, expected {}",
            snapshot.shuffle_table.len(),
            NTAB
        )));
    }

    if !(1..IM1).contains(&snapshot.seed1) {
        return Err(CheckpointError::InvalidState(format!(
            "seed1 {} outside [1, {})",
            snapshot.seed1, IM1
        )));
    }

    if !(1..IM2).contains(&snapshot.seed2) {
        return Err(CheckpointError::InvalidState(format!(
            "seed2 {} outside [1, {})",
            snapshot.seed2, IM2
        )));
    }

    for (i, &entry) in snapshot.shuffle_table.iter().enumerate() {
        if !(1..IM1).contains(&entry) {
            return Err(CheckpointError::InvalidState(format!(
                "shuffle table entry {} = {} outside [1, {})",
                i, entry, IM1
            )));
        }
    }

    // Also keeps last_output / NDIV inside the table
    if !(1..IM1).contains(&snapshot.last_output) {
        return Err(CheckpointError::InvalidState(format!(
            "last output {} outside [1, {})",
            snapshot.last_output, IM1
        )));
    }
    debug_assert!(((snapshot.last_output / NDIV) as usize) < NTAB);

    Ok(())
}
