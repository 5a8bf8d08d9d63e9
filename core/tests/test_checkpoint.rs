//! Checkpoint Tests - Save/Load Generator State
//!
//! Critical invariants tested:
//! - Determinism: A restored generator continues the exact sequence
//! - Integrity: Tampered checkpoints are rejected
//! - Versioning: Unknown snapshot versions are rejected

use shuffled_lcg_core_rs::checkpoint::{validate_snapshot, SNAPSHOT_VERSION};
use shuffled_lcg_core_rs::{
    load_checkpoint, save_checkpoint, CheckpointError, DeviateSource, GeneratorSnapshot,
    ShuffledLcg,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Generator seeded with `seed` and advanced `draws` times
fn advanced(seed: i64, draws: usize) -> ShuffledLcg {
    let mut rng = ShuffledLcg::new(seed);
    for _ in 0..draws {
        rng.next_deviate();
    }
    rng
}

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn test_restored_generator_continues_sequence() {
    let mut original = advanced(-1, 250);
    let json = save_checkpoint(&original).unwrap();
    let mut restored = load_checkpoint(&json).unwrap();

    assert_eq!(restored, original);
    for i in 0..1000 {
        assert_eq!(
            original.next_deviate(),
            restored.next_deviate(),
            "restored stream diverged at draw {}",
            i
        );
    }
}

#[test]
fn test_checkpoint_of_fresh_generator() {
    let json = save_checkpoint(&ShuffledLcg::new(-1)).unwrap();
    let mut restored = load_checkpoint(&json).unwrap();
    assert_eq!(restored.next_deviate(), 0.2853808990946861);
}

#[test]
fn test_checkpoint_json_shape() {
    let json = save_checkpoint(&ShuffledLcg::new(-1)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["version"], SNAPSHOT_VERSION);
    assert_eq!(value["seed1"], 1_720_212_868);
    assert_eq!(value["seed2"], 1);
    assert_eq!(value["shuffle_table"].as_array().unwrap().len(), 32);
    assert_eq!(value["digest"].as_str().unwrap().len(), 64);
}

#[test]
fn test_same_state_same_digest() {
    let a = GeneratorSnapshot::capture(&advanced(-3, 10));
    let b = GeneratorSnapshot::capture(&advanced(-3, 10));
    let c = GeneratorSnapshot::capture(&advanced(-3, 11));

    assert_eq!(a.digest, b.digest);
    assert_ne!(a.digest, c.digest);
}

// ============================================================================
// Rejection
// ============================================================================

#[test]
fn test_tampered_seed_rejected() {
    let mut snapshot = GeneratorSnapshot::capture(&advanced(-9, 3));
    snapshot.seed1 += 1;

    let err = snapshot.restore().unwrap_err();
    assert!(
        matches!(err, CheckpointError::DigestMismatch { .. }),
        "expected digest mismatch, got {:?}",
        err
    );
}

#[test]
fn test_tampered_table_rejected_from_json() {
    let json = save_checkpoint(&advanced(-9, 3)).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["shuffle_table"][0] = serde_json::json!(12345);

    let err = load_checkpoint(&value.to_string()).unwrap_err();
    assert!(matches!(err, CheckpointError::DigestMismatch { .. }));
}

#[test]
fn test_unknown_version_rejected() {
    let mut snapshot = GeneratorSnapshot::capture(&ShuffledLcg::new(-1));
    snapshot.version = SNAPSHOT_VERSION + 1;

    assert_eq!(
        validate_snapshot(&snapshot),
        Err(CheckpointError::UnsupportedVersion(SNAPSHOT_VERSION + 1))
    );
}

#[test]
fn test_tampered_generator_json_rejected_without_panic() {
    let json = serde_json::to_string(&advanced(-9, 3)).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["last_output"] = serde_json::json!(i64::MAX);

    // Deserializing ShuffledLcg runs the snapshot checks
    let result = serde_json::from_value::<ShuffledLcg>(value);
    assert!(result.is_err());
}

#[test]
fn test_generator_serializes_as_snapshot() {
    let rng = advanced(-9, 3);
    let from_generator = serde_json::to_value(&rng).unwrap();
    let from_snapshot = serde_json::to_value(GeneratorSnapshot::capture(&rng)).unwrap();
    assert_eq!(from_generator, from_snapshot);
}

#[test]
fn test_malformed_json_rejected() {
    let err = load_checkpoint("{\"version\": 1, \"seed1\": ").unwrap_err();
    assert!(matches!(err, CheckpointError::Serialization(_)));

    let err = load_checkpoint("{}").unwrap_err();
    assert!(matches!(err, CheckpointError::Serialization(_)));
}
