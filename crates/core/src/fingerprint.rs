//! Fingerprinting: deterministic numeric digests of checkpoints.

use serde::{Deserialize, Serialize};

/// A 64-bit digest of one checkpoint's text. Distinct texts may collide;
/// callers must treat a collision as a legitimate (if rare) lookup hit,
/// never as corruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    pub fn of(checkpoint: &str) -> Fingerprint {
        let digest = blake3::hash(checkpoint.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest.as_bytes()[..8]);
        Fingerprint(u64::from_le_bytes(bytes))
    }
}

/// One fingerprint per checkpoint, order preserved. A fingerprint depends
/// only on its checkpoint's text, not on position or neighbors.
pub fn build_fingerprints(checkpoints: &[String]) -> Vec<Fingerprint> {
    checkpoints
        .iter()
        .map(|checkpoint| Fingerprint::of(checkpoint))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(build_fingerprints(&[]).is_empty());
    }

    #[test]
    fn length_and_order_are_preserved() {
        let checkpoints = vec![
            "first checkpoint".to_string(),
            "second checkpoint".to_string(),
            "first checkpoint".to_string(),
        ];
        let fingerprints = build_fingerprints(&checkpoints);
        assert_eq!(fingerprints.len(), 3);
        assert_eq!(fingerprints[0], fingerprints[2]);
        assert_ne!(fingerprints[0], fingerprints[1]);
    }

    #[test]
    fn fingerprint_is_position_independent() {
        let alone = build_fingerprints(&["shared text".to_string()]);
        let surrounded = build_fingerprints(&[
            "before".to_string(),
            "shared text".to_string(),
            "after".to_string(),
        ]);
        assert_eq!(alone[0], surrounded[1]);
    }

    #[test]
    fn same_text_always_hashes_the_same() {
        assert_eq!(Fingerprint::of("stable"), Fingerprint::of("stable"));
        assert_ne!(Fingerprint::of("stable"), Fingerprint::of("stable "));
    }
}
