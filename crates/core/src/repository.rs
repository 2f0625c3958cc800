//! Read path: an immutable in-memory fingerprint index for one strategy.

use crate::fingerprint::Fingerprint;
use index::{IndexError, SourceLocation};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Fingerprint -> source locations, loaded once from a persisted snapshot.
/// Never mutated after load, so it can be shared across tasks without
/// locking.
#[derive(Debug)]
pub struct FingerprintRepository {
    entries: HashMap<u64, Vec<SourceLocation>>,
}

impl FingerprintRepository {
    /// Deserializes a persisted snapshot in full. A missing, unreadable, or
    /// corrupt file fails the load; no partial repository is returned.
    pub fn load(path: &Path) -> Result<FingerprintRepository, IndexError> {
        let snapshot = index::load(path)?;
        debug!(
            strategy = %snapshot.strategy,
            buckets = snapshot.entries.len(),
            "loaded fingerprint repository"
        );
        Ok(FingerprintRepository {
            entries: snapshot.entries,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_entries(entries: HashMap<u64, Vec<SourceLocation>>) -> Self {
        FingerprintRepository { entries }
    }

    /// Exact-key lookup. An absent fingerprint is an empty result, not an
    /// error.
    pub fn lookup(&self, fingerprint: Fingerprint) -> &[SourceLocation] {
        self.entries
            .get(&fingerprint.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct fingerprints.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
