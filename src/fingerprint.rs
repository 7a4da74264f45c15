use crate::models::RawSourceBundle;
use sha2::{Digest, Sha256};

/// Deterministic content fingerprint of a source bundle.
///
/// The fingerprint changes whenever any input field's content changes and
/// is otherwise stable: `serde_json` encodes object keys in sorted order,
/// so structurally-identical bundles always serialize, and therefore hash,
/// identically. Used by the cache store to detect stale entries.
///
/// SHA-256, hex encoded.
pub fn bundle_fingerprint(bundle: &RawSourceBundle) -> String {
    let serialized = serde_json::to_string(bundle).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    hex::encode(hasher.finalize())
}
