//! Identifier policy and hash-based shortening
//!
//! Generated identifiers (FK names, unique-index names) must respect the
//! target database's length limit and reserved words. When the naive
//! `prefix_part1_part2` form does not fit, the parts are replaced by a
//! fixed-width content fingerprint so that regeneration is idempotent: the
//! same inputs always shorten to the same identifier.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Width of the fingerprint slice appended after the prefix.
const HASH_LEN: usize = 10;

/// Per-dialect identifier rules.
pub trait IdentifierPolicy {
    /// Maximum identifier length (e.g. 30, 63, 64, 128).
    fn max_length(&self) -> usize;
    /// Quotes a raw identifier (`` `foo` ``, `"foo"`, `[foo]`).
    fn quote(&self, raw: &str) -> String;
    /// Case normalization applied before length/keyword checks.
    fn normalize_case(&self, raw: &str) -> String;
    /// Reserved-word test.
    fn is_keyword(&self, raw: &str) -> bool;
}

/// Builds `prefix_joined(parts)` and shortens it to a policy-compliant
/// identifier when it is too long or collides with a keyword.
///
/// The fingerprint is a SHA-256 digest of the unnormalized joined parts,
/// URL-safe base64 without padding, truncated to [`HASH_LEN`]. The digest is
/// used purely as a deterministic fingerprint, not as a security boundary.
pub fn shorten(prefix: &str, policy: &dyn IdentifierPolicy, parts: &[&str]) -> String {
    let combined = parts.join("_");
    let raw = format!("{}_{}", prefix, combined);

    let normalized = policy.normalize_case(&raw);
    if normalized.len() <= policy.max_length() && !policy.is_keyword(&normalized) {
        return normalized;
    }

    let digest = Sha256::digest(combined.as_bytes());
    let encoded = URL_SAFE_NO_PAD.encode(digest);
    let shortened = policy.normalize_case(&format!("{}_{}", prefix, &encoded[..HASH_LEN]));

    if shortened.len() > policy.max_length() {
        shortened[..policy.max_length()].to_string()
    } else {
        shortened
    }
}
