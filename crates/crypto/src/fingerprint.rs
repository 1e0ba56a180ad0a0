//! BLAKE3 content fingerprints and the attestation digest.
//!
//! Fingerprints are BLAKE3 hashes over canonical JSON encodings. The
//! attestation digest binds a score to its input and to the scoring function
//! that produced it:
//!
//! ```text
//! attestation = BLAKE3(result_fingerprint || input_fingerprint || scorer_id)
//! ```
//!
//! The concatenation order is fixed so a verifier holding the same three
//! inputs reproduces the digest bit for bit.

use blake3::Hasher;
use serde::Serialize;

/// A BLAKE3 hash represented as a 32-byte array.
pub type Blake3Hash = [u8; 32];

/// BLAKE3 hash of raw bytes.
pub fn fingerprint_bytes(bytes: &[u8]) -> Blake3Hash {
    *blake3::hash(bytes).as_bytes()
}

/// BLAKE3 hash of the canonical JSON encoding of `value`.
pub fn fingerprint_json<T: Serialize + ?Sized>(value: &T) -> Result<Blake3Hash, serde_json::Error> {
    let bytes = serde_json::to_vec(value)?;
    Ok(fingerprint_bytes(&bytes))
}

/// Computes the attestation digest in its normative order.
pub fn attestation_digest(
    result_fingerprint: &Blake3Hash,
    input_fingerprint: &Blake3Hash,
    scorer_id: &str,
) -> Blake3Hash {
    let mut hasher = Hasher::new();
    hasher.update(result_fingerprint);
    hasher.update(input_fingerprint);
    hasher.update(scorer_id.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Renders a hash as `0x`-prefixed lowercase hex.
pub fn to_prefixed_hex(hash: &Blake3Hash) -> String {
    format!("0x{}", hex::encode(hash))
}

/// Parses a hash from hex, with or without a `0x` prefix.
pub fn parse_hex(value: &str) -> Option<Blake3Hash> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    let bytes = hex::decode(digits).ok()?;
    bytes.try_into().ok()
}
