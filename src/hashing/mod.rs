//! Deterministic identifiers derived from record ids and query text.

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// # Collision Probability
///
/// With 64 bits, `P(collision) ≈ n² / (2 × 2^64)` for `n` keys: negligible for a
/// page corpus or a query cache of millions of entries. A collision between two
/// cache keys behaves like an overwrite of the older entry, never a merged record.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Numeric point id for a record id (document id or cache query text).
///
/// Vector stores such as Qdrant only accept integer or UUID point ids, so string
/// ids are hashed. The same id always maps to the same point, which turns a
/// repeated insert into an overwrite.
#[inline]
pub fn point_id_for(record_id: &str) -> u64 {
    hash_to_u64(record_id.as_bytes())
}

/// Short hex fingerprint used to correlate log lines without logging query text.
pub fn query_fingerprint(query: &str) -> String {
    let hash = blake3::hash(query.as_bytes());
    hash.to_hex()[..16].to_string()
}
