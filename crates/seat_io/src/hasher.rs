//! crates/seat_io/src/hasher.rs
//!
//! SHA-256 digests and content-derived IDs.
//!
//! - `sha256_canonical(..)` hashes a value through canonical JSON, so key
//!   order and whitespace never change the digest.
//! - `sha256_hex(..)` hashes raw bytes.
//! - Hex digests are lowercase.

#![forbid(unsafe_code)]

use digest::Digest;
use serde::Serialize;
use sha2::Sha256;

use crate::canonical_json::to_canonical_bytes;
use crate::IoResult;

/// Prefix of result IDs.
pub const RESULT_ID_PREFIX: &str = "RES:";

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over the canonical JSON bytes of `value`.
pub fn sha256_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    let bytes = to_canonical_bytes(value)?;
    Ok(sha256_hex(&bytes))
}

/// `RES:<hex64>` derived from the canonical bytes of `value`.
pub fn res_id_from_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    Ok(format!("{RESULT_ID_PREFIX}{}", sha256_canonical(value)?))
}

/// True for a lowercase 64-hex digest.
pub fn is_lower_hex_64(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_vector_lowercase() {
        let h = sha256_hex(b"abc");
        assert_eq!(h, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert!(is_lower_hex_64(&h));
        assert!(!is_lower_hex_64(&h.to_uppercase()));
    }

    #[test]
    fn canonical_hash_ignores_key_order() {
        #[derive(Serialize)]
        struct Row {
            seats: u32,
            party: &'static str,
        }
        let a = sha256_canonical(&Row { seats: 2, party: "A" }).unwrap();
        let b = sha256_canonical(&json!({"party": "A", "seats": 2})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn result_id_shape() {
        let id = res_id_from_canonical(&json!({"x": 1})).unwrap();
        assert!(id.starts_with("RES:"));
        assert!(is_lower_hex_64(&id[4..]));
    }
}
