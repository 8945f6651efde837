//! # Content Addresser
//!
//! Deterministic identity derivation for every record in the engine.
//!
//! All digests are BLAKE3 with a 32-byte output. Each input value is
//! rendered to a canonical byte sequence, the sequences are concatenated in
//! argument order, and the concatenation is hashed once. The functions here
//! are pure: no I/O, no randomness, no error conditions.

use crate::{Digest, ScalarValue};

/// Byte sentinel hashed in place of null-like values.
///
/// The text values `"None"` and `"NULL"` alias the null sentinel, matching
/// the historical wire behavior of data imported from dynamically-typed
/// producers.
const NULL_SENTINEL: &[u8] = b"null";

fn update(hasher: &mut blake3::Hasher, value: &ScalarValue) {
    match value {
        ScalarValue::Null => {
            hasher.update(NULL_SENTINEL);
        }
        ScalarValue::Text(text) => {
            if text == "None" || text == "NULL" {
                hasher.update(NULL_SENTINEL);
            } else {
                hasher.update(text.as_bytes());
            }
        }
        ScalarValue::Bytes(bytes) => {
            hasher.update(bytes);
        }
        ScalarValue::Int(n) => {
            hasher.update(format!("{n}").as_bytes());
        }
        // {:?} always renders a fractional part ("1.0", not "1"), keeping
        // Float(1.0) distinct from Int(1).
        ScalarValue::Float(x) => {
            hasher.update(format!("{x:?}").as_bytes());
        }
    }
}

/// Digest a single scalar value.
#[must_use]
pub fn digest_value(value: &ScalarValue) -> Digest {
    digest_values(std::slice::from_ref(value))
}

/// Digest an ordered tuple of scalar values.
#[must_use]
pub fn digest_values(values: &[ScalarValue]) -> Digest {
    let mut hasher = blake3::Hasher::new();
    for value in values {
        update(&mut hasher, value);
    }
    Digest(*hasher.finalize().as_bytes())
}

/// Digest an ordered tuple of existing digests (composite keys: edge
/// identities, triple identities, auxiliary index keys).
#[must_use]
pub fn digest_keys(keys: &[Digest]) -> Digest {
    let mut hasher = blake3::Hasher::new();
    for key in keys {
        hasher.update(key.as_bytes());
    }
    Digest(*hasher.finalize().as_bytes())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_input_equal_digest() {
        let a = digest_value(&ScalarValue::text("hello"));
        let b = digest_value(&ScalarValue::text("hello"));
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_input_distinct_digest() {
        let a = digest_value(&ScalarValue::text("hello"));
        let b = digest_value(&ScalarValue::text("world"));
        assert_ne!(a, b);
    }

    #[test]
    fn null_aliases() {
        let null = digest_value(&ScalarValue::Null);
        assert_eq!(digest_value(&ScalarValue::text("None")), null);
        assert_eq!(digest_value(&ScalarValue::text("NULL")), null);
        assert_ne!(digest_value(&ScalarValue::text("null")), null);
    }

    #[test]
    fn int_and_float_render_apart() {
        let int = digest_value(&ScalarValue::Int(1));
        let float = digest_value(&ScalarValue::Float(1.0));
        assert_ne!(int, float);
        // Int(1) hashes the same bytes as the text "1".
        assert_eq!(int, digest_value(&ScalarValue::text("1")));
        assert_eq!(float, digest_value(&ScalarValue::text("1.0")));
    }

    #[test]
    fn argument_order_matters() {
        let ab = digest_values(&[ScalarValue::text("a"), ScalarValue::text("b")]);
        let ba = digest_values(&[ScalarValue::text("b"), ScalarValue::text("a")]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn composite_keys_are_order_sensitive() {
        let x = digest_value(&ScalarValue::Int(1));
        let y = digest_value(&ScalarValue::Int(2));
        assert_ne!(digest_keys(&[x, y]), digest_keys(&[y, x]));
        assert_eq!(digest_keys(&[x, y]), digest_keys(&[x, y]));
    }

    #[test]
    fn bytes_hash_verbatim() {
        let raw = digest_value(&ScalarValue::bytes(b"abc".to_vec()));
        let text = digest_value(&ScalarValue::text("abc"));
        // Same byte stream feeds the hash, so these coincide by design.
        assert_eq!(raw, text);
    }
}
