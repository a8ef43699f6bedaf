use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use ulid::Ulid;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// SHA-256 over the compact serialization of a JSON value. Object keys come
/// out sorted, so equal documents fingerprint equally regardless of the key
/// order the generator used.
pub fn json_fingerprint(value: &Value) -> String {
    sha256_hex(value.to_string().as_bytes())
}

/// Fingerprint of a typed value through its JSON form. Fields that decode
/// to the same value (absent vs. `null` optionals) hash identically.
pub fn document_fingerprint<T: Serialize>(doc: &T) -> serde_json::Result<String> {
    Ok(json_fingerprint(&serde_json::to_value(doc)?))
}

pub fn evaluation_id_ulid() -> String {
    format!("e_{}", Ulid::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fingerprint_ignores_key_order() {
        let a: Value = serde_json::from_str(r#"{"b": 1, "a": [true, null]}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a": [true, null], "b": 1}"#).unwrap();
        assert_eq!(json_fingerprint(&a), json_fingerprint(&b));
        assert_ne!(json_fingerprint(&a), json_fingerprint(&json!({"b": 2, "a": [true, null]})));
    }

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn evaluation_ids_are_prefixed_and_unique() {
        let a = evaluation_id_ulid();
        let b = evaluation_id_ulid();
        assert!(a.starts_with("e_"));
        assert_eq!(a.len(), 2 + 26);
        assert_ne!(a, b);
    }
}
