use serde_json::{Map, Value};

/// Token payload in one of the encodings a caller can attach to a request.
///
/// The encoding is carried by the variant tag, so decoding is a single match
/// instead of runtime type sniffing. All three variants decode to the same
/// claim mapping and produce identical verdicts for identical claim values.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenPayload {
    /// Already-decoded claim mapping, used as-is.
    Claims(Map<String, Value>),
    /// JSON text, decoded on demand.
    Json(String),
    /// MessagePack-encoded map, decoded on demand.
    MessagePack(Vec<u8>),
}

impl TokenPayload {
    /// Build an already-decoded payload from key/value claim pairs.
    pub fn claims<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Claims(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Decode into a claim mapping.
    ///
    /// Idempotent and side-effect-free: the same input always yields the same
    /// mapping and the payload itself is never mutated. Undecodable or
    /// non-object input degrades to an empty mapping, which deterministically
    /// fails the subsequent claim lookup rather than surfacing a decode error.
    pub fn decode(&self) -> Map<String, Value> {
        match self {
            Self::Claims(map) => map.clone(),
            Self::Json(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            },
            Self::MessagePack(bytes) => match rmp_serde::from_slice::<Value>(bytes) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            },
        }
    }
}

impl From<Map<String, Value>> for TokenPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self::Claims(map)
    }
}

/// A claim value that is null, an empty string, or an empty collection
/// carries no usable anti-CSRF material.
pub(crate) fn claim_is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claims_decode() {
        let payload = TokenPayload::claims([("csrf", "csrftoken"), ("uid", "1")]);
        let decoded = payload.decode();
        assert_eq!(decoded.get("csrf"), Some(&json!("csrftoken")));
        assert_eq!(decoded.get("uid"), Some(&json!("1")));
    }

    #[test]
    fn test_json_decode() {
        let payload = TokenPayload::Json(r#"{"csrf":"csrftoken","uid":1}"#.to_string());
        let decoded = payload.decode();
        assert_eq!(decoded.get("csrf"), Some(&json!("csrftoken")));
        assert_eq!(decoded.get("uid"), Some(&json!(1)));
    }

    #[test]
    fn test_messagepack_decode() {
        let mut claims = Map::new();
        claims.insert("csrf".to_string(), json!("csrftoken"));
        let bytes = rmp_serde::to_vec_named(&Value::Object(claims.clone())).unwrap();

        let payload = TokenPayload::MessagePack(bytes);
        assert_eq!(payload.decode(), claims);
    }

    #[test]
    fn test_decode_is_idempotent() {
        let payload = TokenPayload::Json(r#"{"csrf":"csrftoken"}"#.to_string());
        let first = payload.decode();
        let second = payload.decode();
        assert_eq!(first, second);
    }

    #[test]
    fn test_encodings_decode_to_equivalent_mapping() {
        let claims = TokenPayload::claims([("csrf", "csrftoken")]);
        let text = TokenPayload::Json(r#"{"csrf":"csrftoken"}"#.to_string());
        let binary = TokenPayload::MessagePack(
            rmp_serde::to_vec_named(&json!({"csrf": "csrftoken"})).unwrap(),
        );

        assert_eq!(claims.decode(), text.decode());
        assert_eq!(text.decode(), binary.decode());
    }

    #[test]
    fn test_malformed_json_degrades_to_empty_mapping() {
        let payload = TokenPayload::Json("not json at all".to_string());
        assert!(payload.decode().is_empty());
    }

    #[test]
    fn test_non_object_json_degrades_to_empty_mapping() {
        let payload = TokenPayload::Json(r#""just a string""#.to_string());
        assert!(payload.decode().is_empty());

        let payload = TokenPayload::Json("[1, 2, 3]".to_string());
        assert!(payload.decode().is_empty());
    }

    #[test]
    fn test_malformed_messagepack_degrades_to_empty_mapping() {
        let payload = TokenPayload::MessagePack(vec![0xc1, 0xff, 0x00]);
        assert!(payload.decode().is_empty());
    }

    #[test]
    fn test_claim_emptiness() {
        assert!(claim_is_empty(&Value::Null));
        assert!(claim_is_empty(&json!("")));
        assert!(claim_is_empty(&json!([])));
        assert!(claim_is_empty(&json!({})));
        assert!(!claim_is_empty(&json!("csrftoken")));
        assert!(!claim_is_empty(&json!(0)));
    }
}
