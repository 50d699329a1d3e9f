//! Decoding of the `{ "body": ... }` response envelope.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;

/// Decode a response body into `T`.
///
/// Most endpoints wrap their payload as `{"email": .., "body": <T>, "status": ..}`.
/// When the wrapper is absent (a bare string, array, or an object without a
/// non-null `body`), the raw document is decoded directly instead.
pub fn decode_envelope<T: DeserializeOwned>(raw: &[u8]) -> Result<T> {
    let value: Value = serde_json::from_slice(raw)?;
    if let Value::Object(map) = &value {
        if let Some(body) = map.get("body").filter(|body| !body.is_null()) {
            return Ok(T::deserialize(body)?);
        }
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Token {
        token: String,
    }

    #[test]
    fn test_unwraps_body() {
        let raw = br#"{"email":"u@mail.ru","body":"/folder/a.txt","status":200}"#;
        let path: String = decode_envelope(raw).unwrap();
        assert_eq!(path, "/folder/a.txt");
    }

    #[test]
    fn test_unwraps_object_body() {
        let raw = br#"{"body":{"token":"abc"},"status":200}"#;
        let token: Token = decode_envelope(raw).unwrap();
        assert_eq!(token.token, "abc");
    }

    #[test]
    fn test_falls_back_without_wrapper() {
        let token: Token = decode_envelope(br#"{"token":"direct"}"#).unwrap();
        assert_eq!(token.token, "direct");

        let hash: String = decode_envelope(br#""C172C6E2FF47284FF33F348FEA7EECE532F6C051""#).unwrap();
        assert_eq!(hash.len(), 40);

        let list: Vec<u32> = decode_envelope(b"[1,2,3]").unwrap();
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[test]
    fn test_null_body_falls_back() {
        let token: Token = decode_envelope(br#"{"body":null,"token":"x"}"#).unwrap();
        assert_eq!(token.token, "x");
    }

    #[test]
    fn test_body_shape_mismatch_is_error() {
        let result: Result<String> = decode_envelope(br#"{"body":{"home":{"error":"exists"}}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_json_is_error() {
        let result: Result<String> = decode_envelope(b"not json");
        assert!(result.is_err());
    }
}
