//! Unified error type for all reconciliation operations.
//!
//! `SyncError` is the single error type carried through every adapted call.
//! It serializes as `{ "kind": "...", "message": "..." }` so a consumer can
//! programmatically distinguish error categories.

use serde::ser::SerializeStruct;

/// Error reported by an external call or by the adapter itself.
///
/// Each variant maps to a distinct failure domain. Serialized form is a JSON
/// object with `kind` (variant name) and `message` (human-readable description).
#[derive(Debug, Clone, thiserror::Error)]
pub enum SyncError {
    /// The live rule engine rejected a set or clear call.
    #[error("{0}")]
    Engine(String),

    /// The synchronized store rejected a get, set, or clear call.
    #[error("{0}")]
    Store(String),

    /// A persisted value could not be encoded or decoded.
    #[error("{0}")]
    Codec(String),

    /// The completion callback was dropped before it fired.
    #[error("{0}")]
    Adapter(String),
}

impl SyncError {
    /// Returns the error kind as a string matching the variant name.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Engine(_) => "Engine",
            SyncError::Store(_) => "Store",
            SyncError::Codec(_) => "Codec",
            SyncError::Adapter(_) => "Adapter",
        }
    }
}

/// Custom Serialize: produces `{ "kind": "Variant", "message": "..." }`.
impl serde::Serialize for SyncError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut s = serializer.serialize_struct("SyncError", 2)?;
        s.serialize_field("kind", self.kind())?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

// ---- From implementations for ergonomic error conversion ----

impl From<anyhow::Error> for SyncError {
    fn from(err: anyhow::Error) -> Self {
        SyncError::Store(err.to_string())
    }
}

impl From<rusqlite::Error> for SyncError {
    fn from(err: rusqlite::Error) -> Self {
        SyncError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Codec(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_returns_correct_variant_name() {
        assert_eq!(SyncError::Engine("set failed".into()).kind(), "Engine");
        assert_eq!(SyncError::Store("write failed".into()).kind(), "Store");
        assert_eq!(SyncError::Codec("bad value".into()).kind(), "Codec");
        assert_eq!(SyncError::Adapter("dropped".into()).kind(), "Adapter");
    }

    #[test]
    fn test_error_display_shows_message() {
        let err = SyncError::Engine("quota exceeded".into());
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn test_error_serializes_as_kind_and_message() {
        let err = SyncError::Store("sync backend unavailable".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "Store");
        assert_eq!(json["message"], "sync backend unavailable");
    }

    #[test]
    fn test_from_rusqlite_produces_store_variant() {
        let err: SyncError = rusqlite::Error::InvalidQuery.into();
        assert_eq!(err.kind(), "Store");
    }

    #[test]
    fn test_from_serde_json_produces_codec_variant() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: SyncError = json_err.into();
        assert_eq!(err.kind(), "Codec");
    }

    #[test]
    fn test_all_variants_serialize_with_two_fields() {
        let variants: Vec<SyncError> = vec![
            SyncError::Engine("a".into()),
            SyncError::Store("b".into()),
            SyncError::Codec("c".into()),
            SyncError::Adapter("d".into()),
        ];
        for err in variants {
            let json = serde_json::to_value(&err).unwrap();
            let obj = json.as_object().unwrap();
            assert_eq!(obj.len(), 2, "Expected exactly 2 fields for {err:?}");
            assert!(obj.contains_key("kind"));
            assert!(obj.contains_key("message"));
        }
    }
}
