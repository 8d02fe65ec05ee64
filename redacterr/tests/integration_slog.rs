//! Integration tests for the slog module.
//!
//! These tests verify that:
//! - The `slog::Value` implementations emit redacted text, never raw messages
//! - Reports are emitted as nested JSON
//! - Only redacting types carry the `SlogRedacted` marker

#![cfg(feature = "slog")]

use std::{cell::RefCell, collections::HashMap, fmt::Arguments};

use redacterr::{
    Redact, RedactedError, RedactedRef, Report, TracedError, slog::SlogRedacted, traced,
};
use serde_json::Value as JsonValue;

// A test serializer that captures serialized key-value pairs
struct CapturingSerializer {
    captured: RefCell<HashMap<String, CapturedValue>>,
}

#[derive(Debug, Clone, PartialEq)]
enum CapturedValue {
    Str(String),
    Serde(JsonValue),
    Other,
}

impl CapturingSerializer {
    fn new() -> Self {
        Self {
            captured: RefCell::new(HashMap::new()),
        }
    }

    fn get(&self, key: &str) -> Option<CapturedValue> {
        self.captured.borrow().get(key).cloned()
    }

    fn insert(&self, key: slog::Key, value: CapturedValue) -> slog::Result {
        self.captured.borrow_mut().insert(key.into(), value);
        Ok(())
    }
}

impl slog::Serializer for CapturingSerializer {
    fn emit_arguments(&mut self, key: slog::Key, val: &Arguments<'_>) -> slog::Result {
        self.insert(key, CapturedValue::Str(val.to_string()))
    }

    fn emit_str(&mut self, key: slog::Key, val: &str) -> slog::Result {
        self.insert(key, CapturedValue::Str(val.into()))
    }

    fn emit_unit(&mut self, key: slog::Key) -> slog::Result {
        self.insert(key, CapturedValue::Other)
    }

    fn emit_none(&mut self, key: slog::Key) -> slog::Result {
        self.insert(key, CapturedValue::Other)
    }

    fn emit_serde(&mut self, key: slog::Key, val: &dyn slog::SerdeValue) -> slog::Result {
        let json = serde_json::to_value(val.as_serde()).unwrap_or(JsonValue::Null);
        self.insert(key, CapturedValue::Serde(json))
    }
}

fn serialize_to_capture<V: slog::Value>(value: &V, key: &'static str) -> CapturedValue {
    static RS: slog::RecordStatic<'static> = slog::record_static!(slog::Level::Info, "");
    let args = format_args!("");
    let record = slog::Record::new(&RS, &args, slog::b!());
    let mut serializer = CapturingSerializer::new();
    value.serialize(&record, key, &mut serializer).unwrap();
    serializer.get(key).unwrap()
}

#[derive(Debug, thiserror::Error, Redact)]
#[error("user {user} not found")]
struct LookupError {
    user: String,
}

mod marker_trait {
    use super::*;

    fn assert_slog_redacted<T: SlogRedacted>() {}

    #[test]
    fn crate_types_implement_slog_redacted() {
        assert_slog_redacted::<RedactedError>();
        assert_slog_redacted::<TracedError>();
        assert_slog_redacted::<Report>();
        assert_slog_redacted::<RedactedRef<'static, LookupError>>();
        assert_slog_redacted::<&RedactedError>();
    }
}

mod values {
    use super::*;

    #[test]
    fn redacted_error_emits_empty_string() {
        let err = RedactedError::new(std::io::Error::other("/secret/path"));
        assert_eq!(
            serialize_to_capture(&err, "error"),
            CapturedValue::Str(String::new())
        );
    }

    #[test]
    fn traced_error_emits_placeholders() {
        let err = traced!("token {} rejected", "abc123");
        assert_eq!(
            serialize_to_capture(&err, "error"),
            CapturedValue::Str("token <redacted &str> rejected".into())
        );
    }

    #[test]
    fn redacted_ref_emits_derived_form() {
        let err = LookupError {
            user: "alice@example.com".into(),
        };
        assert_eq!(
            serialize_to_capture(&err.redacted(), "error"),
            CapturedValue::Str("user <redacted String> not found".into())
        );
    }

    #[test]
    fn report_emits_nested_json() {
        let report = Report::new(&LookupError {
            user: "alice@example.com".into(),
        });
        let CapturedValue::Serde(json) = serialize_to_capture(&report, "report") else {
            panic!("expected nested JSON");
        };
        assert_eq!(json["kind"], "LookupError");
        assert_eq!(json["message"], "user <redacted String> not found");
        assert_eq!(json["frames"], serde_json::json!([]));
        assert!(!json.to_string().contains("alice"));
    }

    #[test]
    fn report_json_includes_frames() {
        let report = Report::new(&RedactedError::new(traced!("lookup {}", "alice")));
        let CapturedValue::Serde(json) = serialize_to_capture(&report, "report") else {
            panic!("expected nested JSON");
        };
        let frames = json["frames"].as_array().unwrap();
        assert!(!frames.is_empty());
        assert!(frames[0]["function"].is_string());
        assert!(frames[0]["line"].is_u64());
        assert!(!json.to_string().contains("alice"));
    }
}
