//! Integration tests for `#[derive(Redact)]`.
//!
//! These tests verify that:
//! - thiserror templates drive both `Display` and the redacted form
//! - unannotated fields render as placeholders, never as values
//! - `#[safe]` and `#[redact(nested)]` select raw and delegated rendering

use std::{fmt, io};

use redacterr::{Redact, RedactedError, Report, traced};

#[derive(Debug, thiserror::Error, Redact)]
#[error("user {user} not found after {attempts} attempts")]
struct LookupError {
    user: String,
    #[safe]
    attempts: u32,
}

#[derive(Debug, thiserror::Error, Redact)]
enum StoreError {
    #[error("record {0} missing")]
    Missing(u64),
    #[error("permission denied for {user} on {path:?}")]
    Denied {
        user: String,
        #[safe]
        path: &'static str,
    },
    #[error("lookup failed: {0}")]
    Lookup(#[redact(nested)] LookupError),
    #[error("storage offline")]
    Offline,
}

/// Config file {path} is unreadable
#[derive(Debug, Redact)]
struct ConfigError {
    path: String,
}

#[derive(Debug, thiserror::Error, Redact)]
#[error(transparent)]
#[redact("io failure")]
struct Transparent(io::Error);

#[derive(Debug, thiserror::Error, Redact)]
#[error("{kind} in {value}")]
struct Generic<K, V> {
    #[safe]
    kind: K,
    value: V,
}

#[derive(Debug, thiserror::Error, Redact)]
#[error("wrapped: {inner}")]
struct Outer<E: std::error::Error + Redact + 'static> {
    #[redact(nested)]
    inner: E,
}

mod structs {
    use super::*;

    #[test]
    fn display_is_raw_and_redacted_form_is_not() {
        let err = LookupError {
            user: "alice@example.com".into(),
            attempts: 3,
        };
        assert_eq!(
            err.to_string(),
            "user alice@example.com not found after 3 attempts"
        );
        assert_eq!(
            err.redacted().to_string(),
            "user <redacted String> not found after 3 attempts"
        );
    }

    #[test]
    fn doc_comment_template() {
        let err = ConfigError {
            path: "/etc/secret.toml".into(),
        };
        assert_eq!(
            err.redacted().to_string(),
            "Config file <redacted String> is unreadable"
        );
    }

    #[test]
    fn redact_template_overrides_transparent() {
        let err = Transparent(io::Error::other("/home/alice"));
        assert_eq!(err.to_string(), "/home/alice");
        assert_eq!(err.redacted().to_string(), "io failure");
    }

    #[test]
    fn generic_fields_use_their_own_bounds() {
        let err = Generic {
            kind: "timeout",
            value: vec![1_u8, 2, 3],
        };
        assert_eq!(err.redacted().to_string(), "timeout in <redacted Vec<u8>>");
    }

    #[test]
    fn generic_placeholder_needs_no_display() {
        struct Opaque;

        let err = Generic {
            kind: 7_u16,
            value: Opaque,
        };
        let rendered = err.redacted().to_string();
        assert!(rendered.starts_with("7 in <redacted "));
        assert!(rendered.ends_with("Opaque>"));
    }
}

mod enums {
    use super::*;

    #[test]
    fn tuple_variant_placeholder() {
        assert_eq!(
            StoreError::Missing(42).redacted().to_string(),
            "record <redacted u64> missing"
        );
    }

    #[test]
    fn named_variant_safe_debug_field() {
        let err = StoreError::Denied {
            user: "alice".into(),
            path: "/srv/data",
        };
        assert_eq!(
            err.redacted().to_string(),
            "permission denied for <redacted String> on \"/srv/data\""
        );
    }

    #[test]
    fn nested_variant_delegates() {
        let err = StoreError::Lookup(LookupError {
            user: "alice".into(),
            attempts: 2,
        });
        assert_eq!(
            err.redacted().to_string(),
            "lookup failed: user <redacted String> not found after 2 attempts"
        );
    }

    #[test]
    fn unit_variant() {
        assert_eq!(StoreError::Offline.redacted().to_string(), "storage offline");
    }
}

mod nesting {
    use super::*;

    #[test]
    fn nested_traced_error_keeps_placeholders() {
        let err = Outer {
            inner: traced!("token {} expired", "abc123"),
        };
        assert_eq!(
            err.redacted().to_string(),
            "wrapped: token <redacted &str> expired"
        );
    }

    #[test]
    fn nested_redacted_error_is_empty() {
        let err = Outer {
            inner: RedactedError::new(io::Error::other("/secret")),
        };
        assert_eq!(err.redacted().to_string(), "wrapped: ");
    }

    #[test]
    fn report_uses_derived_form() {
        let report = Report::new(&StoreError::Missing(42));
        assert_eq!(report.kind(), "StoreError");
        assert_eq!(report.message(), "record <redacted u64> missing");
        assert!(report.frames().is_empty());
    }

    #[test]
    fn debug_of_redacted_ref_matches_display() {
        let err = StoreError::Missing(42);
        assert_eq!(
            format!("{:?}", err.redacted()),
            format!("{}", err.redacted())
        );
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Config file {} is unreadable", self.path)
    }
}
