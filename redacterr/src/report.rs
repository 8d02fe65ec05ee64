//! Diagnostic reports for internal error tracking.
//!
//! A [`Report`] is the payload an application hands to its error tracker:
//! the error's type, its redacted message and the earliest stack trace in its
//! chain. It never holds the unredacted message.

use std::error::Error;

use crate::{
    chain,
    redact::{Redact, short_type_name},
    trace::Frame,
};

/// Redacted, serializable summary of an error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Report {
    kind: String,
    message: String,
    frames: Vec<Frame>,
}

impl Report {
    /// Builds a report for `err`.
    ///
    /// `frames` is the earliest stack trace in the chain, looking through
    /// redaction layers, or empty if nothing in the chain captured one.
    pub fn new<E>(err: &E) -> Self
    where
        E: Error + Redact + 'static,
    {
        Self {
            kind: short_type_name::<E>(),
            message: err.redacted().to_string(),
            frames: chain::earliest_stack_trace(err)
                .map(<[Frame]>::to_vec)
                .unwrap_or_default(),
        }
    }

    /// Builds a report for an error with no redacted form of its own.
    ///
    /// The message is [`chain::redacted_message_of`]: placeholders for each
    /// link of the chain, up to the first [`TracedError`](crate::TracedError)
    /// or [`RedactedError`](crate::RedactedError).
    pub fn from_error<E>(err: &E) -> Self
    where
        E: Error + 'static,
    {
        Self {
            kind: short_type_name::<E>(),
            message: chain::redacted_message_of(err),
            frames: chain::earliest_stack_trace(err)
                .map(<[Frame]>::to_vec)
                .unwrap_or_default(),
        }
    }

    /// Short type name of the reported error.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Redacted message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Earliest stack trace in the chain, innermost frame first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Serializes the report as JSON.
    ///
    /// If serialization fails, the returned value is a JSON string describing
    /// the failure.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|err| {
            serde_json::Value::String(format!("Failed to serialize report: {err}"))
        })
    }
}
