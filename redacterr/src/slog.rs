//! Adapters for emitting redacted errors through `slog`.
//!
//! This module provides `slog::Value` implementations for the crate's error
//! types. It is responsible for:
//! - Ensuring the logged representation comes from [`Redact`], never from the
//!   error's `Display`.
//! - Emitting [`Report`]s as nested JSON via `slog`'s nested-value support.
//!
//! It does not configure `slog` or decide which errors get logged.

use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{
    redact::{Redact, RedactedRef},
    redacted::RedactedError,
    report::Report,
    traced::TracedError,
};

/// Marker trait for types whose `slog` integration always emits redacted output.
///
/// ```compile_fail
/// use redacterr::slog::SlogRedacted;
///
/// fn assert_slog_redacted<T: SlogRedacted>() {}
///
/// assert_slog_redacted::<String>();
/// ```
pub trait SlogRedacted: SlogValue {}

impl<T: SlogRedacted + ?Sized> SlogRedacted for &T {}

fn emit_redacted<T: Redact + ?Sized>(
    value: &T,
    key: Key,
    serializer: &mut dyn Serializer,
) -> SlogResult {
    serializer.emit_arguments(key, &format_args!("{}", RedactedRef::new(value)))
}

impl SlogValue for RedactedError {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        emit_redacted(self, key, serializer)
    }
}

impl SlogRedacted for RedactedError {}

impl SlogValue for TracedError {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        emit_redacted(self, key, serializer)
    }
}

impl SlogRedacted for TracedError {}

impl<T> SlogValue for RedactedRef<'_, T>
where
    T: Redact + ?Sized,
{
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        serializer.emit_arguments(key, &format_args!("{self}"))
    }
}

impl<T> SlogRedacted for RedactedRef<'_, T> where T: Redact + ?Sized {}

impl SlogValue for Report {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.to_json());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

impl SlogRedacted for Report {}
