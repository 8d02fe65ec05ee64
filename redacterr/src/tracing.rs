//! Adapters for emitting redacted errors through `tracing`.
//!
//! - **`TracingRedactedExt`**: logs any [`Redact`] value as its redacted
//!   display string
//! - **`log_stack_trace`**: emits the earliest stack trace of an error chain at
//!   `DEBUG` level, without any message text
//! - **`log_report`**: emits a [`Report`] at `ERROR` level
//!
//! # Example
//!
//! ```ignore
//! use redacterr::tracing::TracingRedactedExt;
//!
//! tracing::warn!(error = %err.tracing_redacted(), "request failed");
//! redacterr::tracing::log_stack_trace(&err);
//! ```

use std::error::Error;

use tracing::field::{DisplayValue, display};

use crate::{chain, redact::Redact, report::Report, trace::display_frames};

/// Extension trait for logging redacted values as display strings.
pub trait TracingRedactedExt {
    /// Wraps the redacted form of the value for `tracing`.
    fn tracing_redacted(&self) -> DisplayValue<String>;
}

impl<T> TracingRedactedExt for T
where
    T: Redact,
{
    fn tracing_redacted(&self) -> DisplayValue<String> {
        display(self.redacted().to_string())
    }
}

/// Emits the earliest stack trace in the chain of `err` at `DEBUG` level.
///
/// Does nothing if no error in the chain captured a stack trace. The event
/// carries frames only, never the error's message.
pub fn log_stack_trace(err: &(dyn Error + 'static)) {
    if let Some(frames) = chain::earliest_stack_trace(err) {
        tracing::debug!(
            frames = frames.len(),
            stack = %display_frames(frames),
            "error stack trace"
        );
    }
}

/// Emits `report` at `ERROR` level.
pub fn log_report(report: &Report) {
    tracing::error!(
        kind = report.kind(),
        message = report.message(),
        frames = report.frames().len(),
        "error report"
    );
}
