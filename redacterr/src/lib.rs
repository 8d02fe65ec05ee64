//! Redacted errors that keep their identity and their stack trace.
//!
//! An error about to cross a trust boundary (a library API, an untrusted
//! output channel) can leak paths, tokens or internal identifiers through its
//! message. This crate separates:
//! - **The message**: suppressed by [`RedactedError`] (always empty), or
//!   replaced by a type-defined safe form via [`Redact`].
//! - **The identity**: sentinel comparison with [`RedactedError::is`] and
//!   [`chain::is`] sees through redaction, so kind-based branching keeps
//!   working.
//! - **The diagnostics**: frames captured at creation ([`TracedError`],
//!   [`traced!`]) stay reachable for internal logging via
//!   [`RedactedError::stack_trace`].
//!
//! What this crate does:
//! - wraps errors at the boundary and walks error chains
//! - captures stack traces and builds redacted [`Report`]s
//! - provides logging integrations behind feature flags (`tracing`, `slog`)
//!
//! What it does not do:
//! - configure or perform logging
//! - decide which errors need redacting
//!
//! The `Redact` derive macro lives in `redacterr-derive` and is re-exported
//! from this crate.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::needless_ifs,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::struct_excessive_bools,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::future_not_send,
    clippy::option_if_let_else,
    clippy::from_over_into,
    clippy::manual_inspect
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[cfg(feature = "derive")]
pub use redacterr_derive::Redact;

#[allow(unused_extern_crates)]
extern crate self as redacterr;

// Module declarations
pub mod chain;
mod redact;
mod redacted;
mod report;
pub mod trace;
mod traced;
#[cfg(feature = "slog")]
pub mod slog;
#[cfg(feature = "tracing")]
pub mod tracing;

pub use redact::{Placeholder, Redact, RedactedRef, short_type_name};
pub use redacted::{RedactedError, ResultExt};
pub use report::Report;
pub use trace::{Frame, Frames, StackTrace};
pub use traced::TracedError;
