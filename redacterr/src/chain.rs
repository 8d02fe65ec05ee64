//! Walking error chains.
//!
//! Two walks are provided:
//!
//! - the **standard** walk ([`chain`], [`find`]) follows `Error::source()`
//!   and therefore stops at a [`RedactedError`], whose source is hidden
//! - the **comparison** walk ([`is`], [`is_io_kind`], [`earliest_stack_trace`])
//!   also steps through redaction boundaries. It only ever yields booleans or
//!   frames to callers, never the hidden errors themselves
//!
//! [`redacted_message`] renders the standard walk as a safe message for
//! errors that have no redacted form of their own.

use std::{
    error::Error,
    fmt::{self, Write as _},
    io,
    iter::FusedIterator,
    num::{ParseFloatError, ParseIntError, TryFromIntError},
    str::{ParseBoolError, Utf8Error},
    string::FromUtf8Error,
};

use crate::{
    redact::{Placeholder, Redact},
    redacted::RedactedError,
    trace::{self, Frame},
    traced::TracedError,
};

// =============================================================================
// Standard walk
// =============================================================================

/// Iterator over an error and its sources, outermost first.
#[derive(Clone, Debug)]
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl FusedIterator for Chain<'_> {}

/// Iterates over `err` and its sources via `Error::source()`.
pub fn chain<'a>(err: &'a (dyn Error + 'static)) -> Chain<'a> {
    Chain { next: Some(err) }
}

/// Returns the first error in the standard chain that is a `T`.
///
/// Does not look behind a [`RedactedError`]: handing out a reference to a
/// redacted source would defeat the redaction.
pub fn find<'a, T>(err: &'a (dyn Error + 'static)) -> Option<&'a T>
where
    T: Error + 'static,
{
    chain(err).find_map(|link| link.downcast_ref::<T>())
}

// =============================================================================
// Comparison walk
// =============================================================================

/// Like [`Chain`], but steps into the hidden source of a [`RedactedError`].
struct ComparisonLinks<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Iterator for ComparisonLinks<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = match current.downcast_ref::<RedactedError>() {
            Some(redacted) => Some(redacted.source_ref()),
            None => current.source(),
        };
        Some(current)
    }
}

fn comparison_links<'a>(err: &'a (dyn Error + 'static)) -> ComparisonLinks<'a> {
    ComparisonLinks { next: Some(err) }
}

/// Reports whether any error in the chain of `err` equals `target`.
///
/// Each link is downcast to `T` and compared with `PartialEq`. Redaction
/// layers anywhere in the chain are transparent to this comparison.
pub fn is<T>(err: &(dyn Error + 'static), target: &T) -> bool
where
    T: Error + PartialEq + 'static,
{
    comparison_links(err).any(|link| {
        link.downcast_ref::<T>()
            .is_some_and(|candidate| candidate == target)
    })
}

/// Reports whether the chain of `err` contains an [`io::Error`] of `kind`.
pub fn is_io_kind(err: &(dyn Error + 'static), kind: io::ErrorKind) -> bool {
    comparison_links(err)
        .filter_map(|link| link.downcast_ref::<io::Error>())
        .any(|io_err| io_err.kind() == kind)
}

/// Returns the stack trace of the deepest error in the chain that captured one.
///
/// The deepest capture is closest to where the failure originated. Returns
/// `None` if no error in the chain has the stack-trace capability.
pub fn earliest_stack_trace<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a [Frame]> {
    comparison_links(err).filter_map(trace::probe).last()
}

// =============================================================================
// Redacted chain messages
// =============================================================================

/// Builds a redacted message for `err` from its standard chain.
///
/// Each link renders as a [`Placeholder`], joined with `": "`, for example
/// `<redacted Error>: <redacted ParseIntError>`. A link with a redacted form
/// of its own ([`TracedError`], [`RedactedError`]) contributes that form and
/// ends the walk. Links of types this function cannot name render as
/// `<redacted dyn Error>`; use [`redacted_message_of`] to name the outermost
/// link after its static type.
pub fn redacted_message(err: &(dyn Error + 'static)) -> String {
    render_redacted(err, link_placeholder(err))
}

/// Like [`redacted_message`], naming the outermost link after `E`.
pub fn redacted_message_of<E>(err: &E) -> String
where
    E: Error + 'static,
{
    render_redacted(err, Placeholder::for_type::<E>())
}

fn render_redacted(err: &(dyn Error + 'static), outermost: Placeholder) -> String {
    let mut message = String::new();
    for (depth, link) in chain(err).enumerate() {
        if depth > 0 {
            message.push_str(": ");
        }
        if write_own_redacted(&mut message, link).is_some() {
            break;
        }
        let placeholder = if depth == 0 {
            outermost
        } else {
            link_placeholder(link)
        };
        // Writing to a String cannot fail.
        let _ = write!(message, "{placeholder}");
    }
    message
}

/// Appends the redacted form of `link` if its type has one.
fn write_own_redacted(message: &mut String, link: &(dyn Error + 'static)) -> Option<()> {
    let redacted: &dyn Redact = if let Some(traced) = link.downcast_ref::<TracedError>() {
        traced
    } else {
        link.downcast_ref::<RedactedError>()?
    };
    let _ = write!(message, "{}", OwnRedacted(redacted));
    Some(())
}

struct OwnRedacted<'a>(&'a dyn Redact);

impl fmt::Display for OwnRedacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_redacted(f)
    }
}

macro_rules! known_placeholder {
    ($link:expr, $($ty:ty),+ $(,)?) => {
        $(
            if $link.is::<$ty>() {
                return Placeholder::for_type::<$ty>();
            }
        )+
    };
}

fn link_placeholder(link: &(dyn Error + 'static)) -> Placeholder {
    known_placeholder!(
        link,
        io::Error,
        fmt::Error,
        ParseIntError,
        ParseFloatError,
        ParseBoolError,
        TryFromIntError,
        Utf8Error,
        FromUtf8Error,
    );
    Placeholder::for_type::<dyn Error>()
}
