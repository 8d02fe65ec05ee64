//! The redaction boundary.
//!
//! [`RedactedError`] wraps an error that is about to cross a trust boundary.
//! Its message is always empty, but callers can still:
//!
//! - compare it against sentinel errors ([`RedactedError::is`]), with the
//!   same result as comparing the original error chain
//! - retrieve the original stack trace for internal logging
//!   ([`RedactedError::stack_trace`])
//!
//! The source is never re-exposed: `Display` is empty, `Debug` is opaque and
//! `Error::source()` returns `None`, so chain renderers cannot reach it.

use std::{error::Error, fmt, io};

use crate::{
    chain,
    redact::Redact,
    trace::{self, Frame, StackTrace},
};

type BoxedSource = Box<dyn Error + Send + Sync + 'static>;

/// Reads the frames of a source whose concrete type is known to implement
/// [`StackTrace`].
type TraceAccessor = for<'a> fn(&'a (dyn Error + Send + Sync + 'static)) -> Option<&'a [Frame]>;

/// An error whose message has been suppressed.
///
/// Construct with [`RedactedError::new`], [`RedactedError::wrap`] or
/// [`ResultExt::redact_err`]. Once wrapped, branch on error kind with
/// [`RedactedError::is`], never on the message.
pub struct RedactedError {
    source: BoxedSource,
    trace: Option<TraceAccessor>,
}

impl RedactedError {
    /// Wraps `source`, suppressing its message.
    ///
    /// Wrapping an error that is already a `RedactedError` returns it
    /// unchanged: redaction is a single outer layer.
    pub fn new<E>(source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::from_boxed(Box::new(source))
    }

    /// Wraps an already boxed error.
    pub fn from_boxed(source: BoxedSource) -> Self {
        match source.downcast::<Self>() {
            Ok(redacted) => *redacted,
            Err(source) => Self {
                source,
                trace: None,
            },
        }
    }

    /// Wraps an optional error. No error in means no error out.
    pub fn wrap<E>(source: Option<E>) -> Option<Self>
    where
        E: Error + Send + Sync + 'static,
    {
        source.map(Self::new)
    }

    /// Wraps a source whose type implements [`StackTrace`], recording the
    /// capability so [`RedactedError::stack_trace`] can reach it.
    ///
    /// Only needed for stack-capturing error types defined outside this
    /// crate. [`TracedError`](crate::TracedError) is recognised by
    /// [`RedactedError::new`] directly. An already redacted source is
    /// returned unchanged, as with [`RedactedError::new`].
    pub fn with_stack_trace<E>(source: E) -> Self
    where
        E: Error + StackTrace + Send + Sync + 'static,
    {
        let source: BoxedSource = Box::new(source);
        match source.downcast::<Self>() {
            Ok(redacted) => *redacted,
            Err(source) => Self {
                source,
                trace: Some(read_frames::<E>),
            },
        }
    }

    /// Reports whether the source chain contains an error equal to `target`.
    ///
    /// Delegates to [`chain::is`] on the source, so the answer is the same as
    /// for the unwrapped error.
    pub fn is<T>(&self, target: &T) -> bool
    where
        T: Error + PartialEq + 'static,
    {
        chain::is(self.source_ref(), target)
    }

    /// Reports whether the source chain contains an [`io::Error`] of `kind`.
    pub fn is_io_kind(&self, kind: io::ErrorKind) -> bool {
        chain::is_io_kind(self.source_ref(), kind)
    }

    /// Returns the stack trace captured when the source was created.
    ///
    /// # Panics
    ///
    /// Panics if the source does not have the stack-trace capability. Only
    /// call this from diagnostic code that knows its errors come from a
    /// stack-capturing construction path; use
    /// [`RedactedError::try_stack_trace`] otherwise.
    #[track_caller]
    pub fn stack_trace(&self) -> &[Frame] {
        match self.try_stack_trace() {
            Some(frames) => frames,
            None => panic!("redacted error source does not capture a stack trace"),
        }
    }

    /// Returns the source's stack trace, or `None` if the source does not
    /// have the stack-trace capability.
    pub fn try_stack_trace(&self) -> Option<&[Frame]> {
        match self.trace {
            Some(read) => read(self.source.as_ref()),
            None => trace::probe(self.source_ref()),
        }
    }

    /// The hidden source, for comparison walks only. Never hand this out.
    pub(crate) fn source_ref(&self) -> &(dyn Error + 'static) {
        self.source.as_ref()
    }
}

fn read_frames<'a, E>(source: &'a (dyn Error + Send + Sync + 'static)) -> Option<&'a [Frame]>
where
    E: Error + StackTrace + 'static,
{
    source.downcast_ref::<E>().map(StackTrace::stack_trace)
}

impl fmt::Display for RedactedError {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl fmt::Debug for RedactedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedError").finish_non_exhaustive()
    }
}

impl Error for RedactedError {}

impl Redact for RedactedError {
    fn fmt_redacted(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl StackTrace for RedactedError {
    #[track_caller]
    fn stack_trace(&self) -> &[Frame] {
        Self::stack_trace(self)
    }
}

// =============================================================================
// ResultExt
// =============================================================================

/// Redacts the error side of a `Result`.
pub trait ResultExt<T> {
    /// Wraps an `Err` in [`RedactedError`]; `Ok` passes through.
    fn redact_err(self) -> Result<T, RedactedError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    fn redact_err(self) -> Result<T, RedactedError> {
        self.map_err(RedactedError::new)
    }
}
