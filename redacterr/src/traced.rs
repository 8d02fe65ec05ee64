//! Errors that carry both a full and a redacted message, plus a stack trace.
//!
//! Build them with [`traced!`](crate::traced). Arguments are redacted to a
//! [`Placeholder`](crate::Placeholder) in the redacted message unless marked
//! with `safe(...)`:
//!
//! ```
//! use redacterr::{Redact, traced};
//!
//! let name = String::from("Alex");
//! let id = 5;
//! let err = traced!("error getting user {} with ID {}", name, safe(id));
//!
//! assert_eq!(err.to_string(), "error getting user Alex with ID 5");
//! assert_eq!(
//!     err.redacted().to_string(),
//!     "error getting user <redacted String> with ID 5"
//! );
//! ```

use std::{error::Error, fmt};

use crate::{
    redact::Redact,
    trace::{Frame, Frames, StackTrace, display_frames},
};

/// An error with a full message, a redacted message and the frames captured
/// where it was created.
///
/// `Display` shows the full message; the alternate form (`{:#}`) appends the
/// stack trace. [`Redact`] gives the redacted message.
pub struct TracedError {
    message: String,
    redacted: String,
    frames: Frames,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl TracedError {
    #[doc(hidden)]
    #[track_caller]
    #[inline(never)]
    pub fn __from_parts(message: String, redacted: String) -> Self {
        Self {
            message,
            redacted,
            frames: Frames::capture(),
            source: None,
        }
    }

    /// Attaches the error that caused this one.
    ///
    /// The cause is reachable through `Error::source()`, so chain comparisons
    /// see it. It does not contribute to either message.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// The frames captured at construction.
    pub fn frames(&self) -> &Frames {
        &self.frames
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if f.alternate() {
            write!(f, "{}", display_frames(&self.frames))?;
        }
        Ok(())
    }
}

impl fmt::Debug for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedError")
            .field("message", &self.message)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl Error for TracedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        let source: &(dyn Error + 'static) = self.source.as_deref()?;
        Some(source)
    }
}

impl Redact for TracedError {
    fn fmt_redacted(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted)
    }
}

impl StackTrace for TracedError {
    fn stack_trace(&self) -> &[Frame] {
        &self.frames
    }
}

/// Creates a [`TracedError`](crate::TracedError) from a format string,
/// capturing the stack at the call site.
///
/// The format string follows [`format!`]. Each argument is formatted as-is in
/// the full message and as a [`Placeholder`](crate::Placeholder) in the
/// redacted message. Wrap an argument in `safe(...)` to keep it in both, or
/// in `redact(...)` to use its own [`Redact`](crate::Redact) form in the
/// redacted message. Every argument is evaluated exactly once.
///
/// Inline captures such as `{name}` are not arguments: they are formatted
/// as-is in both messages. Pass sensitive values as arguments.
///
/// ```
/// use redacterr::{Redact, traced};
///
/// let path = "/home/alex/.ssh/id_rsa";
/// let err = traced!("cannot read {:?} (attempt {})", path, safe(3));
///
/// assert_eq!(err.to_string(), r#"cannot read "/home/alex/.ssh/id_rsa" (attempt 3)"#);
/// assert_eq!(err.redacted().to_string(), "cannot read <redacted &str> (attempt 3)");
///
/// let outer = traced!("config unavailable: {}", redact(err));
/// assert_eq!(
///     outer.redacted().to_string(),
///     "config unavailable: cannot read <redacted &str> (attempt 3)"
/// );
/// ```
#[macro_export]
macro_rules! traced {
    (@munch $fmt:literal [$(($raw:ident, $redacted:expr))*]) => {
        $crate::TracedError::__from_parts(
            ::std::format!($fmt $(, $raw)*),
            ::std::format!($fmt $(, $redacted)*),
        )
    };
    (@munch $fmt:literal [$($acc:tt)*] safe($arg:expr) $(, $($rest:tt)*)?) => {{
        let __arg = &$arg;
        $crate::traced!(@munch $fmt [$($acc)* (__arg, __arg)] $($($rest)*)?)
    }};
    (@munch $fmt:literal [$($acc:tt)*] redact($arg:expr) $(, $($rest:tt)*)?) => {{
        let __arg = &$arg;
        $crate::traced!(
            @munch $fmt [$($acc)* (__arg, $crate::RedactedRef::new(__arg))] $($($rest)*)?
        )
    }};
    (@munch $fmt:literal [$($acc:tt)*] $arg:expr $(, $($rest:tt)*)?) => {{
        let __arg = &$arg;
        $crate::traced!(
            @munch $fmt [$($acc)* (__arg, $crate::Placeholder::of(__arg))] $($($rest)*)?
        )
    }};
    ($fmt:literal $(,)?) => {
        $crate::traced!(@munch $fmt [])
    };
    ($fmt:literal, $($args:tt)+) => {
        $crate::traced!(@munch $fmt [] $($args)+)
    };
}
