//! Redacted message support.
//!
//! This module provides the pieces used to build safe error messages:
//!
//! - [`Redact`]: Trait for types that define an alternative, redacted message
//! - [`RedactedRef`]: Display wrapper that uses `fmt_redacted`
//! - [`Placeholder`]: Stand-in rendered as `<redacted TYPE>` for values that
//!   must not appear in a redacted message

use std::{any::type_name, fmt};

// =============================================================================
// Redact - Trait for redacted message formatting
// =============================================================================

/// Formats a redacted representation of a value, usually an error.
///
/// Implementors keep their own `Display` for internal use and expose a safe
/// alternative through this trait. Use `#[derive(Redact)]` to generate an
/// implementation from a message template.
pub trait Redact {
    /// Formats the redacted representation of `self`.
    fn fmt_redacted(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Returns a wrapper that implements `Display` using `fmt_redacted`.
    fn redacted(&self) -> RedactedRef<'_, Self>
    where
        Self: Sized,
    {
        RedactedRef(self)
    }
}

impl<T: Redact + ?Sized> Redact for &T {
    fn fmt_redacted(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt_redacted(f)
    }
}

impl<T: Redact + ?Sized> Redact for Box<T> {
    fn fmt_redacted(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt_redacted(f)
    }
}

// =============================================================================
// RedactedRef - Display wrapper for redacted messages
// =============================================================================

/// Display wrapper that uses `Redact::fmt_redacted`.
pub struct RedactedRef<'a, T: ?Sized>(&'a T);

impl<'a, T: Redact + ?Sized> RedactedRef<'a, T> {
    /// Wraps a reference to a redactable value.
    pub fn new(value: &'a T) -> Self {
        Self(value)
    }
}

impl<T: Redact + ?Sized> fmt::Display for RedactedRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_redacted(f)
    }
}

impl<T: Redact + ?Sized> fmt::Debug for RedactedRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_redacted(f)
    }
}

// =============================================================================
// Placeholder
// =============================================================================

/// Stand-in for a value that must not appear in a redacted message.
///
/// Renders as `<redacted TYPE>`, where `TYPE` is the value's type name with
/// module paths stripped. Both `Display` and `Debug` produce the same text.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    type_name: &'static str,
}

impl Placeholder {
    /// Placeholder for the type of `value`. The value itself is never read.
    pub fn of<T: ?Sized>(_value: &T) -> Self {
        Self::for_type::<T>()
    }

    /// Placeholder for `T`.
    pub fn for_type<T: ?Sized>() -> Self {
        Self {
            type_name: type_name::<T>(),
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<redacted {}>", strip_paths(self.type_name))
    }
}

impl fmt::Debug for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Returns the name of `T` with module paths stripped.
///
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub fn short_type_name<T: ?Sized>() -> String {
    strip_paths(type_name::<T>())
}

fn strip_paths(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    // Start of the path segment currently being written to `out`.
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
            continue;
        }
        out.push(ch);
        if !(ch.is_alphanumeric() || ch == '_') {
            segment_start = out.len();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LoginFailure {
        user: String,
    }

    impl Redact for LoginFailure {
        fn fmt_redacted(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "login failed for {}", Placeholder::of(&self.user))
        }
    }

    mod short_names {
        use super::*;

        #[test]
        fn strips_std_paths() {
            assert_eq!(short_type_name::<String>(), "String");
            assert_eq!(short_type_name::<Vec<String>>(), "Vec<String>");
            assert_eq!(
                short_type_name::<Result<Option<String>, std::io::Error>>(),
                "Result<Option<String>, Error>"
            );
        }

        #[test]
        fn keeps_primitives_and_references() {
            assert_eq!(short_type_name::<i32>(), "i32");
            assert_eq!(short_type_name::<&str>(), "&str");
            assert_eq!(short_type_name::<Option<&u8>>(), "Option<&u8>");
        }

        #[test]
        fn strips_trait_object_paths() {
            assert_eq!(
                short_type_name::<dyn std::error::Error>(),
                "dyn Error"
            );
        }

        #[test]
        fn strips_local_type_paths() {
            assert_eq!(short_type_name::<LoginFailure>(), "LoginFailure");
        }
    }

    mod placeholder {
        use super::*;

        #[test]
        fn renders_type_not_value() {
            let secret = String::from("hunter2");
            let placeholder = Placeholder::of(&secret);
            assert_eq!(placeholder.to_string(), "<redacted String>");
            assert!(!format!("{placeholder:?}").contains("hunter2"));
        }

        #[test]
        fn debug_matches_display() {
            let placeholder = Placeholder::for_type::<u64>();
            assert_eq!(format!("{placeholder:?}"), format!("{placeholder}"));
        }

        #[test]
        fn of_unsized_value() {
            let path: &str = "/secret/path";
            assert_eq!(Placeholder::of(path).to_string(), "<redacted str>");
        }
    }

    mod redacted_ref {
        use super::*;

        #[test]
        fn display_uses_fmt_redacted() {
            let err = LoginFailure {
                user: "alice".into(),
            };
            assert_eq!(
                err.redacted().to_string(),
                "login failed for <redacted String>"
            );
        }

        #[test]
        fn debug_uses_fmt_redacted() {
            let err = LoginFailure {
                user: "alice".into(),
            };
            let debug = format!("{:?}", err.redacted());
            assert!(!debug.contains("alice"));
        }

        #[test]
        fn works_through_references_and_boxes() {
            let err = LoginFailure {
                user: "alice".into(),
            };
            let boxed: Box<dyn Redact> = Box::new(err);
            assert_eq!(
                RedactedRef::new(&boxed).to_string(),
                "login failed for <redacted String>"
            );
        }
    }
}
