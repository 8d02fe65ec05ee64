//! Stack trace capture and the `StackTrace` capability.
//!
//! - [`Frame`]: one call-site record (function, file, line)
//! - [`Frames`]: an immutable, cheaply clonable frame sequence, innermost first
//! - [`StackTrace`]: the optional capability an error implements to expose the
//!   frames captured when it was created
//!
//! Frames are captured once and never recomputed. Wrappers hand out borrowed
//! slices of the sequence their source holds.

use std::{error::Error, fmt, ops::Deref, panic::Location, sync::Arc};

use crate::{redacted::RedactedError, traced::TracedError};

/// Function name used when a frame's symbol cannot be resolved.
const UNKNOWN_FUNCTION: &str = "<unknown>";

/// Leading frames that belong to the capture machinery rather than the caller.
const CAPTURE_FRAMES: &[&str] = &[
    "backtrace::",
    "redacterr::trace::Frames::capture",
    "redacterr::traced::TracedError::__from_parts",
];

// =============================================================================
// Frame
// =============================================================================

/// A single call-site record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Frame {
    function: String,
    file: String,
    line: u32,
}

impl Frame {
    /// Creates a frame from its parts.
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            file: file.into(),
            line,
        }
    }

    /// Fully qualified function name, or `<unknown>` if it could not be resolved.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Source file path. Empty if it could not be resolved.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Line number within `file`. Zero if it could not be resolved.
    pub fn line(&self) -> u32 {
        self.line
    }

    fn from_location(location: &Location<'_>) -> Self {
        Self::new(UNKNOWN_FUNCTION, location.file(), location.line())
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\t{}:{}", self.function, self.file, self.line)
    }
}

// =============================================================================
// Frames
// =============================================================================

/// An ordered, immutable frame sequence. The innermost frame comes first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frames(Arc<[Frame]>);

impl Frames {
    /// Captures the current call stack.
    ///
    /// Frames belonging to the capture itself are dropped, so the first frame
    /// is the function that asked for the capture. If no symbol can be
    /// resolved (for example in a stripped binary), the sequence holds a
    /// single frame for the caller's location, so it is never empty.
    #[track_caller]
    #[inline(never)]
    pub fn capture() -> Self {
        let caller = Location::caller();
        let backtrace = backtrace::Backtrace::new();
        let frames: Vec<Frame> = backtrace
            .frames()
            .iter()
            .flat_map(backtrace::BacktraceFrame::symbols)
            .map(|symbol| {
                let function = symbol
                    .name()
                    .map_or_else(|| UNKNOWN_FUNCTION.to_string(), |name| format!("{name:#}"));
                let file = symbol
                    .filename()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default();
                Frame::new(function, file, symbol.lineno().unwrap_or_default())
            })
            .skip_while(|frame| {
                CAPTURE_FRAMES
                    .iter()
                    .any(|prefix| frame.function.starts_with(prefix))
            })
            .collect();

        if frames.is_empty() {
            return Self::from(vec![Frame::from_location(caller)]);
        }
        Self::from(frames)
    }

    /// Returns the frames as a slice.
    pub fn as_slice(&self) -> &[Frame] {
        &self.0
    }
}

impl Deref for Frames {
    type Target = [Frame];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[Frame]> for Frames {
    fn as_ref(&self) -> &[Frame] {
        &self.0
    }
}

impl From<Vec<Frame>> for Frames {
    fn from(frames: Vec<Frame>) -> Self {
        Self(frames.into())
    }
}

// =============================================================================
// StackTrace - the optional capability
// =============================================================================

/// Exposes the frames captured when an error was created.
///
/// This is an optional capability: most errors do not implement it. Wrappers
/// that hold type-erased errors query it at runtime (see
/// [`RedactedError::try_stack_trace`]).
pub trait StackTrace {
    /// Returns the captured frames, innermost first.
    fn stack_trace(&self) -> &[Frame];
}

impl StackTrace for Frames {
    fn stack_trace(&self) -> &[Frame] {
        self
    }
}

/// Queries a type-erased error for the stack-trace capability.
///
/// Only the crate's own stack-capturing types are recognised here. Foreign
/// types register their capability through [`RedactedError::with_stack_trace`].
pub(crate) fn probe<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a [Frame]> {
    if let Some(traced) = err.downcast_ref::<TracedError>() {
        return Some(traced.stack_trace());
    }
    if let Some(redacted) = err.downcast_ref::<RedactedError>() {
        return redacted.try_stack_trace();
    }
    None
}

// =============================================================================
// Rendering
// =============================================================================

/// Returns a `Display` adapter that prints each frame on its own lines.
///
/// Every frame is preceded by a newline, so the output can be appended
/// directly after a message.
pub fn display_frames(frames: &[Frame]) -> FramesDisplay<'_> {
    FramesDisplay(frames)
}

/// Display adapter returned by [`display_frames`].
#[derive(Clone, Copy, Debug)]
pub struct FramesDisplay<'a>(&'a [Frame]);

impl fmt::Display for FramesDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in self.0 {
            write!(f, "\n{frame}")?;
        }
        Ok(())
    }
}
