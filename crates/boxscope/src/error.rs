#![forbid(unsafe_code)]

//! boxscope error model and graceful degradation.
//!
//! # Design Principles
//!
//! 1. **No error reaches the page**: pointer and resize handling never fail;
//!    errors only surface from construction and from inbound messages.
//! 2. **Domain-specific errors**: the protocol and the overlay engine keep
//!    their own typed errors; [`Error`] wraps them.
//! 3. **Graceful degradation**: every variant maps to a
//!    [`DegradationAction`] a host can apply without inspecting details.

use std::fmt;

use boxscope_web::{CommandParseError, OverlayError};

// ── Unified Error ───────────────────────────────────────────────────────

/// Top-level error type for boxscope hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An inbound protocol message could not be parsed.
    Protocol(CommandParseError),
    /// The overlay could not be configured or installed.
    Overlay(OverlayError),
}

/// Standard result type for boxscope APIs.
pub type Result<T> = std::result::Result<T, Error>;

// ── Graceful Degradation ────────────────────────────────────────────────

/// What a host should do when an error occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationAction {
    /// Keep running with the overlay hidden.
    HideOverlay,
    /// Run without painting; pointer events still reach the page.
    SkipPaint,
    /// Drop the offending message and keep processing.
    DropMessage,
}

impl Error {
    /// Determine the graceful degradation action for this error.
    pub fn degradation(&self) -> DegradationAction {
        match self {
            Self::Protocol(_) => DegradationAction::DropMessage,
            Self::Overlay(OverlayError::Presenter(_)) => DegradationAction::HideOverlay,
            Self::Overlay(OverlayError::InvalidConfig(_) | OverlayError::ConfigDecode(_)) => {
                DegradationAction::SkipPaint
            }
        }
    }

    /// Error type label for logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Protocol(_) => "protocol",
            Self::Overlay(_) => "overlay",
        }
    }
}

// ── Display ─────────────────────────────────────────────────────────────

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protocol(e) => write!(f, "protocol: {e}"),
            Self::Overlay(e) => write!(f, "overlay: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Protocol(e) => Some(e),
            Self::Overlay(e) => Some(e),
        }
    }
}

// ── Conversions ─────────────────────────────────────────────────────────

impl From<CommandParseError> for Error {
    fn from(err: CommandParseError) -> Self {
        Self::Protocol(err)
    }
}

impl From<OverlayError> for Error {
    fn from(err: OverlayError) -> Self {
        Self::Overlay(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;

    use super::*;

    #[test]
    fn protocol_errors_drop_message() {
        let err = Error::from(CommandParseError::MissingField("nodeId"));
        assert_eq!(err.degradation(), DegradationAction::DropMessage);
        assert_eq!(err.error_type(), "protocol");
        assert!(format!("{err}").contains("nodeId"));
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn presenter_errors_hide_overlay() {
        let err = Error::from(OverlayError::Presenter("detached".into()));
        assert_eq!(err.degradation(), DegradationAction::HideOverlay);
        assert_eq!(format!("{err}"), "overlay: presenter failed: detached");
    }

    #[test]
    fn config_errors_skip_paint() {
        for err in [
            OverlayError::InvalidConfig("indicator idle must be non-zero"),
            OverlayError::ConfigDecode("eof".into()),
        ] {
            let err = Error::from(err);
            assert_eq!(err.degradation(), DegradationAction::SkipPaint);
            assert_eq!(err.error_type(), "overlay");
        }
    }
}
