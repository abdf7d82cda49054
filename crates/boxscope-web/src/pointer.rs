#![forbid(unsafe_code)]

//! Pointer pipeline records and the listener plan.
//!
//! Every pointer event handed to
//! [`InspectController::dispatch_pointer`](crate::InspectController::dispatch_pointer)
//! produces a [`PointerDispatch`]: the notification (if any) sent to the
//! host, what the host must do with the DOM event, and a structured
//! [`PointerLogEntry`] describing the decision. Ignored events carry a
//! deterministic [`PointerIgnoredReason`].

use boxscope_backend::OverlayNotification;
use boxscope_core::{NodeId, Point, PointerCapabilities, PointerPhase};

/// Deterministic reason why a pointer event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerIgnoredReason {
    /// Inspect mode is `none`.
    InspectInactive,
    /// The event belongs to an input family the controller does not listen to.
    ListenerNotRegistered,
    /// A touch event with neither active nor changed touches.
    NoPointerPosition,
}

/// Outcome category for one pointer dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// The node under the pointer was painted and announced.
    Highlighted,
    /// The node under the pointer was committed; the overlay is hidden.
    Inspected,
    /// The pointer left the document; the overlay is hidden.
    Hidden,
    /// No element under the pointer; the overlay is hidden.
    NothingUnderPointer,
    /// The node under the pointer has no box to draw; nothing changed.
    NotHighlightable,
    /// A presenter operation failed; the overlay was hidden if possible.
    Degraded,
    Ignored(PointerIgnoredReason),
}

impl PointerOutcome {
    /// Short label for logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Highlighted => "highlighted",
            Self::Inspected => "inspected",
            Self::Hidden => "hidden",
            Self::NothingUnderPointer => "nothing_under_pointer",
            Self::NotHighlightable => "not_highlightable",
            Self::Degraded => "degraded",
            Self::Ignored(_) => "ignored",
        }
    }
}

/// What the host must do with the originating DOM event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventDisposition {
    /// Call `preventDefault()`.
    pub prevent_default: bool,
    /// Call `stopImmediatePropagation()`.
    pub stop_immediate_propagation: bool,
}

impl EventDisposition {
    /// Let the event continue untouched.
    pub const PASS_THROUGH: Self = Self {
        prevent_default: false,
        stop_immediate_propagation: false,
    };

    /// Swallow the event: the page never sees an inspecting click.
    pub const SUPPRESS: Self = Self {
        prevent_default: true,
        stop_immediate_propagation: true,
    };

    #[must_use]
    pub const fn is_suppressed(self) -> bool {
        self.prevent_default && self.stop_immediate_propagation
    }
}

/// Structured log record for one pointer dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerLogEntry {
    pub phase: PointerPhase,
    /// DOM event type (`mousemove`, `touchend`, ...).
    pub event_type: &'static str,
    /// Monotonic sequence number; `None` for ignored events.
    pub sequence: Option<u64>,
    pub position: Option<Point>,
    pub node_id: Option<NodeId>,
    pub outcome: PointerOutcome,
}

/// Result of one pointer dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDispatch {
    /// Notification delivered to the host sink, if any.
    pub notification: Option<OverlayNotification>,
    pub disposition: EventDisposition,
    pub log: PointerLogEntry,
}

impl PointerDispatch {
    pub(crate) fn ignored(
        phase: PointerPhase,
        event_type: &'static str,
        reason: PointerIgnoredReason,
        position: Option<Point>,
    ) -> Self {
        Self {
            notification: None,
            disposition: EventDisposition::PASS_THROUGH,
            log: PointerLogEntry {
                phase,
                event_type,
                sequence: None,
                position,
                node_id: None,
                outcome: PointerOutcome::Ignored(reason),
            },
        }
    }

    /// Outcome of this dispatch.
    #[must_use]
    pub const fn outcome(&self) -> PointerOutcome {
        self.log.outcome
    }

    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self.log.outcome, PointerOutcome::Ignored(_))
    }
}

// ---------------------------------------------------------------------------
// Listener plan
// ---------------------------------------------------------------------------

/// Where a host registers a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// `document.documentElement`.
    DocumentElement,
    /// `window`.
    Window,
}

/// One DOM listener the host must install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerRegistration {
    pub target: ListenerTarget,
    pub event_type: &'static str,
    /// Register in the capture phase.
    pub capture: bool,
}

impl ListenerRegistration {
    const fn capture_at_root(event_type: &'static str) -> Self {
        Self {
            target: ListenerTarget::DocumentElement,
            event_type,
            capture: true,
        }
    }
}

const MOUSE_EVENTS: [&str; 3] = ["mousemove", "mouseout", "click"];
const TOUCH_EVENTS: [&str; 3] = ["touchstart", "touchmove", "touchend"];

/// Listeners for the enabled input families, plus the window resize listener.
#[must_use]
pub fn listener_plan(capabilities: PointerCapabilities) -> Vec<ListenerRegistration> {
    let mut plan = Vec::with_capacity(7);
    if capabilities.contains(PointerCapabilities::MOUSE) {
        plan.extend(MOUSE_EVENTS.map(ListenerRegistration::capture_at_root));
    }
    if capabilities.contains(PointerCapabilities::TOUCH) {
        plan.extend(TOUCH_EVENTS.map(ListenerRegistration::capture_at_root));
    }
    plan.push(ListenerRegistration {
        target: ListenerTarget::Window,
        event_type: "resize",
        capture: false,
    });
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn event_types(plan: &[ListenerRegistration]) -> Vec<&'static str> {
        plan.iter().map(|l| l.event_type).collect()
    }

    #[test]
    fn mouse_plan() {
        let plan = listener_plan(PointerCapabilities::MOUSE);
        assert_eq!(
            event_types(&plan),
            vec!["mousemove", "mouseout", "click", "resize"]
        );
        assert!(
            plan[..3]
                .iter()
                .all(|l| l.capture && l.target == ListenerTarget::DocumentElement)
        );
        assert_eq!(plan[3].target, ListenerTarget::Window);
    }

    #[test]
    fn touch_plan() {
        let plan = listener_plan(PointerCapabilities::TOUCH);
        assert_eq!(
            event_types(&plan),
            vec!["touchstart", "touchmove", "touchend", "resize"]
        );
    }

    #[test]
    fn combined_plan_has_both_families() {
        let plan = listener_plan(PointerCapabilities::all());
        assert_eq!(plan.len(), 7);
    }

    #[test]
    fn ignored_dispatch_passes_event_through() {
        let dispatch = PointerDispatch::ignored(
            PointerPhase::Commit,
            "click",
            PointerIgnoredReason::InspectInactive,
            Some(Point::new(1.0, 2.0)),
        );
        assert!(dispatch.is_ignored());
        assert_eq!(dispatch.disposition, EventDisposition::PASS_THROUGH);
        assert_eq!(dispatch.notification, None);
        assert_eq!(dispatch.log.sequence, None);
        assert_eq!(dispatch.outcome().label(), "ignored");
    }

    #[test]
    fn suppress_disposition() {
        assert!(EventDisposition::SUPPRESS.is_suppressed());
        assert!(!EventDisposition::default().is_suppressed());
    }
}
