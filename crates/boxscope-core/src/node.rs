#![forbid(unsafe_code)]

//! Node identity and node kinds.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a document node across the core/host boundary.
///
/// Identities are minted by the host's node registry; the overlay never
/// interprets the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// DOM node kind, mirroring `Node.nodeType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `ELEMENT_NODE` (1).
    Element,
    /// `TEXT_NODE` (3).
    Text,
    /// `COMMENT_NODE` (8).
    Comment,
    /// `DOCUMENT_NODE` (9).
    Document,
    /// `DOCUMENT_TYPE_NODE` (10).
    DocumentType,
    /// `DOCUMENT_FRAGMENT_NODE` (11).
    DocumentFragment,
    /// Any other `nodeType` value.
    Other(u16),
}

impl NodeKind {
    /// Only elements and text nodes can be highlighted.
    pub const fn is_highlightable(self) -> bool {
        matches!(self, Self::Element | Self::Text)
    }
}
