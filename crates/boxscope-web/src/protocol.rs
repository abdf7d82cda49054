#![forbid(unsafe_code)]

//! JSON protocol for the `Overlay` domain.
//!
//! Inbound messages look like `{"method": "Overlay.setInspectMode",
//! "params": {...}}` and are parsed with [`parse_command`]. Methods outside
//! the supported set return `Ok(None)` so a host can route them elsewhere.
//! Outbound notifications are serialized with [`notification_to_json`].

use boxscope_backend::OverlayNotification;
use boxscope_core::NodeId;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::inspect_mode::{HighlightConfig, InspectSettings};

/// Errors from parsing an inbound protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// `params` present but not the expected shape.
    InvalidParams {
        method: &'static str,
        message: String,
    },
}

impl core::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::InvalidParams { method, message } => {
                write!(f, "invalid params for {method}: {message}")
            }
        }
    }
}

impl std::error::Error for CommandParseError {}

/// A supported inbound command.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCommand {
    SetInspectMode(InspectSettings),
    SetShowViewportSizeOnResize { show: bool },
    HighlightNode {
        node_id: NodeId,
        highlight_config: HighlightConfig,
    },
    HideHighlight,
}

impl OverlayCommand {
    /// Protocol method name.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::SetInspectMode(_) => SET_INSPECT_MODE,
            Self::SetShowViewportSizeOnResize { .. } => SET_SHOW_VIEWPORT_SIZE_ON_RESIZE,
            Self::HighlightNode { .. } => HIGHLIGHT_NODE,
            Self::HideHighlight => HIDE_HIGHLIGHT,
        }
    }
}

const SET_INSPECT_MODE: &str = "Overlay.setInspectMode";
const SET_SHOW_VIEWPORT_SIZE_ON_RESIZE: &str = "Overlay.setShowViewportSizeOnResize";
const HIGHLIGHT_NODE: &str = "Overlay.highlightNode";
const HIDE_HIGHLIGHT: &str = "Overlay.hideHighlight";

#[derive(Debug, Deserialize)]
struct RawMessage {
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ShowParams {
    show: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HighlightNodeParams {
    #[serde(default)]
    node_id: Option<NodeId>,
    #[serde(default)]
    highlight_config: HighlightConfig,
}

/// Parse one inbound message.
///
/// Returns `Ok(None)` for methods this crate does not handle and `Err` for
/// malformed JSON or params.
pub fn parse_command(json: &str) -> Result<Option<OverlayCommand>, CommandParseError> {
    let raw: RawMessage =
        serde_json::from_str(json).map_err(|e| CommandParseError::Json(e.to_string()))?;

    match raw.method.as_str() {
        SET_INSPECT_MODE => {
            let settings: InspectSettings = decode_params(SET_INSPECT_MODE, raw.params)?;
            Ok(Some(OverlayCommand::SetInspectMode(settings)))
        }
        SET_SHOW_VIEWPORT_SIZE_ON_RESIZE => {
            let params: ShowParams = decode_params(SET_SHOW_VIEWPORT_SIZE_ON_RESIZE, raw.params)?;
            Ok(Some(OverlayCommand::SetShowViewportSizeOnResize {
                show: params.show,
            }))
        }
        HIGHLIGHT_NODE => {
            let params: HighlightNodeParams = decode_params(HIGHLIGHT_NODE, raw.params)?;
            let node_id = params
                .node_id
                .ok_or(CommandParseError::MissingField("nodeId"))?;
            Ok(Some(OverlayCommand::HighlightNode {
                node_id,
                highlight_config: params.highlight_config,
            }))
        }
        HIDE_HIGHLIGHT => Ok(Some(OverlayCommand::HideHighlight)),
        _ => Ok(None),
    }
}

fn decode_params<T: DeserializeOwned>(
    method: &'static str,
    params: Option<Value>,
) -> Result<T, CommandParseError> {
    let params = params.ok_or(CommandParseError::MissingField("params"))?;
    serde_json::from_value(params).map_err(|e| CommandParseError::InvalidParams {
        method,
        message: e.to_string(),
    })
}

/// Serialize an outbound notification as `{"method": ..., "params": ...}`.
#[must_use]
pub fn notification_to_json(notification: &OverlayNotification) -> String {
    let params = match notification {
        OverlayNotification::NodeHighlightRequested { node_id } => json!({ "nodeId": node_id }),
        OverlayNotification::InspectNodeRequested { backend_node_id } => {
            json!({ "backendNodeId": backend_node_id })
        }
    };
    json!({ "method": notification.method(), "params": params }).to_string()
}
