//! JSON wire format for captured hierarchies.
//!
//! These types mirror the flat, ID-addressed snapshot produced by the capture
//! side: one message per window, each holding its views as an ordered list.
//! Optional attributes are `Option` fields that are omitted when absent, so a
//! field that was never captured stays distinguishable from one captured as
//! `false` or `0`.
//!
//! Parent IDs use `-1` for "no parent", matching the capture format.

use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CondensedId, HierarchyError, Rect};

/// Parent ID sentinel for roots.
pub const NO_PARENT: i32 = -1;

fn no_parent() -> i32 {
    NO_PARENT
}

fn is_no_parent(id: &i32) -> bool {
    *id == NO_PARENT
}

/// Checks that a record's declared ID matches its position in the list.
pub(crate) fn position_id(position: usize, declared: i32, kind: &str) -> Result<u32, HierarchyError> {
    match u32::try_from(declared) {
        Ok(id) if id as usize == position => Ok(id),
        _ => Err(HierarchyError::MalformedInput(format!(
            "{} at position {} declares id {}",
            kind, position, declared
        ))),
    }
}

/// Decodes a parent ID, mapping the `-1` sentinel to `None`.
pub(crate) fn parent_id(raw: i32, kind: &str) -> Result<Option<u32>, HierarchyError> {
    if raw == NO_PARENT {
        return Ok(None);
    }
    u32::try_from(raw).map(Some).map_err(|_| {
        HierarchyError::MalformedInput(format!("{} has invalid parent id {}", kind, raw))
    })
}

pub(crate) fn child_ids(raw: &[i32], kind: &str) -> Result<Vec<u32>, HierarchyError> {
    raw.iter()
        .map(|&id| {
            u32::try_from(id).map_err(|_| {
                HierarchyError::MalformedInput(format!("{} has invalid child id {}", kind, id))
            })
        })
        .collect()
}

/// Errors raised while decoding or encoding the wire format.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level snapshot message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyMessage {
    pub device_state: DeviceStateMessage,

    pub active_window_id: i32,

    #[serde(default)]
    pub windows: Vec<WindowMessage>,
}

impl HierarchyMessage {
    pub fn from_json(json: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, WireError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowMessage {
    pub id: i32,

    #[serde(default = "no_parent", skip_serializing_if = "is_no_parent")]
    pub parent_id: i32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_ids: Vec<i32>,

    /// Platform-assigned window ID (unrelated to the position-based `id`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<i32>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub window_type: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focused: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_focused: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds_in_screen: Option<Rect>,

    #[serde(default)]
    pub views: Vec<ViewMessage>,
}

impl WindowMessage {
    /// Creates a window record with only its bookkeeping fields set.
    pub fn new(id: i32) -> Self {
        WindowMessage {
            id,
            parent_id: NO_PARENT,
            child_ids: Vec::new(),
            window_id: None,
            layer: None,
            window_type: None,
            focused: None,
            accessibility_focused: None,
            active: None,
            bounds_in_screen: None,
            views: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewMessage {
    pub id: i32,

    #[serde(default = "no_parent", skip_serializing_if = "is_no_parent")]
    pub parent_id: i32,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub child_ids: Vec<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility_class_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_description: Option<TextMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextMessage>,

    pub important_for_accessibility: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_to_user: Option<bool>,

    pub clickable: bool,

    pub long_clickable: bool,

    pub focusable: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrollable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_scroll_forward: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_scroll_backward: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_touch_delegate: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds_in_screen: Option<Rect>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonclipped_height: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonclipped_width: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_size: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_drawable_color: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub typeface_style: Option<i32>,

    pub enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labeled_by_id: Option<CondensedId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility_traversal_before_id: Option<CondensedId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility_traversal_after_id: Option<CondensedId>,
}

impl ViewMessage {
    /// Creates a view record with only its bookkeeping fields set.
    pub fn new(id: i32) -> Self {
        ViewMessage {
            id,
            parent_id: NO_PARENT,
            ..Default::default()
        }
    }
}

/// Marked-up text: raw content plus typed spans.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextMessage {
    pub text: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<SpanMessage>,
}

/// Span discriminant. Tags this version does not know decode as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpanType {
    Clickable,
    Url,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_class_name: Option<String>,

    pub start: i32,

    pub end: i32,

    pub flags: i32,

    #[serde(rename = "type")]
    pub span_type: SpanType,

    /// Only meaningful for `SpanType::Url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceStateMessage {
    #[serde(default)]
    pub sdk_version: i32,

    /// BCP 47 language tag; absent in snapshots captured before locales were recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(default)]
    pub default_display_info: DisplayInfoMessage,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayInfoMessage {
    #[serde(default)]
    pub metrics_without_decoration: MetricsMessage,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_metrics: Option<MetricsMessage>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsMessage {
    pub density: f32,
    pub scaled_density: f32,
    pub x_dpi: f32,
    pub y_dpi: f32,
    pub density_dpi: i32,
    pub height_pixels: i32,
    pub width_pixels: i32,
}

/// Evaluation result record written by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResultMessage {
    pub source_check_class: String,

    pub result_id: i32,

    pub result_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy_source_id: Option<CondensedId>,

    pub title: String,

    pub message: String,
}
