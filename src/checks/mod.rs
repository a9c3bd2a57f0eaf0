//! Accessibility checks evaluated over a frozen hierarchy.
//!
//! Every check is a stateless unit struct implementing
//! `AccessibilityHierarchyCheck`. The registry in [`registry`] holds exactly one
//! instance per `CheckKind`, and [`preset`] resolves a versioned preset name to
//! the set of checks active in that release.
//!
//! Checks only read the hierarchy. A navigation failure inside a check turns
//! into a `ResultType::NotRun` result rather than an error.

pub mod preset;
pub mod registry;

mod speakable;
mod structure;
mod touch;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hierarchy::Hierarchy;
use crate::text;
use crate::types::{CondensedId, HierarchyError};
use crate::view::ViewRef;
use crate::wire::CheckResultMessage;

pub use preset::{checks_for_preset, CheckPreset, CheckSet};
pub use registry::{check_for_kind, CheckKind};
pub use speakable::{
    DuplicateSpeakableTextCheck, EditableContentDescCheck, RedundantDescriptionCheck,
    SpeakableTextPresentCheck,
};
pub use structure::{ClassNameCheck, ClickableSpanCheck, TraversalOrderCheck};
pub use touch::{DuplicateClickableBoundsCheck, TouchTargetSizeCheck};

/// Result ID used for `NotRun` results caused by a malformed hierarchy.
pub const RESULT_ID_NOT_RUN: i32 = 0;

/// Severity of a check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultType {
    Error,
    Warning,
    Info,
    NotRun,
    Suppressed,
}

impl ResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Error => "ERROR",
            ResultType::Warning => "WARNING",
            ResultType::Info => "INFO",
            ResultType::NotRun => "NOT_RUN",
            ResultType::Suppressed => "SUPPRESSED",
        }
    }

    /// Parses the upper-case wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ERROR" => Some(ResultType::Error),
            "WARNING" => Some(ResultType::Warning),
            "INFO" => Some(ResultType::Info),
            "NOT_RUN" => Some(ResultType::NotRun),
            "SUPPRESSED" => Some(ResultType::Suppressed),
            _ => None,
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-run options passed to every check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    /// Overrides the default minimum touch target size, in dp
    pub customized_touch_target_size_dp: Option<u32>,
}

/// A single finding produced by a check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub check: CheckKind,
    pub result_type: ResultType,
    /// The offending view, if the result is about one
    pub element: Option<CondensedId>,
    pub result_id: i32,
    pub message: String,
}

impl CheckResult {
    pub fn new(
        check: CheckKind,
        result_type: ResultType,
        element: Option<CondensedId>,
        result_id: i32,
        message: impl Into<String>,
    ) -> Self {
        CheckResult {
            check,
            result_type,
            element,
            result_id,
            message: message.into(),
        }
    }

    pub(crate) fn not_run(check: CheckKind, error: &HierarchyError) -> Self {
        CheckResult::new(
            check,
            ResultType::NotRun,
            None,
            RESULT_ID_NOT_RUN,
            format!("Check could not run: {}", error),
        )
    }

    pub fn to_message(&self) -> CheckResultMessage {
        CheckResultMessage {
            source_check_class: self.check.class_name().to_string(),
            result_id: self.result_id,
            result_type: self.result_type.as_str().to_string(),
            hierarchy_source_id: self.element,
            title: self.check.check().title().to_string(),
            message: self.message.clone(),
        }
    }
}

/// A rule evaluated over a completed hierarchy.
///
/// Implementations hold no state, so one instance can serve concurrent
/// evaluations over any number of hierarchies.
pub trait AccessibilityHierarchyCheck: Send + Sync {
    fn kind(&self) -> CheckKind;

    /// Short human-readable name of the rule.
    fn title(&self) -> &'static str;

    /// Evaluates the rule over the views below `from_root`, or over the active
    /// window when `from_root` is `None`.
    fn run_check_on_hierarchy(
        &self,
        hierarchy: &Hierarchy,
        from_root: Option<ViewRef<'_>>,
        metadata: &Metadata,
    ) -> Vec<CheckResult>;
}

/// Views a check should evaluate.
pub(crate) fn views_in_scope<'h>(
    hierarchy: &'h Hierarchy,
    from_root: Option<ViewRef<'h>>,
) -> Result<Vec<ViewRef<'h>>, HierarchyError> {
    match from_root {
        Some(root) => root.self_and_all_descendants(),
        None => Ok(hierarchy.active_window().views().collect()),
    }
}

/// Content description if present and non-blank, otherwise text.
pub(crate) fn own_speakable_text(view: &ViewRef<'_>) -> Option<String> {
    let attrs = view.attributes();
    [&attrs.content_description, &attrs.text]
        .into_iter()
        .flatten()
        .map(|value| value.as_str().trim())
        .find(|value| text::trimmed_length(value) > 0)
        .map(str::to_string)
}

/// Whether the view is focusable or actionable on its own.
pub(crate) fn is_actionable(view: &ViewRef<'_>) -> bool {
    let attrs = view.attributes();
    attrs.clickable || attrs.long_clickable || attrs.focusable
}

/// Whether the view can be seen and reached by assistive technology.
pub(crate) fn is_reachable(view: &ViewRef<'_>) -> bool {
    view.attributes().important_for_accessibility && !view.attributes().visible_to_user.is_false()
}

/// Text a screen reader would announce for `view`.
///
/// Combines the view's own text, the text of the view labeling it, and text of
/// descendants that are not themselves actionable.
pub(crate) fn speakable_text(view: &ViewRef<'_>) -> Result<String, HierarchyError> {
    let mut parts = Vec::new();
    if let Some(own) = own_speakable_text(view) {
        parts.push(own);
    }
    if let Some(label) = view.labeled_by()? {
        parts.extend(own_speakable_text(&label));
    }
    for descendant in view.self_and_all_descendants()?.into_iter().skip(1) {
        if !is_actionable(&descendant) && !descendant.attributes().visible_to_user.is_false() {
            parts.extend(own_speakable_text(&descendant));
        }
    }
    Ok(parts.join(" "))
}
