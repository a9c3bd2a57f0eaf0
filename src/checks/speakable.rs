//! Checks about what a screen reader announces.

use std::collections::BTreeMap;

use super::{
    is_actionable, is_reachable, own_speakable_text, speakable_text, views_in_scope,
    AccessibilityHierarchyCheck, CheckKind, CheckResult, Metadata, ResultType,
};
use crate::hierarchy::Hierarchy;
use crate::view::ViewRef;

/// Words that repeat the role a screen reader already announces.
const REDUNDANT_ROLE_WORDS: &[&str] = &["button", "checkbox", "check box"];

/// Actionable views must have something to announce.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeakableTextPresentCheck;

impl SpeakableTextPresentCheck {
    pub const RESULT_ID_MISSING_SPEAKABLE_TEXT: i32 = 1;
}

impl AccessibilityHierarchyCheck for SpeakableTextPresentCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::SpeakableTextPresent
    }

    fn title(&self) -> &'static str {
        "Item label"
    }

    fn run_check_on_hierarchy(
        &self,
        hierarchy: &Hierarchy,
        from_root: Option<ViewRef<'_>>,
        _metadata: &Metadata,
    ) -> Vec<CheckResult> {
        let views = match views_in_scope(hierarchy, from_root) {
            Ok(views) => views,
            Err(e) => return vec![CheckResult::not_run(self.kind(), &e)],
        };

        let mut results = Vec::new();
        for view in views {
            if !is_reachable(&view) || !is_actionable(&view) || view.is_web_view() {
                continue;
            }
            match speakable_text(&view) {
                Ok(spoken) if spoken.trim().is_empty() => results.push(CheckResult::new(
                    self.kind(),
                    ResultType::Error,
                    Some(view.condensed_id()),
                    Self::RESULT_ID_MISSING_SPEAKABLE_TEXT,
                    "This item may not have a label readable by screen readers.",
                )),
                Ok(_) => {}
                Err(e) => results.push(CheckResult::not_run(self.kind(), &e)),
            }
        }
        results
    }
}

/// Editable fields should be labeled by hint or label, not content description.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditableContentDescCheck;

impl EditableContentDescCheck {
    pub const RESULT_ID_EDITABLE_WITH_CONTENT_DESC: i32 = 1;
}

impl AccessibilityHierarchyCheck for EditableContentDescCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::EditableContentDesc
    }

    fn title(&self) -> &'static str {
        "Editable item label"
    }

    fn run_check_on_hierarchy(
        &self,
        hierarchy: &Hierarchy,
        from_root: Option<ViewRef<'_>>,
        _metadata: &Metadata,
    ) -> Vec<CheckResult> {
        let views = match views_in_scope(hierarchy, from_root) {
            Ok(views) => views,
            Err(e) => return vec![CheckResult::not_run(self.kind(), &e)],
        };

        views
            .into_iter()
            .filter(|view| view.attributes().important_for_accessibility)
            .filter(|view| view.attributes().editable.is_true() || view.is_edit_text())
            .filter(|view| {
                view.attributes()
                    .content_description
                    .as_ref()
                    .map_or(false, |desc| !desc.as_str().trim().is_empty())
            })
            .map(|view| {
                CheckResult::new(
                    self.kind(),
                    ResultType::Error,
                    Some(view.condensed_id()),
                    Self::RESULT_ID_EDITABLE_WITH_CONTENT_DESC,
                    "Editable item has a content description; screen readers may not read its contents.",
                )
            })
            .collect()
    }
}

/// Clickable views should not share the same announcement.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateSpeakableTextCheck;

impl DuplicateSpeakableTextCheck {
    pub const RESULT_ID_CLICKABLE_DUPLICATE: i32 = 1;
    pub const RESULT_ID_NON_CLICKABLE_DUPLICATE: i32 = 2;
}

impl AccessibilityHierarchyCheck for DuplicateSpeakableTextCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::DuplicateSpeakableText
    }

    fn title(&self) -> &'static str {
        "Duplicate item descriptions"
    }

    fn run_check_on_hierarchy(
        &self,
        hierarchy: &Hierarchy,
        from_root: Option<ViewRef<'_>>,
        _metadata: &Metadata,
    ) -> Vec<CheckResult> {
        let views = match views_in_scope(hierarchy, from_root) {
            Ok(views) => views,
            Err(e) => return vec![CheckResult::not_run(self.kind(), &e)],
        };

        let mut by_text: BTreeMap<String, Vec<ViewRef<'_>>> = BTreeMap::new();
        for view in views.into_iter().filter(is_reachable) {
            if let Some(spoken) = own_speakable_text(&view) {
                by_text.entry(spoken.to_lowercase()).or_default().push(view);
            }
        }

        let mut results = Vec::new();
        for (spoken, group) in by_text.iter().filter(|(_, group)| group.len() > 1) {
            for view in group {
                let (result_type, result_id) = if view.attributes().clickable {
                    (ResultType::Warning, Self::RESULT_ID_CLICKABLE_DUPLICATE)
                } else {
                    (ResultType::Info, Self::RESULT_ID_NON_CLICKABLE_DUPLICATE)
                };
                results.push(CheckResult::new(
                    self.kind(),
                    result_type,
                    Some(view.condensed_id()),
                    result_id,
                    format!("{} items share the description \"{}\".", group.len(), spoken),
                ));
            }
        }
        results
    }
}

/// Content descriptions should not repeat the element's role.
///
/// Only evaluated for English locales, where the role words are known.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedundantDescriptionCheck;

impl RedundantDescriptionCheck {
    pub const RESULT_ID_ROLE_IN_DESCRIPTION: i32 = 1;
    pub const RESULT_ID_NOT_ENGLISH: i32 = 2;
}

impl AccessibilityHierarchyCheck for RedundantDescriptionCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::RedundantDescription
    }

    fn title(&self) -> &'static str {
        "Item type label"
    }

    fn run_check_on_hierarchy(
        &self,
        hierarchy: &Hierarchy,
        from_root: Option<ViewRef<'_>>,
        _metadata: &Metadata,
    ) -> Vec<CheckResult> {
        if hierarchy.device_state().locale().language() != "en" {
            return vec![CheckResult::new(
                self.kind(),
                ResultType::NotRun,
                None,
                Self::RESULT_ID_NOT_ENGLISH,
                "Only evaluated for English locales.",
            )];
        }
        let views = match views_in_scope(hierarchy, from_root) {
            Ok(views) => views,
            Err(e) => return vec![CheckResult::not_run(self.kind(), &e)],
        };

        let mut results = Vec::new();
        for view in views.iter().filter(|view| is_reachable(view)) {
            let Some(desc) = view.attributes().content_description.as_ref() else {
                continue;
            };
            let lowered = desc.as_str().to_lowercase();
            if let Some(word) = REDUNDANT_ROLE_WORDS.iter().find(|word| lowered.contains(**word)) {
                results.push(CheckResult::new(
                    self.kind(),
                    ResultType::Warning,
                    Some(view.condensed_id()),
                    Self::RESULT_ID_ROLE_IN_DESCRIPTION,
                    format!("Content description repeats the item type \"{}\".", word),
                ));
            }
        }
        results
    }
}
