//! Checks about view structure, roles and navigation order.

use std::collections::HashSet;

use super::{
    is_actionable, is_reachable, views_in_scope, AccessibilityHierarchyCheck, CheckKind,
    CheckResult, Metadata, ResultType,
};
use crate::hierarchy::Hierarchy;
use crate::text::SpanKind;
use crate::types::{CondensedId, HierarchyError};
use crate::view::ViewRef;

/// Clickable text spans are hard to activate with assistive technology.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickableSpanCheck;

impl ClickableSpanCheck {
    pub const RESULT_ID_CLICKABLE_SPAN: i32 = 1;
    pub const RESULT_ID_RELATIVE_LINK: i32 = 2;
}

/// `true` for URLs with a scheme, such as `https://` or `mailto:`.
fn is_absolute_url(url: &str) -> bool {
    match url.split_once(':') {
        Some((scheme, rest)) => {
            !rest.is_empty()
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

impl AccessibilityHierarchyCheck for ClickableSpanCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::ClickableSpan
    }

    fn title(&self) -> &'static str {
        "Clickable links"
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
        for view in views.iter().filter(|view| is_reachable(view)) {
            let Some(text) = view.attributes().text.as_ref() else {
                continue;
            };
            for span in text.spans() {
                let finding = match span.kind() {
                    SpanKind::Generic => None,
                    SpanKind::Clickable => Some((
                        ResultType::Warning,
                        Self::RESULT_ID_CLICKABLE_SPAN,
                        "Clickable span may not be activatable by accessibility services; use a URL span instead.".to_string(),
                    )),
                    SpanKind::Url { url } => match url.as_deref() {
                        Some(url) if is_absolute_url(url) => None,
                        other => Some((
                            ResultType::Error,
                            Self::RESULT_ID_RELATIVE_LINK,
                            format!(
                                "Link target {:?} is not an absolute URL.",
                                other.unwrap_or_default()
                            ),
                        )),
                    },
                };
                if let Some((result_type, result_id, message)) = finding {
                    results.push(CheckResult::new(
                        self.kind(),
                        result_type,
                        Some(view.condensed_id()),
                        result_id,
                        message,
                    ));
                }
            }
        }
        results
    }
}

/// Actionable views should announce their role.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassNameCheck;

impl ClassNameCheck {
    pub const RESULT_ID_MISSING_ROLE: i32 = 1;
}

impl AccessibilityHierarchyCheck for ClassNameCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::ClassName
    }

    fn title(&self) -> &'static str {
        "Item type"
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
            .iter()
            .filter(|view| is_reachable(view) && is_actionable(view))
            .filter(|view| {
                view.attributes()
                    .accessibility_class_name
                    .as_deref()
                    .map_or(true, |name| name.trim().is_empty())
            })
            .map(|view| {
                CheckResult::new(
                    self.kind(),
                    ResultType::Warning,
                    Some(view.condensed_id()),
                    Self::RESULT_ID_MISSING_ROLE,
                    "Screen readers cannot announce the type of this item.",
                )
            })
            .collect()
    }
}

/// Traversal-order hints must resolve and must not loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraversalOrderCheck;

impl TraversalOrderCheck {
    pub const RESULT_ID_DANGLING_BEFORE: i32 = 1;
    pub const RESULT_ID_DANGLING_AFTER: i32 = 2;
    pub const RESULT_ID_BEFORE_CYCLE: i32 = 3;
    pub const RESULT_ID_AFTER_CYCLE: i32 = 4;
}

/// How a chain of traversal hints ended.
enum ChainEnd {
    Terminated,
    Dangling(CondensedId),
    Cycle,
}

/// Follows `next` from `start` until the chain ends, dangles, or returns to `start`.
fn follow_chain<'h>(
    start: ViewRef<'h>,
    next: impl Fn(&ViewRef<'h>) -> Option<CondensedId>,
) -> ChainEnd {
    let hierarchy = start.hierarchy();
    let mut seen = HashSet::new();
    let mut current = start;

    while let Some(target) = next(&current) {
        if target == start.condensed_id() {
            return ChainEnd::Cycle;
        }
        if !seen.insert(target) {
            // A loop that does not pass through `start`; reported from its own members.
            return ChainEnd::Terminated;
        }
        current = match hierarchy.view_by_condensed_id(target) {
            Ok(view) => view,
            Err(HierarchyError::NotFound(_)) => return ChainEnd::Dangling(target),
            Err(_) => return ChainEnd::Terminated,
        };
    }
    ChainEnd::Terminated
}

impl AccessibilityHierarchyCheck for TraversalOrderCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::TraversalOrder
    }

    fn title(&self) -> &'static str {
        "Traversal order"
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
            let chains: [(&str, fn(&ViewRef<'_>) -> Option<CondensedId>, i32, i32); 2] = [
                (
                    "before",
                    |v| v.accessibility_traversal_before_id(),
                    Self::RESULT_ID_DANGLING_BEFORE,
                    Self::RESULT_ID_BEFORE_CYCLE,
                ),
                (
                    "after",
                    |v| v.accessibility_traversal_after_id(),
                    Self::RESULT_ID_DANGLING_AFTER,
                    Self::RESULT_ID_AFTER_CYCLE,
                ),
            ];
            for (direction, next, dangling_id, cycle_id) in chains {
                let (result_id, message) = match follow_chain(view, next) {
                    ChainEnd::Terminated => continue,
                    ChainEnd::Dangling(target) => (
                        dangling_id,
                        format!("Traversal-{} hint points to missing view {}.", direction, target),
                    ),
                    ChainEnd::Cycle => (
                        cycle_id,
                        format!("Traversal-{} hints form a loop back to this view.", direction),
                    ),
                };
                results.push(CheckResult::new(
                    self.kind(),
                    ResultType::Error,
                    Some(view.condensed_id()),
                    result_id,
                    message,
                ));
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::types::{Rect, ViewId, WindowId};
    use crate::wire::{SpanMessage, SpanType, TextMessage};

    fn run(check: &dyn AccessibilityHierarchyCheck, hierarchy: &Hierarchy) -> Vec<CheckResult> {
        check.run_check_on_hierarchy(hierarchy, None, &Metadata::default())
    }

    fn linked_text(span_type: SpanType, url: Option<&str>) -> TextMessage {
        TextMessage {
            text: "Read the terms".to_string(),
            spans: vec![SpanMessage {
                start: 9,
                end: 14,
                span_type,
                url: url.map(str::to_string),
                ..Default::default()
            }],
        }
    }

    fn cid(view: u32) -> CondensedId {
        CondensedId::new(WindowId(0), ViewId(view))
    }

    #[test]
    fn test_absolute_url_detection() {
        assert!(is_absolute_url("https://example.com"));
        assert!(is_absolute_url("mailto:help@example.com"));
        assert!(!is_absolute_url("/terms"));
        assert!(!is_absolute_url("terms.html"));
        assert!(!is_absolute_url("1http:x"));
    }

    #[test]
    fn test_clickable_span_findings() {
        let mut plain_click = clickable_view(1, 0, Rect::new(0, 0, 200, 100));
        plain_click.text = Some(linked_text(SpanType::Clickable, None));
        let mut relative = clickable_view(2, 0, Rect::new(0, 100, 200, 200));
        relative.text = Some(linked_text(SpanType::Url, Some("/terms")));
        let mut absolute = clickable_view(3, 0, Rect::new(0, 200, 200, 300));
        absolute.text = Some(linked_text(SpanType::Url, Some("https://example.com/terms")));

        let hierarchy = hierarchy_with_views(vec![container(), plain_click, relative, absolute]);
        let results = run(&ClickableSpanCheck, &hierarchy);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].result_type, ResultType::Warning);
        assert_eq!(results[0].element, Some(cid(1)));
        assert_eq!(results[1].result_type, ResultType::Error);
        assert_eq!(results[1].element, Some(cid(2)));
    }

    #[test]
    fn test_missing_accessibility_class_name() {
        let mut named = clickable_view(2, 0, Rect::new(0, 100, 100, 200));
        named.accessibility_class_name = Some("android.widget.Button".to_string());
        let hierarchy = hierarchy_with_views(vec![
            container(),
            clickable_view(1, 0, Rect::new(0, 0, 100, 100)),
            named,
        ]);

        let results = run(&ClassNameCheck, &hierarchy);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].element, Some(cid(1)));
    }

    #[test]
    fn test_dangling_traversal_hint() {
        let mut view = clickable_view(1, 0, Rect::new(0, 0, 100, 100));
        view.accessibility_traversal_after_id = Some(cid(9));
        let hierarchy = hierarchy_with_views(vec![container(), view]);

        let results = run(&TraversalOrderCheck, &hierarchy);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].result_id, TraversalOrderCheck::RESULT_ID_DANGLING_AFTER);
    }

    #[test]
    fn test_traversal_cycle_reported_for_each_member() {
        let mut first = clickable_view(1, 0, Rect::new(0, 0, 100, 100));
        first.accessibility_traversal_before_id = Some(cid(2));
        let mut second = clickable_view(2, 0, Rect::new(0, 100, 100, 200));
        second.accessibility_traversal_before_id = Some(cid(1));
        let hierarchy = hierarchy_with_views(vec![container(), first, second]);

        let results = run(&TraversalOrderCheck, &hierarchy);
        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|result| result.result_id == TraversalOrderCheck::RESULT_ID_BEFORE_CYCLE));
    }

    #[test]
    fn test_straight_chain_is_clean() {
        let mut first = clickable_view(1, 0, Rect::new(0, 0, 100, 100));
        first.accessibility_traversal_after_id = Some(cid(2));
        let hierarchy = hierarchy_with_views(vec![
            container(),
            first,
            clickable_view(2, 0, Rect::new(0, 100, 100, 200)),
        ]);

        assert!(run(&TraversalOrderCheck, &hierarchy).is_empty());
    }
}
