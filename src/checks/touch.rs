//! Checks about touch targets.

use std::collections::BTreeMap;

use super::{
    is_reachable, views_in_scope, AccessibilityHierarchyCheck, CheckKind, CheckResult, Metadata,
    ResultType,
};
use crate::hierarchy::Hierarchy;
use crate::types::Rect;
use crate::view::ViewRef;

/// Minimum touch target edge, in dp.
pub const DEFAULT_MIN_TOUCH_TARGET_SIZE_DP: u32 = 48;

/// Clickable views must be large enough to hit reliably.
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchTargetSizeCheck;

impl TouchTargetSizeCheck {
    pub const RESULT_ID_TOO_SMALL: i32 = 1;
    pub const RESULT_ID_TOO_SMALL_WITH_DELEGATE: i32 = 2;
}

impl AccessibilityHierarchyCheck for TouchTargetSizeCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::TouchTargetSize
    }

    fn title(&self) -> &'static str {
        "Touch target size"
    }

    fn run_check_on_hierarchy(
        &self,
        hierarchy: &Hierarchy,
        from_root: Option<ViewRef<'_>>,
        metadata: &Metadata,
    ) -> Vec<CheckResult> {
        let views = match views_in_scope(hierarchy, from_root) {
            Ok(views) => views,
            Err(e) => return vec![CheckResult::not_run(self.kind(), &e)],
        };

        let metrics = hierarchy
            .device_state()
            .default_display_info()
            .metrics_without_decoration;
        let min_dp = metadata
            .customized_touch_target_size_dp
            .unwrap_or(DEFAULT_MIN_TOUCH_TARGET_SIZE_DP) as f32;

        let mut results = Vec::new();
        for view in views {
            let attrs = view.attributes();
            if !(attrs.clickable || attrs.long_clickable) || !is_reachable(&view) {
                continue;
            }
            let bounds = view.bounds_in_screen();
            if bounds.is_empty() {
                continue;
            }

            let width_dp = metrics.px_to_dp(bounds.width());
            let height_dp = metrics.px_to_dp(bounds.height());
            if width_dp >= min_dp && height_dp >= min_dp {
                continue;
            }

            // Views clipped by a scrolling parent are judged on their full size
            if let (Some(width), Some(height)) = (attrs.nonclipped_width, attrs.nonclipped_height) {
                if metrics.px_to_dp(i64::from(width)) >= min_dp
                    && metrics.px_to_dp(i64::from(height)) >= min_dp
                {
                    continue;
                }
            }

            let (result_type, result_id) = if attrs.has_touch_delegate.is_true() {
                (ResultType::Warning, Self::RESULT_ID_TOO_SMALL_WITH_DELEGATE)
            } else {
                (ResultType::Error, Self::RESULT_ID_TOO_SMALL)
            };
            results.push(CheckResult::new(
                self.kind(),
                result_type,
                Some(view.condensed_id()),
                result_id,
                format!(
                    "Touch target is {:.0}x{:.0}dp; consider making it at least {:.0}x{:.0}dp.",
                    width_dp, height_dp, min_dp, min_dp
                ),
            ));
        }
        results
    }
}

/// Clickable views should not occupy exactly the same area.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateClickableBoundsCheck;

impl DuplicateClickableBoundsCheck {
    pub const RESULT_ID_SAME_BOUNDS: i32 = 1;
}

impl AccessibilityHierarchyCheck for DuplicateClickableBoundsCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::DuplicateClickableBounds
    }

    fn title(&self) -> &'static str {
        "Duplicate clickable bounds"
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

        let mut by_bounds: BTreeMap<(i32, i32, i32, i32), Vec<ViewRef<'_>>> = BTreeMap::new();
        for view in views {
            let attrs = view.attributes();
            if !attrs.clickable || attrs.visible_to_user.is_false() {
                continue;
            }
            let bounds = view.bounds_in_screen();
            if bounds.is_empty() {
                continue;
            }
            by_bounds.entry(bounds_key(&bounds)).or_default().push(view);
        }

        by_bounds
            .values()
            .filter(|group| group.len() > 1)
            .map(|group| {
                let first = group[0];
                CheckResult::new(
                    self.kind(),
                    ResultType::Error,
                    Some(first.condensed_id()),
                    Self::RESULT_ID_SAME_BOUNDS,
                    format!(
                        "{} clickable items share the bounds {:?}.",
                        group.len(),
                        first.bounds_in_screen()
                    ),
                )
            })
            .collect()
    }
}

fn bounds_key(bounds: &Rect) -> (i32, i32, i32, i32) {
    (bounds.left, bounds.top, bounds.right, bounds.bottom)
}
