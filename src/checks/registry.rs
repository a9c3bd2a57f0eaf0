//! Singleton registry of check instances.
//!
//! Each `CheckKind` maps to exactly one stateless instance, stored as a
//! `static`. Lookup is a `match`, so adding a kind without an instance does not
//! compile.

use std::fmt;

use super::{
    AccessibilityHierarchyCheck, ClassNameCheck, ClickableSpanCheck,
    DuplicateClickableBoundsCheck, DuplicateSpeakableTextCheck, EditableContentDescCheck,
    RedundantDescriptionCheck, SpeakableTextPresentCheck, TouchTargetSizeCheck,
    TraversalOrderCheck,
};

static SPEAKABLE_TEXT_PRESENT: SpeakableTextPresentCheck = SpeakableTextPresentCheck;
static EDITABLE_CONTENT_DESC: EditableContentDescCheck = EditableContentDescCheck;
static TOUCH_TARGET_SIZE: TouchTargetSizeCheck = TouchTargetSizeCheck;
static DUPLICATE_SPEAKABLE_TEXT: DuplicateSpeakableTextCheck = DuplicateSpeakableTextCheck;
static CLICKABLE_SPAN: ClickableSpanCheck = ClickableSpanCheck;
static DUPLICATE_CLICKABLE_BOUNDS: DuplicateClickableBoundsCheck = DuplicateClickableBoundsCheck;
static REDUNDANT_DESCRIPTION: RedundantDescriptionCheck = RedundantDescriptionCheck;
static CLASS_NAME: ClassNameCheck = ClassNameCheck;
static TRAVERSAL_ORDER: TraversalOrderCheck = TraversalOrderCheck;

/// Every accessibility rule known to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckKind {
    SpeakableTextPresent,
    EditableContentDesc,
    TouchTargetSize,
    DuplicateSpeakableText,
    ClickableSpan,
    DuplicateClickableBounds,
    RedundantDescription,
    ClassName,
    TraversalOrder,
}

impl CheckKind {
    pub const ALL: [CheckKind; 9] = [
        CheckKind::SpeakableTextPresent,
        CheckKind::EditableContentDesc,
        CheckKind::TouchTargetSize,
        CheckKind::DuplicateSpeakableText,
        CheckKind::ClickableSpan,
        CheckKind::DuplicateClickableBounds,
        CheckKind::RedundantDescription,
        CheckKind::ClassName,
        CheckKind::TraversalOrder,
    ];

    /// Name reported as the source of a result.
    pub fn class_name(&self) -> &'static str {
        match self {
            CheckKind::SpeakableTextPresent => "SpeakableTextPresentCheck",
            CheckKind::EditableContentDesc => "EditableContentDescCheck",
            CheckKind::TouchTargetSize => "TouchTargetSizeCheck",
            CheckKind::DuplicateSpeakableText => "DuplicateSpeakableTextCheck",
            CheckKind::ClickableSpan => "ClickableSpanCheck",
            CheckKind::DuplicateClickableBounds => "DuplicateClickableBoundsCheck",
            CheckKind::RedundantDescription => "RedundantDescriptionCheck",
            CheckKind::ClassName => "ClassNameCheck",
            CheckKind::TraversalOrder => "TraversalOrderCheck",
        }
    }

    /// The singleton instance for this kind.
    pub fn check(&self) -> &'static dyn AccessibilityHierarchyCheck {
        check_for_kind(*self)
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Resolves a rule type to its process-wide instance.
pub fn check_for_kind(kind: CheckKind) -> &'static dyn AccessibilityHierarchyCheck {
    match kind {
        CheckKind::SpeakableTextPresent => &SPEAKABLE_TEXT_PRESENT,
        CheckKind::EditableContentDesc => &EDITABLE_CONTENT_DESC,
        CheckKind::TouchTargetSize => &TOUCH_TARGET_SIZE,
        CheckKind::DuplicateSpeakableText => &DUPLICATE_SPEAKABLE_TEXT,
        CheckKind::ClickableSpan => &CLICKABLE_SPAN,
        CheckKind::DuplicateClickableBounds => &DUPLICATE_CLICKABLE_BOUNDS,
        CheckKind::RedundantDescription => &REDUNDANT_DESCRIPTION,
        CheckKind::ClassName => &CLASS_NAME,
        CheckKind::TraversalOrder => &TRAVERSAL_ORDER,
    }
}
