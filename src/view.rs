//! View nodes and their navigation handle.
//!
//! A `View` is owned by its window's view arena; its ID is its position there.
//! Parent, child and window links are integer handles, and cross-references
//! to views in other windows are `CondensedId`s. Navigation goes through
//! `ViewRef`, which borrows the frozen `Hierarchy` so every handle can be
//! resolved without back-pointers.

use std::fmt;
use std::ops::Deref;

use crate::hierarchy::Hierarchy;
use crate::text::{self, SpannableText};
use crate::types::{CondensedId, HierarchyError, Rect, TriState, ViewId, WindowId};
use crate::wire::{self, ViewMessage, NO_PARENT};
use crate::window::{Window, WindowRef};

const LIST_VIEW_CLASS_NAMES: &[&str] = &[
    "android.widget.ListView",
    "android.widget.GridView",
    "android.support.v7.widget.RecyclerView",
    "androidx.recyclerview.widget.RecyclerView",
];

const TEXT_VIEW_CLASS_NAMES: &[&str] = &[
    "android.widget.Button",
    "android.widget.TextClock",
    "android.widget.Chronometer",
    "android.widget.DigitalClock",
];

/// Attributes captured for a single view.
///
/// `TriState` fields were optional in the capture; `Indeterminate` means the
/// platform could not determine the value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewAttributes {
    pub package_name: Option<String>,
    pub class_name: Option<String>,
    pub accessibility_class_name: Option<String>,
    pub resource_name: Option<String>,
    pub content_description: Option<SpannableText>,
    pub text: Option<SpannableText>,
    pub important_for_accessibility: bool,
    pub visible_to_user: TriState,
    pub clickable: bool,
    pub long_clickable: bool,
    pub focusable: bool,
    pub editable: TriState,
    pub scrollable: TriState,
    pub can_scroll_forward: TriState,
    pub can_scroll_backward: TriState,
    pub checkable: TriState,
    pub checked: TriState,
    pub has_touch_delegate: TriState,
    pub bounds_in_screen: Option<Rect>,
    pub nonclipped_height: Option<i32>,
    pub nonclipped_width: Option<i32>,
    pub text_size: Option<f32>,
    pub text_color: Option<i32>,
    pub background_drawable_color: Option<i32>,
    pub typeface_style: Option<i32>,
    pub enabled: bool,
}

impl ViewAttributes {
    fn from_message(message: &ViewMessage) -> Self {
        ViewAttributes {
            package_name: message.package_name.clone(),
            class_name: message.class_name.clone(),
            accessibility_class_name: message.accessibility_class_name.clone(),
            resource_name: message.resource_name.clone(),
            content_description: message
                .content_description
                .as_ref()
                .map(SpannableText::from_message),
            text: message.text.as_ref().map(SpannableText::from_message),
            important_for_accessibility: message.important_for_accessibility,
            visible_to_user: message.visible_to_user.into(),
            clickable: message.clickable,
            long_clickable: message.long_clickable,
            focusable: message.focusable,
            editable: message.editable.into(),
            scrollable: message.scrollable.into(),
            can_scroll_forward: message.can_scroll_forward.into(),
            can_scroll_backward: message.can_scroll_backward.into(),
            checkable: message.checkable.into(),
            checked: message.checked.into(),
            has_touch_delegate: message.has_touch_delegate.into(),
            bounds_in_screen: message.bounds_in_screen,
            nonclipped_height: message.nonclipped_height,
            nonclipped_width: message.nonclipped_width,
            text_size: message.text_size,
            text_color: message.text_color,
            background_drawable_color: message.background_drawable_color,
            typeface_style: message.typeface_style,
            enabled: message.enabled,
        }
    }
}

/// A view as read from the wire, before it knows its window.
#[derive(Debug, Clone)]
pub(crate) struct ViewDraft {
    id: ViewId,
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    attributes: ViewAttributes,
    labeled_by: Option<CondensedId>,
    traversal_before: Option<CondensedId>,
    traversal_after: Option<CondensedId>,
}

impl ViewDraft {
    /// Builds the draft for the record at `position` in its window's view list.
    pub(crate) fn from_message(position: usize, message: &ViewMessage) -> Result<Self, HierarchyError> {
        let id = wire::position_id(position, message.id, "view")?;
        Ok(ViewDraft {
            id: ViewId(id),
            parent: wire::parent_id(message.parent_id, "view")?.map(ViewId),
            children: wire::child_ids(&message.child_ids, "view")?
                .into_iter()
                .map(ViewId)
                .collect(),
            attributes: ViewAttributes::from_message(message),
            labeled_by: message.labeled_by_id,
            traversal_before: message.accessibility_traversal_before_id,
            traversal_after: message.accessibility_traversal_after_id,
        })
    }

    /// Stamps the owning window handle, producing the final node.
    pub(crate) fn link(self, window: WindowId) -> View {
        View {
            id: self.id,
            window,
            parent: self.parent,
            children: self.children,
            attributes: self.attributes,
            labeled_by: self.labeled_by,
            traversal_before: self.traversal_before,
            traversal_after: self.traversal_after,
        }
    }
}

/// A single UI element inside a window.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    id: ViewId,
    window: WindowId,
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    attributes: ViewAttributes,
    labeled_by: Option<CondensedId>,
    traversal_before: Option<CondensedId>,
    traversal_after: Option<CondensedId>,
}

impl View {
    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn window_id(&self) -> WindowId {
        self.window
    }

    pub fn condensed_id(&self) -> CondensedId {
        CondensedId::new(self.window, self.id)
    }

    pub fn parent_id(&self) -> Option<ViewId> {
        self.parent
    }

    pub fn child_ids(&self) -> &[ViewId] {
        &self.children
    }

    pub fn attributes(&self) -> &ViewAttributes {
        &self.attributes
    }

    pub fn labeled_by_id(&self) -> Option<CondensedId> {
        self.labeled_by
    }

    pub fn accessibility_traversal_before_id(&self) -> Option<CondensedId> {
        self.traversal_before
    }

    pub fn accessibility_traversal_after_id(&self) -> Option<CondensedId> {
        self.traversal_after
    }

    /// Screen bounds, or an empty rectangle when none were captured.
    pub fn bounds_in_screen(&self) -> Rect {
        self.attributes.bounds_in_screen.unwrap_or(Rect::EMPTY)
    }

    fn class_name_is(&self, candidates: &[&str]) -> bool {
        self.attributes
            .class_name
            .as_deref()
            .map_or(false, |name| candidates.contains(&name))
    }

    fn class_name_contains(&self, fragment: &str) -> bool {
        self.attributes
            .class_name
            .as_deref()
            .map_or(false, |name| name.contains(fragment))
    }

    pub fn is_list_view(&self) -> bool {
        self.class_name_is(LIST_VIEW_CLASS_NAMES)
    }

    pub fn is_spinner(&self) -> bool {
        self.class_name_is(&["android.widget.Spinner"])
    }

    pub fn is_adapter_view(&self) -> bool {
        self.is_spinner() || self.is_list_view()
    }

    pub fn is_scroll_view(&self) -> bool {
        self.class_name_is(&["android.widget.ScrollView"])
    }

    pub fn is_horizontal_scroll_view(&self) -> bool {
        self.class_name_is(&["android.widget.HorizontalScrollView"])
    }

    pub fn is_web_view(&self) -> bool {
        self.class_name_contains("WebView")
    }

    pub fn is_edit_text(&self) -> bool {
        self.class_name_contains("EditText")
    }

    pub fn is_text_view(&self) -> bool {
        self.class_name_contains("TextView")
            || self.class_name_is(TEXT_VIEW_CLASS_NAMES)
            || self.is_edit_text()
    }

    /// Serializes the view back to its wire record.
    ///
    /// Empty strings and empty text are written as absent.
    pub fn to_message(&self) -> ViewMessage {
        let attrs = &self.attributes;
        let non_empty = |value: &Option<String>| value.clone().filter(|s| !s.is_empty());
        let non_empty_text = |value: &Option<SpannableText>| {
            if text::is_empty(value.as_ref()) {
                None
            } else {
                value.as_ref().map(SpannableText::to_message)
            }
        };

        ViewMessage {
            id: self.id.0 as i32,
            parent_id: self.parent.map_or(NO_PARENT, |parent| parent.0 as i32),
            child_ids: self.children.iter().map(|child| child.0 as i32).collect(),
            package_name: non_empty(&attrs.package_name),
            class_name: non_empty(&attrs.class_name),
            accessibility_class_name: attrs.accessibility_class_name.clone(),
            resource_name: non_empty(&attrs.resource_name),
            content_description: non_empty_text(&attrs.content_description),
            text: non_empty_text(&attrs.text),
            important_for_accessibility: attrs.important_for_accessibility,
            visible_to_user: attrs.visible_to_user.to_option(),
            clickable: attrs.clickable,
            long_clickable: attrs.long_clickable,
            focusable: attrs.focusable,
            editable: attrs.editable.to_option(),
            scrollable: attrs.scrollable.to_option(),
            can_scroll_forward: attrs.can_scroll_forward.to_option(),
            can_scroll_backward: attrs.can_scroll_backward.to_option(),
            checkable: attrs.checkable.to_option(),
            checked: attrs.checked.to_option(),
            has_touch_delegate: attrs.has_touch_delegate.to_option(),
            bounds_in_screen: attrs.bounds_in_screen,
            nonclipped_height: attrs.nonclipped_height,
            nonclipped_width: attrs.nonclipped_width,
            text_size: attrs.text_size,
            text_color: attrs.text_color,
            background_drawable_color: attrs.background_drawable_color,
            typeface_style: attrs.typeface_style,
            enabled: attrs.enabled,
            labeled_by_id: self.labeled_by,
            accessibility_traversal_before_id: self.traversal_before,
            accessibility_traversal_after_id: self.traversal_after,
        }
    }
}

/// Borrowed handle to a view inside a frozen hierarchy.
#[derive(Clone, Copy)]
pub struct ViewRef<'h> {
    hierarchy: &'h Hierarchy,
    window: &'h Window,
    view: &'h View,
}

impl<'h> ViewRef<'h> {
    pub(crate) fn new(hierarchy: &'h Hierarchy, window: &'h Window, view: &'h View) -> Self {
        ViewRef {
            hierarchy,
            window,
            view,
        }
    }

    pub fn hierarchy(&self) -> &'h Hierarchy {
        self.hierarchy
    }

    pub fn node(&self) -> &'h View {
        self.view
    }

    pub fn window(&self) -> WindowRef<'h> {
        WindowRef::new(self.hierarchy, self.window)
    }

    /// `None` for the root of a window's view tree.
    ///
    /// # Errors
    ///
    /// `HierarchyError::NotFound` if the recorded parent is not in the window.
    pub fn parent_view(&self) -> Result<Option<ViewRef<'h>>, HierarchyError> {
        match self.view.parent_id() {
            Some(parent) => self.window().view(parent).map(Some),
            None => Ok(None),
        }
    }

    pub fn child_view_count(&self) -> usize {
        self.view.child_ids().len()
    }

    /// # Errors
    ///
    /// `HierarchyError::NotFound` if `index` is past the child list or the
    /// child ID is not in the window.
    pub fn child_view(&self, index: usize) -> Result<ViewRef<'h>, HierarchyError> {
        let child = self.view.child_ids().get(index).ok_or_else(|| {
            HierarchyError::NotFound(format!(
                "child index {} of {} (has {} children)",
                index,
                self.view.condensed_id(),
                self.child_view_count()
            ))
        })?;
        self.window().view(*child)
    }

    pub fn child_views(&self) -> Result<Vec<ViewRef<'h>>, HierarchyError> {
        (0..self.child_view_count())
            .map(|index| self.child_view(index))
            .collect()
    }

    /// This view followed by its descendants in depth-first pre-order.
    ///
    /// Children are visited in child-list order. A view listed under several
    /// parents is emitted once per occurrence.
    ///
    /// # Errors
    ///
    /// `HierarchyError::NotFound` for a dangling child ID and
    /// `HierarchyError::MalformedInput` if a view is its own ancestor.
    pub fn self_and_all_descendants(&self) -> Result<Vec<ViewRef<'h>>, HierarchyError> {
        let mut result = Vec::new();
        // Ancestors of the view being visited, root first
        let mut path: Vec<ViewId> = Vec::new();
        let mut stack = vec![(*self, 0usize)];

        while let Some((current, depth)) = stack.pop() {
            path.truncate(depth);
            if path.contains(&current.view.id()) {
                return Err(HierarchyError::MalformedInput(format!(
                    "{} is its own ancestor below {}",
                    current.view.condensed_id(),
                    self.view.condensed_id()
                )));
            }
            path.push(current.view.id());
            for index in (0..current.child_view_count()).rev() {
                stack.push((current.child_view(index)?, depth + 1));
            }
            result.push(current);
        }

        Ok(result)
    }

    pub fn labeled_by(&self) -> Result<Option<ViewRef<'h>>, HierarchyError> {
        self.resolve(self.view.labeled_by_id())
    }

    pub fn accessibility_traversal_before(&self) -> Result<Option<ViewRef<'h>>, HierarchyError> {
        self.resolve(self.view.accessibility_traversal_before_id())
    }

    pub fn accessibility_traversal_after(&self) -> Result<Option<ViewRef<'h>>, HierarchyError> {
        self.resolve(self.view.accessibility_traversal_after_id())
    }

    fn resolve(&self, id: Option<CondensedId>) -> Result<Option<ViewRef<'h>>, HierarchyError> {
        id.map(|id| self.hierarchy.view_by_condensed_id(id)).transpose()
    }
}

impl Deref for ViewRef<'_> {
    type Target = View;

    fn deref(&self) -> &View {
        self.view
    }
}

impl PartialEq for ViewRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.hierarchy, other.hierarchy)
            && self.view.condensed_id() == other.view.condensed_id()
    }
}

impl Eq for ViewRef<'_> {}

impl fmt::Debug for ViewRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRef")
            .field("id", &self.view.condensed_id())
            .field("class_name", &self.view.attributes().class_name)
            .finish()
    }
}
