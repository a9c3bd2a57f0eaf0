//! Window nodes and their navigation handle.
//!
//! A `Window` owns its views in an arena where list position is the view ID.
//! Parent and child windows are referenced by `WindowId` and resolved through
//! the owning `Hierarchy` via `WindowRef`.

use std::fmt;
use std::ops::Deref;

use crate::hierarchy::Hierarchy;
use crate::types::{HierarchyError, Rect, TriState, ViewId, WindowId};
use crate::view::{View, ViewDraft, ViewRef};
use crate::wire::{self, WindowMessage, NO_PARENT};

/// Platform window type: an application window.
pub const WINDOW_TYPE_APPLICATION: i32 = 1;
/// Platform window type: an input method (soft keyboard).
pub const WINDOW_TYPE_INPUT_METHOD: i32 = 2;
/// Platform window type: a system window such as the status bar.
pub const WINDOW_TYPE_SYSTEM: i32 = 3;
/// Platform window type: an accessibility overlay.
pub const WINDOW_TYPE_ACCESSIBILITY: i32 = 4;

/// Platform metadata captured for a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowAttributes {
    /// Platform-assigned window ID
    pub window_id: Option<i32>,
    pub layer: Option<i32>,
    pub window_type: Option<i32>,
    pub focused: TriState,
    pub accessibility_focused: TriState,
    pub active: TriState,
    pub bounds_in_screen: Option<Rect>,
}

impl WindowAttributes {
    fn from_message(message: &WindowMessage) -> Self {
        WindowAttributes {
            window_id: message.window_id,
            layer: message.layer,
            window_type: message.window_type,
            focused: message.focused.into(),
            accessibility_focused: message.accessibility_focused.into(),
            active: message.active.into(),
            bounds_in_screen: message.bounds_in_screen,
        }
    }
}

/// A window as read from the wire, with views not yet linked to it.
#[derive(Debug, Clone)]
pub(crate) struct WindowDraft {
    id: WindowId,
    parent: Option<WindowId>,
    children: Vec<WindowId>,
    attributes: WindowAttributes,
    views: Vec<ViewDraft>,
}

impl WindowDraft {
    /// Builds the draft for the record at `position`, constructing views in input order.
    pub(crate) fn from_message(position: usize, message: &WindowMessage) -> Result<Self, HierarchyError> {
        let id = wire::position_id(position, message.id, "window")?;
        let views = message
            .views
            .iter()
            .enumerate()
            .map(|(index, view)| ViewDraft::from_message(index, view))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WindowDraft {
            id: WindowId(id),
            parent: wire::parent_id(message.parent_id, "window")?.map(WindowId),
            children: wire::child_ids(&message.child_ids, "window")?
                .into_iter()
                .map(WindowId)
                .collect(),
            attributes: WindowAttributes::from_message(message),
            views,
        })
    }

    pub(crate) fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Links every view to this window, producing the final node.
    pub(crate) fn link(self) -> Window {
        let id = self.id;
        Window {
            id,
            parent: self.parent,
            children: self.children,
            attributes: self.attributes,
            views: self.views.into_iter().map(|view| view.link(id)).collect(),
        }
    }
}

/// A window and the views it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    id: WindowId,
    parent: Option<WindowId>,
    children: Vec<WindowId>,
    attributes: WindowAttributes,
    views: Vec<View>,
}

impl Window {
    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn parent_id(&self) -> Option<WindowId> {
        self.parent
    }

    pub fn child_ids(&self) -> &[WindowId] {
        &self.children
    }

    pub fn attributes(&self) -> &WindowAttributes {
        &self.attributes
    }

    pub fn all_views(&self) -> &[View] {
        &self.views
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Screen bounds, or an empty rectangle when none were captured.
    pub fn bounds_in_screen(&self) -> Rect {
        self.attributes.bounds_in_screen.unwrap_or(Rect::EMPTY)
    }

    /// # Errors
    ///
    /// `HierarchyError::NotFound` if `id` is not a position in this window's view list.
    pub fn view_by_id(&self, id: ViewId) -> Result<&View, HierarchyError> {
        self.views.get(id.index()).ok_or_else(|| {
            HierarchyError::NotFound(format!(
                "{} in {} (has {} views)",
                id,
                self.id,
                self.views.len()
            ))
        })
    }

    pub fn to_message(&self) -> WindowMessage {
        let attrs = &self.attributes;
        WindowMessage {
            id: self.id.0 as i32,
            parent_id: self.parent.map_or(NO_PARENT, |parent| parent.0 as i32),
            child_ids: self.children.iter().map(|child| child.0 as i32).collect(),
            window_id: attrs.window_id,
            layer: attrs.layer,
            window_type: attrs.window_type,
            focused: attrs.focused.to_option(),
            accessibility_focused: attrs.accessibility_focused.to_option(),
            active: attrs.active.to_option(),
            bounds_in_screen: attrs.bounds_in_screen,
            views: self.views.iter().map(View::to_message).collect(),
        }
    }
}

/// Borrowed handle to a window inside a frozen hierarchy.
#[derive(Clone, Copy)]
pub struct WindowRef<'h> {
    hierarchy: &'h Hierarchy,
    window: &'h Window,
}

impl<'h> WindowRef<'h> {
    pub(crate) fn new(hierarchy: &'h Hierarchy, window: &'h Window) -> Self {
        WindowRef { hierarchy, window }
    }

    pub fn hierarchy(&self) -> &'h Hierarchy {
        self.hierarchy
    }

    pub fn node(&self) -> &'h Window {
        self.window
    }

    /// View 0, or `None` for a window without views.
    pub fn root_view(&self) -> Option<ViewRef<'h>> {
        self.window
            .views
            .first()
            .map(|view| ViewRef::new(self.hierarchy, self.window, view))
    }

    pub fn view(&self, id: ViewId) -> Result<ViewRef<'h>, HierarchyError> {
        let view = self.window.view_by_id(id)?;
        Ok(ViewRef::new(self.hierarchy, self.window, view))
    }

    /// All views in ID order.
    pub fn views(&self) -> impl Iterator<Item = ViewRef<'h>> + 'h {
        let hierarchy = self.hierarchy;
        let window = self.window;
        window
            .views
            .iter()
            .map(move |view| ViewRef::new(hierarchy, window, view))
    }

    pub fn parent_window(&self) -> Result<Option<WindowRef<'h>>, HierarchyError> {
        match self.window.parent_id() {
            Some(parent) => self.hierarchy.window_by_id(parent).map(Some),
            None => Ok(None),
        }
    }

    pub fn child_window_count(&self) -> usize {
        self.window.child_ids().len()
    }

    /// # Errors
    ///
    /// `HierarchyError::NotFound` if `index` is past the child list or the
    /// child ID is not in the hierarchy.
    pub fn child_window(&self, index: usize) -> Result<WindowRef<'h>, HierarchyError> {
        let child = self.window.child_ids().get(index).ok_or_else(|| {
            HierarchyError::NotFound(format!(
                "child window index {} of {} (has {} children)",
                index,
                self.window.id(),
                self.child_window_count()
            ))
        })?;
        self.hierarchy.window_by_id(*child)
    }
}

impl Deref for WindowRef<'_> {
    type Target = Window;

    fn deref(&self) -> &Window {
        self.window
    }
}

impl PartialEq for WindowRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.hierarchy, other.hierarchy) && self.window.id() == other.window.id()
    }
}

impl Eq for WindowRef<'_> {}

impl fmt::Debug for WindowRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowRef")
            .field("id", &self.window.id())
            .field("views", &self.window.view_count())
            .finish()
    }
}
