//! Hierarchy assembly and the root aggregate.
//!
//! Assembly runs in two phases:
//!
//! 1. Every window record is turned into a `WindowDraft` in input order, each
//!    building its `ViewDraft`s in input order. Parent/child IDs and condensed
//!    cross-references are copied verbatim.
//! 2. Once the whole forest exists, each draft is linked: views get their
//!    owning window handle, and the window arena is frozen inside `Hierarchy`.
//!
//! Nothing is mutated after `HierarchyBuilder::build` returns, so a
//! `Hierarchy` can be shared across threads without locking.
//!
//! # Example
//!
//! ```
//! use a11y_hierarchy::Hierarchy;
//!
//! let json = r#"{
//!     "device_state": {"sdk_version": 29, "locale": "en-US"},
//!     "active_window_id": 0,
//!     "windows": [{"id": 0, "views": [{"id": 0, "child_ids": [1]}, {"id": 1, "parent_id": 0}]}]
//! }"#;
//!
//! let hierarchy = Hierarchy::from_json(json).unwrap();
//! let root = hierarchy.active_window().root_view().unwrap();
//! assert_eq!(root.self_and_all_descendants().unwrap().len(), 2);
//! ```

use std::io::Read;

use log::{debug, info};

use crate::device::DeviceState;
use crate::types::{CondensedId, HierarchyError, WindowId};
use crate::view::ViewRef;
use crate::window::{Window, WindowDraft, WindowRef};
use crate::wire::{HierarchyMessage, WireError};

/// Errors raised when loading a hierarchy straight from serialized input.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

/// A frozen snapshot: device state plus a forest of windows.
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    device_state: DeviceState,
    windows: Vec<Window>,
    active_window: WindowId,
}

impl Hierarchy {
    /// Assembles a hierarchy from a decoded wire message.
    pub fn from_message(message: &HierarchyMessage) -> Result<Self, HierarchyError> {
        HierarchyBuilder::new(message).build()
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let message = HierarchyMessage::from_json(json)?;
        Ok(Hierarchy::from_message(&message)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let message = HierarchyMessage::from_reader(reader)?;
        Ok(Hierarchy::from_message(&message)?)
    }

    pub fn device_state(&self) -> &DeviceState {
        &self.device_state
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// The window marked active in the snapshot. Always present.
    pub fn active_window(&self) -> WindowRef<'_> {
        WindowRef::new(self, &self.windows[self.active_window.index()])
    }

    pub fn windows(&self) -> impl Iterator<Item = WindowRef<'_>> {
        self.windows.iter().map(move |window| WindowRef::new(self, window))
    }

    /// # Errors
    ///
    /// `HierarchyError::NotFound` if `id` is not a position in the window list.
    pub fn window_by_id(&self, id: WindowId) -> Result<WindowRef<'_>, HierarchyError> {
        let window = self.windows.get(id.index()).ok_or_else(|| {
            HierarchyError::NotFound(format!(
                "{} (hierarchy has {} windows)",
                id,
                self.windows.len()
            ))
        })?;
        Ok(WindowRef::new(self, window))
    }

    /// Resolves a condensed ID to a view anywhere in the forest.
    ///
    /// Both halves are range-checked.
    pub fn view_by_condensed_id(&self, id: CondensedId) -> Result<ViewRef<'_>, HierarchyError> {
        self.window_by_id(id.window_id())?.view(id.view_id())
    }

    /// Every view of every window, windows in ID order.
    pub fn all_views(&self) -> impl Iterator<Item = ViewRef<'_>> {
        self.windows().flat_map(|window| window.views())
    }

    pub fn to_message(&self) -> HierarchyMessage {
        HierarchyMessage {
            device_state: self.device_state.to_message(),
            active_window_id: self.active_window.0 as i32,
            windows: self.windows.iter().map(Window::to_message).collect(),
        }
    }
}

/// Two-phase assembler turning a wire message into a `Hierarchy`.
pub struct HierarchyBuilder<'m> {
    message: &'m HierarchyMessage,
}

impl<'m> HierarchyBuilder<'m> {
    pub fn new(message: &'m HierarchyMessage) -> Self {
        HierarchyBuilder { message }
    }

    /// # Errors
    ///
    /// `HierarchyError::MalformedInput` if there are no windows, the active
    /// window index is out of range, or a record's ID does not match its position.
    pub fn build(self) -> Result<Hierarchy, HierarchyError> {
        let message = self.message;
        if message.windows.is_empty() {
            return Err(HierarchyError::MalformedInput(
                "hierarchies must contain at least one window".into(),
            ));
        }
        let active_window = usize::try_from(message.active_window_id)
            .ok()
            .filter(|&index| index < message.windows.len())
            .ok_or_else(|| {
                HierarchyError::MalformedInput(format!(
                    "active window id {} is out of range for {} windows",
                    message.active_window_id,
                    message.windows.len()
                ))
            })?;

        let drafts = Self::construct(message)?;
        let windows = Self::link(drafts);

        let hierarchy = Hierarchy {
            device_state: DeviceState::from_message(&message.device_state),
            windows,
            active_window: WindowId(active_window as u32),
        };
        info!(
            "Assembled hierarchy with {} windows and {} views",
            hierarchy.window_count(),
            hierarchy.windows.iter().map(Window::view_count).sum::<usize>()
        );
        Ok(hierarchy)
    }

    /// Phase 1: structural construction in input order.
    fn construct(message: &HierarchyMessage) -> Result<Vec<WindowDraft>, HierarchyError> {
        message
            .windows
            .iter()
            .enumerate()
            .map(|(position, window)| {
                let draft = WindowDraft::from_message(position, window)?;
                debug!("Constructed window {} with {} views", position, draft.view_count());
                Ok(draft)
            })
            .collect()
    }

    /// Phase 2: stamp back-references once every node exists.
    fn link(drafts: Vec<WindowDraft>) -> Vec<Window> {
        drafts.into_iter().map(WindowDraft::link).collect()
    }
}
