//! Core data types for the a11y-hierarchy crate.
//!
//! This module defines the fundamental types used throughout the crate:
//! - `HierarchyError`: Errors raised while assembling or navigating a hierarchy
//! - `WindowId` / `ViewId`: Position-based handles into the window and view arenas
//! - `CondensedId`: 64-bit key addressing any view anywhere in the forest
//! - `TriState`: Optional boolean that can be true, false or indeterminate
//! - `Rect`: Screen-space bounding rectangle

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building or navigating a hierarchy.
///
/// Malformed input and lookups that fall outside the hierarchy are reported
/// at the call that discovered them. Nothing is clamped or defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// The wire representation cannot describe a valid hierarchy
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A window, view or child index is outside the current hierarchy
    #[error("Element not found: {0}")]
    NotFound(String),

    /// An internal invariant was broken (e.g. a preset without a bucket)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Position of a window inside its hierarchy's window list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u32);

impl WindowId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window {}", self.0)
    }
}

/// Position of a view inside its owning window's view list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(pub u32);

impl ViewId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view {}", self.0)
    }
}

/// Globally unique view key: window ID in the high 32 bits, view ID in the low 32 bits.
///
/// The value is opaque on the wire; it is always written as a single `u64`.
///
/// # Example
///
/// ```
/// use a11y_hierarchy::types::{CondensedId, ViewId, WindowId};
///
/// let id = CondensedId::new(WindowId(2), ViewId(7));
/// assert_eq!(id.as_u64(), (2u64 << 32) | 7);
/// assert_eq!(id.window_id(), WindowId(2));
/// assert_eq!(id.view_id(), ViewId(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CondensedId(u64);

impl CondensedId {
    pub fn new(window: WindowId, view: ViewId) -> Self {
        CondensedId((u64::from(window.0) << 32) | u64::from(view.0))
    }

    pub fn from_u64(raw: u64) -> Self {
        CondensedId(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    pub fn window_id(self) -> WindowId {
        WindowId((self.0 >> 32) as u32)
    }

    pub fn view_id(self) -> ViewId {
        ViewId((self.0 & 0xFFFF_FFFF) as u32)
    }
}

impl fmt::Display for CondensedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.window_id().0, self.view_id().0)
    }
}

/// A boolean attribute the capturing platform may not have been able to determine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriState {
    True,
    False,
    #[default]
    Indeterminate,
}

impl TriState {
    /// Returns `true` only for an explicit `True`.
    pub fn is_true(self) -> bool {
        self == TriState::True
    }

    /// Returns `true` only for an explicit `False`.
    pub fn is_false(self) -> bool {
        self == TriState::False
    }

    pub fn is_indeterminate(self) -> bool {
        self == TriState::Indeterminate
    }

    /// Wire form: `None` means the field was absent.
    pub fn to_option(self) -> Option<bool> {
        match self {
            TriState::True => Some(true),
            TriState::False => Some(false),
            TriState::Indeterminate => None,
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => TriState::True,
            Some(false) => TriState::False,
            None => TriState::Indeterminate,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::True
        } else {
            TriState::False
        }
    }
}

/// Screen-space rectangle in pixels. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Widened so extreme edges cannot overflow.
    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn contains(&self, other: &Rect) -> bool {
        !self.is_empty()
            && self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }
}
