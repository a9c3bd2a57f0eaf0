//! A11y Hierarchy - Rebuild captured UI accessibility hierarchies and evaluate accessibility checks.
//!
//! A snapshot of a device screen is captured as a flat, ID-addressed record of
//! windows and their views. This crate reassembles such a snapshot into an
//! immutable, navigable `Hierarchy` and runs versioned sets of stateless
//! accessibility checks over it.
//!
//! # Quick Start
//!
//! ```no_run
//! use a11y_hierarchy::analyzer::Analyzer;
//! use a11y_hierarchy::config::AnalyzerConfig;
//!
//! let analyzer = Analyzer::new(AnalyzerConfig::default()).unwrap();
//! let report = analyzer.analyze_dir(std::path::Path::new("captures")).unwrap();
//! for snapshot in &report.snapshots {
//!     for result in &snapshot.results {
//!         println!("{}: {} {}", snapshot.file, result.result_type, result.title);
//!     }
//! }
//! ```
//!
//! # Modules
//!
//! - [`types`]: IDs, tri-state booleans, rectangles and `HierarchyError`
//! - [`text`]: spannable text and typed spans
//! - [`device`]: device state, display metrics and locale
//! - [`wire`]: the JSON wire format
//! - [`view`] / [`window`]: hierarchy nodes and their navigation handles
//! - [`hierarchy`]: the root aggregate and its two-phase builder
//! - [`checks`]: the check trait, registry, presets and rules
//! - [`config`] / [`analyzer`]: batch analysis of snapshot directories

pub mod analyzer;
pub mod checks;
pub mod config;
pub mod device;
pub mod hierarchy;
pub mod text;
pub mod types;
pub mod view;
pub mod window;
pub mod wire;

pub use checks::{
    check_for_kind, checks_for_preset, AccessibilityHierarchyCheck, CheckKind, CheckPreset,
    CheckResult, Metadata, ResultType,
};
pub use device::{DeviceState, DisplayInfo, Locale, Metrics};
pub use hierarchy::{Hierarchy, HierarchyBuilder, LoadError};
pub use text::{Span, SpanKind, SpannableText};
pub use types::{CondensedId, HierarchyError, Rect, TriState, ViewId, WindowId};
pub use view::{View, ViewRef};
pub use window::{Window, WindowRef};
