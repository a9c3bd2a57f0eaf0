//! Versioned check presets.
//!
//! A preset names the set of checks that shipped in a release. Sets only grow
//! from one release to the next:
//! `1.0 ⊂ 2.0 ⊂ 3.0 ⊂ latest ⊆ prerelease`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{check_for_kind, AccessibilityHierarchyCheck, CheckKind};
use crate::types::HierarchyError;

/// Checks that shipped with release 1.0.
const VERSION_1_0_BUCKET: &[CheckKind] = &[
    CheckKind::SpeakableTextPresent,
    CheckKind::EditableContentDesc,
    CheckKind::TouchTargetSize,
    CheckKind::DuplicateSpeakableText,
];

/// Checks added in release 2.0.
const VERSION_2_0_BUCKET: &[CheckKind] = &[
    CheckKind::ClickableSpan,
    CheckKind::DuplicateClickableBounds,
    CheckKind::RedundantDescription,
];

/// Checks added in release 3.0.
const VERSION_3_0_BUCKET: &[CheckKind] = &[CheckKind::ClassName, CheckKind::TraversalOrder];

/// Named check configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckPreset {
    /// The most comprehensive released set
    #[default]
    Latest,
    #[serde(rename = "version_1_0")]
    Version1_0,
    #[serde(rename = "version_2_0")]
    Version2_0,
    #[serde(rename = "version_3_0")]
    Version3_0,
    /// Runs nothing
    NoChecks,
    /// Latest plus checks about to be released
    Prerelease,
    /// A preset with no bucket, used to exercise the unhandled-preset path.
    #[cfg(test)]
    #[serde(skip)]
    Unbucketed,
}

impl CheckPreset {
    pub const ALL: [CheckPreset; 6] = [
        CheckPreset::Latest,
        CheckPreset::Version1_0,
        CheckPreset::Version2_0,
        CheckPreset::Version3_0,
        CheckPreset::NoChecks,
        CheckPreset::Prerelease,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckPreset::Latest => "latest",
            CheckPreset::Version1_0 => "version_1_0",
            CheckPreset::Version2_0 => "version_2_0",
            CheckPreset::Version3_0 => "version_3_0",
            CheckPreset::NoChecks => "no_checks",
            CheckPreset::Prerelease => "prerelease",
            #[cfg(test)]
            CheckPreset::Unbucketed => "unbucketed",
        }
    }
}

impl fmt::Display for CheckPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckPreset {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value
            .trim()
            .to_lowercase()
            .replace(|c: char| c == '-' || c == '.', "_");
        // Short forms such as "v2.0"
        let expanded = normalized
            .strip_prefix('v')
            .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
            .map(|rest| format!("version_{}", rest));
        let normalized = expanded.unwrap_or(normalized);
        CheckPreset::ALL
            .into_iter()
            .find(|preset| preset.as_str() == normalized)
            .ok_or_else(|| format!("Unknown preset: {}", value))
    }
}

/// A resolved, ordered set of check kinds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckSet {
    kinds: BTreeSet<CheckKind>,
}

impl CheckSet {
    fn add_bucket(&mut self, bucket: &[CheckKind]) {
        self.kinds.extend(bucket.iter().copied());
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn contains(&self, kind: CheckKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_subset(&self, other: &CheckSet) -> bool {
        self.kinds.is_subset(&other.kinds)
    }

    pub fn kinds(&self) -> impl Iterator<Item = CheckKind> + '_ {
        self.kinds.iter().copied()
    }

    /// Singleton instances, in `CheckKind` order.
    pub fn checks(&self) -> impl Iterator<Item = &'static dyn AccessibilityHierarchyCheck> + '_ {
        self.kinds.iter().map(|kind| check_for_kind(*kind))
    }
}

/// Resolves a preset to the checks active in that release.
///
/// Buckets are folded in release order, stopping at the requested release.
///
/// # Errors
///
/// `HierarchyError::InvariantViolation` if the preset has no bucket. Every
/// released preset is handled, so reaching this means a preset was added
/// without wiring it in here.
pub fn checks_for_preset(preset: CheckPreset) -> Result<CheckSet, HierarchyError> {
    let mut checks = CheckSet::default();
    if preset == CheckPreset::NoChecks {
        return Ok(checks);
    }

    checks.add_bucket(VERSION_1_0_BUCKET);
    if preset == CheckPreset::Version1_0 {
        return Ok(checks);
    }

    checks.add_bucket(VERSION_2_0_BUCKET);
    if preset == CheckPreset::Version2_0 {
        return Ok(checks);
    }

    checks.add_bucket(VERSION_3_0_BUCKET);
    if preset == CheckPreset::Version3_0 {
        return Ok(checks);
    }

    // Checks added since the last release are folded in here.
    match preset {
        CheckPreset::Latest | CheckPreset::Prerelease => Ok(checks),
        unhandled => Err(HierarchyError::InvariantViolation(format!(
            "preset {} has no check bucket",
            unhandled
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn resolve(preset: CheckPreset) -> CheckSet {
        checks_for_preset(preset).unwrap()
    }

    #[test]
    fn test_no_checks_is_empty() {
        assert!(resolve(CheckPreset::NoChecks).is_empty());
    }

    #[test]
    fn test_bucket_sizes() {
        assert_eq!(resolve(CheckPreset::Version1_0).len(), 4);
        assert_eq!(resolve(CheckPreset::Version2_0).len(), 7);
        assert_eq!(resolve(CheckPreset::Version3_0).len(), 9);
        assert_eq!(resolve(CheckPreset::Latest).len(), 9);
    }

    #[test]
    fn test_release_history_is_strictly_monotonic() {
        let v1 = resolve(CheckPreset::Version1_0);
        let v2 = resolve(CheckPreset::Version2_0);
        let v3 = resolve(CheckPreset::Version3_0);
        let latest = resolve(CheckPreset::Latest);
        let prerelease = resolve(CheckPreset::Prerelease);

        assert!(v1.is_subset(&v2) && v1 != v2);
        assert!(v2.is_subset(&v3) && v2 != v3);
        assert!(v3.is_subset(&latest));
        assert!(latest.is_subset(&prerelease));
        assert_eq!(latest, prerelease);
    }

    #[test]
    fn test_version_buckets_contain_expected_checks() {
        let v1 = resolve(CheckPreset::Version1_0);
        assert!(v1.contains(CheckKind::TouchTargetSize));
        assert!(!v1.contains(CheckKind::ClickableSpan));

        let v2 = resolve(CheckPreset::Version2_0);
        assert!(v2.contains(CheckKind::RedundantDescription));
        assert!(!v2.contains(CheckKind::TraversalOrder));

        let latest = resolve(CheckPreset::Latest);
        assert!(CheckKind::ALL.iter().all(|kind| latest.contains(*kind)));
    }

    #[test]
    fn test_unbucketed_preset_is_an_invariant_violation() {
        let result = checks_for_preset(CheckPreset::Unbucketed);
        assert!(matches!(result, Err(HierarchyError::InvariantViolation(_))));
    }

    #[test]
    fn test_checks_are_singletons_in_kind_order() {
        let set = resolve(CheckPreset::Version2_0);
        let kinds: Vec<CheckKind> = set.checks().map(|check| check.kind()).collect();
        let expected: Vec<CheckKind> = set.kinds().collect();
        assert_eq!(kinds, expected);
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("latest".parse::<CheckPreset>(), Ok(CheckPreset::Latest));
        assert_eq!("version_2_0".parse::<CheckPreset>(), Ok(CheckPreset::Version2_0));
        assert_eq!("v3.0".parse::<CheckPreset>(), Ok(CheckPreset::Version3_0));
        assert_eq!("NO-CHECKS".parse::<CheckPreset>(), Ok(CheckPreset::NoChecks));
        assert!("version_9_0".parse::<CheckPreset>().is_err());
        assert!("unbucketed".parse::<CheckPreset>().is_err());
    }

    #[test]
    fn test_preset_serde_names() {
        let json = serde_json::to_string(&CheckPreset::Version1_0).unwrap();
        assert_eq!(json, "\"version_1_0\"");
        let parsed: CheckPreset = serde_json::from_str("\"prerelease\"").unwrap();
        assert_eq!(parsed, CheckPreset::Prerelease);
    }

    proptest! {
        #[test]
        fn prop_earlier_presets_are_subsets(a in 0usize..4, b in 0usize..4) {
            let history = [
                CheckPreset::Version1_0,
                CheckPreset::Version2_0,
                CheckPreset::Version3_0,
                CheckPreset::Latest,
            ];
            let (early, late) = (a.min(b), a.max(b));
            let early_set = resolve(history[early]);
            let late_set = resolve(history[late]);
            prop_assert!(early_set.is_subset(&late_set));
        }
    }
}
