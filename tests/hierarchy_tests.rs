//! Integration tests for hierarchy assembly and navigation through the public API.

use a11y_hierarchy::wire::{DeviceStateMessage, HierarchyMessage, ViewMessage, WindowMessage};
use a11y_hierarchy::{
    CondensedId, Hierarchy, HierarchyError, Locale, TriState, ViewId, WindowId,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// A window whose views form the given parent list (`-1` for the root).
fn window_with_parents(id: i32, parents: &[i32]) -> WindowMessage {
    let mut window = WindowMessage::new(id);
    window.views = parents
        .iter()
        .enumerate()
        .map(|(position, &parent)| {
            let mut view = ViewMessage::new(position as i32);
            view.parent_id = parent;
            view.child_ids = parents
                .iter()
                .enumerate()
                .filter(|(_, p)| **p == position as i32)
                .map(|(child, _)| child as i32)
                .collect();
            view
        })
        .collect();
    window
}

fn hierarchy(windows: Vec<WindowMessage>, active: i32) -> Result<Hierarchy, HierarchyError> {
    Hierarchy::from_message(&HierarchyMessage {
        device_state: DeviceStateMessage {
            locale: Some("en-US".to_string()),
            ..Default::default()
        },
        active_window_id: active,
        windows,
    })
}

fn ids(views: &[a11y_hierarchy::ViewRef<'_>]) -> Vec<u32> {
    views.iter().map(|view| view.id().0).collect()
}

#[test]
fn test_descendants_of_view_with_two_leaf_children() {
    let hierarchy = hierarchy(vec![window_with_parents(0, &[-1, 0, 0])], 0).unwrap();
    let root = hierarchy.active_window().root_view().unwrap();

    assert_eq!(ids(&root.self_and_all_descendants().unwrap()), vec![0, 1, 2]);
}

#[test]
fn test_descendants_of_three_level_chain() {
    let hierarchy = hierarchy(vec![window_with_parents(0, &[-1, 0, 1])], 0).unwrap();
    let root = hierarchy.active_window().root_view().unwrap();

    assert_eq!(ids(&root.self_and_all_descendants().unwrap()), vec![0, 1, 2]);
    let leaf = hierarchy.active_window().view(ViewId(2)).unwrap();
    assert_eq!(leaf.parent_view().unwrap().map(|v| v.id()), Some(ViewId(1)));
}

#[test]
fn test_descendants_are_pre_order() {
    // 0 -> [1, 3], 1 -> [2]
    let hierarchy = hierarchy(vec![window_with_parents(0, &[-1, 0, 1, 0])], 0).unwrap();
    let root = hierarchy.active_window().root_view().unwrap();

    assert_eq!(ids(&root.self_and_all_descendants().unwrap()), vec![0, 1, 2, 3]);
}

#[test]
fn test_shared_child_is_emitted_under_each_parent() {
    // 0 -> [1, 2], 1 -> [3], 2 -> [3]
    let mut window = window_with_parents(0, &[-1, 0, 0, 1]);
    window.views[2].child_ids = vec![3];
    let hierarchy = hierarchy(vec![window], 0).unwrap();
    let root = hierarchy.active_window().root_view().unwrap();

    assert_eq!(ids(&root.self_and_all_descendants().unwrap()), vec![0, 1, 3, 2, 3]);
}

#[test]
fn test_child_cycle_is_malformed() {
    let mut window = window_with_parents(0, &[-1, 0, 1]);
    window.views[2].child_ids = vec![1];
    let hierarchy = hierarchy(vec![window], 0).unwrap();
    let root = hierarchy.active_window().root_view().unwrap();

    assert!(matches!(
        root.self_and_all_descendants(),
        Err(HierarchyError::MalformedInput(_))
    ));
}

#[test]
fn test_empty_window_list_is_malformed() {
    assert!(matches!(
        hierarchy(Vec::new(), 0),
        Err(HierarchyError::MalformedInput(_))
    ));
}

#[test]
fn test_dangling_child_is_reported_at_navigation() {
    let mut window = window_with_parents(0, &[-1]);
    window.views[0].child_ids = vec![5];
    let hierarchy = hierarchy(vec![window], 0).unwrap();
    let root = hierarchy.active_window().root_view().unwrap();

    assert!(matches!(root.child_view(0), Err(HierarchyError::NotFound(_))));
    assert!(matches!(root.child_view(1), Err(HierarchyError::NotFound(_))));
    assert!(root.self_and_all_descendants().is_err());
}

#[test]
fn test_cross_window_labels_resolve() {
    let mut dialog = window_with_parents(1, &[-1]);
    dialog.parent_id = 0;
    let mut app = window_with_parents(0, &[-1, 0]);
    app.child_ids = vec![1];
    app.views[1].labeled_by_id = Some(CondensedId::new(WindowId(1), ViewId(0)));
    app.views[1].accessibility_traversal_after_id = Some(CondensedId::new(WindowId(1), ViewId(0)));

    let hierarchy = hierarchy(vec![app, dialog], 1).unwrap();
    let view = hierarchy
        .view_by_condensed_id(CondensedId::new(WindowId(0), ViewId(1)))
        .unwrap();

    let label = view.labeled_by().unwrap().unwrap();
    assert_eq!(label.window().id(), WindowId(1));
    assert_eq!(view.accessibility_traversal_after().unwrap(), Some(label));
    assert_eq!(view.accessibility_traversal_before().unwrap(), None);

    let active = hierarchy.active_window();
    assert_eq!(active.id(), WindowId(1));
    assert_eq!(active.parent_window().unwrap().map(|w| w.id()), Some(WindowId(0)));
    assert_eq!(hierarchy.window_by_id(WindowId(0)).unwrap().child_window_count(), 1);
}

#[test]
fn test_missing_locale_uses_system_default() {
    let json = r#"{
        "device_state": {"sdk_version": 28},
        "active_window_id": 0,
        "windows": [{"id": 0, "views": [{"id": 0}]}]
    }"#;
    let hierarchy = Hierarchy::from_json(json).unwrap();

    assert_eq!(hierarchy.device_state().locale(), &Locale::system_default());
    assert!(!hierarchy.device_state().locale().language().is_empty());
}

#[test]
fn test_unset_and_false_scrollable_are_distinct() {
    let json = r#"{
        "device_state": {"sdk_version": 28, "locale": "en-US"},
        "active_window_id": 0,
        "windows": [{"id": 0, "views": [
            {"id": 0, "child_ids": [1]},
            {"id": 1, "parent_id": 0, "scrollable": false}
        ]}]
    }"#;
    let hierarchy = Hierarchy::from_json(json).unwrap();
    let window = hierarchy.active_window();

    assert_eq!(window.view(ViewId(0)).unwrap().attributes().scrollable, TriState::Indeterminate);
    assert_eq!(window.view(ViewId(1)).unwrap().attributes().scrollable, TriState::False);
}

#[test]
fn test_json_roundtrip_preserves_hierarchy() {
    let json = r#"{
        "device_state": {"sdk_version": 30, "locale": "de-DE"},
        "active_window_id": 0,
        "windows": [{"id": 0, "type": 1, "views": [
            {"id": 0, "child_ids": [1], "class_name": "android.widget.FrameLayout"},
            {"id": 1, "parent_id": 0, "clickable": true,
             "text": {"text": "Open site", "spans": [{"start": 0, "end": 4, "flags": 33, "type": "URL", "url": "https://example.com"}]}}
        ]}]
    }"#;
    let hierarchy = Hierarchy::from_json(json).unwrap();
    let encoded = hierarchy.to_message().to_json().unwrap();
    let restored = Hierarchy::from_json(&encoded).unwrap();

    assert_eq!(hierarchy, restored);
}

proptest! {
    #[test]
    fn prop_active_window_is_member(count in 1usize..6, pick in 0usize..6) {
        let active = pick % count;
        let windows = (0..count).map(|id| window_with_parents(id as i32, &[-1])).collect();
        let hierarchy = hierarchy(windows, active as i32).unwrap();

        prop_assert_eq!(hierarchy.window_count(), count);
        prop_assert!(hierarchy.windows().any(|window| window == hierarchy.active_window()));
    }

    #[test]
    fn prop_every_view_recovers_its_condensed_id(parents in proptest::collection::vec(0usize..4, 0..8)) {
        // Each view's parent is some earlier view, so the tree is well formed.
        let mut parent_ids = vec![-1];
        for (index, parent) in parents.iter().enumerate() {
            parent_ids.push((parent % (index + 1)) as i32);
        }
        let hierarchy = hierarchy(
            vec![window_with_parents(0, &[-1]), window_with_parents(1, &parent_ids)],
            1,
        )
        .unwrap();

        for view in hierarchy.all_views() {
            let id = view.condensed_id();
            prop_assert_eq!(id.window_id(), view.window().id());
            prop_assert_eq!(id.view_id(), view.id());
            prop_assert_eq!(hierarchy.view_by_condensed_id(id).unwrap(), view);
        }
        let root = hierarchy.active_window().root_view().unwrap();
        prop_assert_eq!(root.self_and_all_descendants().unwrap().len(), parent_ids.len());
    }
}
