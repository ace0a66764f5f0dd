//! Property-based tests for the bookmark list state machine.
//!
//! Drives a `BookmarkList` with interleaved change events and local delete
//! lifecycle calls, checking the delete-in-flight bookkeeping against an
//! independent model after every step.

use proptest::prelude::*;
use std::collections::HashSet;

use smartmarks::managers::bookmark_list::BookmarkList;
use smartmarks::types::bookmark::Bookmark;
use smartmarks::types::event::BookmarkChange;

#[derive(Debug, Clone)]
enum ListOp {
    RemoteInsert(u8),
    RemoteDelete(u8),
    BeginDelete(u8),
    ConfirmDelete(u8),
    RollbackDelete(u8),
}

fn row(id: u8) -> Bookmark {
    Bookmark {
        id: format!("bm-{}", id),
        user_id: "alice".to_string(),
        title: format!("Title {}", id),
        url: format!("https://{}.example", id),
        created_at: id as i64,
    }
}

fn arb_list_ops() -> impl Strategy<Value = Vec<ListOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => (0..6u8).prop_map(ListOp::RemoteInsert),
            2 => (0..6u8).prop_map(ListOp::RemoteDelete),
            2 => (0..6u8).prop_map(ListOp::BeginDelete),
            2 => (0..6u8).prop_map(ListOp::ConfirmDelete),
            1 => (0..6u8).prop_map(ListOp::RollbackDelete),
        ],
        1..60,
    )
}

// *For any* interleaving of remote changes and local delete lifecycle
// calls, the list's visible ids stay unique and its in-flight marks match
// an independently tracked model.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn delete_marks_track_lifecycle(ops in arb_list_ops()) {
        let mut list = BookmarkList::new();
        let mut pending: HashSet<String> = HashSet::new();

        for op in &ops {
            match op {
                ListOp::RemoteInsert(i) => {
                    list.apply(&BookmarkChange::Inserted(row(*i)));
                }
                ListOp::RemoteDelete(i) => {
                    let id = format!("bm-{}", i);
                    list.apply(&BookmarkChange::Deleted { id: id.clone() });
                    // A confirmed remote delete settles any pending local one.
                    pending.remove(&id);
                }
                ListOp::BeginDelete(i) => {
                    let id = format!("bm-{}", i);
                    let accepted = list.begin_delete(&id);
                    // Accepted exactly when no delete for the id is pending.
                    prop_assert_eq!(accepted, !pending.contains(&id));
                    pending.insert(id);
                }
                ListOp::ConfirmDelete(i) => {
                    let id = format!("bm-{}", i);
                    list.confirm_delete(&id);
                    pending.remove(&id);
                    prop_assert!(!list.contains(&id));
                }
                ListOp::RollbackDelete(i) => {
                    let id = format!("bm-{}", i);
                    let was_visible = list.contains(&id);
                    list.rollback_delete(&id);
                    pending.remove(&id);
                    // Rollback never touches visibility.
                    prop_assert_eq!(list.contains(&id), was_visible);
                }
            }

            // Visible ids are unique.
            let snapshot = list.snapshot();
            let mut seen = HashSet::new();
            for b in &snapshot.bookmarks {
                prop_assert!(seen.insert(b.id.clone()), "duplicate id {}", b.id);
            }

            // In-flight marks match the model exactly.
            let marks: HashSet<String> = snapshot.deleting.iter().cloned().collect();
            prop_assert_eq!(&marks, &pending);
            for id in &marks {
                prop_assert!(list.is_deleting(id));
            }
        }
    }

    // An entry with a delete in flight stays visible until the delete
    // settles one way or the other.
    #[test]
    fn begin_delete_never_hides_the_entry(ids in prop::collection::vec(0..6u8, 1..20)) {
        let mut list = BookmarkList::new();
        for i in &ids {
            list.apply(&BookmarkChange::Inserted(row(*i)));
        }

        for i in &ids {
            let id = format!("bm-{}", i);
            list.begin_delete(&id);
            prop_assert!(list.contains(&id));
            prop_assert!(list.is_deleting(&id));
        }
    }

    // Seeding from a fetch that carries duplicate ids keeps one entry per
    // id, preserving the first (newest) occurrence.
    #[test]
    fn seeding_dedupes_by_id(ids in prop::collection::vec(0..6u8, 0..30)) {
        let rows: Vec<Bookmark> = ids.iter().map(|i| row(*i)).collect();
        let list = BookmarkList::with_items(rows);

        let mut seen = HashSet::new();
        for b in list.items() {
            prop_assert!(seen.insert(b.id.clone()), "duplicate id {}", b.id);
        }
        let distinct: HashSet<u8> = ids.iter().copied().collect();
        prop_assert_eq!(list.len(), distinct.len());
    }
}
