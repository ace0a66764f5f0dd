//! Property-based tests for the visible-collection reducer.
//!
//! These verify the merge invariants: for any sequence of insert and delete
//! changes, the collection never holds two entries with the same id, and
//! both merge directions are idempotent.

use proptest::prelude::*;
use std::collections::HashSet;

use smartmarks::managers::bookmark_list::reduce;
use smartmarks::types::bookmark::Bookmark;
use smartmarks::types::event::BookmarkChange;

/// A merge operation over a small id space, so insert/delete collisions and
/// duplicate deliveries actually happen.
#[derive(Debug, Clone)]
enum MergeOp {
    Insert(u8),
    Delete(u8),
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

fn to_change(op: &MergeOp) -> BookmarkChange {
    match op {
        MergeOp::Insert(id) => BookmarkChange::Inserted(row(*id)),
        MergeOp::Delete(id) => BookmarkChange::Deleted {
            id: format!("bm-{}", id),
        },
    }
}

fn arb_merge_ops() -> impl Strategy<Value = Vec<MergeOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => (0..8u8).prop_map(MergeOp::Insert),
            2 => (0..8u8).prop_map(MergeOp::Delete),
        ],
        1..80,
    )
}

// *For any* sequence of merges, no two visible entries share an id.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn no_duplicate_ids_under_any_merge_sequence(ops in arb_merge_ops()) {
        let mut items = Vec::new();
        for op in &ops {
            items = reduce(items, &to_change(op));

            let mut seen = HashSet::new();
            for b in &items {
                prop_assert!(seen.insert(b.id.clone()), "duplicate id {}", b.id);
            }
        }
    }

    // A duplicate delivery of any change is a no-op: applying it twice in a
    // row leaves exactly the collection one application produced.
    #[test]
    fn every_merge_is_idempotent(ops in arb_merge_ops()) {
        let mut items = Vec::new();
        for op in &ops {
            let change = to_change(op);
            items = reduce(items, &change);
            let again = reduce(items.clone(), &change);
            prop_assert_eq!(&again, &items);
        }
    }

    // The final visible set is decided by each id's last merge: a trailing
    // insert means present, a trailing delete means absent.
    #[test]
    fn last_merge_per_id_wins(ops in arb_merge_ops()) {
        let mut items = Vec::new();
        for op in &ops {
            items = reduce(items, &to_change(op));
        }

        let visible: HashSet<String> = items.iter().map(|b| b.id.clone()).collect();
        for id in 0..8u8 {
            let last = ops.iter().rev().find(|op| match op {
                MergeOp::Insert(i) | MergeOp::Delete(i) => *i == id,
            });
            let key = format!("bm-{}", id);
            match last {
                Some(MergeOp::Insert(_)) => {
                    prop_assert!(visible.contains(&key))
                }
                Some(MergeOp::Delete(_)) | None => {
                    prop_assert!(!visible.contains(&key))
                }
            }
        }
    }

    // Inserting never reorders what was already visible: the surviving
    // entries keep their relative order across any merge.
    #[test]
    fn merges_preserve_relative_order(ops in arb_merge_ops()) {
        let mut items: Vec<Bookmark> = Vec::new();
        for op in &ops {
            let before: Vec<String> = items.iter().map(|b| b.id.clone()).collect();
            items = reduce(items, &to_change(op));
            let after: Vec<String> = items
                .iter()
                .map(|b| b.id.clone())
                .filter(|id| before.contains(id))
                .collect();
            let expected: Vec<String> = before
                .iter()
                .filter(|id| items.iter().any(|b| &b.id == *id))
                .cloned()
                .collect();
            prop_assert_eq!(after, expected);
        }
    }
}
