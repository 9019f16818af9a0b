//! Property and scenario tests for the placement store.
//!
//! These exercise `PlacementStore` and the drop handler through the public API
//! only, the same way a front end would drive them.

use std::collections::BTreeSet;

use proptest::prelude::*;
use songslot_core::{
    handle_drop, DropTarget, ItemId, PlacementStore, SectionDecl, SectionId, TrackTarget,
};
use uuid::Uuid;

const SECTIONS: [&str; 3] = ["S1", "S2", "S3"];

fn make_store() -> PlacementStore {
    PlacementStore::new(SECTIONS.iter().map(|id| SectionDecl::new(*id, format!("Song {id}"))))
        .expect("distinct section ids")
}

fn item(id: &str) -> ItemId {
    ItemId::from(id)
}

fn section(id: &str) -> SectionId {
    SectionId::from(id)
}

// ── Scenario ──────────────────────────────────────────────────────────────────

#[test]
fn test_scenario_two_new_tracks_then_back_to_pool() {
    let mut store = make_store();
    store.import_items(["a.mp3", "b.mp3"]);

    // Step 1: a.mp3 into a new track of S1.
    store
        .move_to_track(&item("a.mp3"), &section("S1"), TrackTarget::New)
        .unwrap();
    assert_eq!(store.pool(), [item("b.mp3")]);
    let s1 = store.section(&section("S1")).unwrap();
    assert_eq!(s1.tracks().len(), 1);
    assert_eq!(s1.tracks()[0].items(), [item("a.mp3")]);

    // Step 2: b.mp3 into a second new track of S1.
    store
        .move_to_track(&item("b.mp3"), &section("S1"), TrackTarget::New)
        .unwrap();
    assert!(store.pool().is_empty());
    assert_eq!(store.section(&section("S1")).unwrap().tracks().len(), 2);
    assert_eq!(store.index_of(&section("S1"), &item("b.mp3")), Some(2));

    // Step 3: a.mp3 back to the pool; its track stays behind empty.
    store.move_to_pool(&item("a.mp3")).unwrap();
    assert_eq!(store.pool(), [item("a.mp3")]);
    assert!(store.section(&section("S1")).unwrap().tracks()[0]
        .items()
        .is_empty());
}

#[test]
fn test_scenario_driven_through_drop_targets() {
    let mut store = make_store();
    store.import_items(["a.mp3", "b.mp3"]);

    handle_drop(
        &mut store,
        &DropTarget::NewTrack {
            section: section("S1"),
        },
        ["a.mp3"],
    );
    handle_drop(
        &mut store,
        &DropTarget::NewTrack {
            section: section("S1"),
        },
        ["b.mp3"],
    );
    let ack = handle_drop(&mut store, &DropTarget::Pool, ["a.mp3"]);

    assert!(ack.completed);
    assert_eq!(store.pool(), [item("a.mp3")]);
    assert_eq!(store.index_of(&section("S1"), &item("b.mp3")), Some(2));
}

#[test]
fn test_re_move_to_other_track_shrinks_old_track_and_keeps_total() {
    let mut store = make_store();
    store.import_items(["a.mp3", "b.mp3", "c.mp3"]);
    store
        .move_to_track(&item("a.mp3"), &section("S1"), TrackTarget::New)
        .unwrap();
    let old = store.section(&section("S1")).unwrap().tracks()[0].id();
    store
        .move_to_track(&item("b.mp3"), &section("S1"), TrackTarget::Existing(old))
        .unwrap();
    store
        .move_to_track(&item("c.mp3"), &section("S2"), TrackTarget::New)
        .unwrap();
    let new = store.section(&section("S2")).unwrap().tracks()[0].id();
    let total = store.item_count();

    store
        .move_to_track(&item("a.mp3"), &section("S2"), TrackTarget::Existing(new))
        .unwrap();

    let old_items = store.section(&section("S1")).unwrap().tracks()[0].items();
    let new_items = store.section(&section("S2")).unwrap().tracks()[0].items();
    assert_eq!(old_items, [item("b.mp3")]);
    assert_eq!(new_items, [item("c.mp3"), item("a.mp3")]);
    assert_eq!(store.item_count(), total);
}

// ── Properties ────────────────────────────────────────────────────────────────

/// One user gesture, with indices resolved against the store when applied.
#[derive(Debug, Clone)]
enum Gesture {
    Import(Vec<u8>),
    ClearPool,
    ToPool(u8),
    /// Section index 3 is undeclared.
    ToNewTrack(u8, u8),
    /// Track index past the end becomes a stale track handle.
    ToExistingTrack(u8, u8, u8),
}

fn gesture() -> impl Strategy<Value = Gesture> {
    prop_oneof![
        prop::collection::vec(0u8..10, 0..4).prop_map(Gesture::Import),
        Just(Gesture::ClearPool),
        (0u8..12).prop_map(Gesture::ToPool),
        (0u8..12, 0u8..4).prop_map(|(i, s)| Gesture::ToNewTrack(i, s)),
        (0u8..12, 0u8..4, 0u8..5).prop_map(|(i, s, t)| Gesture::ToExistingTrack(i, s, t)),
    ]
}

fn item_name(i: u8) -> String {
    format!("take-{i}.wav")
}

fn section_name(s: u8) -> SectionId {
    SectionId::new(SECTIONS.get(usize::from(s)).copied().unwrap_or("S-undeclared"))
}

fn apply_gesture(store: &mut PlacementStore, live: &mut BTreeSet<String>, gesture: &Gesture) {
    match gesture {
        Gesture::Import(ids) => {
            let names: Vec<String> = ids.iter().map(|i| item_name(*i)).collect();
            store.import_items(names.iter().cloned());
            live.extend(names);
        }
        Gesture::ClearPool => {
            for removed in store.clear_pool() {
                live.remove(removed.as_str());
            }
        }
        Gesture::ToPool(i) => {
            let _ = store.move_to_pool(&ItemId::new(item_name(*i)));
        }
        Gesture::ToNewTrack(i, s) => {
            let _ = store.move_to_track(
                &ItemId::new(item_name(*i)),
                &section_name(*s),
                TrackTarget::New,
            );
        }
        Gesture::ToExistingTrack(i, s, t) => {
            let section = section_name(*s);
            let track = store
                .section(&section)
                .and_then(|sec| sec.tracks().get(usize::from(*t)))
                .map(|track| track.id())
                .unwrap_or_else(Uuid::new_v4);
            let _ = store.move_to_track(
                &ItemId::new(item_name(*i)),
                &section,
                TrackTarget::Existing(track),
            );
        }
    }
}

proptest! {
    #[test]
    fn prop_every_item_lives_in_exactly_one_place(
        gestures in prop::collection::vec(gesture(), 0..64)
    ) {
        let mut store = make_store();
        let mut live = BTreeSet::new();

        for g in &gestures {
            apply_gesture(&mut store, &mut live, g);

            prop_assert!(store.duplicates().is_empty(), "duplicate after {:?}", g);
            prop_assert_eq!(store.item_count(), live.len());
            for name in &live {
                prop_assert!(store.locate(&ItemId::new(name.clone())).is_some());
            }
        }
    }

    #[test]
    fn prop_moves_never_change_item_count(
        gestures in prop::collection::vec(gesture(), 0..64)
    ) {
        let mut store = make_store();
        let mut live = BTreeSet::new();
        store.import_items((0u8..10).map(item_name));
        live.extend((0u8..10).map(item_name));

        for g in gestures.iter().filter(|g| !matches!(g, Gesture::Import(_) | Gesture::ClearPool)) {
            let before = store.item_count();
            apply_gesture(&mut store, &mut live, g);
            prop_assert_eq!(store.item_count(), before);
        }
    }

    #[test]
    fn prop_index_matches_track_position(
        gestures in prop::collection::vec(gesture(), 0..64)
    ) {
        let mut store = make_store();
        let mut live = BTreeSet::new();
        for g in &gestures {
            apply_gesture(&mut store, &mut live, g);
        }

        for sec in store.sections() {
            for (pos, track) in sec.tracks().iter().enumerate() {
                for placed in track.items() {
                    prop_assert_eq!(store.index_of(sec.id(), placed), Some(pos + 1));
                }
            }
        }
        for pooled in store.pool() {
            for sec in store.sections() {
                prop_assert_eq!(store.index_of(sec.id(), pooled), None);
            }
        }
    }
}
