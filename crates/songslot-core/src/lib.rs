//! # songslot-core
//!
//! Shared library for Songslot containing the placement state model and the
//! drag-and-drop transfer protocol.
//!
//! This crate is used by the desk application and by any other front end.
//! It has zero dependencies on OS APIs, UI frameworks, or the file system.
//!
//! # Architecture overview (for beginners)
//!
//! Songslot lets a user import a pool of audio files and drag each one into a
//! slot ("track") of a song ("section").  Every imported file ("item") must
//! live in exactly one place at any moment: the unassigned pool, or one track
//! of one section.
//!
//! This crate (`songslot-core`) is the shared foundation.  It defines:
//!
//! - **`domain::placement`** – The `PlacementStore`: the single owner of every
//!   item, with move operations that always remove an item from its old
//!   location before inserting it at the new one.
//!
//! - **`domain::transfer`** – The drag-and-drop contract: what a drag publishes
//!   (one item id), which regions accept a drop, and how a completed drop maps
//!   onto a store operation.

// Rust will look for the module in a subdirectory with the same name
// (src/domain/mod.rs).
pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `songslot_core::PlacementStore` instead of
// `songslot_core::domain::placement::PlacementStore`.
pub use domain::placement::{
    ItemId, Location, MalformedMove, PlacementError, PlacementOp, PlacementStore, Section,
    SectionDecl, SectionId, Track, TrackId, TrackTarget,
};
pub use domain::transfer::{begin_drag, handle_drop, DragPayload, DropAck, DropTarget};
