//! Domain entities for Songslot.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain** (or "entities" layer).  Domain code:
//!
//! - Contains the core business rules of the application.
//! - Has **no** imports from OS APIs, file pickers, audio players, or UI
//!   frameworks.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! Here the business rules are the placement invariants: every item lives in
//! exactly one place, a track's display index is derived from its position,
//! and a drop always moves (never copies) an item.

/// Placement store: the core domain concept.
///
/// See [`placement::PlacementStore`] for the main type.
pub mod placement;

/// Drag-and-drop transfer protocol built on top of the placement store.
pub mod transfer;
