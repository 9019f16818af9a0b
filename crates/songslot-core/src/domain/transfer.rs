//! Drag-and-drop transfer protocol.
//!
//! Defines what a draggable item publishes and what a droppable region
//! consumes, independently of any rendering toolkit.
//!
//! # Gesture lifecycle (for beginners)
//!
//! ```text
//! begin_drag(item)  ──►  DragPayload  ──►  (UI framework carries values)
//!                                                   │
//!                      handle_drop(target, values) ◄┘
//!                         └─ DropTarget::operation()  ──►  PlacementStore::apply()
//! ```
//!
//! - A drag publishes exactly one string: the item id.  Multi-item drags are
//!   not supported.
//! - A drop event may deliver any number of values.  Only the first is used;
//!   the rest are discarded.
//! - The drop always reports completion back to the gesture, whether or not
//!   the store changed.  A cancelled OS drag and a stale drag handle look the
//!   same, so neither is treated as an error.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::placement::{
    ItemId, Location, PlacementOp, PlacementStore, SectionId, TrackId, TrackTarget,
};

/// The value carried by a drag gesture: a single item id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    item: ItemId,
}

impl DragPayload {
    pub fn new(item: ItemId) -> Self {
        Self { item }
    }

    pub fn item(&self) -> &ItemId {
        &self.item
    }

    /// Returns the values handed to the gesture framework (always exactly one).
    pub fn into_values(self) -> Vec<String> {
        vec![self.item.into_string()]
    }

    /// Builds a payload from the values delivered with a drop event.
    ///
    /// Only the first value is consumed; any further values are discarded.
    /// Returns `None` when the event carried no values at all.
    pub fn from_values<I, S>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = values.into_iter();
        let first: String = values.next()?.into();
        let discarded = values.count();
        if discarded > 0 {
            trace!(discarded, "discarding extra drop values");
        }
        Some(Self::new(ItemId::from(first)))
    }
}

/// Starts a drag for a rendered item, in the pool or in a track.
///
/// Returns `None` if the item is not in the store.
pub fn begin_drag(store: &PlacementStore, item: &ItemId) -> Option<DragPayload> {
    store
        .contains(item)
        .then(|| DragPayload::new(item.clone()))
}

/// A region that accepts dropped items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropTarget {
    /// The unassigned pool.
    Pool,
    /// An existing track of a section.
    Track { section: SectionId, track: TrackId },
    /// The area below a section's existing tracks; creates a new track.
    NewTrack { section: SectionId },
}

impl DropTarget {
    /// Computes the store operation that dropping `item` here performs.
    pub fn operation(&self, item: ItemId) -> PlacementOp {
        match self {
            DropTarget::Pool => PlacementOp::MoveToPool { item },
            DropTarget::Track { section, track } => PlacementOp::MoveToTrack {
                item,
                section: section.clone(),
                target: TrackTarget::Existing(*track),
            },
            DropTarget::NewTrack { section } => PlacementOp::MoveToTrack {
                item,
                section: section.clone(),
                target: TrackTarget::New,
            },
        }
    }
}

/// Completion report returned to the drag source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropAck {
    /// Reported to the gesture framework.  Always `true`.
    pub completed: bool,
    /// Where the item ended up, or `None` if the drop was ignored.
    pub location: Option<Location>,
}

impl DropAck {
    fn ignored() -> Self {
        Self {
            completed: true,
            location: None,
        }
    }
}

/// Applies a completed drop to the store.
///
/// The first value is taken as the item id and the operation computed by
/// `target` is applied synchronously.  Empty events and malformed moves leave
/// the store unchanged; the ack still reports completion.
pub fn handle_drop<I, S>(store: &mut PlacementStore, target: &DropTarget, values: I) -> DropAck
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let Some(payload) = DragPayload::from_values(values) else {
        debug!(drop_target = ?target, "drop carried no values");
        return DropAck::ignored();
    };

    let op = target.operation(payload.item);
    match store.apply(&op) {
        Ok(location) => DropAck {
            completed: true,
            location: Some(location),
        },
        Err(e) => {
            debug!(error = %e, drop_target = ?target, "ignoring malformed drop");
            DropAck::ignored()
        }
    }
}
