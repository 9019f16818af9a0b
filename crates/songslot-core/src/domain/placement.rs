//! Placement store domain entity.
//!
//! The store owns the unassigned pool plus every section, and it is the only
//! place where an item may change location.  Each item lives in exactly one
//! of: the pool, or one track of one section.  Every move is a
//! remove-then-insert: the item is taken out of wherever it currently lives
//! before it is appended to the destination, so a move can never leave two
//! copies behind.
//!
//! Item lookups are linear scans over the pool and then every track of every
//! section.  Sessions hold tens of items in a handful of sections, so there is
//! no secondary index to keep in sync.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Identifier of an imported audio file (its display name, e.g. `"kick.wav"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Stable identifier of a section (song), declared when the session starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SectionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Unique identifier for a track, generated (UUID v4) when the track is created.
pub type TrackId = Uuid;

/// Which track of a section a drop lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackTarget {
    /// Append to an existing track.
    Existing(TrackId),
    /// Append a new empty track to the section, then append into it.
    New,
}

/// The current unique location of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// The item is unassigned.
    Pool {
        /// Zero-based position in the pool (display order).
        position: usize,
    },
    /// The item is placed in a track.
    Track {
        section: SectionId,
        track: TrackId,
        /// Zero-based position of the track within its section.
        track_index: usize,
        /// Zero-based position of the item within the track.
        row: usize,
    },
}

impl Location {
    /// Returns the 1-based index shown next to a placed item, or `None` for
    /// items in the pool.
    ///
    /// The index is always derived from the track's current position and is
    /// never stored.
    pub fn display_index(&self) -> Option<usize> {
        match self {
            Location::Pool { .. } => None,
            Location::Track { track_index, .. } => Some(track_index + 1),
        }
    }

    /// Returns `true` if the item is in the unassigned pool.
    pub fn is_pool(&self) -> bool {
        matches!(self, Location::Pool { .. })
    }
}

/// A single store mutation, as computed by a drop target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOp {
    MoveToPool {
        item: ItemId,
    },
    MoveToTrack {
        item: ItemId,
        section: SectionId,
        target: TrackTarget,
    },
}

/// A move or selection that references something the store does not know.
///
/// The store leaves its state untouched when it returns one of these.  These
/// only originate from a stale drag handle or a UI bug, so callers log them
/// and carry on rather than surfacing them to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedMove {
    /// No item with this id exists in the pool or any track.
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),

    /// No section with this id was declared.
    #[error("unknown section: {0}")]
    UnknownSection(SectionId),

    /// The section exists but has no track with this id.
    #[error("unknown track {track} in section {section}")]
    UnknownTrack { section: SectionId, track: TrackId },

    /// Selection target is not placed in the section.
    #[error("item {item} is not placed in section {section}")]
    NotInSection { section: SectionId, item: ItemId },
}

/// Errors that can occur when building a store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlacementError {
    /// Two section declarations share the same id.
    #[error("section declared twice: {0}")]
    DuplicateSection(SectionId),
}

/// Declaration of one section, supplied when the session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDecl {
    pub id: SectionId,
    pub title: String,
}

impl SectionDecl {
    pub fn new(id: impl Into<SectionId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// One slot within a section, holding placed items in drop order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    id: TrackId,
    items: Vec<ItemId>,
}

impl Track {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Returns `true` if every item has been dragged out of this track.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One song: a titled, ordered list of tracks plus a selection cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: SectionId,
    title: String,
    /// Last item tapped in this section.  Not cleared when that item moves away.
    selected: Option<ItemId>,
    tracks: Vec<Track>,
}

impl Section {
    fn new(decl: SectionDecl) -> Self {
        Self {
            id: decl.id,
            title: decl.title,
            selected: None,
            tracks: Vec::new(),
        }
    }

    pub fn id(&self) -> &SectionId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn selected(&self) -> Option<&ItemId> {
        self.selected.as_ref()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Total number of items placed across all tracks of this section.
    pub fn item_count(&self) -> usize {
        self.tracks.iter().map(|t| t.items.len()).sum()
    }

    /// Returns `true` if no item is placed in this section, even when empty
    /// tracks remain.
    pub fn is_empty(&self) -> bool {
        self.tracks.iter().all(Track::is_empty)
    }

    /// Returns the 1-based position of the track holding `item`.
    pub fn index_of(&self, item: &ItemId) -> Option<usize> {
        self.find(item).map(|(track_index, _)| track_index + 1)
    }

    fn track_position(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Returns `(track_index, row)` of `item` within this section.
    fn find(&self, item: &ItemId) -> Option<(usize, usize)> {
        self.tracks.iter().enumerate().find_map(|(track_index, track)| {
            track
                .items
                .iter()
                .position(|i| i == item)
                .map(|row| (track_index, row))
        })
    }
}

/// Index-based location used internally while mutating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Pool(usize),
    Track {
        section: usize,
        track: usize,
        row: usize,
    },
}

/// The authoritative mapping from item to location.
///
/// All mutation goes through the operations below; the fields are private so
/// rendering code can only observe the store, never splice it.
#[derive(Debug, Clone)]
pub struct PlacementStore {
    pool: Vec<ItemId>,
    sections: Vec<Section>,
}

impl PlacementStore {
    /// Creates a store with an empty pool and the given sections, in order.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::DuplicateSection`] if two declarations share
    /// an id.
    pub fn new(decls: impl IntoIterator<Item = SectionDecl>) -> Result<Self, PlacementError> {
        let mut sections: Vec<Section> = Vec::new();
        for decl in decls {
            if sections.iter().any(|s| s.id == decl.id) {
                return Err(PlacementError::DuplicateSection(decl.id));
            }
            sections.push(Section::new(decl));
        }
        Ok(Self {
            pool: Vec::new(),
            sections,
        })
    }

    /// Returns the unassigned items in display order.
    pub fn pool(&self) -> &[ItemId] {
        &self.pool
    }

    /// Returns every section in declaration order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.id == id)
    }

    /// Total number of items in the model (pool plus every track).
    pub fn item_count(&self) -> usize {
        self.pool.len() + self.sections.iter().map(Section::item_count).sum::<usize>()
    }

    pub fn contains(&self, item: &ItemId) -> bool {
        self.slot_of(item).is_some()
    }

    /// Returns where `item` currently lives, or `None` if it was never imported
    /// (or has been cleared).
    pub fn locate(&self, item: &ItemId) -> Option<Location> {
        self.slot_of(item).map(|slot| self.location_of(slot))
    }

    /// Appends new items to the end of the pool, in input order.
    ///
    /// Ids that already exist anywhere in the model, ids repeated within the
    /// batch, and empty ids are skipped.  Returns the ids actually added.
    pub fn import_items<I, S>(&mut self, ids: I) -> Vec<ItemId>
    where
        I: IntoIterator<Item = S>,
        S: Into<ItemId>,
    {
        let mut added = Vec::new();
        for id in ids {
            let id = id.into();
            if id.as_str().is_empty() {
                debug!("skipping empty item id on import");
                continue;
            }
            if self.contains(&id) {
                debug!(item = %id, "skipping already imported item");
                continue;
            }
            self.pool.push(id.clone());
            added.push(id);
        }
        debug!(count = added.len(), "imported items into pool");
        self.debug_check();
        added
    }

    /// Removes every pool item from the model.  Placed items are untouched.
    ///
    /// Returns the removed ids in their former pool order.
    pub fn clear_pool(&mut self) -> Vec<ItemId> {
        let removed = std::mem::take(&mut self.pool);
        debug!(count = removed.len(), "cleared pool");
        removed
    }

    /// Moves `item` back to the end of the pool.
    ///
    /// An item already in the pool stays where it is.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedMove::UnknownItem`] if the item does not exist; the
    /// store is unchanged.
    pub fn move_to_pool(&mut self, item: &ItemId) -> Result<Location, MalformedMove> {
        match self.slot_of(item) {
            None => Err(MalformedMove::UnknownItem(item.clone())),
            Some(Slot::Pool(position)) => Ok(Location::Pool { position }),
            Some(_) => {
                self.take(item);
                self.pool.push(item.clone());
                debug!(item = %item, "moved item to pool");
                self.debug_check();
                Ok(Location::Pool {
                    position: self.pool.len() - 1,
                })
            }
        }
    }

    /// Moves `item` to the end of a track in `section`.
    ///
    /// Every reference is validated before anything is touched.  The item is
    /// then removed from its current location (pool or old track) and appended
    /// to the target track.  With [`TrackTarget::New`] a new empty track is
    /// appended to the section first.  Dropping an item on the track it already
    /// occupies moves it to the end of that track.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedMove`] if the item, section, or existing track does
    /// not exist; the store is unchanged.
    pub fn move_to_track(
        &mut self,
        item: &ItemId,
        section: &SectionId,
        target: TrackTarget,
    ) -> Result<Location, MalformedMove> {
        let section_idx = self
            .section_index(section)
            .ok_or_else(|| MalformedMove::UnknownSection(section.clone()))?;
        let existing_idx = match target {
            TrackTarget::Existing(track) => Some(
                self.sections[section_idx]
                    .track_position(track)
                    .ok_or_else(|| MalformedMove::UnknownTrack {
                        section: section.clone(),
                        track,
                    })?,
            ),
            TrackTarget::New => None,
        };
        if !self.contains(item) {
            return Err(MalformedMove::UnknownItem(item.clone()));
        }

        // Remove first, unconditionally.  Tracks are never deleted, so the
        // track position validated above is unaffected by the removal.
        self.take(item);

        let section_ref = &mut self.sections[section_idx];
        let track_idx = match existing_idx {
            Some(idx) => idx,
            None => {
                section_ref.tracks.push(Track::new());
                section_ref.tracks.len() - 1
            }
        };
        let track = &mut section_ref.tracks[track_idx];
        track.items.push(item.clone());
        let location = Location::Track {
            section: section.clone(),
            track: track.id,
            track_index: track_idx,
            row: track.items.len() - 1,
        };

        debug!(item = %item, section = %section, track_index = track_idx, "moved item to track");
        self.debug_check();
        Ok(location)
    }

    /// Executes a single [`PlacementOp`].
    ///
    /// # Errors
    ///
    /// Propagates the [`MalformedMove`] of the underlying operation.
    pub fn apply(&mut self, op: &PlacementOp) -> Result<Location, MalformedMove> {
        match op {
            PlacementOp::MoveToPool { item } => self.move_to_pool(item),
            PlacementOp::MoveToTrack {
                item,
                section,
                target,
            } => self.move_to_track(item, section, *target),
        }
    }

    /// Sets the selection cursor of `section` to `item`.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedMove::UnknownSection`] for an undeclared section and
    /// [`MalformedMove::NotInSection`] if `item` is not placed in that section.
    pub fn select(&mut self, section: &SectionId, item: &ItemId) -> Result<(), MalformedMove> {
        let section_ref = self
            .sections
            .iter_mut()
            .find(|s| &s.id == section)
            .ok_or_else(|| MalformedMove::UnknownSection(section.clone()))?;
        if section_ref.find(item).is_none() {
            return Err(MalformedMove::NotInSection {
                section: section.clone(),
                item: item.clone(),
            });
        }
        section_ref.selected = Some(item.clone());
        Ok(())
    }

    /// Returns the 1-based position of the track holding `item` in `section`,
    /// or `None` if the item is not placed there.
    pub fn index_of(&self, section: &SectionId, item: &ItemId) -> Option<usize> {
        self.section(section)?.index_of(item)
    }

    /// Returns every id that appears in more than one location.
    ///
    /// Always empty for a store that has only been mutated through its own
    /// operations.
    pub fn duplicates(&self) -> Vec<ItemId> {
        let mut counts: HashMap<&ItemId, usize> = HashMap::new();
        let placed = self
            .sections
            .iter()
            .flat_map(|s| s.tracks.iter())
            .flat_map(|t| t.items.iter());
        for item in self.pool.iter().chain(placed) {
            *counts.entry(item).or_insert(0) += 1;
        }
        let mut dups: Vec<ItemId> = counts
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|(item, _)| item.clone())
            .collect();
        dups.sort();
        dups
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn section_index(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| &s.id == id)
    }

    /// Scans the pool, then every track of every section.
    fn slot_of(&self, item: &ItemId) -> Option<Slot> {
        if let Some(position) = self.pool.iter().position(|i| i == item) {
            return Some(Slot::Pool(position));
        }
        self.sections
            .iter()
            .enumerate()
            .find_map(|(section, s)| {
                s.find(item).map(|(track, row)| Slot::Track {
                    section,
                    track,
                    row,
                })
            })
    }

    /// Removes `item` from wherever it lives and returns where that was.
    fn take(&mut self, item: &ItemId) -> Option<Slot> {
        let slot = self.slot_of(item)?;
        match slot {
            Slot::Pool(position) => {
                self.pool.remove(position);
            }
            Slot::Track {
                section,
                track,
                row,
            } => {
                self.sections[section].tracks[track].items.remove(row);
            }
        }
        Some(slot)
    }

    fn location_of(&self, slot: Slot) -> Location {
        match slot {
            Slot::Pool(position) => Location::Pool { position },
            Slot::Track {
                section,
                track,
                row,
            } => {
                let s = &self.sections[section];
                Location::Track {
                    section: s.id.clone(),
                    track: s.tracks[track].id,
                    track_index: track,
                    row,
                }
            }
        }
    }

    fn debug_check(&self) {
        debug_assert!(
            self.duplicates().is_empty(),
            "item placed in more than one location: {:?}",
            self.duplicates()
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
