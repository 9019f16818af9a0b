//! Session: the placement store plus the per-run state around it.
//!
//! A session owns:
//!
//! - The [`PlacementStore`] holding the pool and every section.
//! - The source path of every imported item, which is what a playback
//!   collaborator would open when the user taps an item.
//! - The current import error message, if any.
//!
//! Nothing here is persisted.  A session starts empty from its section
//! declarations and is discarded when the application exits.
//!
//! # Error surfacing
//!
//! Only import failures are shown to the user.  Malformed moves and
//! selections come from stale drag handles or UI bugs; the session logs them
//! and leaves its state untouched.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use songslot_core::{
    begin_drag, handle_drop, DragPayload, DropAck, DropTarget, ItemId, MalformedMove,
    PlacementError, PlacementStore, SectionDecl, SectionId,
};
use tracing::{debug, info, warn};

use super::import_files::{ImportFailure, PickedFile, PickerError};

/// What applying a picker result did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Files were imported; `added` lists the new pool items in order.
    Imported { added: Vec<ItemId> },
    /// The user cancelled; nothing changed.
    Cancelled,
    /// The picker failed; the message is now the session's import error.
    Failed(ImportFailure),
}

/// In-memory state for one run of the application.
#[derive(Debug, Clone)]
pub struct Session {
    store: PlacementStore,
    sources: HashMap<ItemId, PathBuf>,
    import_error: Option<ImportFailure>,
}

impl Session {
    /// Creates an empty session with the given sections.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::DuplicateSection`] if two declarations share
    /// an id.
    pub fn new(decls: impl IntoIterator<Item = SectionDecl>) -> Result<Self, PlacementError> {
        let store = PlacementStore::new(decls)?;
        info!(sections = store.sections().len(), "session started");
        Ok(Self {
            store,
            sources: HashMap::new(),
            import_error: None,
        })
    }

    /// Read-only view of the placement state, for rendering.
    pub fn store(&self) -> &PlacementStore {
        &self.store
    }

    pub fn import_error(&self) -> Option<&ImportFailure> {
        self.import_error.as_ref()
    }

    /// Returns the file an item was imported from.
    pub fn source_of(&self, item: &ItemId) -> Option<&Path> {
        self.sources.get(item).map(PathBuf::as_path)
    }

    /// Applies the answer of a file picker.
    ///
    /// On success, the display name of each file becomes an item id and is
    /// appended to the pool (existing ids are skipped), and any previous
    /// import error is cleared.  A failure replaces the import error.  A
    /// cancellation changes nothing.
    pub fn apply_import(
        &mut self,
        result: Result<Vec<PickedFile>, PickerError>,
    ) -> ImportOutcome {
        match result {
            Ok(files) => {
                let picked: Vec<(ItemId, PathBuf)> = files
                    .into_iter()
                    .filter_map(|file| {
                        let name = file.display_name()?;
                        Some((ItemId::new(name), file.path))
                    })
                    .collect();

                let added = self
                    .store
                    .import_items(picked.iter().map(|(id, _)| id.clone()));
                for (id, path) in picked {
                    if added.contains(&id) {
                        self.sources.entry(id).or_insert(path);
                    }
                }

                self.import_error = None;
                info!(added = added.len(), "import complete");
                ImportOutcome::Imported { added }
            }
            Err(PickerError::Cancelled) => {
                debug!("import cancelled");
                ImportOutcome::Cancelled
            }
            Err(PickerError::Failed(message)) => {
                warn!(error = %message, "import failed");
                let failure = ImportFailure { message };
                self.import_error = Some(failure.clone());
                ImportOutcome::Failed(failure)
            }
        }
    }

    /// Hides the current import error.
    pub fn dismiss_error(&mut self) {
        self.import_error = None;
    }

    /// Removes every pool item and forgets its source.  Placed items stay.
    pub fn clear_pool(&mut self) -> Vec<ItemId> {
        let removed = self.store.clear_pool();
        for id in &removed {
            self.sources.remove(id);
        }
        removed
    }

    /// Starts a drag from a rendered item.
    pub fn begin_drag(&self, item: &ItemId) -> Option<DragPayload> {
        begin_drag(&self.store, item)
    }

    /// Applies a completed drop.  Always reports completion to the gesture.
    pub fn drop_values<I, S>(&mut self, target: &DropTarget, values: I) -> DropAck
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        handle_drop(&mut self.store, target, values)
    }

    /// Records a tap on a placed item as the section's selection.
    ///
    /// # Errors
    ///
    /// Returns the [`MalformedMove`] from the store; the selection is
    /// unchanged.
    pub fn select(&mut self, section: &SectionId, item: &ItemId) -> Result<(), MalformedMove> {
        self.store.select(section, item).map_err(|e| {
            debug!(error = %e, "ignoring selection");
            e
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
