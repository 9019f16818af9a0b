//! UI command bridge: exposes application-layer operations to a front end.
//!
//! Every command function lives here and delegates to the shared
//! [`AppState`].  The presentation layer (a desktop shell, or the headless
//! JSON driver in `main.rs`) is the only consumer of this module; it must NOT
//! be imported by the Application or Domain layers.
//!
//! # How commands are invoked (for beginners)
//!
//! A front end sends one JSON object per command, discriminated by `"type"`:
//!
//! ```json
//! {"type":"ImportFiles"}
//! {"type":"DropItem","target":{"kind":"NewTrack","section":"song-one"},"values":["a.mp3"]}
//! {"type":"GetSnapshot"}
//! ```
//!
//! [`SessionCommand`] deserialises that object and [`dispatch`] routes it to
//! the matching async command function, which locks the session, applies the
//! change, and returns a JSON-friendly result.
//!
//! # Data Transfer Objects (DTOs)
//!
//! The domain uses internal types (`ItemId`, `Uuid`, `Section`) that carry
//! behaviour and invariants.  DTOs are plain structs (`SnapshotDto`,
//! `SectionDto`, `TrackDto`) that:
//!
//! - Contain only JSON-serialisable fields (`String`, `usize`, `bool`, etc.)
//! - Are defined using `#[derive(Serialize, Deserialize)]`.
//! - Carry derived values the renderer needs, such as the 1-based track
//!   index and the drop hint of an empty section, so the front end never
//!   recomputes placement rules.
//!
//! # `CommandResult<T>` wrapper
//!
//! All commands return `CommandResult<T>` rather than `Result<T, E>`.
//! This ensures every command response has the same shape:
//! `{ success: bool, data: T | null, error: string | null }`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use songslot_core::{
    DropAck, DropTarget, ItemId, PlacementError, Section, SectionId, Track, TrackId,
};
use tokio::sync::Mutex;
use tracing::warn;

use crate::application::{
    import_files::{FilePicker, ImportFilesUseCase},
    session::{ImportOutcome, Session},
};
use crate::infrastructure::storage::config::AppConfig;

// ── Shared application state ──────────────────────────────────────────────────

/// Application state shared between command invocations.
///
/// This struct is wrapped in `Arc<>` so every command (and every Tokio task
/// driving commands) can hold a handle to the same session.
///
/// # Why async Mutex (not std::sync::Mutex)?
///
/// `std::sync::Mutex` blocks the OS thread while waiting to acquire the lock.
/// In an async context this is problematic because blocking a thread prevents
/// other async tasks from running.  `tokio::sync::Mutex` suspends the async
/// task instead of blocking the thread, allowing other tasks to proceed.
pub struct AppState {
    /// The placement store and its surrounding per-run state.
    pub session: Mutex<Session>,
    /// Drives the file picker.  Picking happens without the session lock.
    pub importer: ImportFilesUseCase,
}

impl AppState {
    /// Starts an empty session with the configured sections.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::DuplicateSection`] if the configuration
    /// declares a section id twice.
    pub fn new(
        config: &AppConfig,
        picker: Arc<dyn FilePicker>,
    ) -> Result<Arc<Self>, PlacementError> {
        let session = Session::new(config.section_decls())?;
        Ok(Arc::new(Self {
            session: Mutex::new(session),
            importer: ImportFilesUseCase::new(picker),
        }))
    }
}

// ── Data Transfer Objects (Presentation layer) ────────────────────────────────

/// Everything a renderer needs to draw the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDto {
    /// Unassigned items in display order.
    pub pool: Vec<String>,
    pub sections: Vec<SectionDto>,
    /// Current import error message, if one is being shown.
    pub error: Option<String>,
}

impl From<&Session> for SnapshotDto {
    fn from(session: &Session) -> Self {
        let store = session.store();
        Self {
            pool: store.pool().iter().map(|i| i.as_str().to_string()).collect(),
            sections: store.sections().iter().map(SectionDto::from).collect(),
            error: session.import_error().map(|e| e.message.clone()),
        }
    }
}

/// DTO for one section (song).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDto {
    pub id: String,
    pub title: String,
    pub selected: Option<String>,
    pub tracks: Vec<TrackDto>,
    /// Placeholder text shown while no item is placed in the section.
    pub drop_hint: Option<String>,
}

impl From<&Section> for SectionDto {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id().as_str().to_string(),
            title: section.title().to_string(),
            selected: section.selected().map(|i| i.as_str().to_string()),
            tracks: section
                .tracks()
                .iter()
                .enumerate()
                .map(|(position, track)| TrackDto::new(position, track))
                .collect(),
            drop_hint: section
                .is_empty()
                .then(|| format!("Drag your audio file here for\n{}", section.title())),
        }
    }
}

/// DTO for one track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDto {
    pub id: String,
    /// 1-based position of the track within its section.
    pub index: usize,
    pub items: Vec<String>,
}

impl TrackDto {
    fn new(position: usize, track: &Track) -> Self {
        Self {
            id: track.id().to_string(),
            index: position + 1,
            items: track.items().iter().map(|i| i.as_str().to_string()).collect(),
        }
    }
}

/// DTO naming a drop region.  Track ids travel as UUID strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DropTargetDto {
    Pool,
    Track { section: String, track: String },
    NewTrack { section: String },
}

impl TryFrom<&DropTargetDto> for DropTarget {
    type Error = uuid::Error;

    fn try_from(dto: &DropTargetDto) -> Result<Self, Self::Error> {
        Ok(match dto {
            DropTargetDto::Pool => DropTarget::Pool,
            DropTargetDto::Track { section, track } => DropTarget::Track {
                section: SectionId::from(section.as_str()),
                track: track.parse::<TrackId>()?,
            },
            DropTargetDto::NewTrack { section } => DropTarget::NewTrack {
                section: SectionId::from(section.as_str()),
            },
        })
    }
}

/// Result of a drop, reported back to the drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropAckDto {
    /// Always `true`: the gesture is finished whether or not anything moved.
    pub completed: bool,
    /// `false` when the drop was empty or referenced something unknown.
    pub moved: bool,
    /// 1-based track index of the item's new location, `None` in the pool.
    pub index: Option<usize>,
}

impl From<&DropAck> for DropAckDto {
    fn from(ack: &DropAck) -> Self {
        Self {
            completed: ack.completed,
            moved: ack.location.is_some(),
            index: ack.location.as_ref().and_then(|l| l.display_index()),
        }
    }
}

/// Result of an import request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDto {
    /// Items added to the pool, in order.
    pub added: Vec<String>,
    /// `true` if the user dismissed the picker.
    pub cancelled: bool,
}

/// Unified response wrapper used by every command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }

    /// Converts the payload to a JSON value so results of different commands
    /// share one type.
    pub fn into_json(self) -> CommandResult<serde_json::Value> {
        match (self.success, self.data) {
            (true, Some(data)) => match serde_json::to_value(data) {
                Ok(value) => CommandResult::ok(value),
                Err(e) => CommandResult::err(format!("failed to encode result: {e}")),
            },
            (_, _) => CommandResult {
                success: self.success,
                data: None,
                error: self.error,
            },
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Returns the current session snapshot.
pub async fn get_snapshot(state: Arc<AppState>) -> CommandResult<SnapshotDto> {
    let session = state.session.lock().await;
    CommandResult::ok(SnapshotDto::from(&*session))
}

/// Runs the file picker and imports the chosen files into the pool.
///
/// The picker is awaited before the session is locked, so other commands keep
/// working while it is open.  A failure is stored on the session (and shown in
/// the snapshot) as well as returned here.
pub async fn import_files(state: Arc<AppState>) -> CommandResult<ImportDto> {
    let picked = state.importer.pick().await;

    let mut session = state.session.lock().await;
    match session.apply_import(picked) {
        ImportOutcome::Imported { added } => CommandResult::ok(ImportDto {
            added: added.into_iter().map(ItemId::into_string).collect(),
            cancelled: false,
        }),
        ImportOutcome::Cancelled => CommandResult::ok(ImportDto {
            added: Vec::new(),
            cancelled: true,
        }),
        ImportOutcome::Failed(failure) => CommandResult::err(failure.message),
    }
}

/// Removes every unassigned item.  Returns the removed ids.
pub async fn clear_pool(state: Arc<AppState>) -> CommandResult<Vec<String>> {
    let mut session = state.session.lock().await;
    let removed = session.clear_pool();
    CommandResult::ok(removed.into_iter().map(ItemId::into_string).collect())
}

/// Returns the values a drag of `item` carries.
pub async fn begin_drag(state: Arc<AppState>, item: String) -> CommandResult<Vec<String>> {
    let session = state.session.lock().await;
    match session.begin_drag(&ItemId::new(item.as_str())) {
        Some(payload) => CommandResult::ok(payload.into_values()),
        None => CommandResult::err(format!("unknown item: {item}")),
    }
}

/// Applies a completed drop.
///
/// Stale or malformed drops still report `completed = true`; only an
/// unparseable track id is rejected.
pub async fn drop_item(
    state: Arc<AppState>,
    target: DropTargetDto,
    values: Vec<String>,
) -> CommandResult<DropAckDto> {
    let target = match DropTarget::try_from(&target) {
        Ok(t) => t,
        Err(e) => return CommandResult::err(format!("invalid track id UUID: {e}")),
    };

    let mut session = state.session.lock().await;
    let ack = session.drop_values(&target, values);
    CommandResult::ok(DropAckDto::from(&ack))
}

/// Records a tap on a placed item.  Returns whether the selection changed.
pub async fn select_item(
    state: Arc<AppState>,
    section: String,
    item: String,
) -> CommandResult<bool> {
    let mut session = state.session.lock().await;
    let selected = session
        .select(&SectionId::from(section), &ItemId::from(item))
        .is_ok();
    CommandResult::ok(selected)
}

/// Hides the current import error.
pub async fn dismiss_error(state: Arc<AppState>) -> CommandResult<()> {
    let mut session = state.session.lock().await;
    session.dismiss_error();
    CommandResult::ok(())
}

// ── Command protocol ──────────────────────────────────────────────────────────

/// One command sent by a front end.
///
/// # Serde representation
///
/// ```json
/// {"type":"GetSnapshot"}
/// {"type":"BeginDrag","item":"a.mp3"}
/// {"type":"SelectItem","section":"song-one","item":"a.mp3"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionCommand {
    GetSnapshot,
    ImportFiles,
    ClearPool,
    BeginDrag {
        item: String,
    },
    DropItem {
        target: DropTargetDto,
        /// Values delivered with the drop; only the first is used.
        #[serde(default)]
        values: Vec<String>,
    },
    SelectItem {
        section: String,
        item: String,
    },
    DismissError,
}

/// Routes a command to its handler.
pub async fn dispatch(
    state: Arc<AppState>,
    command: SessionCommand,
) -> CommandResult<serde_json::Value> {
    match command {
        SessionCommand::GetSnapshot => get_snapshot(state).await.into_json(),
        SessionCommand::ImportFiles => import_files(state).await.into_json(),
        SessionCommand::ClearPool => clear_pool(state).await.into_json(),
        SessionCommand::BeginDrag { item } => begin_drag(state, item).await.into_json(),
        SessionCommand::DropItem { target, values } => {
            drop_item(state, target, values).await.into_json()
        }
        SessionCommand::SelectItem { section, item } => {
            select_item(state, section, item).await.into_json()
        }
        SessionCommand::DismissError => dismiss_error(state).await.into_json(),
    }
}

/// Parses one JSON command line and dispatches it.
///
/// A line that does not parse yields an error result instead of failing.
pub async fn dispatch_json(state: Arc<AppState>, line: &str) -> CommandResult<serde_json::Value> {
    match serde_json::from_str::<SessionCommand>(line) {
        Ok(command) => dispatch(state, command).await,
        Err(e) => {
            warn!(error = %e, "rejecting malformed command");
            CommandResult::err(format!("invalid command: {e}"))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
