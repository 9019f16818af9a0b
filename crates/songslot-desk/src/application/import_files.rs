//! ImportFilesUseCase: asks a file picker for audio files and turns the
//! result into pool items.
//!
//! The picker itself lives outside the application (a native dialog, a
//! directory scan, a test double).  This module only describes the request it
//! is handed and the shape of its answer, via the [`FilePicker`] trait.
//!
//! # Import flow (for beginners)
//!
//! ```text
//! ImportFilesUseCase::pick()  ──►  FilePicker::pick(ImportRequest::audio())
//!                                          │
//!       Ok(files)     ──►  Session::apply_import  ──►  PlacementStore::import_items
//!       Err(Failed)   ──►  Session::apply_import  ──►  error message shown to user
//!       Err(Cancelled)──►  nothing changes
//! ```
//!
//! Picking is asynchronous and can take as long as the user keeps a dialog
//! open, so callers await [`ImportFilesUseCase::pick`] first and only then
//! lock the session to apply the answer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

/// Kinds of content a picker may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Audio,
}

/// What the application asks the picker for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub allowed_content_types: Vec<ContentType>,
    pub allows_multiple_selection: bool,
}

impl ImportRequest {
    /// The only request Songslot makes: any number of audio files.
    pub fn audio() -> Self {
        Self {
            allowed_content_types: vec![ContentType::Audio],
            allows_multiple_selection: true,
        }
    }
}

/// One file handle resolved by the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub path: PathBuf,
}

impl PickedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the last path component, which becomes the item id.
    ///
    /// `None` for paths without a file name (e.g. `/` or `..`).
    pub fn display_name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Error type for file picker operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PickerError {
    /// The picker could not resolve the selection.  The message is shown to
    /// the user as-is.
    #[error("{0}")]
    Failed(String),

    /// The user dismissed the picker without choosing anything.
    #[error("file selection was cancelled")]
    Cancelled,
}

/// A user-visible import failure, kept until the next successful import or
/// until the user dismisses it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ImportFailure {
    pub message: String,
}

/// Trait abstracting the file selection dialog.
///
/// The headless implementation scans a directory
/// (`infrastructure::file_picker::DirectoryFilePicker`); tests use
/// `MockFilePicker`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilePicker: Send + Sync {
    /// Presents the picker and resolves to the chosen files.
    async fn pick(&self, request: ImportRequest) -> Result<Vec<PickedFile>, PickerError>;
}

/// Drives a [`FilePicker`] with the audio import request.
#[derive(Clone)]
pub struct ImportFilesUseCase {
    picker: Arc<dyn FilePicker>,
}

impl ImportFilesUseCase {
    pub fn new(picker: Arc<dyn FilePicker>) -> Self {
        Self { picker }
    }

    /// Asks the picker for audio files.
    ///
    /// The result is returned untouched; a session applies it with
    /// `Session::apply_import`.
    pub async fn pick(&self) -> Result<Vec<PickedFile>, PickerError> {
        let result = self.picker.pick(ImportRequest::audio()).await;
        match &result {
            Ok(files) => debug!(count = files.len(), "picker returned files"),
            Err(PickerError::Cancelled) => debug!("picker cancelled"),
            Err(e) => warn!(error = %e, "picker failed"),
        }
        result
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
