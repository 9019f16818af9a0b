//! Headless file picker backed by a directory scan.
//!
//! Desktop builds show a native open-file dialog.  The headless binary and the
//! integration tests have no dialog, so this adapter "picks" every audio file
//! found in a configured directory instead.
//!
//! # Matching rules
//!
//! - Only regular files whose extension is in the configured list count as
//!   audio.  The comparison ignores case (`KICK.WAV` matches `wav`).
//! - Hidden entries (names starting with `.`) are skipped, which also skips
//!   the `._name` sidecar files some file systems leave next to audio.
//! - Files are returned sorted by file name.  With `recursive = true`
//!   sub-directories are visited depth-first, each sorted the same way.
//! - Unreadable entries are skipped.  A missing directory is an error.
//!
//! The scan blocks on the file system, so it runs on Tokio's blocking thread
//! pool via `spawn_blocking` rather than on an async worker thread.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::application::import_files::{
    ContentType, FilePicker, ImportRequest, PickedFile, PickerError,
};
use crate::infrastructure::storage::config::ImportConfig;

/// Picks audio files from a directory on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryFilePicker {
    directory: PathBuf,
    extensions: Vec<String>,
    recursive: bool,
}

impl DirectoryFilePicker {
    pub fn new(directory: impl Into<PathBuf>, extensions: &[String], recursive: bool) -> Self {
        Self {
            directory: directory.into(),
            extensions: extensions.iter().map(|e| e.to_ascii_lowercase()).collect(),
            recursive,
        }
    }

    /// Builds a picker for `directory` using the configured extensions and
    /// recursion setting.
    pub fn from_config(directory: impl Into<PathBuf>, config: &ImportConfig) -> Self {
        Self::new(directory, &config.extensions, config.recursive)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn is_audio(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }

    /// Walks the directory synchronously and returns the matching files.
    fn scan(&self, request: &ImportRequest) -> Result<Vec<PickedFile>, PickerError> {
        if !self.directory.is_dir() {
            return Err(PickerError::Failed(format!(
                "import directory not found: {}",
                self.directory.display()
            )));
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.directory)
            .follow_links(false)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && self.is_audio(entry.path()) {
                files.push(PickedFile::new(entry.into_path()));
                if !request.allows_multiple_selection {
                    break;
                }
            }
        }

        info!(
            directory = %self.directory.display(),
            count = files.len(),
            "scanned import directory"
        );
        Ok(files)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[async_trait]
impl FilePicker for DirectoryFilePicker {
    async fn pick(&self, request: ImportRequest) -> Result<Vec<PickedFile>, PickerError> {
        if !request.allowed_content_types.contains(&ContentType::Audio) {
            return Ok(Vec::new());
        }

        let picker = self.clone();
        tokio::task::spawn_blocking(move || picker.scan(&request))
            .await
            .map_err(|e| PickerError::Failed(format!("directory scan did not finish: {e}")))?
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
