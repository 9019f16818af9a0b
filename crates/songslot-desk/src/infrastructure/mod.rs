//! Infrastructure layer for the desk application.
//!
//! Contains OS-facing adapters: the directory-backed file picker, file-system
//! storage for the configuration, and the UI command bridge.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `songslot_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod file_picker;
pub mod storage;
pub mod ui_bridge;
