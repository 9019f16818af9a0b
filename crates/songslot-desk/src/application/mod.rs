//! Application layer use cases for the desk application.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules) and the infrastructure (OS/file system/UI).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "import the
//!   chosen audio files into the pool").
//! - **Depend on abstractions** (traits) rather than concrete implementations,
//!   so the infrastructure can be swapped without changing this code.
//! - **Contain no OS calls and no file system access**.
//!
//! # Sub-modules
//!
//! - **`session`**      – Owns the placement store for one run, plus the
//!   imported file sources and the current import error.
//!
//! - **`import_files`** – Describes the file picker collaborator and drives
//!   it with the audio import request.

pub mod import_files;
pub mod session;
