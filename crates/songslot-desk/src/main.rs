//! Songslot desk application entry point (headless driver).
//!
//! Wires together configuration, the file picker, and the shared session,
//! then serves UI commands over standard input/output.
//!
//! # Usage
//!
//! ```text
//! songslot-desk [OPTIONS]
//!
//! Options:
//!   --config     <PATH>   Config file [default: platform config dir]
//!   --import-dir <DIR>    Directory scanned on import; imports once at startup
//!   --log-level  <LEVEL>  Log level when RUST_LOG is unset
//! ```
//!
//! # Protocol
//!
//! Each line on stdin is one JSON [`SessionCommand`]; each produces exactly
//! one JSON `CommandResult` line on stdout.  Logs go to stderr so stdout
//! carries nothing but responses.
//!
//! ```text
//! stdin  → {"type":"ImportFiles"}
//! stdout ← {"success":true,"data":{"added":["a.mp3"],"cancelled":false},"error":null}
//! ```
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()            -- TOML settings, defaults on first run
//!  └─ AppState::new()          -- session with the configured sections
//!  └─ optional startup import  -- DirectoryFilePicker over --import-dir
//!  └─ command loop             -- stdin line → dispatch_json → stdout line
//! ```
//!
//! [`SessionCommand`]: songslot_desk::infrastructure::ui_bridge::SessionCommand

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use songslot_desk::infrastructure::file_picker::DirectoryFilePicker;
use songslot_desk::infrastructure::storage::config::{load_config, load_config_from, AppConfig};
use songslot_desk::infrastructure::ui_bridge::{dispatch_json, import_files, AppState};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Songslot desk: distribute imported audio files across songs.
///
/// The `#[derive(Parser)]` macro from `clap` generates the argument parser
/// automatically from the struct fields and their `#[arg(...)]` attributes.
#[derive(Debug, Parser)]
#[command(
    name = "songslot-desk",
    about = "Headless Songslot session driven by JSON commands on stdin",
    version
)]
struct Cli {
    /// Path to the TOML config file.
    ///
    /// Defaults to `config.toml` in the platform config directory.  A missing
    /// file means default settings.
    #[arg(long, env = "SONGSLOT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory the file picker scans.
    ///
    /// Overrides `import.directory` from the config file.  When given, one
    /// import runs before the first command is read.
    #[arg(long, env = "SONGSLOT_IMPORT_DIR")]
    import_dir: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is unset.
    ///
    /// Overrides `logging.log_level` from the config file.
    #[arg(long, env = "SONGSLOT_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Loads the config from `--config`, or from the platform location.
    fn load_config(&self) -> anyhow::Result<AppConfig> {
        match &self.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display())),
            None => load_config().context("failed to load config"),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `RUST_LOG` wins; otherwise `--log-level`, then the configured level.
    let fallback_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Songslot desk starting");

    // ── Shared state ──────────────────────────────────────────────────────────
    let directory = cli
        .import_dir
        .clone()
        .or_else(|| config.import.directory.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let picker = DirectoryFilePicker::from_config(directory, &config.import);
    info!(directory = %picker.directory().display(), "file picker ready");
    let state = AppState::new(&config, Arc::new(picker))
        .context("invalid [session] sections in config")?;

    if cli.import_dir.is_some() {
        let result = import_files(Arc::clone(&state)).await;
        match result.error {
            None => info!("startup import complete"),
            Some(e) => warn!(error = %e, "startup import failed"),
        }
    }

    // ── Command loop ──────────────────────────────────────────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    info!("Songslot desk ready.  Reading commands from stdin.");

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read command from stdin")?,
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        };
        // EOF
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let result = dispatch_json(Arc::clone(&state), &line).await;
        let mut response =
            serde_json::to_string(&result).context("failed to encode command result")?;
        response.push('\n');
        stdout
            .write_all(response.as_bytes())
            .await
            .context("failed to write command result")?;
        stdout.flush().await.context("failed to flush stdout")?;
    }

    info!("Songslot desk stopped");
    Ok(())
}
