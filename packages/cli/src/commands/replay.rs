//! Drive an edit session from a recorded script of input events.
//!
//! A script is a JSON array. Each step is either an input event, exactly
//! as the rendering layer would send it, or a clock advance:
//!
//! ```json
//! [
//!   {"event": "focus", "block": "intro"},
//!   {"event": "content_changed", "block": "intro", "content": "# ", "cursor": 2},
//!   {"event": "key", "block": "intro", "key": "enter", "cursor": {"start": 0, "end": 0}},
//!   {"advance": 1500}
//! ]
//! ```

use crate::clipboard::CommandClipboard;
use crate::config::Config;
use crate::store::FileStore;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use quire_editor::{EditSession, InputEvent, Notification};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Document JSON file
    pub document: PathBuf,

    /// Script of input events
    pub script: PathBuf,

    /// Write the edited document here instead of back to the input file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the final document to stdout and write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Use the OS clipboard (overrides config)
    #[arg(long)]
    pub system_clipboard: bool,

    /// Configuration file (defaults to quire.config.json in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Advance { advance: u64 },
    Event(InputEvent),
}

#[derive(Debug, Default, PartialEq)]
pub struct ReplaySummary {
    pub events: usize,
    pub handled: usize,
    pub changed: usize,
    pub notifications: Vec<Notification>,
}

pub fn parse_script(text: &str) -> Result<Vec<Step>> {
    serde_json::from_str(text).context("Invalid replay script")
}

/// Feed every step to the session, then flush pending sync
pub fn run_script(session: &mut EditSession, steps: Vec<Step>) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for step in steps {
        match step {
            Step::Advance { advance } => session.advance(advance),
            Step::Event(event) => {
                let outcome = session.handle(event);
                debug!(handled = outcome.handled, changed = outcome.changed, "Replayed event");
                summary.events += 1;
                summary.handled += usize::from(outcome.handled);
                summary.changed += usize::from(outcome.changed);
            }
        }
        summary.notifications.extend(session.take_notifications());
    }

    session.flush();
    summary.notifications.extend(session.take_notifications());
    summary
}

pub fn replay(args: ReplayArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd, args.config.as_deref())?;

    let source = fs::read_to_string(&args.document)
        .with_context(|| format!("Cannot read {}", args.document.display()))?;
    let script = fs::read_to_string(&args.script)
        .with_context(|| format!("Cannot read {}", args.script.display()))?;
    let steps = parse_script(&script)?;

    let document_id = document_id(&args.document)?;
    let mut session = EditSession::from_json(&document_id, &source, config.editor.clone())?;
    if args.system_clipboard || config.system_clipboard {
        session = session.with_system_clipboard(CommandClipboard);
    }

    let target = args.output.clone().unwrap_or_else(|| args.document.clone());
    if !args.dry_run {
        let store = FileStore::open(&target)?;
        println!(
            "{} {} → {}",
            "▶".bright_blue(),
            args.script.display(),
            store.path().display()
        );
        session = session.with_persistence(store);
    }

    let summary = run_script(&mut session, steps);

    for notification in &summary.notifications {
        eprintln!("  {} {}", "⚠️".yellow(), describe(notification).yellow());
    }

    if args.dry_run {
        println!("{}", session.page().to_json()?);
        return Ok(());
    }

    let unsaved = summary.notifications.iter().any(|notification| {
        matches!(
            notification,
            Notification::SyncConflict { .. } | Notification::SyncFailed { .. }
        )
    });
    if unsaved {
        return Err(anyhow!("{} was not saved", target.display()));
    }
    println!(
        "{} Replayed {} events ({} handled, {} changed), {} blocks",
        "✅".green(),
        summary.events,
        summary.handled,
        summary.changed,
        session.page().len()
    );
    Ok(())
}

fn document_id(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Cannot derive a document id from {}", path.display()))
}

fn describe(notification: &Notification) -> String {
    match notification {
        Notification::SyncConflict { document_id } => {
            format!("{} was changed elsewhere; local edits were kept but not saved", document_id)
        }
        Notification::SyncFailed { document_id, reason } => {
            format!("Saving {} failed: {}", document_id, reason)
        }
        Notification::ClipboardUnavailable => "System clipboard unavailable".to_string(),
        Notification::NothingToPaste => "Nothing to paste".to_string(),
    }
}
