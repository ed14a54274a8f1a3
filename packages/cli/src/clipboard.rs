//! OS clipboard through the platform's helper commands.
//! - macOS: pbcopy / pbpaste
//! - Linux: xclip, falling back to xsel
//! - Windows: clip / powershell Get-Clipboard

use quire_editor::{ClipboardError, SystemClipboard};
use std::io::Write;
use std::process::{Command, Stdio};

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandClipboard;

impl SystemClipboard for CommandClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        for (program, args) in WRITE_HELPERS {
            match pipe_into(program, args, text) {
                Ok(()) => return Ok(()),
                Err(err) => tracing::debug!(program, error = %err, "Clipboard helper failed"),
            }
        }
        Err(ClipboardError::Unavailable(
            "no clipboard helper available (install xclip or xsel)".to_string(),
        ))
    }

    fn read_text(&mut self) -> Result<String, ClipboardError> {
        for (program, args) in READ_HELPERS {
            match read_from(program, args) {
                Ok(text) if text.is_empty() => return Err(ClipboardError::Empty),
                Ok(text) => return Ok(text),
                Err(err) => tracing::debug!(program, error = %err, "Clipboard helper failed"),
            }
        }
        Err(ClipboardError::Unavailable(
            "no clipboard helper available (install xclip or xsel)".to_string(),
        ))
    }
}

type Helper = (&'static str, &'static [&'static str]);

#[cfg(target_os = "macos")]
const WRITE_HELPERS: &[Helper] = &[("pbcopy", &[])];
#[cfg(target_os = "macos")]
const READ_HELPERS: &[Helper] = &[("pbpaste", &[])];

#[cfg(target_os = "windows")]
const WRITE_HELPERS: &[Helper] = &[("clip", &[])];
#[cfg(target_os = "windows")]
const READ_HELPERS: &[Helper] = &[("powershell", &["-NoProfile", "-Command", "Get-Clipboard"])];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const WRITE_HELPERS: &[Helper] = &[
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const READ_HELPERS: &[Helper] = &[
    ("xclip", &["-selection", "clipboard", "-o"]),
    ("xsel", &["--clipboard", "--output"]),
];

fn pipe_into(program: &str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| ClipboardError::Unavailable(format!("Failed to spawn {}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| ClipboardError::Unavailable(format!("Failed to write to {}: {}", program, e)))?;
    }

    let status = child
        .wait()
        .map_err(|e| ClipboardError::Unavailable(format!("Failed to wait for {}: {}", program, e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::Unavailable(format!("{} exited with error", program)))
    }
}

fn read_from(program: &str, args: &[&str]) -> Result<String, ClipboardError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ClipboardError::Unavailable(format!("Failed to execute {}: {}", program, e)))?;

    if !output.status.success() {
        return Err(ClipboardError::Unavailable(format!("{} exited with error", program)));
    }
    String::from_utf8(output.stdout)
        .map_err(|e| ClipboardError::Malformed(format!("Invalid UTF-8 in clipboard: {}", e)))
}
