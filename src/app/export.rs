// src/app/export.rs
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::Notice;
use crate::error::{AppError, Result};

pub const EXPORT_EXT: &str = "txt";

impl crate::app::ReelscriptApp {
    /// Open the tag prompt, provided there is something to export.
    pub fn request_export(&mut self) {
        if self.dialogue.trim().is_empty() {
            self.notify(Notice::warning("Please generate the dialogue first."));
            return;
        }
        self.show_export_popup = true;
    }

    pub fn export_dialogue(&mut self, tag: &str) {
        match write_export(&self.export_dir, tag, &self.dialogue) {
            Ok(path) => {
                info!("Dialogue exported to {}", path.display());
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.notify(Notice::info(format!("Dialogue saved as '{name}'.")));
            }
            Err(e) => self.notify_error("Failed to save dialogue", &e),
        }
    }
}

/// Write `text` (trimmed) to `<dir>/<tag>.txt`, replacing any existing file.
pub fn write_export(dir: &Path, tag: &str, text: &str) -> Result<PathBuf> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::MissingPrecondition(
            "Please generate the dialogue first.".into(),
        ));
    }

    let tag = tag.trim();
    if tag.is_empty() {
        return Err(AppError::Validation(
            "Please enter a name for the dialogue file.".into(),
        ));
    }
    if tag.contains(['/', '\\']) || tag == "." || tag == ".." {
        return Err(AppError::Validation(format!(
            "`{tag}` is not a valid file name."
        )));
    }

    let path = dir.join(format!("{tag}.{EXPORT_EXT}"));
    fs::write(&path, text).map_err(|e| AppError::File(format!("{}: {e}", path.display())))?;
    Ok(path)
}
