//! Saving fetched documents to disk via native file dialogs.
//!
//! # Platform Support
//!
//! - **Native (Windows, macOS, Linux)**: save dialog via the `rfd` crate.
//! - **Web (WASM)**: not supported; saving is a logged no-op.

use std::path::PathBuf;

/// Saves bytes under a user-chosen path, enabling mock savers in tests.
pub trait FileSaver {
    /// `Ok(None)` when the user dismissed the dialog.
    fn save(&self, suggested_name: &str, bytes: &[u8]) -> std::io::Result<Option<PathBuf>>;
}

/// Default saver using the system dialog.
#[derive(Debug, Default)]
pub struct SystemFileSaver;

#[cfg(not(target_arch = "wasm32"))]
impl FileSaver for SystemFileSaver {
    fn save(&self, suggested_name: &str, bytes: &[u8]) -> std::io::Result<Option<PathBuf>> {
        use rfd::FileDialog;

        let Some(path) = FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .set_file_name(suggested_name)
            .set_title("Salvar boleto")
            .save_file()
        else {
            return Ok(None);
        };

        std::fs::write(&path, bytes)?;
        log::info!("saved {} bytes to {:?}", bytes.len(), path);
        Ok(Some(path))
    }
}

#[cfg(target_arch = "wasm32")]
impl FileSaver for SystemFileSaver {
    fn save(&self, suggested_name: &str, _bytes: &[u8]) -> std::io::Result<Option<PathBuf>> {
        log::warn!("saving {suggested_name} is not supported on web");
        Ok(None)
    }
}

/// `12,3 KB` style size of a download.
pub fn human_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < KB * KB {
        format!("{:.1} KB", bytes / KB).replace('.', ",")
    } else {
        format!("{:.1} MB", bytes / (KB * KB)).replace('.', ",")
    }
}
