//! Output generation for the chart
//!
//! - **HTML**: static page that loads plotly.js and renders the treemap
//! - **JSON**: the bare figure, `data` + `layout`
//!
//! # Usage
//!
//! ```ignore
//! use poptree::report;
//!
//! // Automatically picks format based on extension
//! report::generate("index.html", &figure)?;   // HTML
//! report::generate("figure.json", &figure)?;  // JSON
//! ```
//!
//! Output is written to a temporary file next to the target and renamed into
//! place, so a failed run never leaves a truncated page behind.

pub mod html;
pub mod json;

use crate::chart::Figure;
use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;

/// Output formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "json" => Format::Json,
            _ => Format::Html,
        }
    }
}

pub fn render(format: Format, figure: &Figure) -> Result<String> {
    match format {
        Format::Html => html::render(figure),
        Format::Json => json::render(figure),
    }
}

/// Render `figure` in the format matching `path` and write it there
pub fn generate<P: AsRef<Path>>(path: P, figure: &Figure) -> Result<()> {
    let path = path.as_ref();
    let content = render(Format::from_path(path), figure)?;
    write_atomic(path, content.as_bytes())
}

/// Replace `path` with `bytes` in one step. The temporary file is removed on
/// any error, leaving an existing `path` untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".poptree-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| Error::io(path, e))?;

    tmp.write_all(bytes).map_err(|e| Error::io(path, e))?;
    tmp.as_file().sync_all().map_err(|e| Error::io(path, e))?;

    // Temp files are created owner-only; a published page should be world-readable
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(|e| Error::io(path, e))?;
    }

    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}
