// src/file.rs

use std::{
    fs::{self, File},
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use crate::config::options::{ExportOptions, Selection};
use crate::export::{write_report, ExportError};
use crate::scrape::RunSummary;

/// Write the run according to ExportOptions (destination, format, headers).
/// Returns the file written, or `None` when the report went to stdout.
pub fn write_export(
    export: &ExportOptions,
    selection: &Selection,
    summary: &RunSummary,
) -> Result<Option<PathBuf>, ExportError> {
    let Some(path) = export.out_path(selection) else {
        let stdout = io::stdout();
        write_report(stdout.lock(), export.format, export.include_headers, summary)?;
        return Ok(None);
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let file = File::create(&path)?; // truncate/overwrite
    write_report(BufWriter::new(file), export.format, export.include_headers, summary)?;
    logf!("wrote {} reports to {}", summary.reports.len(), path.display());
    Ok(Some(path))
}

pub fn normalize_separators(p: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR;
    p.chars().map(|c| if c == '/' || c == '\\' { sep } else { c }).collect()
}

pub fn ensure_directory(dir: &Path) -> Result<(), ExportError> {
    if dir.exists() && !dir.is_dir() {
        return Err(ExportError::NotADirectory(dir.display().to_string()));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// A trailing separator means "directory", even if it does not exist yet.
pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}
