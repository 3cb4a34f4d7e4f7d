// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub selection: Selection,
    pub sources: SourceOptions,
    pub export: ExportOptions,
}

/// Which countries a run reports on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Explicit identifiers, reported in this order.
    Countries(Vec<String>),
    /// Every reference-table country whose name contains the term (case-insensitive).
    Search(String),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Countries(Vec::new())
    }
}

impl Selection {
    /// File stem used when the output path is a directory (or omitted).
    /// A search for "ice" writes `icesummary.<ext>`.
    pub fn default_stem(&self) -> String {
        match self {
            Selection::Search(term) => join!(term.trim().to_lowercase(), SEARCH_FILE_SUFFIX),
            Selection::Countries(_) => s!(DEFAULT_FILE),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceOptions {
    pub base_url: String,
    pub reference_page: String,
    /// `None` skips the population list; population then comes from info-boxes only.
    pub population_page: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            base_url: s!(BASE_URL),
            reference_page: s!(REFERENCE_PAGE),
            population_page: Some(s!(POPULATION_PAGE)),
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            user_agent: s!(USER_AGENT),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ExportFormat {
    #[default]
    Text,
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }

    /// Field separator for the delimited formats.
    pub fn delim(&self) -> Option<char> {
        match self {
            ExportFormat::Csv => Some(','),
            ExportFormat::Tsv => Some('\t'),
            ExportFormat::Text | ExportFormat::Json => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// `None` → stdout. A directory (existing, or ending in a separator)
    /// gets the selection's default file name appended.
    pub out: Option<PathBuf>,
    pub include_headers: bool,
}

impl ExportOptions {
    /// Resolve the final output file, or `None` for stdout.
    pub fn out_path(&self, selection: &Selection) -> Option<PathBuf> {
        let out = self.out.as_deref()?;
        if out.is_dir() || crate::file::looks_like_dir_hint(out) {
            let file = join!(selection.default_stem(), ".", self.format.ext());
            Some(out.join(file))
        } else {
            Some(out.to_path_buf())
        }
    }
}
