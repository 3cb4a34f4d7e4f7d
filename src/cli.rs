// src/cli.rs
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};

use crate::config::consts::{BASE_URL, HTTP_TIMEOUT_SECS};
use crate::config::options::{ExportFormat, ExportOptions, RunOptions, Selection, SourceOptions};
use crate::core::net::HttpFetcher;
use crate::progress::Progress;
use crate::{file, scrape};

/// Per-country COVID-19 figures from Wikipedia, normalized per 100,000 people.
#[derive(Debug, Parser)]
#[command(name = "covid_scrape", version, about)]
pub struct Args {
    /// Countries to report on, in output order ("Iceland", "New Zealand", ...)
    #[arg(required_unless_present = "search", conflicts_with = "search")]
    pub countries: Vec<String>,

    /// Report every country whose name contains TERM (case-insensitive)
    #[arg(short, long, value_name = "TERM")]
    pub search: Option<String>,

    #[arg(short, long, value_enum, default_value_t = ExportFormat::Text)]
    pub format: ExportFormat,

    /// Output file or directory (trailing '/' for a new directory); stdout if omitted
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<String>,

    /// Emit a header line for csv/tsv
    #[arg(long)]
    pub include_headers: bool,

    /// Skip the population list page; population then comes from info-boxes only
    #[arg(long)]
    pub no_population_list: bool,

    #[arg(long, value_name = "URL", default_value = BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = HTTP_TIMEOUT_SECS)]
    pub timeout: u64,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn into_options(self) -> RunOptions {
        let selection = match self.search {
            Some(term) => Selection::Search(term),
            None => Selection::Countries(self.countries),
        };

        let defaults = SourceOptions::default();
        let sources = SourceOptions {
            base_url: self.base_url,
            population_page: if self.no_population_list { None } else { defaults.population_page },
            timeout: Duration::from_secs(self.timeout),
            ..defaults
        };

        let export = ExportOptions {
            format: self.format,
            out: self.out.map(|o| PathBuf::from(file::normalize_separators(&o))),
            include_headers: self.include_headers,
        };

        RunOptions { selection, sources, export }
    }
}

/// `[3/12] Iceland` lines on stderr.
#[derive(Default)]
struct StderrProgress {
    total: usize,
    done: usize,
}

impl Progress for StderrProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn item_done(&mut self, country: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {country}", self.done, self.total);
    }

    fn item_failed(&mut self, country: &str, reason: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {country}: {reason}", self.done, self.total);
    }

    fn finish(&mut self) {
        let _ = std::io::stderr().flush();
    }
}

pub fn run() -> color_eyre::Result<()> {
    let args = Args::parse();
    crate::log::init(args.verbose);

    let opts = args.into_options();
    let fetcher = HttpFetcher::new(&opts.sources).wrap_err("cannot set up HTTP client")?;

    // progress lines only when a person is watching
    let mut progress = StderrProgress::default();
    let sink: Option<&mut dyn Progress> =
        if std::io::stderr().is_terminal() { Some(&mut progress) } else { None };

    let summary = scrape::run(&fetcher, &opts, sink)?;

    if let Some(path) = file::write_export(&opts.export, &opts.selection, &summary)? {
        eprintln!("Wrote {}", path.display());
    }

    if summary.reports.is_empty() && !summary.failures.is_empty() {
        bail!("no country page could be fetched ({} failed)", summary.failures.len());
    }
    Ok(())
}
