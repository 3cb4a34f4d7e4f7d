// src/scrape.rs
//
// Run pipeline: shared list pages once, then one page per country, strictly
// in selection order. A country whose page cannot be fetched is skipped and
// recorded; a reference page that cannot be read aborts the run.

use thiserror::Error;

use crate::{
    config::options::{RunOptions, Selection, SourceOptions},
    core::net::{wiki_path, FetchError, Fetcher},
    normalize::normalize,
    progress::Progress,
    report::CountryReport,
    specs::{self, PopulationTable, ReferenceTable},
};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("cannot fetch the reference statistics page: {0}")]
    Reference(#[source] FetchError),

    #[error("no country statistics table found on {page}")]
    ReferenceTableMissing { page: String },
}

/// The shared list pages, parsed once per run.
#[derive(Clone, Debug, Default)]
pub struct Sources {
    pub reference: ReferenceTable,
    /// `None` when disabled or unavailable.
    pub population: Option<PopulationTable>,
}

/// Fetch and parse the reference table (required) and population list (best-effort).
pub fn load_sources(fetcher: &dyn Fetcher, opts: &SourceOptions) -> Result<Sources, RunError> {
    let markup = fetcher.fetch(&opts.reference_page).map_err(|e| {
        loge!("reference page: {e}");
        RunError::Reference(e)
    })?;
    // a header row with no countries under it is as good as no table
    let Some(reference) = ReferenceTable::parse(&markup).filter(|t| !t.is_empty()) else {
        loge!("no statistics table on {}", opts.reference_page);
        return Err(RunError::ReferenceTableMissing { page: opts.reference_page.clone() });
    };
    logf!("reference table: {} countries", reference.len());

    let population = opts.population_page.as_deref().and_then(|page| {
        match fetcher.fetch(page) {
            Ok(markup) => {
                let table = PopulationTable::parse(&markup).filter(|t| !t.is_empty());
                match &table {
                    Some(t) => logf!("population list: {} countries", t.len()),
                    None => logw!("no population table found on {page}; continuing without it"),
                }
                table
            }
            Err(e) => {
                logw!("population list unavailable ({e}); continuing without it");
                None
            }
        }
    });

    Ok(Sources { reference, population })
}

/// Selection → ordered country identifiers.
pub fn resolve_selection(selection: &Selection, reference: &ReferenceTable) -> Vec<String> {
    match selection {
        Selection::Countries(ids) => ids.clone(),
        Selection::Search(term) => reference.search(term).map(|r| r.name.clone()).collect(),
    }
}

/// A country that was skipped, with the reason.
#[derive(Debug)]
pub struct CountryFailure {
    pub country: String,
    pub error: FetchError,
}

/// Lazy per-country reports, in selection order. Countries whose page
/// cannot be fetched are left out of the sequence and kept in `failures()`.
pub struct Reports<'a, 'p> {
    fetcher: &'a dyn Fetcher,
    sources: &'a Sources,
    ids: std::vec::IntoIter<String>,
    failures: Vec<CountryFailure>,
    progress: Option<&'p mut dyn Progress>,
    finished: bool,
}

impl<'a, 'p> Reports<'a, 'p> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        sources: &'a Sources,
        ids: Vec<String>,
        mut progress: Option<&'p mut dyn Progress>,
    ) -> Self {
        if let Some(p) = progress.as_deref_mut() {
            p.begin(ids.len());
        }
        Self {
            fetcher,
            sources,
            ids: ids.into_iter(),
            failures: Vec::new(),
            progress,
            finished: false,
        }
    }

    /// Failures recorded so far.
    pub fn failures(&self) -> &[CountryFailure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<CountryFailure> {
        self.failures
    }

    fn report_for(&self, id: &str) -> Result<CountryReport, FetchError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(FetchError::InvalidPage { page: s!(), reason: s!("empty country identifier") });
        }

        let row = self.sources.reference.lookup(id);
        let page = row
            .and_then(|r| r.link.clone())
            .unwrap_or_else(|| wiki_path(id));

        let markup = self.fetcher.fetch(&page)?;
        let specs::Extracted { fields, summary } = specs::extract(&markup);

        let name = row.map_or(id, |r| r.name.as_str());
        let hint = self
            .sources
            .population
            .as_ref()
            .and_then(|p| p.get(name).or_else(|| p.get(id)));

        Ok(normalize(name, &fields, row, hint, summary))
    }
}

impl Iterator for Reports<'_, '_> {
    type Item = CountryReport;

    fn next(&mut self) -> Option<CountryReport> {
        loop {
            let Some(id) = self.ids.next() else {
                if !self.finished {
                    self.finished = true;
                    if let Some(p) = self.progress.as_deref_mut() {
                        p.finish();
                    }
                }
                return None;
            };

            match self.report_for(&id) {
                Ok(report) => {
                    if let Some(p) = self.progress.as_deref_mut() {
                        p.item_done(&report.name);
                    }
                    return Some(report);
                }
                Err(error) => {
                    logw!("{id}: skipped ({error})");
                    if let Some(p) = self.progress.as_deref_mut() {
                        p.item_failed(&id, &error.to_string());
                    }
                    self.failures.push(CountryFailure { country: id, error });
                }
            }
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<CountryReport>,
    pub failures: Vec<CountryFailure>,
}

/// Top-level: load the shared pages, then collect every selected country (no IO
/// beyond fetching).
pub fn run(
    fetcher: &dyn Fetcher,
    opts: &RunOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, RunError> {
    if let Some(p) = progress.as_deref_mut() {
        p.log("Fetching reference table…");
    }
    let sources = load_sources(fetcher, &opts.sources)?;

    let ids = resolve_selection(&opts.selection, &sources.reference);
    if ids.is_empty() {
        logw!("selection matched no countries");
    }

    let mut reports = Reports::new(fetcher, &sources, ids, progress);
    let collected: Vec<_> = reports.by_ref().collect();
    let failures = reports.into_failures();
    logf!("{} reports, {} failures", collected.len(), failures.len());

    Ok(RunSummary { reports: collected, failures })
}
