// src/export.rs
//
// Report rendering for every output format. Writers only; choosing the
// destination is `file`'s job.

use std::io::{self, Write};

use serde::Serialize;
use thiserror::Error;

use crate::config::options::ExportFormat;
use crate::csv::write_row;
use crate::report::{CountryReport, Figure};
use crate::scrape::{CountryFailure, RunSummary};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error while exporting: {0}")]
    Io(#[from] io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("path exists but is not a directory: {0}")]
    NotADirectory(String),
}

pub const HEADERS: [&str; 8] = [
    "Name",
    "Population",
    "Total Cases",
    "Total Deaths",
    "Cases per 100k",
    "Deaths per 100k",
    "Defaulted",
    "Summary",
];

const DEFAULTED_MARK: &str = " (defaulted)";

/// Render the whole run in `format`.
pub fn write_report<W: Write>(
    mut w: W,
    format: ExportFormat,
    include_headers: bool,
    summary: &RunSummary,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Text => write_text(&mut w, summary)?,
        ExportFormat::Json => write_json(&mut w, summary)?,
        ExportFormat::Csv | ExportFormat::Tsv => {
            let sep = format.delim().unwrap_or(',');
            if include_headers {
                write_row(&mut w, &HEADERS, sep)?;
            }
            for r in &summary.reports {
                write_row(&mut w, &to_row(r), sep)?;
            }
        }
    }
    w.flush()?;
    Ok(())
}

/* ---------------- Text ---------------- */

/// `1234567` → `"1,234,567"`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn count_text(f: &Figure<u64>) -> String {
    let n = group_thousands(f.value);
    if f.is_defaulted() { join!(n, DEFAULTED_MARK) } else { n }
}

fn rate_text(f: &Figure<f64>) -> String {
    let n = format!("{:.1}", f.value);
    if f.is_defaulted() { join!(n, DEFAULTED_MARK) } else { n }
}

fn write_country<W: Write>(w: &mut W, r: &CountryReport) -> io::Result<()> {
    writeln!(w, "Country: {}", r.name)?;
    writeln!(w, "Population: {:>29}", count_text(&r.population))?;
    writeln!(w, "Total Confirmed Cases: {:>18}", count_text(&r.total_cases))?;
    writeln!(w, "Total Deaths: {:>27}", count_text(&r.total_deaths))?;
    writeln!(w, "Cases per 100,000 people: {:>15}", rate_text(&r.cases_per_100k))?;
    writeln!(w, "Deaths per 100,000 people: {:>14}", rate_text(&r.deaths_per_100k))?;
    for warning in &r.warnings {
        writeln!(w, "  ! {warning}")?;
    }
    if !r.summary.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}", r.summary)?;
    }
    Ok(())
}

fn write_text<W: Write>(w: &mut W, summary: &RunSummary) -> io::Result<()> {
    for (i, r) in summary.reports.iter().enumerate() {
        if i > 0 { writeln!(w)?; }
        write_country(w, r)?;
    }
    if !summary.failures.is_empty() {
        if !summary.reports.is_empty() { writeln!(w)?; }
        writeln!(w, "Failed:")?;
        for f in &summary.failures {
            writeln!(w, "  {}: {}", f.country, f.error)?;
        }
    }
    Ok(())
}

/* ---------------- Delimited ---------------- */

/// One CSV/TSV record. Numbers are plain (no grouping) so spreadsheets read them.
pub fn to_row(r: &CountryReport) -> Vec<String> {
    vec![
        r.name.clone(),
        r.population.value.to_string(),
        r.total_cases.value.to_string(),
        r.total_deaths.value.to_string(),
        format!("{:.2}", r.cases_per_100k.value),
        format!("{:.2}", r.deaths_per_100k.value),
        r.defaulted().join("; "),
        r.summary.clone(),
    ]
}

/* ---------------- JSON ---------------- */

#[derive(Serialize)]
struct JsonFailure<'a> {
    country: &'a str,
    error: String,
}

impl<'a> From<&'a CountryFailure> for JsonFailure<'a> {
    fn from(f: &'a CountryFailure) -> Self {
        Self { country: &f.country, error: f.error.to_string() }
    }
}

#[derive(Serialize)]
struct JsonRun<'a> {
    reports: &'a [CountryReport],
    failures: Vec<JsonFailure<'a>>,
}

fn write_json<W: Write>(w: &mut W, summary: &RunSummary) -> Result<(), ExportError> {
    let run = JsonRun {
        reports: &summary.reports,
        failures: summary.failures.iter().map(JsonFailure::from).collect(),
    };
    serde_json::to_writer_pretty(&mut *w, &run)?;
    writeln!(w)?;
    Ok(())
}
