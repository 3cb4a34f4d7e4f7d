// src/report.rs
//
// Report data model: the recognized raw fields, figures tagged with where
// they came from, and the per-country record the exporters consume.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The fixed set of scraped fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Population,
    TotalCases,
    TotalDeaths,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Population, Field::TotalCases, Field::TotalDeaths];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Population => "Population",
            Field::TotalCases => "Total Cases",
            Field::TotalDeaths => "Total Deaths",
        }
    }

    /// Canonical (lowercase, footnote-free) labels that map to this field.
    /// Real pages say "Confirmed cases" or plain "Deaths" as often as not.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Population => &["population"],
            Field::TotalCases => &["total cases", "confirmed cases", "cases"],
            Field::TotalDeaths => &["total deaths", "deaths"],
        }
    }

    /// Match an already-cleaned label (see `sanitize::clean_label`).
    pub fn from_label(clean: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.aliases().contains(&clean))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scraped field → raw cell text. Ordered, so repeated extraction over the
/// same markup yields an identical map.
pub type RawFields = BTreeMap<Field, String>;

/// Page a raw value was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Infobox,
    ReferenceTable,
    PopulationList,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "source", rename_all = "snake_case")]
pub enum Provenance {
    /// Parsed from a source page.
    Parsed(Source),
    /// Derived from other non-defaulted figures.
    Computed,
    /// Missing or malformed upstream; the value is a stand-in zero.
    Defaulted,
}

/// A number plus where it came from, so a defaulted zero is never mistaken
/// for a real one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Figure<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Figure<T> {
    pub fn parsed(value: T, source: Source) -> Self {
        Self { value, provenance: Provenance::Parsed(source) }
    }

    pub fn computed(value: T) -> Self {
        Self { value, provenance: Provenance::Computed }
    }

    pub fn is_defaulted(&self) -> bool {
        self.provenance == Provenance::Defaulted
    }
}

impl<T: Default> Figure<T> {
    pub fn defaulted() -> Self {
        Self { value: T::default(), provenance: Provenance::Defaulted }
    }
}

/// Non-fatal problems found while building a report.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    #[error("{field} not found on any source page")]
    Missing { field: Field },

    #[error("{field} value `{raw}` is not a whole number")]
    Unparsable { field: Field, raw: String },

    #[error("population is zero or unknown; per-100k rates set to 0")]
    DivisionGuard,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CountryReport {
    pub name: String,
    pub population: Figure<u64>,
    pub total_cases: Figure<u64>,
    pub total_deaths: Figure<u64>,
    pub cases_per_100k: Figure<f64>,
    pub deaths_per_100k: Figure<f64>,
    pub summary: String,
    pub warnings: Vec<Warning>,
}

impl CountryReport {
    /// Column labels of the figures that hold stand-in values.
    pub fn defaulted(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.population.is_defaulted() { out.push("Population"); }
        if self.total_cases.is_defaulted() { out.push("Total Cases"); }
        if self.total_deaths.is_defaulted() { out.push("Total Deaths"); }
        if self.cases_per_100k.is_defaulted() { out.push("Cases per 100k"); }
        if self.deaths_per_100k.is_defaulted() { out.push("Deaths per 100k"); }
        out
    }

    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}
