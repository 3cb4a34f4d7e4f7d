// src/normalize.rs
//
// Raw text → typed figures, then per-100k rates.
//
// Source precedence:
//   cases / deaths : reference table row → info-box
//   population     : info-box → population list
// A source "has" a value when its raw text is non-empty and not a
// placeholder dash; otherwise the next source is tried.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::consts::PER_CAPITA_BASE;
use crate::core::sanitize::strip_trailing_footnotes;
use crate::report::{CountryReport, Field, Figure, RawFields, Source, Warning};
use crate::specs::ReferenceRow;

/// Trailing parenthesised annotations: `"383,726 (179th)"`, `"1,234 (2023)"`.
static TRAILING_PARENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\s*\([^()]*\))+\s*$").expect("static regex"));

const PLACEHOLDERS: &[&str] = &["", "—", "–", "-", "?", "n/a", "na", "unknown", "no data"];

/// Parse a scraped count: `"1,234,567[5]"` → `1234567`.
///
/// Thousands separators (`,`, `'`, thin/no-break spaces), whitespace and
/// trailing footnotes/annotations are dropped; what is left must be digits.
pub fn parse_count(raw: &str) -> Option<u64> {
    let mut s = strip_trailing_footnotes(raw.trim());
    // footnotes and annotations can interleave: "1,000 (est.)[3]"
    loop {
        let before = s.len();
        s = strip_trailing_footnotes(s);
        if let Some(m) = TRAILING_PARENS.find(s) {
            s = &s[..m.start()];
        }
        if s.len() == before { break; }
    }

    let digits: String = s
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, ',' | '\'' | '\u{2009}' | '\u{202f}')))
        .collect();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// `count / population * 100000`; `None` when population is zero.
pub fn per_100k(count: u64, population: u64) -> Option<f64> {
    (population > 0).then(|| count as f64 / population as f64 * PER_CAPITA_BASE)
}

fn is_placeholder(raw: &str) -> bool {
    let t = strip_trailing_footnotes(raw.trim());
    PLACEHOLDERS.iter().any(|p| t.eq_ignore_ascii_case(p))
}

/// Resolve one field from its candidate sources, in precedence order.
fn resolve(
    field: Field,
    candidates: &[(Source, Option<&str>)],
    warnings: &mut Vec<Warning>,
) -> Figure<u64> {
    let Some(&(source, Some(raw))) = candidates
        .iter()
        .find(|(_, raw)| raw.is_some_and(|r| !is_placeholder(r)))
    else {
        logw!("{field}: no value on any source");
        warnings.push(Warning::Missing { field });
        return Figure::defaulted();
    };

    match parse_count(raw) {
        Some(n) => Figure::parsed(n, source),
        None => {
            logw!("{field}: cannot parse `{raw}`");
            warnings.push(Warning::Unparsable { field, raw: s!(raw) });
            Figure::defaulted()
        }
    }
}

/// Rate figure: computed only from non-defaulted inputs with population > 0.
fn rate(count: Figure<u64>, population: Figure<u64>) -> Figure<f64> {
    if count.is_defaulted() || population.is_defaulted() {
        return Figure::defaulted();
    }
    match per_100k(count.value, population.value) {
        Some(r) => Figure::computed(r),
        None => Figure::defaulted(),
    }
}

/// Build one country's report from everything scraped for it.
///
/// - `fields`: info-box values from the country's own page
/// - `reference`: the country's row in the shared statistics table, if any
/// - `population_hint`: raw population from the population list, if any
pub fn normalize(
    name: &str,
    fields: &RawFields,
    reference: Option<&ReferenceRow>,
    population_hint: Option<&str>,
    summary: String,
) -> CountryReport {
    let mut warnings = Vec::new();
    let infobox = |f: Field| fields.get(&f).map(String::as_str);

    let population = resolve(
        Field::Population,
        &[
            (Source::Infobox, infobox(Field::Population)),
            (Source::PopulationList, population_hint),
        ],
        &mut warnings,
    );
    let total_cases = resolve(
        Field::TotalCases,
        &[
            (Source::ReferenceTable, reference.and_then(|r| r.cases.as_deref())),
            (Source::Infobox, infobox(Field::TotalCases)),
        ],
        &mut warnings,
    );
    let total_deaths = resolve(
        Field::TotalDeaths,
        &[
            (Source::ReferenceTable, reference.and_then(|r| r.deaths.as_deref())),
            (Source::Infobox, infobox(Field::TotalDeaths)),
        ],
        &mut warnings,
    );

    if population.value == 0 {
        logw!("{name}: population is zero or unknown, rates defaulted");
        warnings.push(Warning::DivisionGuard);
    }

    CountryReport {
        name: s!(name),
        population,
        total_cases,
        total_deaths,
        cases_per_100k: rate(total_cases, population),
        deaths_per_100k: rate(total_deaths, population),
        summary,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Provenance;

    fn fields(pairs: &[(Field, &str)]) -> RawFields {
        pairs.iter().map(|(f, v)| (*f, s!(*v))).collect()
    }

    #[test]
    fn parse_count_examples() {
        assert_eq!(parse_count("1,234,567[5]"), Some(1_234_567));
        assert_eq!(parse_count(" 186 "), Some(186));
        assert_eq!(parse_count("383,726[7] (179th)"), Some(383_726));
        assert_eq!(parse_count("1 000 000"), Some(1_000_000));
        assert_eq!(parse_count("1\u{202f}000"), Some(1_000));
        assert_eq!(parse_count("12,345*"), Some(12_345));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("[3]"), None);
        assert_eq!(parse_count("12 million"), None);
        assert_eq!(parse_count("3.5"), None);
        assert_eq!(parse_count("-5"), None);
    }

    #[test]
    fn per_100k_guard_and_exact_value() {
        assert_eq!(per_100k(500, 100_000), Some(500.0));
        assert_eq!(per_100k(5, 0), None);
    }

    #[test]
    fn well_formed_inputs_compute_rates() {
        let f = fields(&[(Field::Population, "383,726")]);
        let row = ReferenceRow {
            name: s!("Iceland"),
            cases: Some(s!("209,906")),
            deaths: Some(s!("186")),
            link: None,
        };
        let r = normalize("Iceland", &f, Some(&row), None, s!("Lead."));

        assert!(r.is_complete());
        assert_eq!(r.population.value, 383_726);
        assert_eq!(r.population.provenance, Provenance::Parsed(Source::Infobox));
        assert_eq!(r.total_cases.provenance, Provenance::Parsed(Source::ReferenceTable));
        let expected = 209_906f64 / 383_726f64 * 100_000.0;
        assert!((r.cases_per_100k.value - expected).abs() < 1e-6);
        assert_eq!(r.cases_per_100k.provenance, Provenance::Computed);
        assert!((r.deaths_per_100k.value - 186f64 / 383_726f64 * 100_000.0).abs() < 1e-6);
        assert_eq!(r.summary, "Lead.");
    }

    #[test]
    fn zero_population_defaults_rates_with_warning() {
        let f = fields(&[
            (Field::Population, "0"),
            (Field::TotalCases, "10"),
            (Field::TotalDeaths, "1"),
        ]);
        let r = normalize("Nowhere", &f, None, None, s!());
        assert_eq!(r.cases_per_100k.value, 0.0);
        assert_eq!(r.deaths_per_100k.value, 0.0);
        assert!(r.cases_per_100k.is_defaulted());
        assert_eq!(r.warnings, vec![Warning::DivisionGuard]);
    }

    #[test]
    fn fallbacks_and_defaults_are_tagged() {
        let f = fields(&[(Field::TotalCases, "1,000"), (Field::TotalDeaths, "n/a[2]")]);
        let row = ReferenceRow { name: s!("X"), cases: Some(s!("—")), deaths: Some(s!("lots")), link: None };
        let r = normalize("X", &f, Some(&row), Some("50,000"), s!());

        // dash in the reference row falls through to the info-box
        assert_eq!(r.total_cases.value, 1_000);
        assert_eq!(r.total_cases.provenance, Provenance::Parsed(Source::Infobox));
        // population from the list page
        assert_eq!(r.population.provenance, Provenance::Parsed(Source::PopulationList));
        // malformed reference value is not silently replaced
        assert!(r.total_deaths.is_defaulted());
        assert!(r.warnings.contains(&Warning::Unparsable { field: Field::TotalDeaths, raw: s!("lots") }));
        assert!((r.cases_per_100k.value - 2_000.0).abs() < 1e-9);
        assert!(r.deaths_per_100k.is_defaulted());
        assert_eq!(r.defaulted(), vec!["Total Deaths", "Deaths per 100k"]);
    }

    #[test]
    fn nothing_known_is_all_defaults() {
        let r = normalize("Unknownland", &RawFields::new(), None, None, s!());
        assert_eq!(r.population.value, 0);
        assert_eq!(r.warnings.len(), 4);
        assert!(r.warnings.contains(&Warning::Missing { field: Field::Population }));
        assert!(r.warnings.contains(&Warning::DivisionGuard));
    }
}
