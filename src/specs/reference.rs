// src/specs/reference.rs
//! Scraping *specs* for the two shared list pages.
//!
//! - **Reference statistics** (`COVID-19_pandemic_by_country_and_territory`):
//!   one row per country with raw case/death counts and a link to the
//!   country's own pandemic page.
//! - **Population list** (`List_of_countries_and_dependencies_by_population`):
//!   country → raw population text.
//!
//! Both tables are located by header labels (see `specs::table`). Values stay
//! raw strings; turning them into numbers is `normalize`'s job.

use std::collections::HashMap;

use crate::core::dom::Document;
use crate::core::sanitize::{clean_country_name, name_key};

use super::table::{self, Column, GridRow, Span};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceRow {
    pub name: String,
    pub cases: Option<String>,
    pub deaths: Option<String>,
    /// Site-relative link to the country's page, as found in the name cell.
    pub link: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ReferenceTable {
    rows: Vec<ReferenceRow>,
    index: HashMap<String, usize>,
}

impl ReferenceTable {
    /// Locate and read the statistics table. `None` if no table carries
    /// country, cases and deaths headers.
    pub fn parse(markup: &str) -> Option<Self> {
        let doc = Document::parse(markup);
        let located = table::locate(&doc, &[
            Column { name: "country", matches: table::is_country_header },
            Column { name: "cases", matches: |l| table::is_count_header(l, "case") },
            Column { name: "deaths", matches: |l| table::is_count_header(l, "death") },
        ])?;
        let &[country, cases, deaths] = located.spans.as_slice() else { return None };

        let rows = located
            .rows
            .iter()
            .filter_map(|r| read_row(r, country, cases, deaths))
            .collect();
        Some(Self::from_rows(rows))
    }

    pub fn from_rows(rows: Vec<ReferenceRow>) -> Self {
        let mut index = HashMap::with_capacity(rows.len());
        for (i, r) in rows.iter().enumerate() {
            // first row for a name wins
            index.entry(name_key(&r.name)).or_insert(i);
        }
        Self { rows, index }
    }

    pub fn lookup(&self, name: &str) -> Option<&ReferenceRow> {
        self.index.get(&name_key(name)).map(|&i| &self.rows[i])
    }

    /// Rows whose name contains `term` (case-insensitive), in table order.
    pub fn search<'a>(&'a self, term: &str) -> impl Iterator<Item = &'a ReferenceRow> + use<'a> {
        let needle = term.trim().to_lowercase();
        self.rows
            .iter()
            .filter(move |r| !needle.is_empty() && r.name.to_lowercase().contains(&needle))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Non-article namespaces; a flag icon links to `File:`, not to the country.
const NAMESPACES: &[&str] = &["File:", "Image:", "Help:", "Special:", "Template:", "Category:", "Wikipedia:", "Portal:"];

fn is_article_link(href: &str) -> bool {
    href.strip_prefix("/wiki/")
        .is_some_and(|title| !title.is_empty() && !NAMESPACES.iter().any(|ns| title.starts_with(ns)))
}

fn read_row(row: &GridRow<'_>, country: Span, cases: Span, deaths: Span) -> Option<ReferenceRow> {
    // the cell that names the country, not the flag cell beside it
    let (cell, text) = row
        .cells_in(country)
        .map(|c| (c, c.el.text()))
        .find(|(_, t)| !t.is_empty())?;
    let name = clean_country_name(&text);
    if name.is_empty() {
        return None;
    }
    let link = cell
        .el
        .find_all("a")
        .filter_map(|a| a.attr("href"))
        .find(|href| is_article_link(href))
        .map(String::from);

    Some(ReferenceRow {
        name,
        cases: row.text_in(cases),
        deaths: row.text_in(deaths),
        link,
    })
}

/// Country → raw population text.
#[derive(Clone, Debug, Default)]
pub struct PopulationTable {
    by_name: HashMap<String, String>,
}

impl PopulationTable {
    pub fn parse(markup: &str) -> Option<Self> {
        let doc = Document::parse(markup);
        let located = table::locate(&doc, &[
            Column { name: "country", matches: table::is_country_header },
            Column { name: "population", matches: |l| table::is_count_header(l, "population") },
        ])?;
        let &[country, population] = located.spans.as_slice() else { return None };

        let mut by_name = HashMap::new();
        for row in &located.rows {
            let (Some(name), Some(pop)) = (row.text_in(country), row.text_in(population)) else {
                continue;
            };
            let key = name_key(&name);
            if !key.is_empty() {
                by_name.entry(key).or_insert(pop);
            }
        }
        Some(Self { by_name })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name.get(&name_key(name)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = r#"
        <html><body>
        <table class="wikitable plainrowheaders sortable">
          <tr><th colspan="2">Country[a]</th><th>Deaths / million</th><th>Deaths</th><th>Cases</th></tr>
          <tr><th><span class="flagicon"><img src="is.png"></span></th>
              <th scope="row"><a href="/wiki/COVID-19_pandemic_in_Iceland">Iceland</a></th>
              <td>504</td><td>186</td><td>209,906</td></tr>
          <tr><th></th>
              <th scope="row"><a href="/wiki/COVID-19_pandemic_in_France">France</a>[c]</th>
              <td>2,567</td><td>167,985</td><td>39,028,265</td></tr>
          <tr><th></th><th scope="row">Niue</th><td>—</td><td>—</td><td>1,059</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn reference_rows_by_header() {
        let t = ReferenceTable::parse(REFERENCE).unwrap();
        assert_eq!(t.len(), 3);

        let ice = t.lookup("iceland").unwrap();
        assert_eq!(ice.name, "Iceland");
        assert_eq!(ice.cases.as_deref(), Some("209,906"));
        assert_eq!(ice.deaths.as_deref(), Some("186"));
        assert_eq!(ice.link.as_deref(), Some("/wiki/COVID-19_pandemic_in_Iceland"));

        let fr = t.lookup("France").unwrap();
        assert_eq!(fr.name, "France");
        assert_eq!(fr.cases.as_deref(), Some("39,028,265"));

        let niue = t.lookup("Niue").unwrap();
        assert_eq!(niue.deaths.as_deref(), Some("—"));
        assert_eq!(niue.link, None);
    }

    #[test]
    fn search_keeps_table_order() {
        let t = ReferenceTable::parse(REFERENCE).unwrap();
        let hits: Vec<_> = t.search("an").map(|r| r.name.as_str()).collect();
        assert_eq!(hits, vec!["Iceland", "France"]);
        assert_eq!(t.search("  ").count(), 0);
    }

    #[test]
    fn flag_link_is_not_the_country_link() {
        let page = r#"
            <table class="wikitable plainrowheaders sortable">
              <tr><th colspan="2">Country</th><th>Deaths</th><th>Cases</th></tr>
              <tr><th><span class="flagicon"><a href="/wiki/File:Flag_of_X.svg"><img src="x.png"></a></span></th>
                  <th scope="row"><a href="/wiki/COVID-19_pandemic_in_X">X</a></th><td>1</td><td>10</td></tr>
              <tr><th><span class="flagicon"><a href="/wiki/File:Flag_of_Y.svg"><img src="y.png"></a></span></th>
                  <th scope="row">Y<a href="/wiki/Help:Footnotes">[n]</a></th><td>2</td><td>20</td></tr>
            </table>
        "#;
        let t = ReferenceTable::parse(page).unwrap();
        assert_eq!(t.lookup("X").unwrap().link.as_deref(), Some("/wiki/COVID-19_pandemic_in_X"));
        let y = t.lookup("Y").unwrap();
        assert_eq!(y.name, "Y");
        assert_eq!(y.link, None);
    }

    #[test]
    fn article_links_only() {
        assert!(is_article_link("/wiki/COVID-19_pandemic_in_Iceland"));
        assert!(!is_article_link("/wiki/File:Flag_of_Iceland.svg"));
        assert!(!is_article_link("/wiki/Template:COVID-19_pandemic_data"));
        assert!(!is_article_link("/w/index.php?title=X"));
        assert!(!is_article_link("/wiki/"));
    }

    #[test]
    fn page_without_stats_table_is_none() {
        assert!(ReferenceTable::parse("<table><tr><th>Country</th><th>Capital</th></tr></table>").is_none());
    }

    #[test]
    fn population_list_by_header() {
        let page = r#"
            <table class="wikitable sortable">
              <tr><th>Rank</th><th>Location</th><th>Population</th><th>% of world</th></tr>
              <tr><td>1</td><td><a href="/wiki/India">India</a></td><td>1,425,775,850</td><td>17.7%</td></tr>
              <tr><td>180</td><td><a href="/wiki/Iceland">Iceland</a>[d]</td><td>383,726</td><td>0%</td></tr>
            </table>
        "#;
        let p = PopulationTable::parse(page).unwrap();
        assert_eq!(p.len(), 2);
        assert!(!p.is_empty());
        assert_eq!(p.get("ICELAND"), Some("383,726"));
        assert_eq!(p.get("Atlantis"), None);
    }
}
