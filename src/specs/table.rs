// src/specs/table.rs
//! Header-driven table reading shared by the list-page specs.
//!
//! Columns are found by matching cleaned header labels, and cells are placed
//! on a column grid that honours `colspan`, so a "Country" header spanning a
//! flag cell plus a name cell still lines up with the data rows.
//! `rowspan` is not tracked.

use crate::core::dom::{Document, Element};
use crate::core::sanitize::clean_label;

/// How many leading header-only rows are searched for column labels.
const MAX_HEADER_ROWS: usize = 3;

/// A column the caller wants, recognized by its cleaned header label.
pub struct Column {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
}

/// Grid position of a header: first column and width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub width: usize,
}

impl Span {
    fn overlaps(&self, start: usize, width: usize) -> bool {
        start < self.start + self.width && self.start < start + width
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Cell<'a> {
    pub start: usize,
    pub width: usize,
    pub el: Element<'a>,
}

/// A data row laid out on the column grid.
pub struct GridRow<'a> {
    cells: Vec<Cell<'a>>,
}

impl<'a> GridRow<'a> {
    /// Cells overlapping the span, left to right.
    pub fn cells_in(&self, span: Span) -> impl Iterator<Item = &Cell<'a>> {
        self.cells.iter().filter(move |c| span.overlaps(c.start, c.width))
    }

    /// First non-empty text under the span.
    pub fn text_in(&self, span: Span) -> Option<String> {
        self.cells_in(span)
            .map(|c| c.el.text())
            .find(|t| !t.is_empty())
    }
}

/// A table whose headers satisfied every requested column.
pub struct Located<'a> {
    pub spans: Vec<Span>,
    pub rows: Vec<GridRow<'a>>,
}

/// Lay a `<tr>`'s th/td cells onto the grid.
fn grid_cells(tr: Element<'_>) -> Vec<Cell<'_>> {
    let mut col = 0usize;
    tr.children()
        .filter(|c| c.is("th") || c.is("td"))
        .map(|el| {
            let width = el.colspan();
            let cell = Cell { start: col, width, el };
            col += width;
            cell
        })
        .collect()
}

fn own_rows(table: Element<'_>) -> Vec<Element<'_>> {
    table
        .find_all("tr")
        .filter(|tr| tr.closest("table").is_some_and(|t| t.same(&table)))
        .collect()
}

fn is_header_row(tr: Element<'_>) -> bool {
    let mut cells = tr.children().filter(|c| c.is("th") || c.is("td")).peekable();
    cells.peek().is_some() && cells.all(|c| c.is("th"))
}

/// Try one table: every column must match a header in the leading header rows.
fn locate_in<'a>(table: Element<'a>, columns: &[Column]) -> Option<Located<'a>> {
    let rows = own_rows(table);
    let header_rows: Vec<_> = rows
        .iter()
        .copied()
        .take_while(|tr| is_header_row(*tr))
        .take(MAX_HEADER_ROWS)
        .collect();
    if header_rows.is_empty() {
        return None;
    }

    let headers: Vec<(Span, String)> = header_rows
        .iter()
        .flat_map(|tr| grid_cells(*tr))
        .map(|c| (Span { start: c.start, width: c.width }, clean_label(&c.el.text())))
        .collect();

    let mut spans = Vec::with_capacity(columns.len());
    for col in columns {
        let (span, _) = headers.iter().find(|(_, label)| (col.matches)(label))?;
        spans.push(*span);
    }

    let data = rows
        .into_iter()
        .filter(|tr| tr.children().any(|c| c.is("td")))
        .map(|tr| GridRow { cells: grid_cells(tr) })
        .collect();

    Some(Located { spans, rows: data })
}

/// First table in the document whose headers match all `columns`.
pub fn locate<'a>(doc: &'a Document, columns: &[Column]) -> Option<Located<'a>> {
    let found = doc.find_all("table").find_map(|t| locate_in(t, columns));
    if found.is_none() {
        let names: Vec<_> = columns.iter().map(|c| c.name).collect();
        logd!("no table with headers {names:?}");
    }
    found
}

/// Header predicate helpers.
pub fn is_country_header(label: &str) -> bool {
    ["country", "location", "territory", "dependency"]
        .iter()
        .any(|k| label.contains(k))
}

/// A plain count column, not a derived ratio ("Deaths / million", "per 100k").
pub fn is_count_header(label: &str, noun: &str) -> bool {
    label.contains(noun)
        && !["/", "per ", "million", "%", "rate", "ratio"]
            .iter()
            .any(|k| label.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols() -> Vec<Column> {
        vec![
            Column { name: "country", matches: is_country_header },
            Column { name: "deaths", matches: |l| is_count_header(l, "death") },
        ]
    }

    #[test]
    fn colspan_header_lines_up_with_split_cells() {
        let doc = Document::parse(r#"
            <table class="wikitable">
              <tr><th colspan="2">Country</th><th>Deaths / million</th><th>Deaths[a]</th></tr>
              <tr><th><img src="f.png"></th><th><a href="/wiki/X">Xland</a></th><td>10</td><td>1,000</td></tr>
            </table>
        "#);
        let t = locate(&doc, &cols()).unwrap();
        assert_eq!(t.spans, vec![Span { start: 0, width: 2 }, Span { start: 3, width: 1 }]);
        assert_eq!(t.rows.len(), 1);
        assert_eq!(t.rows[0].text_in(t.spans[0]).as_deref(), Some("Xland"));
        assert_eq!(t.rows[0].text_in(t.spans[1]).as_deref(), Some("1,000"));
    }

    #[test]
    fn first_matching_table_wins_and_others_are_skipped() {
        let doc = Document::parse(r#"
            <table><tr><th>Foo</th></tr><tr><td>1</td></tr></table>
            <table><tr><th>Location</th><th>Deaths</th></tr><tr><td>A</td><td>1</td></tr></table>
            <table><tr><th>Location</th><th>Deaths</th></tr><tr><td>B</td><td>2</td></tr></table>
        "#);
        let t = locate(&doc, &cols()).unwrap();
        assert_eq!(t.rows[0].text_in(t.spans[0]).as_deref(), Some("A"));
    }

    #[test]
    fn ratio_headers_are_not_counts() {
        assert!(is_count_header("deaths", "death"));
        assert!(!is_count_header("deaths / million", "death"));
        assert!(!is_count_header("deaths per 100k", "death"));
        assert!(is_count_header("total cases", "case"));
    }

    #[test]
    fn no_match_is_none() {
        let doc = Document::parse("<table><tr><td>no headers</td></tr></table>");
        assert!(locate(&doc, &cols()).is_none());
    }
}
