// src/specs/infobox.rs
//! Scraping *spec* for a country page's info-box and lead paragraph.
//!
//! Purpose:
//! - Find the info-box (first element whose class list contains `infobox`), never by position.
//!   A `div.infobox` wrapper is read through the first table inside it.
//! - Read label/value rows (`th` label, first `td` value) and keep the ones whose
//!   cleaned label maps to a `Field`.
//! - Return the first non-empty paragraph after the info-box as the summary.
//!
//! Rules:
//! - Absent info-box or label → field simply not in the map.
//! - A label row with no value cell (Wikipedia's "Population" section header)
//!   borrows the value of the bullet sub-row right below it (`• 2024 estimate`).
//! - Same label twice → **first match wins**.
//! - No info-box → no summary either; the lead is anchored to it.

use crate::core::dom::{Document, Element};
use crate::core::sanitize::{clean_label, normalize_ws, strip_citations};
use crate::report::{Field, RawFields};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extracted {
    pub fields: RawFields,
    pub summary: String,
}

/// Parse a country page and pull out the recognized fields plus summary.
pub fn extract(markup: &str) -> Extracted {
    let doc = Document::parse(markup);
    extract_doc(&doc)
}

pub fn extract_doc(doc: &Document) -> Extracted {
    let Some(infobox) = find_infobox(doc) else {
        logd!("no infobox on page");
        return Extracted::default();
    };

    Extracted {
        fields: read_fields(infobox),
        summary: lead_paragraph(doc, infobox).unwrap_or_default(),
    }
}

fn find_infobox(doc: &Document) -> Option<Element<'_>> {
    doc.find_first(|e| e.has_class("infobox"))
}

/// The table holding the box's rows: the box itself, or the first table
/// inside a `div.infobox` wrapper.
fn rows_table(infobox: Element<'_>) -> Option<Element<'_>> {
    if infobox.is("table") {
        Some(infobox)
    } else {
        infobox.find_all("table").next()
    }
}

/// One `<tr>` reduced to its label and (optional) value text.
struct LabelRow {
    label: String,
    value: Option<String>,
}

fn label_rows(infobox: Element<'_>) -> Vec<LabelRow> {
    let Some(table) = rows_table(infobox) else { return Vec::new() };
    table
        .find_all("tr")
        // rows of nested tables belong to those tables
        .filter(|tr| tr.closest("table").is_some_and(|t| t.same(&table)))
        .filter_map(|tr| {
            let th = tr.children().find(|c| c.is("th"))?;
            let value = tr
                .children()
                .find(|c| c.is("td"))
                .map(|td| td.text())
                .filter(|v| !v.is_empty());
            Some(LabelRow { label: th.text(), value })
        })
        .collect()
}

fn is_sub_row(label: &str) -> bool {
    let l = normalize_ws(label);
    l.starts_with('•') || l.starts_with('·')
}

fn read_fields(infobox: Element<'_>) -> RawFields {
    let rows = label_rows(infobox);
    let mut fields = RawFields::new();

    for (i, row) in rows.iter().enumerate() {
        let Some(field) = Field::from_label(&clean_label(&row.label)) else { continue };
        if fields.contains_key(&field) {
            logd!("duplicate {field} row ignored (first match wins)");
            continue;
        }

        let value = row.value.clone().or_else(|| {
            rows.get(i + 1)
                .filter(|next| is_sub_row(&next.label))
                .and_then(|next| next.value.clone())
        });

        match value {
            Some(v) => { fields.insert(field, v); }
            None => logd!("{field} row has no value"),
        }
    }
    fields
}

/// First paragraph after the info-box (document order) with visible text,
/// citation markers stripped. Paragraphs inside the info-box don't count.
fn lead_paragraph(doc: &Document, infobox: Element<'_>) -> Option<String> {
    doc.elements()
        .skip_while(|e| !e.same(&infobox))
        .skip(1)
        .filter(|e| e.is("p") && !infobox.contains(e))
        .map(|p| strip_citations(&p.text()))
        .find(|t| !t.is_empty())
}
