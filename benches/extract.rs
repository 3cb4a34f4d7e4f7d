// benches/extract.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use covid_scrape::specs::{self, ReferenceTable};

/// Synthetic country page: a long infobox followed by prose.
fn country_page() -> String {
    let mut rows = String::new();
    for i in 0..60 {
        rows.push_str(&format!("<tr><th>Label {i}</th><td>value {i}<sup>[{i}]</sup></td></tr>"));
    }
    format!(
        r#"<html><body>
        <table class="infobox">
          <tr><th colspan="2">COVID-19 pandemic in Benchland</th></tr>
          {rows}
          <tr class="mergedtoprow"><th colspan="2">Population</th></tr>
          <tr><th>• 2024 estimate</th><td>12,345,678<sup>[9]</sup></td></tr>
          <tr><th>Confirmed cases</th><td>1,234,567</td></tr>
          <tr><th>Deaths</th><td>8,901</td></tr>
        </table>
        {}
        </body></html>"#,
        "<p>The pandemic in Benchland began in 2020.[1] It spread quickly.[2]</p>".repeat(40)
    )
}

/// Synthetic statistics list with ~240 rows.
fn reference_page() -> String {
    let mut rows = String::new();
    for i in 0..240 {
        rows.push_str(&format!(
            r#"<tr><th><img src="f.png"></th><th scope="row"><a href="/wiki/COVID-19_pandemic_in_C{i}">Country {i}</a>[a]</th>
               <td>{}</td><td>{}</td><td>{}</td></tr>"#,
            i * 3, i * 1_000, i * 100_000
        ));
    }
    format!(
        r#"<table class="wikitable plainrowheaders sortable">
           <tr><th colspan="2">Country</th><th>Deaths / million</th><th>Deaths</th><th>Cases</th></tr>
           {rows}
           </table>"#
    )
}

fn bench_extract(c: &mut Criterion) {
    let page = country_page();
    let reference = reference_page();

    c.bench_function("infobox_extract", |b| {
        b.iter(|| {
            let out = specs::extract(black_box(&page));
            black_box(out.fields.len())
        })
    });

    c.bench_function("reference_table_parse", |b| {
        b.iter(|| {
            let table = ReferenceTable::parse(black_box(&reference));
            black_box(table.map(|t| t.len()))
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
