// src/specs/mod.rs
//! # Scraping "specs" module
//!
//! Page-specific scraping specifications. Each spec knows *where the ground
//! truth lives in one page's HTML* and *how to extract it robustly*.
//!
//! ## What lives here
//! - **Pure HTML reading** of already-fetched markup, through `core::dom`.
//! - **Structural lookup**: tables and boxes are found by class or header
//!   labels, never by numeric position, since surrounding content shifts.
//! - **Raw output**: label → text maps and raw table rows. Numbers stay text.
//!
//! ## What does **not** live here
//! - **Networking** (`core::net`), **number parsing and per-capita math**
//!   (`normalize`), **export formatting** (`export`).
//!
//! ## Typical call chain
//! ```text
//! scrape::run → core::net::Fetcher::fetch → specs::<page>::parse/extract
//!                                        ↘ normalize::normalize → CountryReport
//! ```
//!
//! ## Current specs
//! - `infobox`   – country page: info-box fields + lead paragraph.
//! - `reference` – statistics list (cases/deaths/link) and population list.
//! - `table`     – header-located grid reading shared by `reference`.
//!
//! ## Testing notes
//! Specs are tested offline against inline HTML fixtures.
pub mod infobox;
pub mod reference;
pub mod table;

pub use infobox::{extract, Extracted};
pub use reference::{PopulationTable, ReferenceRow, ReferenceTable};
