// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod specs;

pub mod csv;
pub mod export;
pub mod file;
pub mod normalize;
pub mod progress;
pub mod report;
pub mod scrape;
