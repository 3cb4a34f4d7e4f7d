// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://en.wikipedia.org";
pub const WIKI_PREFIX: &str = "/wiki/";
pub const HTTP_TIMEOUT_SECS: u64 = 15;
pub const USER_AGENT: &str = concat!("covid_scrape/", env!("CARGO_PKG_VERSION"));

// Source pages
pub const REFERENCE_PAGE: &str = "/wiki/COVID-19_pandemic_by_country_and_territory";
pub const POPULATION_PAGE: &str = "/wiki/List_of_countries_and_dependencies_by_population";

// Normalization
pub const PER_CAPITA_BASE: f64 = 100_000.0;

// Export
pub const DEFAULT_FILE: &str = "covid_summary";
pub const SEARCH_FILE_SUFFIX: &str = "summary";
