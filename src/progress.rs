// src/progress.rs
/// Lightweight progress reporting for a run (one unit per country).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of countries selected.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A country's report was built.
    fn item_done(&mut self, _country: &str) {}

    /// A country was skipped; `reason` is the fetch error text.
    fn item_failed(&mut self, _country: &str, _reason: &str) {}

    /// Called once every selected country has been handled.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
