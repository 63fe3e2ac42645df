use std::collections::BTreeMap;

/// Failure counts accumulated over a crawl
///
/// Three categories are kept apart: transport and write failures keyed by
/// message, HTTP failures keyed by status code, and URLs skipped because their
/// final path segment was too long to mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTally {
    /// Failures without an HTTP response, by message
    pub unknown: BTreeMap<String, u64>,

    /// Non-2xx responses, by status code
    pub http: BTreeMap<u16, u64>,

    /// URLs skipped before any network access
    pub filename_too_long: u64,
}

impl ErrorTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_unknown(&mut self, message: &str) {
        *self.unknown.entry(message.to_string()).or_insert(0) += 1;
    }

    pub fn record_http(&mut self, status_code: u16) {
        *self.http.entry(status_code).or_insert(0) += 1;
    }

    pub fn record_filename_too_long(&mut self) {
        self.filename_too_long += 1;
    }

    /// Total number of recorded failures across all categories
    pub fn total(&self) -> u64 {
        self.unknown.values().sum::<u64>() + self.http.values().sum::<u64>() + self.filename_too_long
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
