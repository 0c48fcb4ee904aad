//! Permanent redirect records
//!
//! The registry is read once from a line-oriented file of
//! `<source url>-><destination url>` records and never changes afterwards,
//! so it is shared across connections without locking.

use std::path::Path;

use crate::http::mime::ContentType;

/// Separator between source and destination in the records file
pub const MAPPING_SEPARATOR: &str = "->";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRecord {
    pub source_url: String,
    pub destination_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct RedirectRegistry {
    records: Vec<RedirectRecord>,
}

impl RedirectRegistry {
    pub fn new(records: Vec<RedirectRecord>) -> Self {
        Self { records }
    }

    /// Parses records file contents.
    ///
    /// Blank lines are ignored; lines without a separator are skipped with
    /// a warning. File order is kept so the first matching record wins.
    pub fn parse(text: &str) -> Self {
        let mut records = Vec::new();

        for (number, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            match line.split_once(MAPPING_SEPARATOR) {
                Some((source, destination)) => records.push(RedirectRecord {
                    source_url: source.trim().to_string(),
                    destination_url: destination.trim().to_string(),
                }),
                None => {
                    tracing::warn!(line = number + 1, "Skipping redirect record without separator");
                }
            }
        }

        Self { records }
    }

    /// Loads the records file. A missing or unreadable file yields an empty
    /// registry.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let registry = Self::parse(&text);
                tracing::info!(
                    path = %path.display(),
                    records = registry.len(),
                    "Loaded redirect records"
                );
                registry
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not read redirect records, continuing without redirects"
                );
                Self::default()
            }
        }
    }

    /// Finds the new location of a moved resource.
    ///
    /// Only Html resources redirect. Matching is exact string equality
    /// after trimming whitespace.
    pub fn lookup(&self, content_type: ContentType, url: &str) -> Option<&str> {
        if content_type != ContentType::Html {
            return None;
        }

        let url = url.trim();
        self.records
            .iter()
            .find(|record| record.source_url == url)
            .map(|record| record.destination_url.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
