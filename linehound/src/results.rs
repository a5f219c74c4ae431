use std::path::PathBuf;

use crate::errors::Diagnostic;

/// One matching line: where it was found and what it said.
///
/// The line text is stored verbatim; case folding happens only inside the
/// matcher, never in the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Path of the file the line was read from
    pub path: PathBuf,
    /// 1-based position of the line within its file
    pub line_number: usize,
    /// Raw line content, exactly as read
    pub line_text: String,
}

impl MatchRecord {
    pub fn new(path: impl Into<PathBuf>, line_number: usize, line_text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line_number,
            line_text: line_text.into(),
        }
    }

    /// Length of the path string, the primary aggregation sort key
    pub fn path_len(&self) -> usize {
        self.path.as_os_str().len()
    }
}

/// Everything one scan produced: matches plus the non-fatal problems hit
/// along the way. Also the shape of the merged, ordered output.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub records: Vec<MatchRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanOutcome {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push_record(&mut self, record: MatchRecord) {
        self.records.push(record);
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Folds another outcome into this one, keeping arrival order
    pub fn merge(&mut self, other: ScanOutcome) {
        self.records.extend(other.records);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// The answer to one query, as returned by the session controller
#[derive(Debug, Clone)]
pub struct QueryResults {
    /// Ordered match records
    pub records: Vec<MatchRecord>,
    /// Non-fatal problems encountered while computing the result.
    /// Empty when the result was served from cache.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether the records came from the result cache
    pub from_cache: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_record_creation() {
        let record = MatchRecord::new("dir/file.txt", 42, "Hello, world!");
        assert_eq!(record.path, PathBuf::from("dir/file.txt"));
        assert_eq!(record.line_number, 42);
        assert_eq!(record.line_text, "Hello, world!");
        assert_eq!(record.path_len(), "dir/file.txt".len());
    }

    #[test]
    fn test_outcome_merge() {
        let mut first = ScanOutcome::new();
        first.push_record(MatchRecord::new("a.txt", 1, "one"));

        let mut second = ScanOutcome::new();
        second.push_record(MatchRecord::new("b.txt", 2, "two"));
        second.push_diagnostic(Diagnostic::new("c.txt", "could not open"));

        first.merge(second);
        assert_eq!(first.records.len(), 2);
        assert_eq!(first.diagnostics.len(), 1);
        assert_eq!(first.records[0].path, PathBuf::from("a.txt"));
        assert_eq!(first.records[1].path, PathBuf::from("b.txt"));
    }

    #[test]
    fn test_outcome_merge_empty() {
        let mut outcome = ScanOutcome::new();
        outcome.push_record(MatchRecord::new("a.txt", 1, "one"));
        outcome.merge(ScanOutcome::new());
        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.diagnostics.is_empty());
    }
}
