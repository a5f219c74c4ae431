use ignore::WalkBuilder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{trace, warn};

use super::matcher::QueryMatcher;
use super::partition::WorkUnit;
use crate::errors::{Diagnostic, SearchError};
use crate::results::{MatchRecord, ScanOutcome};

const BUFFER_CAPACITY: usize = 65536;

/// Scans one work unit and returns everything it found.
///
/// Runs to completion no matter what it hits: unreadable files and failed
/// subtrees become diagnostics in the outcome, never a panic or an early
/// return. Each invocation owns its outcome exclusively, so units can run
/// on separate threads with nothing shared.
pub fn scan_unit(unit: &WorkUnit, matcher: &QueryMatcher) -> ScanOutcome {
    trace!("Scanning unit: {}", unit.path().display());

    let mut builder = WalkBuilder::new(unit.path());
    builder
        .hidden(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .follow_links(false);

    // The top-level unit covers only files sitting directly in the root;
    // everything deeper belongs to a subtree unit.
    if matches!(unit, WorkUnit::TopLevel(_)) {
        builder.max_depth(Some(1));
    }

    let mut outcome = ScanOutcome::new();
    for entry in builder.build() {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_some_and(|ft| ft.is_file()) {
                    scan_file(entry.path(), matcher, &mut outcome);
                }
            }
            Err(err) => {
                warn!("Traversal error under {}: {}", unit.path().display(), err);
                let err = SearchError::traversal_failure(unit.path(), err.to_string());
                outcome.push_diagnostic(Diagnostic::from(&err));
            }
        }
    }
    outcome
}

/// Reads one file line by line, appending a record for every matching line.
/// Non-UTF-8 bytes are replaced rather than treated as an error.
fn scan_file(path: &Path, matcher: &QueryMatcher, outcome: &mut ScanOutcome) {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            warn!("Could not open {}: {}", path.display(), err);
            let err = SearchError::unreadable_file(path, err);
            outcome.push_diagnostic(Diagnostic::from(&err));
            return;
        }
    };

    let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
    let mut buf = Vec::new();
    let mut line_number = 0;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                line_number += 1;
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                let line = String::from_utf8_lossy(&buf);
                if matcher.is_match(&line) {
                    outcome.push_record(MatchRecord::new(path, line_number, line.into_owned()));
                }
            }
            Err(err) => {
                warn!("Read failed in {}: {}", path.display(), err);
                let err = SearchError::unreadable_file(path, err);
                outcome.push_diagnostic(Diagnostic::from(&err));
                break;
            }
        }
    }
}
