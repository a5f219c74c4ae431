/// Case-insensitive substring matcher for a single query.
///
/// The query is folded to lowercase once at construction; each candidate
/// line is folded at match time. Folding uses Rust's locale-independent
/// Unicode lowercase mapping, so results do not vary with the host locale.
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    lowered: String,
}

impl QueryMatcher {
    /// Creates a matcher for the given query text
    pub fn new(query: &str) -> Self {
        Self {
            lowered: query.to_lowercase(),
        }
    }

    /// Reports whether the line contains the query as a contiguous
    /// substring, ignoring case. The empty query matches every line.
    pub fn is_match(&self, line: &str) -> bool {
        if self.lowered.is_empty() {
            return true;
        }
        line.to_lowercase().contains(&self.lowered)
    }
}
