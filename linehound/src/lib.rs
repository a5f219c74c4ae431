pub mod cache;
pub mod config;
pub mod errors;
pub mod results;
pub mod search;
pub mod session;

pub use cache::ResultCache;
pub use config::SessionConfig;
pub use errors::{Diagnostic, SearchError, SearchResult};
pub use results::{MatchRecord, QueryResults, ScanOutcome};
pub use session::Session;
