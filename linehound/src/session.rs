use rayon::prelude::*;
use rayon::ThreadPool;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::cache::ResultCache;
use crate::config::SessionConfig;
use crate::errors::{Diagnostic, SearchError, SearchResult};
use crate::results::{QueryResults, ScanOutcome};
use crate::search::{aggregate, partition, scan_unit, Partition, QueryMatcher};

/// Owns the current root directory, the result cache, and the worker pool.
///
/// A session runs one search at a time: the cache is read before any unit
/// task starts and written after every task has joined, all on the caller's
/// thread, which is why the cache itself needs no locking.
pub struct Session {
    root: PathBuf,
    cache: ResultCache,
    pool: ThreadPool,
}

impl Session {
    /// Creates a session rooted at `config.root_path`.
    ///
    /// The root must exist and be a directory. Worker threads are created
    /// once here and reused across searches; parallelism per search is
    /// bounded by the pool, not by the partition count.
    pub fn new(config: &SessionConfig) -> SearchResult<Self> {
        let root = config
            .root_path
            .clone()
            .ok_or_else(|| SearchError::config_error("root_path is not set"))?;
        if !root.is_dir() {
            return Err(SearchError::invalid_root(root));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.thread_count.get())
            .build()
            .map_err(|e| SearchError::config_error(e.to_string()))?;

        Ok(Self {
            root,
            cache: ResultCache::new(config.max_cache_entries),
            pool,
        })
    }

    /// The directory searches currently run against
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of queries currently held by the result cache
    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }

    /// Answers a query, from cache when possible.
    ///
    /// On a miss the root is partitioned, every unit is scanned in
    /// parallel, and the joined outcome is ordered, cached, and returned.
    /// Search never fails as a whole: problems along the way surface as
    /// diagnostics next to whatever results were still collectable.
    pub fn search(&mut self, query: &str) -> QueryResults {
        if let Some(cached) = self.cache.lookup(query) {
            info!("Cache hit for query {:?}", query);
            return QueryResults {
                records: cached.to_vec(),
                diagnostics: Vec::new(),
                from_cache: true,
            };
        }

        info!(
            "Cache miss for query {:?}, searching {}",
            query,
            self.root.display()
        );
        let outcome = self.run_search(query);
        self.cache.store(query, outcome.records.clone());

        QueryResults {
            records: outcome.records,
            diagnostics: outcome.diagnostics,
            from_cache: false,
        }
    }

    fn run_search(&self, query: &str) -> ScanOutcome {
        let Partition { units, diagnostics } = match partition(&self.root) {
            Ok(partition) => partition,
            Err(err) => {
                warn!("Partitioning failed: {}", err);
                let mut outcome = ScanOutcome::new();
                outcome.push_diagnostic(Diagnostic::from(&err));
                return outcome;
            }
        };
        debug!("Dispatching {} work units", units.len());

        let matcher = QueryMatcher::new(query);
        // collect() is the join: every unit has finished before aggregation
        // starts, so partial results are never observable.
        let outcomes: Vec<ScanOutcome> = self.pool.install(|| {
            units
                .par_iter()
                .map(|unit| scan_unit(unit, &matcher))
                .collect()
        });

        // Problems seen while partitioning ride along with the unit ones
        let mut outcome = ScanOutcome {
            records: Vec::new(),
            diagnostics,
        };
        outcome.merge(aggregate(outcomes));
        outcome
    }

    /// Points the session at a new root directory.
    ///
    /// Validation happens first; an invalid path leaves both the root and
    /// the cache untouched. On success the cache wipe and the root swap
    /// happen together, so results for the old root can never be served
    /// under the new one.
    pub fn change_root(&mut self, new_root: impl Into<PathBuf>) -> SearchResult<()> {
        let new_root = new_root.into();
        if !new_root.is_dir() {
            return Err(SearchError::invalid_root(new_root));
        }

        info!("Changing root to {}", new_root.display());
        self.cache.invalidate_all();
        self.root = new_root;
        Ok(())
    }
}
