//! The search pipeline: partition the root into disjoint work units, scan
//! each unit on its own task, then join and order the per-unit outcomes.
//!
//! Each stage is a free function over plain owned data. Units never share
//! mutable state while running; determinism is imposed only at the
//! aggregation step.

pub mod aggregate;
pub mod matcher;
pub mod partition;
pub mod unit;

pub use aggregate::{aggregate, order_records};
pub use matcher::QueryMatcher;
pub use partition::{partition, Partition, WorkUnit};
pub use unit::scan_unit;
