//! Operation counters for the cache, behind `feature = "metrics"`.
//!
//! Recording, snapshotting, and consumption are split into small pieces:
//! [`metrics_impl::LruMetrics`] holds the counters, the traits in [`traits`]
//! define who may write them, and [`snapshot::LruMetricsSnapshot`] is the
//! plain-data copy handed to callers.

pub mod cell;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
