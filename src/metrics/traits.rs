//! Metrics trait hierarchy.
//!
//! Recording and consumption are separate responsibilities: recorders only
//! write counters, and [`MetricsSnapshotProvider`] only reads them. Mutating
//! cache operations use the `&mut self` recorders; read-only operations go
//! through [`LruMetricsReadRecorder`], which relies on interior mutability.

/// Common counters shared by any bounded cache.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// Counters for recency-order operations that take `&mut self`.
pub trait LruMetricsRecorder: CoreMetricsRecorder {
    fn record_pop_lru_call(&mut self);
    fn record_pop_lru_found(&mut self);
    fn record_touch_call(&mut self);
    fn record_touch_found(&mut self);
}

/// Counters for recency-order operations that only take `&self`
/// (`peek`, `peek_lru`, `recency_rank`).
pub trait LruMetricsReadRecorder {
    fn record_peek_call(&self);
    fn record_peek_found(&self);
    fn record_peek_lru_call(&self);
    fn record_peek_lru_found(&self);
    fn record_recency_rank_call(&self);
    fn record_recency_rank_found(&self);
    fn record_recency_rank_scan_step(&self);
}

/// Read side: produces a point-in-time, plain-data copy of the counters.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}
