use std::cell::Cell;

/// Counter cell for read paths that only hold `&self`.
///
/// Interior mutability lets `peek`-style operations record themselves without
/// taking `&mut self`. Metrics are observational and never affect cache
/// correctness.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }
}
