//! Global connection budget shared across workers.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Workers reserve connection slots before opening transfers and release them
/// when done, so the total stays under `max_total_connections`.
#[derive(Debug)]
pub struct GlobalConnectionBudget {
    max_total: usize,
    in_use: AtomicUsize,
}

impl GlobalConnectionBudget {
    pub fn new(max_total: usize) -> Self {
        Self {
            max_total: max_total.max(1),
            in_use: AtomicUsize::new(0),
        }
    }

    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::Relaxed)
    }

    pub fn available(&self) -> usize {
        self.max_total.saturating_sub(self.in_use())
    }

    /// Reserves up to `requested` slots; returns how many were granted
    /// (possibly 0). Pair with `release`.
    pub fn reserve(&self, requested: usize) -> usize {
        let mut current = self.in_use.load(Ordering::Relaxed);
        loop {
            let take = requested.min(self.max_total.saturating_sub(current));
            match self.in_use.compare_exchange_weak(
                current,
                current + take,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return take,
                Err(actual) => current = actual,
            }
        }
    }

    pub fn release(&self, n: usize) {
        let _ = self
            .in_use
            .fetch_update(Ordering::AcqRel, Ordering::Relaxed, |cur| Some(cur.saturating_sub(n)));
    }

    /// Reserves like [`reserve`](Self::reserve) and releases on drop.
    pub fn reserve_guard(&self, requested: usize) -> BudgetGuard<'_> {
        BudgetGuard {
            budget: self,
            reserved: self.reserve(requested),
        }
    }
}

/// Releases reserved connections when dropped.
#[derive(Debug)]
pub struct BudgetGuard<'a> {
    budget: &'a GlobalConnectionBudget,
    reserved: usize,
}

impl BudgetGuard<'_> {
    pub fn granted(&self) -> usize {
        self.reserved
    }
}

impl Drop for BudgetGuard<'_> {
    fn drop(&mut self) {
        self.budget.release(self.reserved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_and_release() {
        let budget = GlobalConnectionBudget::new(16);
        assert_eq!(budget.reserve(8), 8);
        assert_eq!(budget.reserve(10), 8);
        assert_eq!(budget.available(), 0);
        assert_eq!(budget.reserve(1), 0);
        budget.release(8);
        assert_eq!(budget.available(), 8);
        budget.release(100);
        assert_eq!(budget.in_use(), 0);
    }

    #[test]
    fn guard_releases_on_drop() {
        let budget = GlobalConnectionBudget::new(4);
        {
            let g = budget.reserve_guard(3);
            assert_eq!(g.granted(), 3);
            let g2 = budget.reserve_guard(3);
            assert_eq!(g2.granted(), 1);
            assert_eq!(budget.available(), 0);
        }
        assert_eq!(budget.available(), 4);
    }
}
