//! Batch scheduling.
//!
//! Runs download tasks on a bounded pool, isolates per-task failures, and
//! folds every outcome into a [`BatchReport`](crate::report::BatchReport) at a
//! single collection point. A global connection budget caps the total number
//! of HTTP connections across all workers.

mod batch;
mod budget;
mod interrupt;

pub use batch::{run_batch, DEFAULT_WORKERS};
pub use budget::{BudgetGuard, GlobalConnectionBudget};
pub use interrupt::Interrupt;
