//! Reconciliation and polling loop
//!
//! [`Reconciler`] runs one fetch-normalize-diff cycle at a time and
//! [`PollScheduler`] decides when the next one happens.

mod change_detection;
pub mod reconciler;
pub mod scheduler;
pub mod state;

pub use reconciler::{Reconciler, Snapshot, TickOutcome};
pub use scheduler::PollScheduler;
pub use state::PollState;
