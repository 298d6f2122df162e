//! Plumbing between async work and UI-owned state.
//!
//! Nothing here knows about the billing domain: it provides latest-only update
//! channels, one-shot promises, task handles with cooperative cancellation, and a
//! platform-neutral `spawn`.

mod promise;
mod spawn;
mod task;
mod updater;

pub use promise::{Promise, PromiseResolver, PromiseStatus};
pub use spawn::spawn;
pub use task::{TaskHandle, TaskId};
pub use updater::{Generations, LatestOnlyUpdater, Stamped, UpdateChannel, UpdateIssuer};

pub use tokio_util::sync::CancellationToken;
