//! Task identity and cooperative cancellation.
//!
//! - `TaskId`: which update channel spawned the task, and at which generation
//! - `TaskHandle`: a `TaskId` paired with the `CancellationToken` the task must honour
//!
//! Tokens handed out by an [`crate::UpdateChannel`] are children of the channel's root
//! token, so dropping the channel cancels every task it ever issued.

use tokio_util::sync::CancellationToken;

/// Unique identifier for a spawned task.
///
/// The owner id distinguishes channels; the generation orders tasks issued by the
/// same channel. A higher generation always supersedes a lower one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    owner: u64,
    generation: u64,
}

impl TaskId {
    pub fn new(owner: u64, generation: u64) -> Self {
        Self { owner, generation }
    }

    pub fn owner(&self) -> u64 {
        self.owner
    }

    /// Higher values indicate more recently issued tasks.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task#{}.{}", self.owner, self.generation)
    }
}

/// Handle to an issued task with cooperative cancellation support.
///
/// Cancellation is a request, not an abort: the task observes it through
/// `is_cancelled()` or by racing `cancelled()` in `tokio::select!`.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Clone of the token, for async work that needs to race cancellation.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}
