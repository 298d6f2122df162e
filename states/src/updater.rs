//! Latest-only update channels.
//!
//! Async work never touches UI-owned state directly. Each task gets a
//! [`LatestOnlyUpdater`] stamped with a generation and pushes values through a `flume`
//! channel; the owner drains the channel once per frame with
//! [`UpdateChannel::drain_latest`]. Only values from the most recently issued generation
//! survive the drain, so overlapping tasks cannot clobber each other out of order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use flume::{Receiver, Sender};
use tokio_util::sync::CancellationToken;

use crate::task::{TaskHandle, TaskId};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// A value tagged with the task that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<T> {
    pub task: TaskId,
    pub value: T,
}

/// Shared monotonically increasing generation counter.
#[derive(Debug, Clone, Default)]
pub struct Generations(Arc<AtomicU64>);

impl Generations {
    /// The most recently issued generation, `0` before the first issue.
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    pub fn is_latest(&self, generation: u64) -> bool {
        self.current() == generation
    }

    fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// Sender half handed to a single task.
pub struct LatestOnlyUpdater<T> {
    handle: TaskHandle,
    generations: Generations,
    send: Sender<Stamped<T>>,
}

impl<T> Clone for LatestOnlyUpdater<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            generations: self.generations.clone(),
            send: self.send.clone(),
        }
    }
}

impl<T> std::fmt::Debug for LatestOnlyUpdater<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatestOnlyUpdater")
            .field("task", &self.handle.id())
            .field("latest", &self.generations.current())
            .finish()
    }
}

impl<T> LatestOnlyUpdater<T> {
    pub fn task_id(&self) -> TaskId {
        self.handle.id()
    }

    pub fn handle(&self) -> &TaskHandle {
        &self.handle
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.handle.cancellation_token()
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }

    /// Whether no newer task has been issued on the same channel.
    pub fn is_latest(&self) -> bool {
        self.generations.is_latest(self.handle.id().generation())
    }

    /// Push a value to the owner.
    ///
    /// Returns `false` when the value was dropped: the task was cancelled, a newer
    /// generation exists, or the owner is gone.
    pub fn set(&self, value: T) -> bool {
        let task = self.handle.id();
        if self.handle.is_cancelled() {
            log::debug!("{task}: cancelled, update dropped");
            return false;
        }
        if !self.is_latest() {
            log::debug!(
                "{task}: superseded by generation {}, update dropped",
                self.generations.current()
            );
            return false;
        }
        self.send.send(Stamped { task, value }).is_ok()
    }
}

/// Cloneable issuing side of an [`UpdateChannel`].
///
/// Lets callbacks and background tasks start new generations without borrowing the
/// channel's owner.
pub struct UpdateIssuer<T> {
    owner: u64,
    generations: Generations,
    send: Sender<Stamped<T>>,
    root: CancellationToken,
}

impl<T> Clone for UpdateIssuer<T> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner,
            generations: self.generations.clone(),
            send: self.send.clone(),
            root: self.root.clone(),
        }
    }
}

impl<T> std::fmt::Debug for UpdateIssuer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateIssuer")
            .field("owner", &self.owner)
            .field("latest", &self.generations.current())
            .field("closed", &self.root.is_cancelled())
            .finish()
    }
}

impl<T> UpdateIssuer<T> {
    /// Start a new generation. Every earlier updater becomes stale.
    pub fn updater(&self) -> LatestOnlyUpdater<T> {
        let generation = self.generations.advance();
        LatestOnlyUpdater {
            handle: TaskHandle::new(
                TaskId::new(self.owner, generation),
                self.root.child_token(),
            ),
            generations: self.generations.clone(),
            send: self.send.clone(),
        }
    }

    pub fn generations(&self) -> &Generations {
        &self.generations
    }

    /// `true` once the owning channel was dropped or cancelled.
    pub fn is_closed(&self) -> bool {
        self.root.is_cancelled()
    }
}

/// Owner side: issues updaters and drains their values.
///
/// Dropping the channel cancels every task it issued.
pub struct UpdateChannel<T> {
    issuer: UpdateIssuer<T>,
    recv: Receiver<Stamped<T>>,
}

impl<T> Default for UpdateChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for UpdateChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateChannel")
            .field("issuer", &self.issuer)
            .field("queued", &self.recv.len())
            .finish()
    }
}

impl<T> UpdateChannel<T> {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            issuer: UpdateIssuer {
                owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
                generations: Generations::default(),
                send,
                root: CancellationToken::new(),
            },
            recv,
        }
    }

    pub fn issuer(&self) -> UpdateIssuer<T> {
        self.issuer.clone()
    }

    pub fn updater(&self) -> LatestOnlyUpdater<T> {
        self.issuer.updater()
    }

    pub fn generations(&self) -> &Generations {
        &self.issuer.generations
    }

    /// Take every queued value, discarding those from superseded generations.
    pub fn drain_latest(&self) -> Vec<Stamped<T>> {
        let generations = &self.issuer.generations;
        self.recv
            .try_iter()
            .filter(|stamped| {
                let keep = generations.is_latest(stamped.task.generation());
                if !keep {
                    log::debug!("{}: stale update discarded on drain", stamped.task);
                }
                keep
            })
            .collect()
    }

    /// Cancel every task issued so far and any issued later.
    pub fn close(&self) {
        self.issuer.root.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.issuer.is_closed()
    }
}

impl<T> Drop for UpdateChannel<T> {
    fn drop(&mut self) {
        self.close();
    }
}
