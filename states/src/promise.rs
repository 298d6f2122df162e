//! One-shot results polled from the UI thread.
//!
//! A `Promise` is the receiving end of a bounded `flume` channel of capacity one. The
//! UI polls it once per frame; it never blocks.

use std::future::Future;

use flume::{Receiver, Sender, TryRecvError};

/// What a poll observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromiseStatus<T> {
    /// Not settled yet.
    Pending,
    /// Settled with this value. Reported exactly once.
    Ready(T),
    /// The producer went away without settling, or the value was already taken.
    Broken,
}

#[derive(Debug)]
pub struct Promise<T> {
    recv: Receiver<T>,
}

/// Producer side created by [`Promise::channel`].
#[derive(Debug)]
pub struct PromiseResolver<T> {
    send: Sender<T>,
}

impl<T> PromiseResolver<T> {
    /// Settle the promise. Returns `false` when nobody is waiting any more.
    pub fn resolve(self, value: T) -> bool {
        self.send.try_send(value).is_ok()
    }
}

impl<T: Send + 'static> Promise<T> {
    /// Run `future` on the platform executor and settle with its output.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (resolver, promise) = Self::channel();
        crate::spawn(async move {
            if !resolver.resolve(future.await) {
                log::debug!("promise dropped before its future settled");
            }
        });
        promise
    }
}

impl<T> Promise<T> {
    pub fn channel() -> (PromiseResolver<T>, Self) {
        let (send, recv) = flume::bounded(1);
        (PromiseResolver { send }, Self { recv })
    }

    /// An already settled promise.
    pub fn resolved(value: T) -> Self {
        let (resolver, promise) = Self::channel();
        resolver.resolve(value);
        promise
    }

    pub fn poll(&self) -> PromiseStatus<T> {
        match self.recv.try_recv() {
            Ok(value) => PromiseStatus::Ready(value),
            Err(TryRecvError::Empty) => PromiseStatus::Pending,
            Err(TryRecvError::Disconnected) => PromiseStatus::Broken,
        }
    }
}
