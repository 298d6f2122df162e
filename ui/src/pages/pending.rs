//! Writes a page has started and not yet seen settle: creates, row edits and deletes.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use billing_business::{ActionOutcome, RequestError};
use billing_states::{Promise, PromiseStatus};

pub type ActionResult = Result<ActionOutcome, RequestError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Create,
    Edit,
    Delete,
}

/// Shared between a page and the table callbacks it hands out.
#[derive(Debug, Clone, Default)]
pub struct PendingActions {
    inner: Rc<RefCell<Vec<(ActionKind, Promise<ActionResult>)>>>,
}

impl PendingActions {
    pub fn spawn<F>(&self, kind: ActionKind, future: F)
    where
        F: Future<Output = ActionResult> + Send + 'static,
    {
        self.inner.borrow_mut().push((kind, Promise::spawn(future)));
    }

    pub fn is_busy(&self) -> bool {
        !self.inner.borrow().is_empty()
    }

    /// Take every action that settled since the last poll.
    pub fn poll(&self) -> Vec<(ActionKind, ActionResult)> {
        let mut settled = Vec::new();
        self.inner.borrow_mut().retain(|(kind, promise)| match promise.poll() {
            PromiseStatus::Pending => true,
            PromiseStatus::Ready(result) => {
                settled.push((*kind, result));
                false
            }
            PromiseStatus::Broken => {
                log::warn!("{kind:?} action dropped before it settled");
                false
            }
        });
        settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billing_business::Method;

    #[tokio::test]
    async fn settled_actions_are_taken_once() {
        let actions = PendingActions::default();
        actions.spawn(ActionKind::Create, async { Ok(ActionOutcome::Saved) });
        actions.spawn(ActionKind::Delete, async {
            Err(RequestError::Status {
                method: Method::Delete,
                status: 500,
            })
        });
        assert!(actions.is_busy());

        let mut settled = Vec::new();
        for _ in 0..50 {
            settled.extend(actions.poll());
            if settled.len() == 2 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert_eq!(settled.len(), 2);
        assert!(!actions.is_busy());
        assert!(actions.poll().is_empty());
    }
}
