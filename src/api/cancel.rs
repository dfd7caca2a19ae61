//! Request Cancellation
//!
//! A cancel token per issued request, and a guard that lets only the most
//! recently issued request of a view write its result back.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared cancellation flag; aborts the browser request when cancelled
#[derive(Clone, Debug)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
    controller: Option<web_sys::AbortController>,
}

impl CancelToken {
    pub fn new() -> Self {
        let controller = if cfg!(target_arch = "wasm32") {
            web_sys::AbortController::new().ok()
        } else {
            None
        };
        Self {
            cancelled: Rc::new(Cell::new(false)),
            controller,
        }
    }

    pub fn cancel(&self) {
        if self.cancelled.replace(true) {
            return;
        }
        if let Some(controller) = &self.controller {
            controller.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    pub fn abort_signal(&self) -> Option<web_sys::AbortSignal> {
        self.controller.as_ref().map(|c| c.signal())
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for one issued request
#[derive(Clone, Debug)]
pub struct Ticket {
    generation: u64,
    pub token: CancelToken,
}

/// Latest-request-wins guard for a single view.
///
/// `begin` cancels whatever request the view issued before, so a superseded
/// response can never overwrite a newer one.
#[derive(Debug, Default)]
pub struct LatestOnly {
    generation: Cell<u64>,
    active: RefCell<Option<CancelToken>>,
}

impl LatestOnly {
    pub fn begin(&self) -> Ticket {
        if let Some(previous) = self.active.borrow_mut().take() {
            previous.cancel();
        }
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        let token = CancelToken::new();
        *self.active.borrow_mut() = Some(token.clone());
        Ticket { generation, token }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation.get() && !ticket.token.is_cancelled()
    }

    /// Cancel the active request (view teardown)
    pub fn cancel_all(&self) {
        if let Some(active) = self.active.borrow_mut().take() {
            active.cancel();
        }
    }
}
