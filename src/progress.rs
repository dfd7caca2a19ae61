//! Request Progress
//!
//! The API client reports the start and end of every request; the top
//! progress bar is shown while anything is in flight.

use std::cell::{Cell, RefCell};

pub trait RequestObserver {
    fn request_started(&self);
    fn request_finished(&self);
}

/// Counts in-flight requests and notifies a listener on every change
#[derive(Default)]
pub struct RequestTracker {
    in_flight: Cell<u32>,
    started: Cell<u32>,
    listener: RefCell<Option<Box<dyn Fn(u32)>>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change(&self, listener: impl Fn(u32) + 'static) {
        *self.listener.borrow_mut() = Some(Box::new(listener));
    }

    pub fn in_flight(&self) -> u32 {
        self.in_flight.get()
    }

    /// Requests issued since creation
    pub fn total_started(&self) -> u32 {
        self.started.get()
    }

    fn publish(&self) {
        if let Some(listener) = self.listener.borrow().as_ref() {
            listener(self.in_flight.get());
        }
    }
}

impl RequestObserver for RequestTracker {
    fn request_started(&self) {
        self.started.set(self.started.get() + 1);
        self.in_flight.set(self.in_flight.get() + 1);
        self.publish();
    }

    fn request_finished(&self) {
        self.in_flight.set(self.in_flight.get().saturating_sub(1));
        self.publish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_tracker_counts_and_notifies() {
        let tracker = RequestTracker::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        tracker.on_change(move |n| sink.borrow_mut().push(n));

        tracker.request_started();
        tracker.request_started();
        tracker.request_finished();
        tracker.request_finished();
        tracker.request_finished();

        assert_eq!(*seen.borrow(), vec![1, 2, 1, 0, 0]);
        assert_eq!(tracker.total_started(), 2);
        assert_eq!(tracker.in_flight(), 0);
    }
}
