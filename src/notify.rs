//! Notifications
//!
//! Transient, dismissable toasts. Views and the query layer report through
//! the [`Notifier`] trait; the app renders the queue kept in the store.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn css_class(self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
            ToastKind::Info => "toast toast-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    /// Bumped each time the same toast is pushed again
    shown: u32,
}

/// Handle for one showing of a toast; expiring a stale ticket is a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTicket {
    pub id: u64,
    shown: u32,
}

pub trait Notifier {
    fn notify(&self, kind: ToastKind, message: String);

    fn success(&self, message: &str) {
        self.notify(ToastKind::Success, message.to_string());
    }

    fn error(&self, message: &str) {
        self.notify(ToastKind::Error, message.to_string());
    }

    fn info(&self, message: &str) {
        self.notify(ToastKind::Info, message.to_string());
    }
}

/// Bounded list of visible toasts, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
    max_visible: usize,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(5)
    }
}

impl ToastQueue {
    pub fn new(max_visible: usize) -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 1,
            max_visible: max_visible.max(1),
        }
    }

    /// Add a toast, evicting the oldest when full.
    ///
    /// An identical toast already on screen is not stacked; it is renewed,
    /// and tickets from earlier pushes of it stop expiring it.
    pub fn push(&mut self, kind: ToastKind, message: String) -> ToastTicket {
        if let Some(existing) = self
            .toasts
            .iter_mut()
            .find(|t| t.kind == kind && t.message == message)
        {
            existing.shown += 1;
            return ToastTicket {
                id: existing.id,
                shown: existing.shown,
            };
        }
        let id = self.next_id;
        self.next_id += 1;
        if self.toasts.len() == self.max_visible {
            self.toasts.remove(0);
        }
        self.toasts.push(Toast {
            id,
            kind,
            message,
            shown: 0,
        });
        ToastTicket { id, shown: 0 }
    }

    /// Timed dismissal: only removes the toast if `ticket` is its latest showing
    pub fn expire(&mut self, ticket: ToastTicket) -> bool {
        let current = self
            .toasts
            .iter()
            .any(|t| t.id == ticket.id && t.shown == ticket.shown);
        current && self.dismiss(ticket.id)
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        before != self.toasts.len()
    }

    pub fn items(&self) -> &[Toast] {
        &self.toasts
    }
}
