//! Optimistic Toggle
//!
//! Two-state value flipped immediately on click and reconciled with the
//! server response. Requests are not serialized; the last response to
//! resolve wins. Once nothing is outstanding, the displayed value equals the
//! last value the server confirmed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimisticToggle {
    confirmed: bool,
    displayed: bool,
    outstanding: u32,
}

/// One issued update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingToggle {
    /// Value sent to the server
    pub value: bool,
}

impl OptimisticToggle {
    pub fn new(value: bool) -> Self {
        Self {
            confirmed: value,
            displayed: value,
            outstanding: 0,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.outstanding > 0
    }

    pub fn displayed(&self) -> bool {
        self.displayed
    }

    pub fn confirmed(&self) -> bool {
        self.confirmed
    }

    /// Flip the displayed value and describe the request to send
    pub fn begin(&mut self) -> PendingToggle {
        self.outstanding += 1;
        self.displayed = !self.displayed;
        PendingToggle {
            value: self.displayed,
        }
    }

    /// Apply the outcome of `pending`.
    ///
    /// Success makes its value the confirmed one. While other requests are
    /// outstanding the display keeps the newest optimistic value; when the
    /// last one settles it snaps to the confirmed value.
    pub fn settle(&mut self, pending: PendingToggle, ok: bool) {
        self.outstanding = self.outstanding.saturating_sub(1);
        if ok {
            self.confirmed = pending.value;
        }
        if self.outstanding == 0 {
            self.displayed = self.confirmed;
        }
    }

    /// Server state changed underneath (list refetch); ignored mid-flight
    pub fn reset(&mut self, value: bool) {
        if self.outstanding == 0 {
            self.confirmed = value;
            self.displayed = value;
        }
    }
}
