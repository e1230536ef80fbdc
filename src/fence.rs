//! Request Fencing
//!
//! In-flight requests are never aborted, so responses can resolve out of
//! order. Each logical operation (list fetch, order persist) owns a
//! `Fence`; a response is applied only while its ticket is still the
//! newest issued one.

use std::cell::Cell;
use std::rc::Rc;

/// Monotonic ticket issuer for one logical operation
#[derive(Clone, Default)]
pub struct Fence {
    latest: Rc<Cell<u64>>,
}

/// Proof of which request a response belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Fence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier ticket
    pub fn issue(&self) -> Ticket {
        let next = self.latest.get() + 1;
        self.latest.set(next);
        Ticket(next)
    }

    /// Whether a response holding `ticket` may still be applied
    pub fn admits(&self, ticket: Ticket) -> bool {
        self.latest.get() == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_admitted() {
        let fence = Fence::new();
        let t1 = fence.issue();
        assert!(fence.admits(t1));
    }

    #[test]
    fn test_stale_ticket_rejected() {
        let fence = Fence::new();
        let t1 = fence.issue();
        let t2 = fence.issue();
        assert!(!fence.admits(t1));
        assert!(fence.admits(t2));
    }

    #[test]
    fn test_clones_share_state() {
        let fence = Fence::new();
        let t1 = fence.issue();
        let other = fence.clone();
        let t2 = other.issue();
        assert!(!fence.admits(t1));
        assert!(fence.admits(t2));
    }
}
