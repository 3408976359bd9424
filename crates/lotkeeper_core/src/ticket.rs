//! Source of ticket identifiers used by the tracker.

use crate::types::TicketId;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Issues candidate ticket identifiers.
///
/// The tracker rejects candidates that match an active ticket and asks
/// again, so implementations need not guarantee uniqueness.
pub trait TicketSource: Send + Sync {
    /// Returns the next candidate ticket.
    fn next_ticket(&self) -> TicketId;
}

/// Random tickets derived from v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTickets;

impl TicketSource for RandomTickets {
    fn next_ticket(&self) -> TicketId {
        TicketId::generate()
    }
}

/// Replays a fixed list of tickets, then falls back to random ones.
///
/// # Example
///
/// ```rust
/// use lotkeeper_core::{RandomTickets, ScriptedTickets, TicketId, TicketSource};
///
/// let first = RandomTickets.next_ticket();
/// let source = ScriptedTickets::new([first.clone()]);
/// assert_eq!(source.next_ticket(), first);
/// assert_eq!(source.remaining(), 0);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedTickets {
    queue: Mutex<VecDeque<TicketId>>,
}

impl ScriptedTickets {
    /// Creates a source that hands out `tickets` in order.
    pub fn new(tickets: impl IntoIterator<Item = TicketId>) -> Self {
        Self {
            queue: Mutex::new(tickets.into_iter().collect()),
        }
    }

    /// Returns how many scripted tickets are left.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.lock().len()
    }
}

impl TicketSource for ScriptedTickets {
    fn next_ticket(&self) -> TicketId {
        self.queue
            .lock()
            .pop_front()
            .unwrap_or_else(TicketId::generate)
    }
}
