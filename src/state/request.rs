/// Single-slot supervisor for list fetches.
///
/// Every fetch is issued a ticket. Issuing a new ticket supersedes the
/// previous one, so when responses arrive out of order only the answer
/// to the newest request is applied.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct RequestSlot {
    issued: u64,
    pending: Option<Ticket>,
}

impl RequestSlot {
    /// Issue a ticket for a new request, superseding any pending one
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.pending = Some(ticket);
        ticket
    }

    /// Accept a response. Returns false (and leaves the slot untouched)
    /// when the ticket has been superseded.
    pub fn settle(&mut self, ticket: Ticket) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
