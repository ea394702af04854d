//! Technician domain model

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::RwLock;

use tracing::debug;

use crate::ticket::TicketId;

/// A roster member who works tickets
///
/// The active queue is only changed through the `assign_ticket` and
/// `resolve_ticket` hooks, which `Ticket` calls from its own transitions.
#[derive(Debug)]
pub struct Technician {
    id: String,
    name: String,
    extension: u32,
    active: RwLock<Vec<TicketId>>,
}

impl Technician {
    pub fn new(id: impl Into<String>, name: impl Into<String>, extension: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extension,
            active: RwLock::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> u32 {
        self.extension
    }

    /// Snapshot of the ids currently in this technician's queue, oldest first.
    ///
    /// The copy does not follow later changes; call again for the current queue.
    pub fn active_ticket_ids(&self) -> Vec<TicketId> {
        self.active.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn has_active(&self, ticket_id: TicketId) -> bool {
        self.active
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&ticket_id)
    }

    pub fn active_count(&self) -> usize {
        self.active.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub(crate) fn assign_ticket(&self, ticket_id: TicketId) {
        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        if !active.contains(&ticket_id) {
            active.push(ticket_id);
        }
        debug!(technician = %self.id, ticket_id, "ticket added to queue");
    }

    pub(crate) fn resolve_ticket(&self, ticket_id: TicketId) {
        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        active.retain(|id| *id != ticket_id);
        debug!(technician = %self.id, ticket_id, "ticket removed from queue");
    }
}

impl PartialEq for Technician {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Technician {}

impl Hash for Technician {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Technician {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Technician {}, {}", self.id, self.name)
    }
}
