//! Help desk registry: technician roster, ticket collection, auto-assignment
//! and queries
//!
//! Every mutation takes `&mut self`, so allocating a ticket id and advancing
//! the round-robin cursor happen as one step. A service that shares a desk
//! across threads wraps the whole `HelpDesk` in a single lock.
//!
//! Query methods return iterators that walk the live collection. Nothing is
//! cached, so calling a query again after a mutation sees the new state.
//! Results come back in natural ticket order (most urgent first, then lowest
//! id).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::require_text;
use crate::{
    Clock, Error, Priority, Result, Status, SystemClock, Tag, Technician, Ticket, TicketId,
};

pub struct HelpDesk {
    technicians: Vec<Arc<Technician>>,
    tickets: BTreeMap<TicketId, Ticket>,
    next_ticket_id: TicketId,
    cursor: usize,
    clock: Arc<dyn Clock>,
}

impl HelpDesk {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            technicians: Vec::new(),
            tickets: BTreeMap::new(),
            next_ticket_id: 1,
            cursor: 0,
            clock,
        }
    }

    /// Add a technician at the end of the round-robin rotation
    pub fn add_technician(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        extension: u32,
    ) -> Result<&Technician> {
        let id = id.into();
        let name = name.into();
        require_text(&id, "Technician ID")?;
        require_text(&name, "Technician name")?;
        if self.get_technician(&id).is_some() {
            return Err(Error::invalid_state(format!(
                "Technician {} is already on the roster",
                id
            )));
        }

        info!(technician = %id, extension, "technician added");
        let technician = Arc::new(Technician::new(id, name, extension));
        self.technicians.push(technician);
        Ok(self.technicians[self.technicians.len() - 1].as_ref())
    }

    /// Roster in insertion (rotation) order
    pub fn technicians(&self) -> impl Iterator<Item = &Technician> + '_ {
        self.technicians.iter().map(|tech| &**tech)
    }

    pub fn get_technician(&self, id: &str) -> Option<&Technician> {
        self.technicians().find(|tech| tech.id() == id)
    }

    /// Open a ticket and hand it to the next technician in rotation
    pub fn create_ticket(
        &mut self,
        originator: &str,
        description: &str,
        priority: Priority,
    ) -> Result<&mut Ticket> {
        if self.technicians.is_empty() {
            return Err(Error::invalid_state(
                "Can't create a ticket with no technicians on the roster.",
            ));
        }

        let id = self.next_ticket_id;
        let mut ticket = Ticket::new(id, originator, description, priority, self.clock.clone())?;

        let technician = self.technicians[self.cursor].clone();
        ticket.assign(technician)?;

        self.next_ticket_id += 1;
        self.cursor = (self.cursor + 1) % self.technicians.len();
        info!(
            ticket_id = id,
            %priority,
            technician = ?ticket.technician().map(Technician::id),
            "ticket created"
        );

        Ok(self.tickets.entry(id).or_insert(ticket))
    }

    /// `None` when no ticket has that id
    pub fn get_ticket_by_id(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.get(&id)
    }

    /// Mutable access for driving a ticket through its own transitions
    pub fn ticket_mut(&mut self, id: TicketId) -> Option<&mut Ticket> {
        self.tickets.get_mut(&id)
    }

    /// Every ticket, in id order
    pub fn tickets(&self) -> impl Iterator<Item = &Ticket> + '_ {
        self.tickets.values()
    }

    /// Move a ticket to a named technician through `Ticket::assign`
    pub fn reassign(&mut self, ticket_id: TicketId, technician_id: &str) -> Result<()> {
        let technician = self
            .technicians
            .iter()
            .find(|tech| tech.id() == technician_id)
            .cloned()
            .ok_or_else(|| Error::invalid_argument(format!("No technician {}", technician_id)))?;
        let ticket = self
            .tickets
            .get_mut(&ticket_id)
            .ok_or_else(|| Error::invalid_argument(format!("No ticket {}", ticket_id)))?;

        ticket.assign(technician)?;
        info!(ticket_id, technician = technician_id, "ticket reassigned");
        Ok(())
    }

    /// Tag a ticket by label. Returns how many tags were new.
    ///
    /// All labels are checked before any is applied.
    pub fn add_tags(&mut self, ticket_id: TicketId, labels: &[&str]) -> Result<usize> {
        let tags = labels
            .iter()
            .map(|label| Tag::new(*label))
            .collect::<Result<Vec<_>>>()?;
        let ticket = self
            .tickets
            .get_mut(&ticket_id)
            .ok_or_else(|| Error::invalid_argument(format!("No ticket {}", ticket_id)))?;

        let mut added = 0;
        for tag in tags {
            if ticket.add_tag(tag) {
                added += 1;
            }
        }
        debug!(ticket_id, added, "tags added");
        Ok(added)
    }

    /// Tickets in a technician's active queue, oldest assignment first
    pub fn active_tickets<'a>(
        &'a self,
        technician_id: &str,
    ) -> impl Iterator<Item = &'a Ticket> + 'a {
        let ids = self
            .get_technician(technician_id)
            .map(Technician::active_ticket_ids)
            .unwrap_or_default();
        ids.into_iter().filter_map(move |id| self.tickets.get(&id))
    }

    pub fn tickets_by_status(&self, status: Status) -> impl Iterator<Item = &Ticket> + '_ {
        self.natural_order()
            .filter(move |ticket| ticket.status() == status)
    }

    pub fn tickets_by_not_status(&self, status: Status) -> impl Iterator<Item = &Ticket> + '_ {
        self.natural_order()
            .filter(move |ticket| ticket.status() != status)
    }

    /// Tickets carrying at least one of `tags`, each listed once
    pub fn tickets_with_any_tag<'a>(
        &'a self,
        tags: &'a [Tag],
    ) -> impl Iterator<Item = &'a Ticket> + 'a {
        self.natural_order()
            .filter(move |ticket| tags.iter().any(|tag| ticket.has_tag(tag)))
    }

    /// Tickets whose current technician is `technician_id`, resolved ones included
    pub fn tickets_by_technician<'a>(
        &'a self,
        technician_id: &'a str,
    ) -> impl Iterator<Item = &'a Ticket> + 'a {
        self.natural_order().filter(move |ticket| {
            ticket
                .technician()
                .is_some_and(|tech| tech.id() == technician_id)
        })
    }

    pub fn tickets_by_text<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a Ticket> + 'a {
        self.natural_order()
            .filter(move |ticket| ticket.includes_text(text))
    }

    fn natural_order(&self) -> impl Iterator<Item = &Ticket> + '_ {
        Priority::DESCENDING.into_iter().flat_map(move |priority| {
            self.tickets
                .values()
                .filter(move |ticket| ticket.priority() == priority)
        })
    }
}

impl fmt::Debug for HelpDesk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelpDesk")
            .field(
                "technicians",
                &self.technicians().map(Technician::id).collect::<Vec<_>>(),
            )
            .field("tickets", &self.tickets.len())
            .field("next_ticket_id", &self.next_ticket_id)
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl Default for HelpDesk {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
