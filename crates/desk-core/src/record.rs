//! Read-only, serializable views of desk state
//!
//! These are what persistence and reporting collaborators consume. Building a
//! record never mutates the ticket or technician it was taken from.

use std::cmp::Ordering;

use serde::Serialize;

use crate::ticket::natural_key;
use crate::{Event, HelpDesk, Priority, Status, Tag, Technician, Ticket, TicketId};

#[derive(Debug, Clone, Serialize)]
pub struct TicketRecord {
    pub id: TicketId,
    pub priority: Priority,
    pub status: Status,
    pub originator: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_id: Option<String>,
    pub tags: Vec<Tag>,
    pub history: Vec<Event>,
}

impl From<&Ticket> for TicketRecord {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id(),
            priority: ticket.priority(),
            status: ticket.status(),
            originator: ticket.originator().to_string(),
            description: ticket.description().to_string(),
            technician_id: ticket.technician().map(|tech| tech.id().to_string()),
            tags: ticket.tags().cloned().collect(),
            history: ticket.history().cloned().collect(),
        }
    }
}

impl PartialEq for TicketRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TicketRecord {}

/// Same natural order as `Ticket`
impl Ord for TicketRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_key(self.priority, self.id).cmp(&natural_key(other.priority, other.id))
    }
}

impl PartialOrd for TicketRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TechnicianRecord {
    pub id: String,
    pub name: String,
    pub extension: u32,
    pub active_tickets: Vec<TicketId>,
}

impl From<&Technician> for TechnicianRecord {
    fn from(tech: &Technician) -> Self {
        Self {
            id: tech.id().to_string(),
            name: tech.name().to_string(),
            extension: tech.extension(),
            active_tickets: tech.active_ticket_ids(),
        }
    }
}

/// Whole-desk dump: roster in rotation order, tickets in id order
#[derive(Debug, Clone, Serialize)]
pub struct DeskRecord {
    pub technicians: Vec<TechnicianRecord>,
    pub tickets: Vec<TicketRecord>,
}

impl From<&HelpDesk> for DeskRecord {
    fn from(desk: &HelpDesk) -> Self {
        Self {
            technicians: desk.technicians().map(TechnicianRecord::from).collect(),
            tickets: desk.tickets().map(TicketRecord::from).collect(),
        }
    }
}
