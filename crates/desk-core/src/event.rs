//! Ticket history entries

use serde::Serialize;
use time::OffsetDateTime;

use crate::ticket::{Status, TicketId};

/// Immutable record of one change to a ticket
///
/// Carries the owning ticket's id rather than the ticket itself, so reporters
/// can hold events without keeping tickets alive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    ticket_id: TicketId,
    #[serde(with = "time::serde::timestamp")]
    timestamp: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_status: Option<Status>,
    note: String,
}

impl Event {
    pub(crate) fn status_change(
        ticket_id: TicketId,
        timestamp: OffsetDateTime,
        new_status: Status,
        note: impl Into<String>,
    ) -> Self {
        Self {
            ticket_id,
            timestamp,
            new_status: Some(new_status),
            note: note.into(),
        }
    }

    pub(crate) fn note(ticket_id: TicketId, timestamp: OffsetDateTime, note: impl Into<String>) -> Self {
        Self {
            ticket_id,
            timestamp,
            new_status: None,
            note: note.into(),
        }
    }

    pub fn ticket_id(&self) -> TicketId {
        self.ticket_id
    }

    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    /// `None` for a plain note
    pub fn new_status(&self) -> Option<Status> {
        self.new_status
    }

    pub fn note_text(&self) -> &str {
        &self.note
    }
}
