//! Ticket state machine
//!
//! A ticket's status is never stored. It is read back from the history on
//! every call: the newest event that carries a status wins, and note-only
//! events are skipped. Every transition validates against that derived status
//! before touching anything, so a rejected call leaves history and the
//! technician queues untouched.
//!
//! ```text
//! CREATED -> ASSIGNED <-> WAITING
//!               |
//!               v
//!           RESOLVED (terminal)
//! ```

use std::cmp::{Ordering, Reverse};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::require_text;
use crate::{Clock, Error, Event, Result, Tag, Technician};

pub type TicketId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Created,
    Assigned,
    Waiting,
    Resolved,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Created => "CREATED",
            Status::Assigned => "ASSIGNED",
            Status::Waiting => "WAITING",
            Status::Resolved => "RESOLVED",
        })
    }
}

/// Declared lowest first, so the derived `Ord` ranks `Urgent` highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Most urgent first
    pub const DESCENDING: [Priority; 4] = [
        Priority::Urgent,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        })
    }
}

/// A tracked problem report
pub struct Ticket {
    id: TicketId,
    priority: Priority,
    originator: String,
    description: String,
    technician: Option<Arc<Technician>>,
    history: Vec<Event>,
    tags: BTreeSet<Tag>,
    clock: Arc<dyn Clock>,
}

impl Ticket {
    pub fn new(
        id: TicketId,
        originator: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let originator = originator.into();
        let description = description.into();
        require_text(&originator, "Originator")?;
        require_text(&description, "Description")?;

        let created = Event::status_change(id, clock.now(), Status::Created, "Created ticket.");
        Ok(Self {
            id,
            priority,
            originator,
            description,
            technician: None,
            history: vec![created],
            tags: BTreeSet::new(),
            clock,
        })
    }

    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn originator(&self) -> &str {
        &self.originator
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn technician(&self) -> Option<&Technician> {
        self.technician.as_deref()
    }

    pub fn history(&self) -> impl Iterator<Item = &Event> + '_ {
        self.history.iter()
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> + '_ {
        self.tags.iter()
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    pub fn status(&self) -> Status {
        self.history
            .iter()
            .rev()
            .find_map(Event::new_status)
            // the CREATED event is always first
            .unwrap_or(Status::Created)
    }

    /// Hand the ticket to `technician`, taking it off any previous queue first.
    ///
    /// Only the desk calls this, with a technician from its own roster. Callers
    /// outside the crate go through `HelpDesk::reassign`.
    pub(crate) fn assign(&mut self, technician: Arc<Technician>) -> Result<()> {
        match self.status() {
            Status::Created | Status::Assigned => {}
            Status::Resolved => {
                return Err(Error::invalid_state("Can't re-assign a resolved ticket."));
            }
            status => {
                return Err(Error::invalid_state(format!(
                    "Can't assign a ticket with status {}",
                    status
                )));
            }
        }

        if let Some(previous) = self.technician.take() {
            previous.resolve_ticket(self.id);
        }

        let note = format!("Assigned to {}.", technician);
        self.push_status(Status::Assigned, note);
        technician.assign_ticket(self.id);
        debug!(ticket_id = self.id, technician = %technician.id(), "ticket assigned");
        self.technician = Some(technician);
        Ok(())
    }

    pub fn suspend(&mut self, reason: &str) -> Result<()> {
        require_text(reason, "Reason")?;
        if self.status() != Status::Assigned {
            return Err(Error::invalid_state(
                "Can't suspend until the ticket is assigned.",
            ));
        }

        self.push_status(Status::Waiting, reason);
        debug!(ticket_id = self.id, "ticket suspended");
        Ok(())
    }

    pub fn resume(&mut self, reason: &str) -> Result<()> {
        require_text(reason, "Reason")?;
        if self.status() != Status::Waiting {
            return Err(Error::invalid_state(
                "Can't resume a ticket that isn't in the WAITING state.",
            ));
        }

        self.push_status(Status::Assigned, reason);
        debug!(ticket_id = self.id, "ticket resumed");
        Ok(())
    }

    pub fn resolve(&mut self, reason: &str) -> Result<()> {
        require_text(reason, "Reason")?;
        match self.status() {
            Status::Assigned => {}
            Status::Created => {
                return Err(Error::invalid_state(
                    "Can't resolve until the ticket is assigned.",
                ));
            }
            Status::Resolved => {
                return Err(Error::invalid_state("Can't resolve a resolved ticket."));
            }
            status => {
                return Err(Error::invalid_state(format!(
                    "Can't resolve a ticket with status {}",
                    status
                )));
            }
        }

        self.push_status(Status::Resolved, reason);
        if let Some(technician) = &self.technician {
            technician.resolve_ticket(self.id);
        }
        debug!(ticket_id = self.id, "ticket resolved");
        Ok(())
    }

    /// Annotate the history without changing status. Allowed in any state.
    pub fn add_note(&mut self, note: &str) -> Result<()> {
        require_text(note, "Note")?;
        self.history
            .push(Event::note(self.id, self.clock.now(), note));
        Ok(())
    }

    /// Returns `false` if the tag was already present
    pub fn add_tag(&mut self, tag: Tag) -> bool {
        self.tags.insert(tag)
    }

    /// Whole minutes between the first and the last history entry
    pub fn minutes_to_resolve(&self) -> Result<i64> {
        if self.status() != Status::Resolved {
            return Err(Error::invalid_state("The ticket is not yet resolved."));
        }

        match (self.history.first(), self.history.last()) {
            (Some(first), Some(last)) => Ok((last.timestamp() - first.timestamp()).whole_minutes()),
            _ => Err(Error::invalid_state("The ticket is not yet resolved.")),
        }
    }

    /// True if the description or any history note contains `text`
    pub fn includes_text(&self, text: &str) -> bool {
        self.description.contains(text)
            || self
                .history
                .iter()
                .any(|event| event.note_text().contains(text))
    }

    fn push_status(&mut self, status: Status, note: impl Into<String>) {
        self.history
            .push(Event::status_change(self.id, self.clock.now(), status, note));
    }
}

impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ticket")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("status", &self.status())
            .field("technician", &self.technician.as_ref().map(|t| t.id()))
            .field("history", &self.history.len())
            .field("tags", &self.tags)
            .finish()
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ticket {}: {} priority, {}",
            self.id,
            self.priority,
            self.status()
        )
    }
}

impl PartialEq for Ticket {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Ticket {}

impl Hash for Ticket {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Sort key for natural ticket order: priority descending, then id ascending
pub(crate) fn natural_key(priority: Priority, id: TicketId) -> (Reverse<Priority>, TicketId) {
    (Reverse(priority), id)
}

impl Ord for Ticket {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_key(self.priority, self.id).cmp(&natural_key(other.priority, other.id))
    }
}

impl PartialOrd for Ticket {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
