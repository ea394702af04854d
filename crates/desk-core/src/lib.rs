//! Core domain models and logic for desk
//!
//! This crate contains:
//! - Domain models (Ticket, Technician, Event, Tag)
//! - The ticket state machine and its technician hand-off
//! - The help desk registry with round-robin assignment and queries
//!
//! The engine is in-memory only and performs no I/O.

pub mod clock;
pub mod error;
pub mod event;
pub mod help_desk;
pub mod record;
pub mod tag;
pub mod technician;
pub mod ticket;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, ErrorKind, Result};
pub use event::Event;
pub use help_desk::HelpDesk;
pub use record::{DeskRecord, TechnicianRecord, TicketRecord};
pub use tag::Tag;
pub use technician::Technician;
pub use ticket::{Priority, Status, Ticket, TicketId};
