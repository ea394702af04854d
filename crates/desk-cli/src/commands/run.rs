use anyhow::{Context, Result};
use desk_config::Config;
use desk_core::{DeskRecord, HelpDesk, ManualClock, Tag, Ticket, TicketId};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use time::Duration;
use tracing::debug;

use super::build_desk;
use crate::script::{Query, Script, Step};

/// Result of one `query` step
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub step: usize,
    pub label: String,
    pub ticket_ids: Vec<TicketId>,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub queries: Vec<QueryResult>,
    pub desk: DeskRecord,
}

pub fn handle(config: &Config, script_path: &Path, json: bool) -> Result<()> {
    let script = Script::load(script_path)?;
    let report = execute(config, &script, !json)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_tickets(&report.desk);
    }

    Ok(())
}

/// Replay `script` on a fresh desk. The first failing step aborts the run.
pub fn execute(config: &Config, script: &Script, verbose: bool) -> Result<RunReport> {
    let clock = Arc::new(ManualClock::default());
    if let Some(start) = &script.start {
        clock.set_time_str(start)?;
    }
    let mut desk = build_desk(config, clock.clone())?;
    let mut queries = Vec::new();

    for (index, step) in script.steps.iter().enumerate() {
        let number = index + 1;
        debug!(step = number, action = step.action(), "applying step");
        let line = apply(&mut desk, &clock, step)
            .with_context(|| format!("step {} ({}) failed", number, step.action()))?;

        if let Step::Query { query, label } = step {
            let ticket_ids = run_query(&desk, query)
                .with_context(|| format!("step {} (query) failed", number))?;
            let label = label.clone().unwrap_or_else(|| query.describe());
            if verbose {
                println!("? {}: {:?}", label, ticket_ids);
            }
            queries.push(QueryResult {
                step: number,
                label,
                ticket_ids,
            });
        } else if verbose && let Some(line) = line {
            println!("✓ {}", line);
        }
    }

    Ok(RunReport {
        queries,
        desk: DeskRecord::from(&desk),
    })
}

/// Apply one mutating step. Returns a line describing what happened.
fn apply(desk: &mut HelpDesk, clock: &ManualClock, step: &Step) -> Result<Option<String>> {
    let line = match step {
        Step::Create {
            originator,
            description,
            priority,
        } => {
            let ticket = desk.create_ticket(originator, description, *priority)?;
            let assignee = ticket.technician().map(|t| t.id()).unwrap_or("nobody");
            format!("Created ticket {} (assigned to {})", ticket.id(), assignee)
        }
        Step::Assign { ticket, technician } => {
            desk.reassign(*ticket, technician)?;
            format!("Assigned ticket {} to {}", ticket, technician)
        }
        Step::Suspend { ticket, reason } => {
            ticket_mut(desk, *ticket)?.suspend(reason)?;
            format!("Suspended ticket {}", ticket)
        }
        Step::Resume { ticket, reason } => {
            ticket_mut(desk, *ticket)?.resume(reason)?;
            format!("Resumed ticket {}", ticket)
        }
        Step::Resolve { ticket, reason } => {
            let target = ticket_mut(desk, *ticket)?;
            target.resolve(reason)?;
            format!(
                "Resolved ticket {} in {} minute(s)",
                ticket,
                target.minutes_to_resolve()?
            )
        }
        Step::Note { ticket, text } => {
            ticket_mut(desk, *ticket)?.add_note(text)?;
            format!("Noted ticket {}", ticket)
        }
        Step::Tag { ticket, tags } => {
            let labels: Vec<&str> = tags.iter().map(String::as_str).collect();
            let added = desk.add_tags(*ticket, &labels)?;
            format!("Tagged ticket {} ({} new)", ticket, added)
        }
        Step::Advance { minutes } => {
            if *minutes < 0 {
                anyhow::bail!("the clock only moves forward");
            }
            let by = minutes
                .checked_mul(60)
                .map(Duration::seconds)
                .with_context(|| format!("{} minutes is out of range", minutes))?;
            clock.advance(by)?;
            format!("Clock advanced {} minute(s)", minutes)
        }
        Step::Query { .. } => return Ok(None),
    };
    Ok(Some(line))
}

fn ticket_mut(desk: &mut HelpDesk, id: TicketId) -> Result<&mut Ticket> {
    desk.ticket_mut(id)
        .with_context(|| format!("no ticket with ID {}", id))
}

fn run_query(desk: &HelpDesk, query: &Query) -> Result<Vec<TicketId>> {
    let ids: Vec<TicketId> = match query {
        Query::Status(status) => desk.tickets_by_status(*status).map(Ticket::id).collect(),
        Query::NotStatus(status) => desk.tickets_by_not_status(*status).map(Ticket::id).collect(),
        Query::AnyTag(labels) => {
            let tags = labels
                .iter()
                .map(|label| Tag::new(label.as_str()))
                .collect::<desk_core::Result<Vec<_>>>()?;
            desk.tickets_with_any_tag(&tags).map(Ticket::id).collect()
        }
        Query::Technician(id) => desk.tickets_by_technician(id).map(Ticket::id).collect(),
        Query::Text(text) => desk.tickets_by_text(text).map(Ticket::id).collect(),
    };
    Ok(ids)
}

fn print_tickets(record: &DeskRecord) {
    if record.tickets.is_empty() {
        println!("\nNo tickets.");
        return;
    }

    let mut tickets: Vec<_> = record.tickets.iter().collect();
    tickets.sort();

    println!("\nTickets ({}):", tickets.len());
    for ticket in tickets {
        println!(
            "  [{}] {} priority, {} - {}",
            ticket.id, ticket.priority, ticket.status, ticket.description
        );
        if let Some(tech) = &ticket.technician_id {
            println!("    Technician: {}", tech);
        }
        if !ticket.tags.is_empty() {
            let tags: Vec<_> = ticket.tags.iter().map(Tag::label).collect();
            println!("    Tags: {}", tags.join(", "));
        }
        println!("    Events: {}", ticket.history.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desk_config::TechnicianConfig;
    use desk_core::Status;

    fn config() -> Config {
        Config {
            roster: ["TECH1", "TECH2", "TECH3"]
                .iter()
                .enumerate()
                .map(|(i, id)| TechnicianConfig {
                    id: id.to_string(),
                    name: id.to_string(),
                    extension: 12345 + i as u32,
                })
                .collect(),
            ..Default::default()
        }
    }

    const SESSION: &str = r#"
start = "1/3/22 13:37"

[[step]]
action = "create"
originator = "Andre"
description = "VPN drops every hour"
priority = "LOW"

[[step]]
action = "create"
originator = "Bea"
description = "Laptop will not boot"
priority = "URGENT"

[[step]]
action = "tag"
ticket = 1
tags = ["VPN"]

[[step]]
action = "advance"
minutes = 10

[[step]]
action = "suspend"
ticket = 1
reason = "waiting on vendor"

[[step]]
action = "resolve"
ticket = 2
reason = "Replaced the disk"

[[step]]
action = "create"
originator = "Cy"
description = "Printer jammed"
priority = "MEDIUM"

[[step]]
action = "query"
label = "open"
query = { not_status = "RESOLVED" }

[[step]]
action = "query"
query = { technician = "TECH2" }
"#;

    #[test]
    fn test_execute_session() {
        let script = Script::parse(SESSION).unwrap();
        let report = execute(&config(), &script, false).unwrap();

        assert_eq!(report.queries.len(), 2);
        assert_eq!(report.queries[0].label, "open");
        assert_eq!(report.queries[0].step, 8);
        assert_eq!(report.queries[0].ticket_ids, vec![3, 1]);
        assert_eq!(report.queries[1].label, "technician = TECH2");
        assert_eq!(report.queries[1].ticket_ids, vec![2]);

        let tickets = &report.desk.tickets;
        assert_eq!(tickets[0].status, Status::Waiting);
        assert_eq!(tickets[1].status, Status::Resolved);
        assert_eq!(tickets[2].technician_id.as_deref(), Some("TECH3"));
        assert_eq!(report.desk.technicians[1].active_tickets, Vec::<TicketId>::new());
    }

    #[test]
    fn test_failing_step_names_the_step() {
        let script = Script::parse(
            r#"
[[step]]
action = "create"
originator = "Andre"
description = "VPN"
priority = "LOW"

[[step]]
action = "resume"
ticket = 1
reason = "not waiting"
"#,
        )
        .unwrap();

        let err = execute(&config(), &script, false).unwrap_err();
        assert!(err.to_string().contains("step 2 (resume)"));
    }

    #[test]
    fn test_empty_roster_cannot_create() {
        let script = Script::parse(
            "[[step]]\naction = \"create\"\noriginator = \"a\"\ndescription = \"b\"\npriority = \"LOW\"\n",
        )
        .unwrap();
        let err = execute(&Config::default(), &script, false).unwrap_err();
        assert!(err.to_string().contains("step 1 (create)"));
    }

    #[test]
    fn test_unknown_ticket() {
        let script = Script::parse("[[step]]\naction = \"note\"\nticket = 9\ntext = \"hi\"\n").unwrap();
        let err = execute(&config(), &script, false).unwrap_err();
        assert!(format!("{:#}", err).contains("no ticket with ID 9"));
    }

    #[test]
    fn test_advance_out_of_range_fails_the_step() {
        let script = Script::parse(&format!(
            "[[step]]\naction = \"advance\"\nminutes = {}\n",
            i64::MAX
        ))
        .unwrap();
        let err = execute(&config(), &script, false).unwrap_err();
        assert!(err.to_string().contains("step 1 (advance)"));

        // in range for i64 seconds, but past the last representable date
        let script =
            Script::parse("[[step]]\naction = \"advance\"\nminutes = 100000000000000\n").unwrap();
        let err = execute(&config(), &script, false).unwrap_err();
        assert!(format!("{:#}", err).contains("Can't advance the clock"));
    }

    #[test]
    fn test_demo_session() {
        let config: Config = toml::from_str(include_str!("../../../../demos/config.toml")).unwrap();
        let script = Script::parse(include_str!("../../../../demos/session.toml")).unwrap();
        let report = execute(&config, &script, false).unwrap();

        let results: Vec<_> = report.queries.iter().map(|q| q.ticket_ids.clone()).collect();
        assert_eq!(results, vec![vec![1, 3], vec![1], vec![2]]);
        assert_eq!(report.desk.tickets[2].technician_id.as_deref(), Some("TECH1"));
        assert_eq!(report.desk.technicians[0].active_tickets, vec![1, 3]);
    }

    #[test]
    fn test_report_serializes() {
        let script = Script::parse(SESSION).unwrap();
        let report = execute(&config(), &script, false).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["queries"][0]["ticket_ids"][0], 3);
        assert_eq!(json["desk"]["tickets"][0]["history"][2]["new_status"], "WAITING");
    }
}
