use anyhow::{Context, Result};
use desk_core::{Priority, Status, TicketId};
use serde::Deserialize;
use std::path::Path;

/// A scripted help desk session (TOML)
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Starting clock time, `M/d/yy HH:mm`
    #[serde(default)]
    pub start: Option<String>,

    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Create {
        originator: String,
        description: String,
        priority: Priority,
    },
    Assign {
        ticket: TicketId,
        technician: String,
    },
    Suspend {
        ticket: TicketId,
        reason: String,
    },
    Resume {
        ticket: TicketId,
        reason: String,
    },
    Resolve {
        ticket: TicketId,
        reason: String,
    },
    Note {
        ticket: TicketId,
        text: String,
    },
    Tag {
        ticket: TicketId,
        tags: Vec<String>,
    },
    /// Move the clock forward
    Advance { minutes: i64 },
    Query {
        query: Query,
        #[serde(default)]
        label: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    Status(Status),
    NotStatus(Status),
    AnyTag(Vec<String>),
    Technician(String),
    Text(String),
}

impl Step {
    pub fn action(&self) -> &'static str {
        match self {
            Step::Create { .. } => "create",
            Step::Assign { .. } => "assign",
            Step::Suspend { .. } => "suspend",
            Step::Resume { .. } => "resume",
            Step::Resolve { .. } => "resolve",
            Step::Note { .. } => "note",
            Step::Tag { .. } => "tag",
            Step::Advance { .. } => "advance",
            Step::Query { .. } => "query",
        }
    }
}

impl Query {
    /// Short human description, used when a step has no label
    pub fn describe(&self) -> String {
        match self {
            Query::Status(status) => format!("status = {}", status),
            Query::NotStatus(status) => format!("status != {}", status),
            Query::AnyTag(tags) => format!("any tag of [{}]", tags.join(", ")),
            Query::Technician(id) => format!("technician = {}", id),
            Query::Text(text) => format!("text contains {:?}", text),
        }
    }
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing script {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script = Script::parse(
            r#"
start = "1/3/22 13:37"

[[step]]
action = "create"
originator = "Andre"
description = "VPN drops every hour"
priority = "HIGH"

[[step]]
action = "advance"
minutes = 5

[[step]]
action = "tag"
ticket = 1
tags = ["VPN", "Network"]

[[step]]
action = "query"
label = "waiting"
query = { status = "WAITING" }

[[step]]
action = "query"
query = { any_tag = ["VPN"] }
"#,
        )
        .unwrap();

        assert_eq!(script.start.as_deref(), Some("1/3/22 13:37"));
        assert_eq!(script.steps.len(), 5);
        assert!(matches!(
            script.steps[0],
            Step::Create {
                priority: Priority::High,
                ..
            }
        ));
        assert!(matches!(script.steps[1], Step::Advance { minutes: 5 }));
        assert!(matches!(&script.steps[2], Step::Tag { ticket: 1, tags } if tags.len() == 2));
        assert!(matches!(
            &script.steps[3],
            Step::Query { query: Query::Status(Status::Waiting), label: Some(_) }
        ));
        assert!(matches!(
            &script.steps[4],
            Step::Query { query: Query::AnyTag(_), label: None }
        ));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let err = Script::parse("[[step]]\naction = \"escalate\"\nticket = 1\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_empty_script() {
        let script = Script::parse("").unwrap();
        assert!(script.start.is_none());
        assert!(script.steps.is_empty());
    }

    #[test]
    fn test_describe_query() {
        assert_eq!(
            Query::NotStatus(Status::Resolved).describe(),
            "status != RESOLVED"
        );
        assert_eq!(
            Query::AnyTag(vec!["VPN".into(), "Java".into()]).describe(),
            "any tag of [VPN, Java]"
        );
    }
}
