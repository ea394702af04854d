//! Ticket labels

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::require_text;
use crate::{Error, Result};

/// A label attached to tickets. Compared and ordered by its text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag {
    label: String,
}

impl Tag {
    pub fn new(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        require_text(&label, "Tag")?;
        Ok(Self { label })
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl TryFrom<String> for Tag {
    type Error = Error;

    fn try_from(label: String) -> Result<Self> {
        Self::new(label)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.label
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
