//! Kinds of dependency links between two tickets.
//!
//! A link has a parent and a child ticket. Each kind carries one label for
//! each end, so "#1 requires #2" reads "#2 required by #1" from the child.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// The parent ticket requires the child ticket.
    Requires,
    /// The parent ticket triggers the child ticket.
    Triggers,
    Suggests,
    Obsoletes,
}

impl LinkType {
    /// All link types, ordered by value.
    pub const ALL: &'static [LinkType] = &[
        LinkType::Requires,
        LinkType::Triggers,
        LinkType::Suggests,
        LinkType::Obsoletes,
    ];

    pub fn all() -> &'static [LinkType] {
        Self::ALL
    }

    pub fn value(&self) -> &'static str {
        match self {
            LinkType::Requires => "10",
            LinkType::Triggers => "20",
            LinkType::Suggests => "30",
            LinkType::Obsoletes => "40",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LinkType::Requires => "requires",
            LinkType::Triggers => "triggers",
            LinkType::Suggests => "suggests",
            LinkType::Obsoletes => "obsoletes",
        }
    }

    /// Label when rendered from the parent ticket.
    pub fn as_parent_text(&self) -> &'static str {
        match self {
            LinkType::Requires => "Requires",
            LinkType::Triggers => "Triggers",
            LinkType::Suggests => "Suggests",
            LinkType::Obsoletes => "Obsoletes",
        }
    }

    /// Label when rendered from the child ticket.
    pub fn as_child_text(&self) -> &'static str {
        match self {
            LinkType::Requires => "Required by",
            LinkType::Triggers => "Triggered by",
            LinkType::Suggests => "Suggested by",
            LinkType::Obsoletes => "Obsoleted by",
        }
    }

    pub fn text(&self) -> &'static str {
        self.as_parent_text()
    }

    pub fn symmetric(&self) -> bool {
        false
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl std::str::FromStr for LinkType {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LinkType::ALL
            .iter()
            .copied()
            .find(|t| t.value() == s || t.name() == s)
            .ok_or_else(|| WorkflowError::UnknownLinkType(s.to_string()))
    }
}
