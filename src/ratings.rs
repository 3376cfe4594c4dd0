use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

/// How the reporter rates a ticket, or a piece of work on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    VeryGood,
    Good,
    Satisfying,
    Deficient,
    Insufficient,
    Unratable,
}

impl Rating {
    pub const ALL: &'static [Rating] = &[
        Rating::VeryGood,
        Rating::Good,
        Rating::Satisfying,
        Rating::Deficient,
        Rating::Insufficient,
        Rating::Unratable,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            Rating::VeryGood => "10",
            Rating::Good => "20",
            Rating::Satisfying => "30",
            Rating::Deficient => "40",
            Rating::Insufficient => "50",
            Rating::Unratable => "90",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rating::VeryGood => "very_good",
            Rating::Good => "good",
            Rating::Satisfying => "satisfying",
            Rating::Deficient => "deficient",
            Rating::Insufficient => "insufficient",
            Rating::Unratable => "unratable",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Rating::VeryGood => "Very good",
            Rating::Good => "Good",
            Rating::Satisfying => "Satisfying",
            Rating::Deficient => "Deficient",
            Rating::Insufficient => "Insufficient",
            Rating::Unratable => "Unratable",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl std::str::FromStr for Rating {
    type Err = WorkflowError;

    /// Accepts either the value ("20") or the name ("good").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rating::ALL
            .iter()
            .copied()
            .find(|r| r.value() == s || r.name() == s)
            .ok_or_else(|| WorkflowError::UnknownRating(s.to_string()))
    }
}
