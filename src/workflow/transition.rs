use std::fmt;

use super::guard::GuardContext;
use super::state::State;

/// A named permission predicate attached to a transition rule.
#[derive(Clone, Copy)]
pub struct Guard {
    pub name: &'static str,
    /// Human-readable condition, reported when the guard denies.
    pub description: &'static str,
    pub check: fn(&GuardContext<'_>) -> bool,
}

impl Guard {
    pub fn allows(&self, ctx: &GuardContext<'_>) -> bool {
        (self.check)(ctx)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").field("name", &self.name).finish()
    }
}

/// One `add_transition` declaration: `target` can be reached from any of
/// `required_states` (or from anywhere when that list is empty), provided the
/// guard, if any, allows it.
#[derive(Debug, Clone)]
pub struct TransitionRule {
    pub target: String,
    pub required_states: Vec<String>,
    pub guard: Option<Guard>,
}

impl TransitionRule {
    pub fn accepts_source(&self, current: &State) -> bool {
        self.required_states.is_empty() || self.required_states.contains(&current.name)
    }
}
