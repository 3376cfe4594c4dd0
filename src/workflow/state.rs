use std::fmt;

use serde::{Deserialize, Serialize};

use super::transition::{Guard, TransitionRule};
use crate::error::{WorkflowError, WorkflowResult};

/// The workflows known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    Tickets,
    Votes,
}

impl WorkflowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowKind::Tickets => "tickets",
            WorkflowKind::Votes => "votes",
        }
    }

    /// Singular noun used when naming an entity of this kind.
    pub fn entity_noun(&self) -> &'static str {
        match self {
            WorkflowKind::Tickets => "ticket",
            WorkflowKind::Votes => "vote",
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorkflowKind {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tickets" | "ticket" => Ok(WorkflowKind::Tickets),
            "votes" | "vote" => Ok(WorkflowKind::Votes),
            _ => Err(WorkflowError::UnknownWorkflow(s.to_string())),
        }
    }
}

/// One named position in a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    /// Short sortable identifier ("10", "15", ...).
    pub code: String,
    /// Symbolic identifier ("new", "talk", ...).
    pub name: String,
    pub display_text: String,
    /// Single glyph shown on workflow buttons.
    pub button_glyph: String,
    /// Whether the owning entity counts as in progress while in this state.
    pub active: bool,
    /// What a vote is called while in this state ("Offer", "Task", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_name: Option<String>,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A named subset of a workflow's states, used for filtering only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateGroup {
    pub name: String,
    pub states: Vec<String>,
}

/// Collects states, transition rules and groups while a workflow is declared.
///
/// Nothing can be registered on the [`Workflow`] returned by [`build`](Self::build),
/// so a workflow is frozen once startup is over.
#[derive(Debug)]
pub struct WorkflowBuilder {
    name: String,
    states: Vec<State>,
    rules: Vec<TransitionRule>,
    groups: Vec<StateGroup>,
}

impl WorkflowBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
            rules: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Add a state. Both `code` and `name` must be new to this workflow.
    pub fn register(
        &mut self,
        code: &str,
        display_text: &str,
        name: &str,
        button_glyph: &str,
        active: bool,
    ) -> WorkflowResult<State> {
        if self.states.iter().any(|s| s.code == code || s.name == name) {
            return Err(WorkflowError::DuplicateCodeOrName {
                workflow: self.name.clone(),
                code: code.to_string(),
                name: name.to_string(),
            });
        }
        let state = State {
            code: code.to_string(),
            name: name.to_string(),
            display_text: display_text.to_string(),
            button_glyph: button_glyph.to_string(),
            active,
            vote_name: None,
        };
        self.states.push(state.clone());
        Ok(state)
    }

    pub fn get(&self, name_or_code: &str) -> WorkflowResult<&State> {
        find_state(&self.name, &self.states, name_or_code)
    }

    /// Set the label an entity goes by while in the given state.
    pub fn set_vote_name(&mut self, name_or_code: &str, vote_name: &str) -> WorkflowResult<()> {
        let name = self.get(name_or_code)?.name.clone();
        if let Some(state) = self.states.iter_mut().find(|s| s.name == name) {
            state.vote_name = Some(vote_name.to_string());
        }
        Ok(())
    }

    /// Declare that `target` can be reached from any of `required_states`,
    /// a whitespace-separated list of state names. An empty list means "from
    /// any state".
    pub fn add_transition(&mut self, target: &str, required_states: &str) -> WorkflowResult<()> {
        self.push_rule(target, required_states, None)
    }

    /// Like [`add_transition`](Self::add_transition), with a guard that must
    /// also allow the change.
    pub fn add_guarded_transition(
        &mut self,
        target: &str,
        required_states: &str,
        guard: Guard,
    ) -> WorkflowResult<()> {
        self.push_rule(target, required_states, Some(guard))
    }

    /// Declare a state group from a whitespace-separated list of state names.
    pub fn add_group(&mut self, name: &str, states: &str) -> WorkflowResult<()> {
        if self.groups.iter().any(|g| g.name == name) {
            return Err(WorkflowError::DuplicateGroup {
                workflow: self.name.clone(),
                group: name.to_string(),
            });
        }
        let states = self.resolve_names(states)?;
        self.groups.push(StateGroup {
            name: name.to_string(),
            states,
        });
        Ok(())
    }

    /// Freeze the declarations. States end up ordered by code.
    pub fn build(self) -> Workflow {
        let mut states = self.states;
        states.sort_by(|a, b| a.code.cmp(&b.code));
        Workflow {
            name: self.name,
            states,
            rules: self.rules,
            groups: self.groups,
        }
    }

    fn push_rule(
        &mut self,
        target: &str,
        required_states: &str,
        guard: Option<Guard>,
    ) -> WorkflowResult<()> {
        let target = self.get(target)?.name.clone();
        let required_states = self.resolve_names(required_states)?;
        self.rules.push(TransitionRule {
            target,
            required_states,
            guard,
        });
        Ok(())
    }

    // Resolves a space-separated list to canonical state names, dropping repeats.
    fn resolve_names(&self, list: &str) -> WorkflowResult<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        for key in list.split_whitespace() {
            let name = &self.get(key)?.name;
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        Ok(names)
    }
}

/// A frozen workflow: ordered states, transition rules and state groups.
#[derive(Debug)]
pub struct Workflow {
    name: String,
    states: Vec<State>,
    rules: Vec<TransitionRule>,
    groups: Vec<StateGroup>,
}

impl Workflow {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look a state up by name, falling back to its code.
    pub fn get(&self, name_or_code: &str) -> WorkflowResult<&State> {
        find_state(&self.name, &self.states, name_or_code)
    }

    /// All states, ordered by code.
    pub fn all(&self) -> &[State] {
        &self.states
    }

    pub fn active_states(&self) -> Vec<&State> {
        self.states.iter().filter(|s| s.active).collect()
    }

    pub fn rules(&self) -> &[TransitionRule] {
        &self.rules
    }

    /// The rules whose target is `target`, in declaration order.
    pub fn rules_into<'a>(&'a self, target: &'a State) -> impl Iterator<Item = &'a TransitionRule> {
        self.rules.iter().filter(move |r| r.target == target.name)
    }

    /// Union of the source states of every rule into `target`, ordered by code.
    /// Empty when no rule targets the state or a rule accepts any source.
    pub fn required_states(&self, target: &State) -> Vec<&State> {
        let rules: Vec<&TransitionRule> = self.rules_into(target).collect();
        if rules.iter().any(|r| r.required_states.is_empty()) {
            return Vec::new();
        }
        self.states
            .iter()
            .filter(|s| rules.iter().any(|r| r.accepts_source(s)))
            .collect()
    }

    pub fn groups(&self) -> &[StateGroup] {
        &self.groups
    }

    /// The states of a named group, ordered by code.
    pub fn group(&self, name: &str) -> WorkflowResult<Vec<&State>> {
        let group = self
            .groups
            .iter()
            .find(|g| g.name == name)
            .ok_or_else(|| WorkflowError::UnknownGroup {
                workflow: self.name.clone(),
                group: name.to_string(),
            })?;
        Ok(self
            .states
            .iter()
            .filter(|s| group.states.contains(&s.name))
            .collect())
    }
}

fn find_state<'a>(workflow: &str, states: &'a [State], key: &str) -> WorkflowResult<&'a State> {
    states
        .iter()
        .find(|s| s.name == key)
        .or_else(|| states.iter().find(|s| s.code == key))
        .ok_or_else(|| WorkflowError::UnknownState {
            workflow: workflow.to_string(),
            name: key.to_string(),
        })
}
