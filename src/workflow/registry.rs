use super::state::{State, Workflow, WorkflowKind};
use crate::error::WorkflowResult;
use crate::links::LinkType;
use crate::tickets::ticket_workflow;
use crate::votes::vote_workflow;

/// Every workflow of a site, built once at startup and read-only afterwards.
///
/// Share it as `Arc<WorkflowRegistry>`; it is `Send + Sync` and needs no
/// locking.
#[derive(Debug)]
pub struct WorkflowRegistry {
    tickets: Workflow,
    votes: Workflow,
}

impl WorkflowRegistry {
    /// Build the ticket and vote workflows. A declaration error here is a
    /// programming error and should abort startup.
    pub fn standard() -> WorkflowResult<Self> {
        let tickets = ticket_workflow()?;
        let votes = vote_workflow()?;
        tracing::debug!(
            tickets = tickets.all().len(),
            votes = votes.all().len(),
            "Workflow registry built"
        );
        Ok(Self { tickets, votes })
    }

    pub fn workflow(&self, kind: WorkflowKind) -> &Workflow {
        match kind {
            WorkflowKind::Tickets => &self.tickets,
            WorkflowKind::Votes => &self.votes,
        }
    }

    /// States of a workflow, ordered by code.
    pub fn list_states(&self, kind: WorkflowKind) -> &[State] {
        self.workflow(kind).all()
    }

    pub fn state_group(&self, kind: WorkflowKind, group: &str) -> WorkflowResult<Vec<&State>> {
        self.workflow(kind).group(group)
    }

    pub fn link_types(&self) -> &'static [LinkType] {
        LinkType::all()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn list_states_ordered_and_unique() {
        let registry = WorkflowRegistry::standard().unwrap();
        for kind in [WorkflowKind::Tickets, WorkflowKind::Votes] {
            let states = registry.list_states(kind);
            assert!(states.windows(2).all(|w| w[0].code < w[1].code), "{kind}");
            let names: HashSet<&str> = states.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names.len(), states.len(), "{kind}");
        }
    }

    #[test]
    fn state_group_lookup() {
        let registry = WorkflowRegistry::standard().unwrap();
        let work: Vec<&str> = registry
            .state_group(WorkflowKind::Tickets, "work_states")
            .unwrap()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(work, vec!["new", "todo"]);

        let err = registry
            .state_group(WorkflowKind::Votes, "work_states")
            .unwrap_err();
        assert_eq!(err.kind(), "UnknownGroup");
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        let registry = Arc::new(WorkflowRegistry::standard().unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.list_states(WorkflowKind::Tickets).len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 8);
        }
    }

    #[test]
    fn link_types_are_exposed() {
        let registry = WorkflowRegistry::standard().unwrap();
        assert_eq!(registry.link_types().len(), 4);
    }
}
