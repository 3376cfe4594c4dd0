//! Transition guard evaluation.
//!
//! [`check_transition`] is a pure function of its arguments and the frozen
//! workflow. It does no I/O, holds no locks and never logs, so it can be
//! called from any number of threads at once.

use super::state::{State, Workflow};
use crate::error::{WorkflowError, WorkflowResult};
use crate::ratings::Rating;
use crate::roles::{PrincipalId, Role, RoleChecker};
use crate::store::EntityRef;

/// What a guard knows about the entity whose state is changing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub entity: EntityRef,
    pub state: State,
    pub rating: Option<Rating>,
    /// The ticket reporter. For a vote, the reporter of the voted ticket.
    pub reporter: PrincipalId,
}

/// Everything a guard may look at.
pub struct GuardContext<'a> {
    pub principal: &'a PrincipalId,
    pub subject: &'a Subject,
    pub current: &'a State,
    pub roles: &'a dyn RoleChecker,
}

impl GuardContext<'_> {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.principal_has_role(self.principal, role)
    }

    pub fn is_reporter(&self) -> bool {
        self.subject.reporter == *self.principal
    }
}

/// Decide whether `principal` may move `subject` from `current` to `target`.
///
/// Rules into the same target are alternatives: the change is permitted as
/// soon as one rule accepts the current state and has no guard, or a guard
/// that allows it.
pub fn check_transition(
    workflow: &Workflow,
    current: &State,
    target: &State,
    principal: &PrincipalId,
    subject: &Subject,
    roles: &dyn RoleChecker,
) -> WorkflowResult<()> {
    let mut rules = workflow.rules_into(target).peekable();
    if rules.peek().is_none() {
        return Err(WorkflowError::NoSuchTransition {
            workflow: workflow.name().to_string(),
            target: target.name.clone(),
        });
    }

    let matching: Vec<_> = rules.filter(|r| r.accepts_source(current)).collect();
    if matching.is_empty() {
        return Err(WorkflowError::TransitionNotAllowedFromState {
            workflow: workflow.name().to_string(),
            from: current.name.clone(),
            to: target.name.clone(),
        });
    }

    let ctx = GuardContext {
        principal,
        subject,
        current,
        roles,
    };
    let mut denied_by = Vec::new();
    for rule in &matching {
        match &rule.guard {
            None => return Ok(()),
            Some(guard) if guard.allows(&ctx) => return Ok(()),
            Some(guard) => denied_by.push(guard.description),
        }
    }

    Err(WorkflowError::PermissionDenied {
        to: target.name.clone(),
        reason: denied_by.join("; "),
    })
}

/// Boolean form of [`check_transition`], for enabling or hiding buttons.
pub fn can_transition(
    workflow: &Workflow,
    current: &State,
    target: &State,
    principal: &PrincipalId,
    subject: &Subject,
    roles: &dyn RoleChecker,
) -> bool {
    check_transition(workflow, current, target, principal, subject, roles).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{UserDirectory, UserType};
    use crate::workflow::{Guard, WorkflowBuilder, WorkflowKind};

    fn owner_only(ctx: &GuardContext<'_>) -> bool {
        ctx.is_reporter()
    }

    fn triager_only(ctx: &GuardContext<'_>) -> bool {
        ctx.has_role(Role::Triager)
    }

    const OWNER_ONLY: Guard = Guard {
        name: "OwnerOnly",
        description: "only the reporter",
        check: owner_only,
    };

    const TRIAGER_ONLY: Guard = Guard {
        name: "TriagerOnly",
        description: "only a triager",
        check: triager_only,
    };

    fn doors() -> Workflow {
        let mut wf = WorkflowBuilder::new("doors");
        wf.register("10", "Open", "open", "O", true).unwrap();
        wf.register("20", "Closed", "closed", "C", false).unwrap();
        wf.register("30", "Locked", "locked", "L", false).unwrap();
        wf.register("40", "Gone", "gone", "G", false).unwrap();
        wf.add_transition("closed", "open").unwrap();
        wf.add_guarded_transition("locked", "closed", OWNER_ONLY).unwrap();
        wf.add_guarded_transition("locked", "closed", TRIAGER_ONLY).unwrap();
        wf.add_transition("gone", "").unwrap();
        wf.build()
    }

    fn subject(wf: &Workflow, state: &str, reporter: &str) -> Subject {
        Subject {
            entity: EntityRef::new(WorkflowKind::Tickets, 1),
            state: wf.get(state).unwrap().clone(),
            rating: None,
            reporter: reporter.into(),
        }
    }

    fn check(wf: &Workflow, from: &str, to: &str, who: &str, reporter: &str) -> WorkflowResult<()> {
        let roles = UserDirectory::new().with_user("boss", UserType::Senior);
        let subject = subject(wf, from, reporter);
        check_transition(
            wf,
            wf.get(from).unwrap(),
            wf.get(to).unwrap(),
            &who.into(),
            &subject,
            &roles,
        )
    }

    #[test]
    fn unguarded_rule_permits_from_listed_source() {
        let wf = doors();
        assert!(check(&wf, "open", "closed", "anyone", "someone").is_ok());
    }

    #[test]
    fn target_without_rules_is_no_such_transition() {
        let wf = doors();
        let err = check(&wf, "closed", "open", "boss", "boss").unwrap_err();
        assert_eq!(err.kind(), "NoSuchTransition");
    }

    #[test]
    fn unlisted_source_is_rejected() {
        let wf = doors();
        let err = check(&wf, "locked", "closed", "boss", "boss").unwrap_err();
        assert_eq!(
            err,
            WorkflowError::TransitionNotAllowedFromState {
                workflow: "doors".into(),
                from: "locked".into(),
                to: "closed".into()
            }
        );
    }

    #[test]
    fn empty_source_list_accepts_any_state() {
        let wf = doors();
        for from in ["open", "closed", "locked"] {
            assert!(check(&wf, from, "gone", "anyone", "someone").is_ok());
        }
    }

    #[test]
    fn guarded_rules_are_alternatives() {
        let wf = doors();
        assert!(check(&wf, "closed", "locked", "alice", "alice").is_ok());
        assert!(check(&wf, "closed", "locked", "boss", "alice").is_ok());

        let err = check(&wf, "closed", "locked", "mallory", "alice").unwrap_err();
        assert_eq!(
            err,
            WorkflowError::PermissionDenied {
                to: "locked".into(),
                reason: "only the reporter; only a triager".into()
            }
        );
    }

    #[test]
    fn can_transition_is_deterministic() {
        let wf = doors();
        let roles = UserDirectory::new();
        let subject = subject(&wf, "closed", "alice");
        let closed = wf.get("closed").unwrap();
        let locked = wf.get("locked").unwrap();
        let first = can_transition(&wf, closed, locked, &"alice".into(), &subject, &roles);
        for _ in 0..10 {
            assert_eq!(
                can_transition(&wf, closed, locked, &"alice".into(), &subject, &roles),
                first
            );
        }
        assert!(first);
    }
}
