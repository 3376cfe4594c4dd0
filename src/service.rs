use std::sync::Arc;

use crate::error::{WorkflowError, WorkflowResult};
use crate::ratings::Rating;
use crate::roles::{PrincipalId, RoleChecker};
use crate::store::{EntityRef, WorkflowStore};
use crate::votes;
use crate::workflow::{check_transition, State, Subject, Workflow, WorkflowKind, WorkflowRegistry};

/// Entry point for the UI and query layers: state listings, transition
/// checks, and applying a transition through the store.
pub struct WorkflowService<S, R> {
    registry: Arc<WorkflowRegistry>,
    store: S,
    roles: R,
}

impl<S: WorkflowStore, R: RoleChecker> WorkflowService<S, R> {
    pub fn new(registry: Arc<WorkflowRegistry>, store: S, roles: R) -> Self {
        Self {
            registry,
            store,
            roles,
        }
    }

    pub fn registry(&self) -> &WorkflowRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn list_states(&self, kind: WorkflowKind) -> &[State] {
        self.registry.list_states(kind)
    }

    pub fn state_group(&self, kind: WorkflowKind, group: &str) -> WorkflowResult<Vec<&State>> {
        self.registry.state_group(kind, group)
    }

    /// Read what the guards need to know about `entity`.
    pub fn subject(&self, entity: EntityRef) -> WorkflowResult<Subject> {
        Ok(Subject {
            entity,
            state: self.store.read_current_state(entity)?,
            rating: self.store.read_rating(entity)?,
            reporter: self.store.read_reporter(entity)?,
        })
    }

    /// Whether `principal` may move `entity` to the state named `target` now.
    pub fn can_transition(
        &self,
        entity: EntityRef,
        target: &str,
        principal: &PrincipalId,
    ) -> WorkflowResult<()> {
        let workflow = self.registry.workflow(entity.kind);
        let target = workflow.get(target)?;
        let subject = self.subject(entity)?;
        self.check(workflow, &subject, target, principal)
    }

    /// Check the transition and write the new state.
    ///
    /// The write only succeeds if the entity is still in the state the check
    /// was made against. A [`WorkflowError::WriteConflict`] is returned as is;
    /// the caller decides whether to re-read and try again.
    pub fn apply_transition(
        &self,
        entity: EntityRef,
        target: &str,
        principal: &PrincipalId,
    ) -> WorkflowResult<State> {
        let workflow = self.registry.workflow(entity.kind);
        let target = workflow.get(target)?;
        let subject = self.subject(entity)?;
        self.check_and_write(workflow, &subject, target, principal)
    }

    /// Rate a vote and mark it as rated in one step.
    ///
    /// The guard of the `rated` transition sees `rating` as if it were
    /// already stored, so the ticket reporter needs no prior write. The
    /// rating is written only after the state change went through.
    pub fn rate_vote(
        &self,
        entity: EntityRef,
        rating: Rating,
        comment: Option<&str>,
        principal: &PrincipalId,
    ) -> WorkflowResult<State> {
        let workflow = self.registry.workflow(entity.kind);
        let target = workflow.get(votes::RATED)?;
        let mut subject = self.subject(entity)?;
        subject.rating = Some(rating);

        let state = self.check_and_write(workflow, &subject, target, principal)?;
        self.store.write_rating(entity, rating, comment)?;
        tracing::info!(entity = %entity, rating = %rating, principal = %principal, "Vote rated");
        Ok(state)
    }

    fn check_and_write(
        &self,
        workflow: &Workflow,
        subject: &Subject,
        target: &State,
        principal: &PrincipalId,
    ) -> WorkflowResult<State> {
        let entity = subject.entity;
        if let Err(err) = self.check(workflow, subject, target, principal) {
            tracing::debug!(
                entity = %entity,
                from = %subject.state,
                to = %target,
                principal = %principal,
                reason = err.kind(),
                "Transition refused"
            );
            return Err(err);
        }

        match self.store.write_state(entity, &subject.state, target) {
            Ok(()) => {
                tracing::info!(
                    entity = %entity,
                    from = %subject.state,
                    to = %target,
                    principal = %principal,
                    "Transition applied"
                );
                Ok(target.clone())
            }
            Err(err @ WorkflowError::WriteConflict { .. }) => {
                tracing::warn!(entity = %entity, error = %err, "Concurrent state change");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Every state `principal` could move `entity` to right now, ordered by code.
    pub fn allowed_targets(
        &self,
        entity: EntityRef,
        principal: &PrincipalId,
    ) -> WorkflowResult<Vec<&State>> {
        let workflow = self.registry.workflow(entity.kind);
        let subject = self.subject(entity)?;
        Ok(workflow
            .all()
            .iter()
            .filter(|target| self.check(workflow, &subject, target, principal).is_ok())
            .collect())
    }

    fn check(
        &self,
        workflow: &Workflow,
        subject: &Subject,
        target: &State,
        principal: &PrincipalId,
    ) -> WorkflowResult<()> {
        check_transition(workflow, &subject.state, target, principal, subject, &self.roles)
    }
}
