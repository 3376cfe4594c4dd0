//! Persistence seam of the workflow core.
//!
//! The core never owns entity data. It reads what a guard needs through
//! [`WorkflowStore`] and writes the new state back with a compare-and-set,
//! so two concurrent transitions on one entity cannot both succeed.
//! [`MemoryStore`] is the reference implementation used by the CLI demo and
//! the tests.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{WorkflowError, WorkflowResult};
use crate::ratings::Rating;
use crate::roles::PrincipalId;
use crate::workflow::{State, WorkflowKind};

/// Identifies a ticket or a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: WorkflowKind,
    pub id: u64,
}

impl EntityRef {
    pub fn new(kind: WorkflowKind, id: u64) -> Self {
        Self { kind, id }
    }

    pub fn ticket(id: u64) -> Self {
        Self::new(WorkflowKind::Tickets, id)
    }

    pub fn vote(id: u64) -> Self {
        Self::new(WorkflowKind::Votes, id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.kind.entity_noun(), self.id)
    }
}

/// What the workflow core needs from the persistence layer.
pub trait WorkflowStore {
    fn read_current_state(&self, entity: EntityRef) -> WorkflowResult<State>;

    /// Replace the state of `entity` with `new_state`, but only if it is
    /// still `expected`. Fails with [`WorkflowError::WriteConflict`]
    /// otherwise.
    fn write_state(&self, entity: EntityRef, expected: &State, new_state: &State) -> WorkflowResult<()>;

    fn read_rating(&self, entity: EntityRef) -> WorkflowResult<Option<Rating>>;

    /// Store the rating given to `entity`, with the rater's optional comment.
    fn write_rating(&self, entity: EntityRef, rating: Rating, comment: Option<&str>) -> WorkflowResult<()>;

    /// The ticket reporter; for a vote, the reporter of the voted ticket.
    fn read_reporter(&self, entity: EntityRef) -> WorkflowResult<PrincipalId>;
}

/// Audit entry for one applied state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub id: Uuid,
    pub entity: EntityRef,
    pub from: String,
    pub to: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct EntityRow {
    state: State,
    rating: Option<Rating>,
    comment: Option<String>,
    /// Reporter for tickets, voter for votes.
    user: PrincipalId,
    /// The voted ticket, for votes only.
    votable: Option<u64>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: HashMap<EntityRef, EntityRow>,
    history: Vec<TransitionRecord>,
}

/// In-memory [`WorkflowStore`] holding tickets and votes.
///
/// Meant for the demo and tests: the history is never pruned and
/// [`history`](Self::history) scans all of it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a ticket. Fails with [`WorkflowError::DuplicateEntity`] if the id is taken.
    pub fn insert_ticket(
        &self,
        id: u64,
        reporter: impl Into<PrincipalId>,
        state: State,
    ) -> WorkflowResult<EntityRef> {
        let mut inner = self.inner.lock();
        let entity = EntityRef::ticket(id);
        if inner.rows.contains_key(&entity) {
            return Err(WorkflowError::DuplicateEntity(entity.to_string()));
        }
        inner.rows.insert(
            entity,
            EntityRow {
                state,
                rating: None,
                comment: None,
                user: reporter.into(),
                votable: None,
            },
        );
        Ok(entity)
    }

    /// Add a vote of `voter` on an existing ticket. The vote id must be new.
    pub fn insert_vote(
        &self,
        id: u64,
        ticket: u64,
        voter: impl Into<PrincipalId>,
        state: State,
    ) -> WorkflowResult<EntityRef> {
        let mut inner = self.inner.lock();
        let votable = EntityRef::ticket(ticket);
        if !inner.rows.contains_key(&votable) {
            return Err(WorkflowError::UnknownEntity(votable.to_string()));
        }
        let entity = EntityRef::vote(id);
        if inner.rows.contains_key(&entity) {
            return Err(WorkflowError::DuplicateEntity(entity.to_string()));
        }
        inner.rows.insert(
            entity,
            EntityRow {
                state,
                rating: None,
                comment: None,
                user: voter.into(),
                votable: Some(ticket),
            },
        );
        Ok(entity)
    }

    pub fn set_rating(&self, entity: EntityRef, rating: Option<Rating>) -> WorkflowResult<()> {
        let mut inner = self.inner.lock();
        let row = inner
            .rows
            .get_mut(&entity)
            .ok_or_else(|| WorkflowError::UnknownEntity(entity.to_string()))?;
        row.rating = rating;
        Ok(())
    }

    pub fn comment(&self, entity: EntityRef) -> WorkflowResult<Option<String>> {
        let inner = self.inner.lock();
        inner
            .rows
            .get(&entity)
            .map(|row| row.comment.clone())
            .ok_or_else(|| WorkflowError::UnknownEntity(entity.to_string()))
    }

    /// The voter of a vote, or the reporter of a ticket.
    pub fn owner(&self, entity: EntityRef) -> WorkflowResult<PrincipalId> {
        let inner = self.inner.lock();
        inner
            .rows
            .get(&entity)
            .map(|row| row.user.clone())
            .ok_or_else(|| WorkflowError::UnknownEntity(entity.to_string()))
    }

    /// Applied transitions of one entity, oldest first.
    pub fn history(&self, entity: EntityRef) -> Vec<TransitionRecord> {
        self.inner
            .lock()
            .history
            .iter()
            .filter(|r| r.entity == entity)
            .cloned()
            .collect()
    }

    pub fn all_history(&self) -> Vec<TransitionRecord> {
        self.inner.lock().history.clone()
    }
}

impl WorkflowStore for MemoryStore {
    fn read_current_state(&self, entity: EntityRef) -> WorkflowResult<State> {
        let inner = self.inner.lock();
        inner
            .rows
            .get(&entity)
            .map(|row| row.state.clone())
            .ok_or_else(|| WorkflowError::UnknownEntity(entity.to_string()))
    }

    fn write_state(&self, entity: EntityRef, expected: &State, new_state: &State) -> WorkflowResult<()> {
        let mut inner = self.inner.lock();
        let row = inner
            .rows
            .get_mut(&entity)
            .ok_or_else(|| WorkflowError::UnknownEntity(entity.to_string()))?;
        if row.state.name != expected.name {
            return Err(WorkflowError::WriteConflict {
                entity: entity.to_string(),
                expected: expected.name.clone(),
                actual: row.state.name.clone(),
            });
        }
        row.state = new_state.clone();
        inner.history.push(TransitionRecord {
            id: Uuid::new_v4(),
            entity,
            from: expected.name.clone(),
            to: new_state.name.clone(),
            at: Utc::now(),
        });
        Ok(())
    }

    fn read_rating(&self, entity: EntityRef) -> WorkflowResult<Option<Rating>> {
        let inner = self.inner.lock();
        inner
            .rows
            .get(&entity)
            .map(|row| row.rating)
            .ok_or_else(|| WorkflowError::UnknownEntity(entity.to_string()))
    }

    fn write_rating(&self, entity: EntityRef, rating: Rating, comment: Option<&str>) -> WorkflowResult<()> {
        let mut inner = self.inner.lock();
        let row = inner
            .rows
            .get_mut(&entity)
            .ok_or_else(|| WorkflowError::UnknownEntity(entity.to_string()))?;
        row.rating = Some(rating);
        row.comment = comment.map(str::to_string);
        Ok(())
    }

    fn read_reporter(&self, entity: EntityRef) -> WorkflowResult<PrincipalId> {
        let inner = self.inner.lock();
        let row = inner
            .rows
            .get(&entity)
            .ok_or_else(|| WorkflowError::UnknownEntity(entity.to_string()))?;
        match row.votable {
            None => Ok(row.user.clone()),
            Some(ticket) => {
                let votable = EntityRef::ticket(ticket);
                inner
                    .rows
                    .get(&votable)
                    .map(|t| t.user.clone())
                    .ok_or_else(|| WorkflowError::UnknownEntity(votable.to_string()))
            }
        }
    }
}
