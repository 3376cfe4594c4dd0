//! The vote workflow.
//!
//! A vote is a user's interest in a ticket. The reporter gets an `author`
//! vote automatically; other users go through watching, candidate and
//! assigned until the work is done and the reporter rates it.

use crate::error::WorkflowResult;
use crate::roles::Role;
use crate::workflow::{Guard, GuardContext, Workflow, WorkflowBuilder};

/// Reserved for the reporter's own vote.
pub const AUTHOR: &str = "author";
pub const WATCHING: &str = "watching";
/// Offers to work on the ticket.
pub const CANDIDATE: &str = "candidate";
pub const ASSIGNED: &str = "assigned";
pub const DONE: &str = "done";
/// The reporter has rated the work.
pub const RATED: &str = "rated";
pub const CANCELLED: &str = "cancelled";

pub const OFFER_STATES: &str = "offer_states";
pub const TASK_STATES: &str = "task_states";
pub const WATCHING_STATES: &str = "watching_states";

/// Rate a vote and mark it as rated. Reserved to the reporter of the voted
/// ticket (once a rating is set) and to triagers.
pub const MARK_VOTE_RATED: Guard = Guard {
    name: "MarkVoteRated",
    description: "only a triager, or the ticket reporter after rating the vote",
    check: mark_vote_rated,
};

fn mark_vote_rated(ctx: &GuardContext<'_>) -> bool {
    ctx.has_role(Role::Triager) || (ctx.is_reporter() && ctx.subject.rating.is_some())
}

pub fn vote_workflow() -> WorkflowResult<Workflow> {
    let mut wf = WorkflowBuilder::new("votes");

    wf.register("00", "Author", AUTHOR, "\u{270D}", true)?;
    wf.register("05", "Watching", WATCHING, "\u{1F441}", true)?;
    wf.register("10", "Candidate", CANDIDATE, "\u{261D}", true)?;
    wf.register("20", "Assigned", ASSIGNED, "\u{1F41C}", true)?;
    wf.register("30", "Done", DONE, "\u{2611}", false)?;
    wf.register("40", "Rated", RATED, "\u{2605}", false)?;
    wf.register("50", "Cancelled", CANCELLED, "\u{1F5D1}", false)?;

    wf.set_vote_name(AUTHOR, "Authorship")?;
    wf.set_vote_name(WATCHING, "Interest")?;
    wf.set_vote_name(CANDIDATE, "Offer")?;
    wf.set_vote_name(ASSIGNED, "Task")?;
    wf.set_vote_name(DONE, "Done task")?;
    wf.set_vote_name(RATED, "Rated task")?;
    wf.set_vote_name(CANCELLED, "Cancelled vote")?;

    wf.add_transition(WATCHING, "candidate cancelled")?;
    wf.add_transition(CANDIDATE, "watching cancelled")?;
    wf.add_transition(ASSIGNED, "watching candidate")?;
    wf.add_transition(DONE, "assigned")?;
    wf.add_guarded_transition(RATED, "done", MARK_VOTE_RATED)?;
    wf.add_transition(CANCELLED, "watching candidate assigned")?;

    wf.add_group(OFFER_STATES, "candidate")?;
    wf.add_group(TASK_STATES, "assigned done")?;
    wf.add_group(WATCHING_STATES, "watching")?;

    Ok(wf.build())
}
