//! The ticket workflow.
//!
//! ```text
//! new ──► talk ◄──► todo ◄──► ready ──MarkDone──► done
//!  │        ▲          ▲         │
//!  ├──► sticky         │         │
//!  └──► sleeping ◄─────┘         │
//!  any of new/talk/todo/sleeping ──► cancelled
//! ```
//!
//! A ticket starts in `new` when it is created, so no rule leads back there.

use crate::error::WorkflowResult;
use crate::roles::Role;
use crate::workflow::{Guard, GuardContext, Workflow, WorkflowBuilder};

/// Somebody reported this ticket, but there was no response so far.
pub const NEW: &str = "new";
/// The ticket needs discussion with the reporter.
pub const TALK: &str = "talk";
/// The ticket is confirmed and somebody is working on it.
pub const TODO: &str = "todo";
/// A permanent ticket without a lifecycle.
pub const STICKY: &str = "sticky";
/// Waiting for some external event.
pub const SLEEPING: &str = "sleeping";
/// Basically done, but the reporter still has to test, confirm or document.
pub const READY: &str = "ready";
pub const DONE: &str = "done";
/// It has been decided that we won't fix this ticket.
pub const CANCELLED: &str = "cancelled";

pub const FAVORITE_STATES: &str = "favorite_states";
pub const WORK_STATES: &str = "work_states";
pub const WAITING_STATES: &str = "waiting_states";

/// Mark a ticket as done. A triager may always do it; anybody else only when
/// they reported the ticket and have rated it.
pub const MARK_DONE: Guard = Guard {
    name: "MarkDone",
    description: "only a triager, or the reporter after rating the ticket",
    check: mark_done,
};

fn mark_done(ctx: &GuardContext<'_>) -> bool {
    if ctx.has_role(Role::Triager) {
        return true;
    }
    ctx.subject.rating.is_some() && ctx.is_reporter()
}

/// Declare the ticket states, their transitions and groups.
pub fn ticket_workflow() -> WorkflowResult<Workflow> {
    let mut wf = WorkflowBuilder::new("tickets");

    wf.register("10", "New", NEW, "\u{1F4E5}", true)?;
    wf.register("15", "Talk", TALK, "\u{1F5EA}", true)?;
    wf.register("20", "ToDo", TODO, "\u{1F41C}", true)?;
    wf.register("21", "Sticky", STICKY, "\u{1F4CC}", true)?;
    wf.register("30", "Sleeping", SLEEPING, "\u{1F578}", false)?;
    wf.register("40", "Ready", READY, "\u{2610}", true)?;
    wf.register("50", "Done", DONE, "\u{2611}", false)?;
    wf.register("60", "Cancelled", CANCELLED, "\u{1F5D1}", false)?;

    wf.add_transition(STICKY, "new")?;
    wf.add_transition(TALK, "new todo ready")?;
    wf.add_transition(TODO, "new talk ready")?;
    wf.add_transition(SLEEPING, "talk todo new talk")?;
    wf.add_transition(READY, "new talk todo")?;
    wf.add_guarded_transition(DONE, "ready", MARK_DONE)?;
    wf.add_transition(CANCELLED, "todo talk new talk sleeping")?;

    wf.add_group(FAVORITE_STATES, "sticky")?;
    wf.add_group(WORK_STATES, "todo new")?;
    wf.add_group(WAITING_STATES, "done")?;

    Ok(wf.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkflowError;
    use crate::ratings::Rating;
    use crate::roles::{PrincipalId, UserDirectory, UserType};
    use crate::store::EntityRef;
    use crate::workflow::{check_transition, Subject, WorkflowKind};

    fn roles() -> UserDirectory {
        UserDirectory::new()
            .with_user("jean", UserType::Senior)
            .with_user("luc", UserType::Developer)
            .with_user("marc", UserType::Consultant)
    }

    fn ticket(wf: &Workflow, state: &str, reporter: &str, rating: Option<Rating>) -> Subject {
        Subject {
            entity: EntityRef::new(WorkflowKind::Tickets, 1),
            state: wf.get(state).unwrap().clone(),
            rating,
            reporter: PrincipalId::new(reporter),
        }
    }

    fn attempt(wf: &Workflow, subject: &Subject, target: &str, who: &str) -> WorkflowResult<()> {
        check_transition(
            wf,
            &subject.state,
            wf.get(target).unwrap(),
            &PrincipalId::new(who),
            subject,
            &roles(),
        )
    }

    fn names(states: &[&crate::workflow::State]) -> Vec<String> {
        states.iter().map(|s| s.name.clone()).collect()
    }

    #[test]
    fn states_are_ordered_by_code() {
        let wf = ticket_workflow().unwrap();
        let codes: Vec<&str> = wf.all().iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["10", "15", "20", "21", "30", "40", "50", "60"]);
        let names: Vec<&str> = wf.all().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["new", "talk", "todo", "sticky", "sleeping", "ready", "done", "cancelled"]
        );
    }

    #[test]
    fn active_flags() {
        let wf = ticket_workflow().unwrap();
        assert_eq!(
            names(&wf.active_states()),
            vec!["new", "talk", "todo", "sticky", "ready"]
        );
    }

    #[test]
    fn triager_marks_done_without_rating() {
        let wf = ticket_workflow().unwrap();
        let t = ticket(&wf, READY, "luc", None);
        assert!(attempt(&wf, &t, DONE, "jean").is_ok());
    }

    #[test]
    fn reporter_needs_rating_to_mark_done() {
        let wf = ticket_workflow().unwrap();
        let unrated = ticket(&wf, READY, "luc", None);
        let err = attempt(&wf, &unrated, DONE, "luc").unwrap_err();
        assert_eq!(err.kind(), "PermissionDenied");

        let rated = ticket(&wf, READY, "luc", Some(Rating::Good));
        assert!(attempt(&wf, &rated, DONE, "luc").is_ok());
    }

    #[test]
    fn rating_alone_is_not_enough() {
        let wf = ticket_workflow().unwrap();
        let rated = ticket(&wf, READY, "luc", Some(Rating::VeryGood));
        let err = attempt(&wf, &rated, DONE, "marc").unwrap_err();
        assert!(matches!(err, WorkflowError::PermissionDenied { .. }));
    }

    #[test]
    fn done_only_from_ready() {
        let wf = ticket_workflow().unwrap();
        for state in [NEW, TALK, TODO, STICKY, SLEEPING, DONE, CANCELLED] {
            let t = ticket(&wf, state, "luc", Some(Rating::Good));
            let err = attempt(&wf, &t, DONE, "jean").unwrap_err();
            assert_eq!(err.kind(), "TransitionNotAllowedFromState", "from {state}");
        }
    }

    #[test]
    fn sticky_only_from_new() {
        let wf = ticket_workflow().unwrap();
        assert!(attempt(&wf, &ticket(&wf, NEW, "luc", None), STICKY, "luc").is_ok());
        for state in [TALK, TODO, STICKY, SLEEPING, READY, DONE, CANCELLED] {
            let t = ticket(&wf, state, "luc", None);
            let err = attempt(&wf, &t, STICKY, "jean").unwrap_err();
            assert_eq!(err.kind(), "TransitionNotAllowedFromState", "from {state}");
        }
    }

    #[test]
    fn nothing_leads_back_to_new() {
        let wf = ticket_workflow().unwrap();
        for state in wf.all() {
            let t = ticket(&wf, &state.name, "jean", Some(Rating::Good));
            let err = attempt(&wf, &t, NEW, "jean").unwrap_err();
            assert_eq!(err.kind(), "NoSuchTransition");
        }
    }

    #[test]
    fn required_states_match_declarations() {
        let wf = ticket_workflow().unwrap();
        let sources = |target: &str| names(&wf.required_states(wf.get(target).unwrap()));
        assert_eq!(sources(STICKY), vec!["new"]);
        assert_eq!(sources(TALK), vec!["new", "todo", "ready"]);
        assert_eq!(sources(TODO), vec!["new", "talk", "ready"]);
        assert_eq!(sources(SLEEPING), vec!["new", "talk", "todo"]);
        assert_eq!(sources(READY), vec!["new", "talk", "todo"]);
        assert_eq!(sources(DONE), vec!["ready"]);
        assert_eq!(sources(CANCELLED), vec!["new", "talk", "todo", "sleeping"]);
        assert!(sources(NEW).is_empty());
    }

    #[test]
    fn unguarded_transitions_ignore_roles() {
        let wf = ticket_workflow().unwrap();
        let t = ticket(&wf, SLEEPING, "luc", None);
        assert!(attempt(&wf, &t, CANCELLED, "somebody").is_ok());
    }

    #[test]
    fn state_groups() {
        let wf = ticket_workflow().unwrap();
        assert_eq!(names(&wf.group(WORK_STATES).unwrap()), vec!["new", "todo"]);
        assert_eq!(names(&wf.group(FAVORITE_STATES).unwrap()), vec!["sticky"]);
        assert_eq!(names(&wf.group(WAITING_STATES).unwrap()), vec!["done"]);
    }

    #[test]
    fn glyphs() {
        let wf = ticket_workflow().unwrap();
        assert_eq!(wf.get(NEW).unwrap().button_glyph, "📥");
        assert_eq!(wf.get(READY).unwrap().button_glyph, "☐");
        assert_eq!(wf.get(DONE).unwrap().button_glyph, "☑");
    }
}
