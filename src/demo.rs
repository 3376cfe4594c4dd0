use std::sync::Arc;

use noi_workflow::tickets;
use noi_workflow::votes;
use noi_workflow::{
    EntityRef, MemoryStore, PrincipalId, Rating, TransitionRecord, UserDirectory, WorkflowKind,
    WorkflowRegistry, WorkflowResult, WorkflowService, WorkflowStore,
};

/// One attempted transition and what came of it.
#[derive(Debug, Clone)]
pub struct DemoStep {
    pub description: String,
    pub from: String,
    pub to: String,
    pub outcome: Result<(), String>,
}

#[derive(Debug)]
pub struct DemoReport {
    pub steps: Vec<DemoStep>,
    pub history: Vec<TransitionRecord>,
}

/// Walk a few tickets and a vote through their workflows with the demo
/// users: luc reports and rates, jean triages, marc works on the ticket.
pub fn run_demo(registry: Arc<WorkflowRegistry>, users: UserDirectory) -> WorkflowResult<DemoReport> {
    let state = |kind: WorkflowKind, name: &str| registry.workflow(kind).get(name).cloned();
    let store = MemoryStore::new();
    let t1 = store.insert_ticket(1, "luc", state(WorkflowKind::Tickets, tickets::READY)?)?;
    let t2 = store.insert_ticket(2, "marc", state(WorkflowKind::Tickets, tickets::READY)?)?;
    let t3 = store.insert_ticket(3, "luc", state(WorkflowKind::Tickets, tickets::TALK)?)?;
    let v1 = store.insert_vote(1, 3, "marc", state(WorkflowKind::Votes, votes::CANDIDATE)?)?;

    let svc = WorkflowService::new(Arc::clone(&registry), store, users);
    let luc = PrincipalId::new("luc");
    let jean = PrincipalId::new("jean");
    let marc = PrincipalId::new("marc");

    let mut steps = Vec::new();
    let mut attempt = |description: &str, entity: EntityRef, target: &str, who: &PrincipalId| -> WorkflowResult<()> {
        let from = svc.store().read_current_state(entity)?.name;
        let outcome = svc
            .apply_transition(entity, target, who)
            .map(|_| ())
            .map_err(|e| e.kind().to_string());
        steps.push(DemoStep {
            description: format!("{description} ({entity}, by {who})"),
            from,
            to: target.to_string(),
            outcome,
        });
        Ok(())
    };

    attempt("Reporter closes an unrated ticket", t1, tickets::DONE, &luc)?;
    svc.store().set_rating(t1, Some(Rating::Good))?;
    attempt("Reporter closes after rating", t1, tickets::DONE, &luc)?;
    attempt("Triager closes an unrated ticket", t2, tickets::DONE, &jean)?;
    attempt("Nobody reopens a ticket as new", t2, tickets::NEW, &jean)?;
    attempt("Worker starts on a discussed ticket", t3, tickets::TODO, &marc)?;
    attempt("Candidate gets assigned", v1, votes::ASSIGNED, &marc)?;
    attempt("Assignee finishes", v1, votes::DONE, &marc)?;
    attempt("Assignee rates own work", v1, votes::RATED, &marc)?;

    let from = svc.store().read_current_state(v1)?.name;
    let outcome = svc
        .rate_vote(v1, Rating::VeryGood, Some("Quick and clean"), &luc)
        .map(|_| ())
        .map_err(|e| e.kind().to_string());
    steps.push(DemoStep {
        description: format!("Reporter rates the work ({v1}, by {luc})"),
        from,
        to: votes::RATED.to_string(),
        outcome,
    });

    Ok(DemoReport {
        steps,
        history: svc.store().all_history(),
    })
}
