mod guard;
mod registry;
mod state;
mod transition;

pub use guard::{can_transition, check_transition, GuardContext, Subject};
pub use registry::WorkflowRegistry;
pub use state::{State, StateGroup, Workflow, WorkflowBuilder, WorkflowKind};
pub use transition::{Guard, TransitionRule};
