//! Workflow core of the Lino Noi ticket tracker.
//!
//! - Generic workflows: ordered states, guarded transition rules and state groups
//! - The ticket and vote workflows, with the `MarkDone` and `MarkVoteRated` guards
//! - Link types and ratings
//! - The persistence and permission seams, with in-memory reference implementations
//! - [`WorkflowService`] to check and apply transitions on stored entities

pub mod error;
pub mod links;
pub mod ratings;
pub mod roles;
pub mod service;
pub mod store;
pub mod tickets;
pub mod votes;
pub mod workflow;

pub use error::{NoiError, WorkflowError, WorkflowResult};
pub use links::LinkType;
pub use ratings::Rating;
pub use roles::{PrincipalId, Role, RoleChecker, UserDirectory, UserType};
pub use service::WorkflowService;
pub use store::{EntityRef, MemoryStore, TransitionRecord, WorkflowStore};
pub use workflow::{State, Workflow, WorkflowKind, WorkflowRegistry};
