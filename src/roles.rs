//! Principals, roles and user types.
//!
//! The workflow core only asks one question of the permission layer:
//! does this principal hold that role? [`RoleChecker`] is that question.
//! [`UserDirectory`] answers it from the user types a Noi site ships with.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The acting user, identified by username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrincipalId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Can create new tickets.
    TicketsUser,
    /// Responsible for triaging new tickets.
    Triager,
    /// Candidate for working on a ticket.
    Worker,
    /// Can see all tickets.
    Searcher,
    /// Can configure tickets functionality.
    TicketsStaff,
    SiteStaff,
}

impl Role {
    pub const ALL: &'static [Role] = &[
        Role::TicketsUser,
        Role::Triager,
        Role::Worker,
        Role::Searcher,
        Role::TicketsStaff,
        Role::SiteStaff,
    ];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::TicketsUser => write!(f, "TicketsUser"),
            Role::Triager => write!(f, "Triager"),
            Role::Worker => write!(f, "Worker"),
            Role::Searcher => write!(f, "Searcher"),
            Role::TicketsStaff => write!(f, "TicketsStaff"),
            Role::SiteStaff => write!(f, "SiteStaff"),
        }
    }
}

/// The user types of a Noi site, each granting a fixed set of roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[default]
    Anonymous,
    /// Reports tickets but won't work on them.
    EndUser,
    Consultant,
    Developer,
    /// A developer who also triages tickets.
    Senior,
    SiteAdmin,
}

impl UserType {
    pub fn roles(&self) -> &'static [Role] {
        match self {
            UserType::Anonymous => &[],
            UserType::EndUser => &[Role::TicketsUser],
            UserType::Consultant | UserType::Developer => &[Role::TicketsUser, Role::Worker],
            UserType::Senior => &[Role::TicketsUser, Role::Worker, Role::Searcher, Role::Triager],
            UserType::SiteAdmin => Role::ALL,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles().contains(&role)
    }
}

/// Capability check consumed by transition guards.
pub trait RoleChecker {
    fn principal_has_role(&self, principal: &PrincipalId, role: Role) -> bool;
}

/// Maps usernames to user types. Unknown principals hold no roles.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<PrincipalId, UserType>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, principal: impl Into<PrincipalId>, user_type: UserType) {
        self.users.insert(principal.into(), user_type);
    }

    pub fn with_user(mut self, principal: impl Into<PrincipalId>, user_type: UserType) -> Self {
        self.insert(principal, user_type);
        self
    }

    pub fn user_type(&self, principal: &PrincipalId) -> UserType {
        self.users.get(principal).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl RoleChecker for UserDirectory {
    fn principal_has_role(&self, principal: &PrincipalId, role: Role) -> bool {
        self.user_type(principal).has_role(role)
    }
}
