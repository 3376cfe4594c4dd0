use thiserror::Error;

/// Errors returned by the workflow core.
///
/// Every variant is reported to the immediate caller; nothing in the core
/// logs, swallows or retries them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Unknown state `{name}` in workflow {workflow}")]
    UnknownState { workflow: String, name: String },

    #[error("Duplicate state in workflow {workflow}: code `{code}` or name `{name}` already registered")]
    DuplicateCodeOrName {
        workflow: String,
        code: String,
        name: String,
    },

    #[error("No transition leads to `{target}` in workflow {workflow}")]
    NoSuchTransition { workflow: String, target: String },

    #[error("Cannot go from `{from}` to `{to}` in workflow {workflow}")]
    TransitionNotAllowedFromState {
        workflow: String,
        from: String,
        to: String,
    },

    #[error("Permission denied for `{to}` ({reason})")]
    PermissionDenied { to: String, reason: String },

    #[error("Write conflict on {entity}: expected state `{expected}`, found `{actual}`")]
    WriteConflict {
        entity: String,
        expected: String,
        actual: String,
    },

    #[error("Unknown state group `{group}` in workflow {workflow}")]
    UnknownGroup { workflow: String, group: String },

    #[error("State group `{group}` declared twice in workflow {workflow}")]
    DuplicateGroup { workflow: String, group: String },

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Entity already exists: {0}")]
    DuplicateEntity(String),

    #[error("Unknown rating: {0}")]
    UnknownRating(String),

    #[error("Unknown link type: {0}")]
    UnknownLinkType(String),

    #[error("Unknown workflow: {0}")]
    UnknownWorkflow(String),
}

impl WorkflowError {
    /// Whether the caller may re-read the entity and run the whole decision again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkflowError::WriteConflict { .. })
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::UnknownState { .. } => "UnknownState",
            WorkflowError::DuplicateCodeOrName { .. } => "DuplicateCodeOrName",
            WorkflowError::NoSuchTransition { .. } => "NoSuchTransition",
            WorkflowError::TransitionNotAllowedFromState { .. } => "TransitionNotAllowedFromState",
            WorkflowError::PermissionDenied { .. } => "PermissionDenied",
            WorkflowError::WriteConflict { .. } => "WriteConflict",
            WorkflowError::UnknownGroup { .. } => "UnknownGroup",
            WorkflowError::DuplicateGroup { .. } => "DuplicateGroup",
            WorkflowError::UnknownEntity(_) => "UnknownEntity",
            WorkflowError::DuplicateEntity(_) => "DuplicateEntity",
            WorkflowError::UnknownRating(_) => "UnknownRating",
            WorkflowError::UnknownLinkType(_) => "UnknownLinkType",
            WorkflowError::UnknownWorkflow(_) => "UnknownWorkflow",
        }
    }
}

/// Result alias for workflow operations.
pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;

/// Application-level errors of the `noi` binary.
#[derive(Debug, Error)]
pub enum NoiError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
