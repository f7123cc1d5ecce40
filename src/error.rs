//! Rich diagnostic error types for guardrail.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.
//!
//! Business outcomes are not errors: a failed validation is a
//! [`ValidationReport`](crate::validation::ValidationReport) and a refused
//! activation is a [`FocusLockValidation::Denied`](crate::focus::FocusLockValidation).
//! The variants below only appear when a mutation cannot be carried out.

use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::paths::PathError;

/// Top-level error type for guardrail.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum GuardrailError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),
}

/// Result type alias for guardrail operations.
pub type GuardrailResult<T> = std::result::Result<T, GuardrailError>;

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("I/O error: {source}")]
    #[diagnostic(
        code(guardrail::store::io),
        help(
            "A filesystem operation failed. Check that the data directory exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("redb transaction error: {message}")]
    #[diagnostic(
        code(guardrail::store::redb),
        help(
            "The embedded database encountered a transaction error. \
             Another guardrail process may hold the database open; close it and retry. \
             If the problem persists, try a fresh data directory."
        )
    )]
    Redb { message: String },

    #[error("serialization error: {message}")]
    #[diagnostic(
        code(guardrail::store::serde),
        help(
            "Failed to serialize or deserialize a stored record. \
             This usually means the stored data format has changed between versions."
        )
    )]
    Serialization { message: String },

    #[error("id counter exhausted for {counter}")]
    #[diagnostic(
        code(guardrail::store::exhausted),
        help("The record ID space is exhausted. Start a fresh data directory.")
    )]
    CounterExhausted { counter: String },
}

// ---------------------------------------------------------------------------
// Tracker errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum TrackerError {
    #[error("idea {id} not found")]
    #[diagnostic(
        code(guardrail::tracker::idea_not_found),
        help("List your ideas with `guardrail idea list` to find a valid id.")
    )]
    IdeaNotFound { id: u64 },

    #[error("idea title must not be empty")]
    #[diagnostic(
        code(guardrail::tracker::empty_title),
        help("Give the idea a short, descriptive title.")
    )]
    EmptyTitle,

    #[error("progress message must not be empty")]
    #[diagnostic(
        code(guardrail::tracker::empty_message),
        help("Describe the concrete unit of work you completed.")
    )]
    EmptyMessage,

    #[error("resource \"{title}\" is missing a title or URL")]
    #[diagnostic(
        code(guardrail::tracker::incomplete_resource),
        help("Every attached resource needs both a title and a URL.")
    )]
    IncompleteResource { title: String },

    #[error("invalid scoring responses: {}", errors.join("; "))]
    #[diagnostic(
        code(guardrail::tracker::invalid_scoring),
        help("Rate every one of the ten criteria with an integer from 1 to 5. See `guardrail rubric`.")
    )]
    InvalidScoring { errors: Vec<String> },

    #[error("invalid progress metrics: {}", errors.join("; "))]
    #[diagnostic(
        code(guardrail::tracker::invalid_progress),
        help("Rate every one of the five execution metrics with an integer from 1 to 5.")
    )]
    InvalidProgress { errors: Vec<String> },

    #[error("idea {id} cannot be activated: decision is {decision}")]
    #[diagnostic(
        code(guardrail::tracker::not_go),
        help("Only ideas scored GO (40 or more points) can take a focus slot. Re-score the idea after modifying it.")
    )]
    NotGo { id: u64, decision: String },

    #[error("idea {id} already holds a focus lock")]
    #[diagnostic(
        code(guardrail::tracker::already_focused),
        help("The idea is already one of your weekly focus commitments.")
    )]
    AlreadyFocused { id: u64 },

    #[error("{reason}")]
    #[diagnostic(
        code(guardrail::tracker::focus_locked),
        help("Wait for a lock to expire or remove an idea with `guardrail focus remove <id>`.")
    )]
    FocusLocked { reason: String },

    #[error("unknown execution status: \"{value}\"")]
    #[diagnostic(
        code(guardrail::tracker::unknown_status),
        help("Valid statuses are: Planned, In Progress, Launched, Validated, Parked, Abandoned.")
    )]
    UnknownStatus { value: String },

    #[error("unknown resource type: \"{value}\"")]
    #[diagnostic(
        code(guardrail::tracker::unknown_resource_type),
        help("Valid resource types are: link, doc, image.")
    )]
    UnknownResourceType { value: String },
}
