//! Error surfaces (parsing, validation, replay invariants).
//!
//! These are bounded and stable: command errors represent user-facing refusal
//! states, apply errors represent upstream invariant violations that a
//! well-behaved runtime never produces.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::CommandEnvelope;
use crate::identity::{CommandId, FormId, ItemId};

/// Invalid identifier.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum InvalidId {
    #[error("form id `{raw}` is invalid: {reason}")]
    Form { raw: String, reason: String },
    #[error("item id `{raw}` is invalid: {reason}")]
    Item { raw: String, reason: String },
    #[error("command id `{raw}` is invalid: {reason}")]
    Command { raw: String, reason: String },
    #[error("actor id `{raw}` is invalid: {reason}")]
    Actor { raw: String, reason: String },
}

/// Rejection class carried on the message channel back to the caller.
///
/// `BadRequest` covers malformed or missing payload fields; `Conflict` covers
/// state-dependent refusals (aggregate already exists, item not found).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    Conflict,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "bad_request",
            ErrorCode::Conflict => "conflict",
        }
    }

    /// Numeric code used by the surrounding transport layer.
    pub fn as_u16(self) -> u16 {
        match self {
            ErrorCode::BadRequest => 400,
            ErrorCode::Conflict => 409,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete validation failure. One variant per precondition, so callers
/// and tests can tell exactly which check refused the command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommandError {
    #[error("aggregate already exists")]
    AggregateExists,
    #[error("you must enter a title")]
    TitleMissing,
    #[error("no item type set")]
    ItemNameMissing,
    #[error("unknown item type `{0}`")]
    ItemKindUnknown(String),
    #[error("item type `{0}` does not accept child items")]
    ChildrenNotAccepted(String),
    #[error("no data set")]
    DataMissing,
    #[error("no uuid to {action} is set")]
    TargetMissing { action: &'static str },
    #[error("item with uuid {uuid} was not found")]
    ItemNotFound { uuid: ItemId },
    #[error("shift direction is not set")]
    DirectionMissing,
    #[error("`{0}` is not a shift direction")]
    DirectionInvalid(String),
    #[error("you must provide an original uuid and version")]
    CloneSourceMissing,
}

impl CommandError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CommandError::AggregateExists | CommandError::ItemNotFound { .. } => {
                ErrorCode::Conflict
            }
            _ => ErrorCode::BadRequest,
        }
    }
}

/// Validation outcome reported back over the message channel.
///
/// Carries enough context for the runtime to route the refusal to the right
/// caller without consulting the command log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("command {command_id} on form {aggregate_id} rejected: {message}")]
pub struct Rejection {
    pub message: String,
    pub code: ErrorCode,
    pub command_id: CommandId,
    pub aggregate_id: FormId,
}

impl Rejection {
    pub fn new(error: &CommandError, envelope: &CommandEnvelope) -> Self {
        Self {
            message: error.to_string(),
            code: error.code(),
            command_id: envelope.command_id,
            aggregate_id: envelope.aggregate_id,
        }
    }
}

/// Historical-state rebuild failure, surfaced by the external replay
/// collaborator during Clone.
#[derive(Debug, Error, Clone)]
#[error("failed to rebuild form {id} at version {version}: {reason}")]
pub struct RebuildError {
    pub id: FormId,
    pub version: u64,
    pub reason: String,
}

/// Replay/application defect. None of these fire for a command that passed
/// validation; on the replay path they mean the event log itself is damaged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApplyError {
    #[error("{kind} event payload is missing `{field}`")]
    PayloadField {
        kind: &'static str,
        field: &'static str,
    },
    #[error("{kind} event targets item {uuid}, which is not in the tree")]
    TargetVanished { kind: &'static str, uuid: ItemId },
    #[error("`{0}` is not a shift direction")]
    DirectionInvalid(String),
    #[error(transparent)]
    Rebuild(#[from] RebuildError),
}

/// Everything `handle_command` can refuse with.
#[derive(Debug, Error)]
pub enum HandleError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Apply(#[from] ApplyError),
}

impl HandleError {
    /// The rejection, if this was a validation refusal.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            HandleError::Rejected(r) => Some(r),
            HandleError::Apply(_) => None,
        }
    }
}
