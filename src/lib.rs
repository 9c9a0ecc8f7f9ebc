//! Event-sourced mutation core for nested form-field trees.
//!
//! Module hierarchy follows type dependency order:
//! - identity: FormId, ItemId, CommandId, ActorId atoms
//! - item: the Item tree node and field-name normalization
//! - registry: injected item-kind descriptors
//! - tree: locate/mutate primitives and sibling reordering
//! - aggregate: the Form aggregate state
//! - command: payloads, the FormCommand sum type, inbound envelope
//! - event: the outbound FormEvent fact
//! - apply: validate/execute/handle_command and event replay
//!
//! The crate is the pure half of a CQRS pair: it turns
//! `(current state, command)` into `(new state, event fact)` or a rejection.
//! Persistence, optimistic concurrency, and replay orchestration belong to
//! the surrounding runtime, which it reaches only through the
//! [`AggregateRebuilder`] boundary trait.

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod apply;
pub mod command;
pub mod error;
pub mod event;
pub mod identity;
pub mod item;
pub mod registry;
pub mod tree;

pub use aggregate::Form;
pub use apply::{apply_event, handle_command, AggregateRebuilder, Applied, HandlerContext};
pub use command::{
    AddItemPayload, ClonePayload, CommandEnvelope, EditItemPayload, FormCommand, FormSettings,
    RemoveItemPayload, ShiftItemPayload,
};
pub use error::{
    ApplyError, CommandError, ErrorCode, HandleError, InvalidId, RebuildError, Rejection,
};
pub use event::FormEvent;
pub use identity::{ActorId, CommandId, FormId, ItemId};
pub use item::{normalize_name, Item, ItemData};
pub use registry::{ItemKindDescriptor, ItemKindRegistry};
pub use tree::{find, find_path, locate_mut, shift, Located, ShiftDirection};
