//! Command validation and deterministic event application.
//!
//! `handle_command` is the write path: validate against current state, derive
//! the event fact, execute it on a working copy, return both. `apply_event`
//! is the replay path: the same executor, driven straight from the event log.
//! Both are pure functions of their inputs (plus the injected rebuilder), so
//! the surrounding runtime can retry and reject on version conflicts without
//! the core's cooperation.
//!
//! Validation failures never mutate. Execution never fails for a precondition
//! validation enforces; its error paths exist for the replay of a damaged log
//! and for the external rebuild collaborator.

use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::aggregate::Form;
use crate::command::{
    AddItemPayload, ClonePayload, CommandEnvelope, EditItemPayload, FormCommand,
    RemoveItemPayload, ShiftItemPayload,
};
use crate::error::{ApplyError, CommandError, HandleError, RebuildError, Rejection};
use crate::event::FormEvent;
use crate::identity::{ActorId, FormId, ItemId};
use crate::item::{normalize_data_name, Item};
use crate::registry::ItemKindRegistry;
use crate::tree::{locate_mut, shift, ShiftDirection};

/// Historical-state replay, owned by the external runtime.
///
/// Clone seeds a fresh aggregate from another aggregate's state as of an
/// arbitrary past version; how that state is rebuilt (snapshot, full replay)
/// is the collaborator's business.
pub trait AggregateRebuilder {
    fn rebuild(&self, id: FormId, at_version: u64, actor: &ActorId)
        -> Result<Form, RebuildError>;
}

/// Collaborators injected into the handler.
#[derive(Clone, Copy)]
pub struct HandlerContext<'a> {
    pub registry: &'a ItemKindRegistry,
    pub rebuilder: &'a dyn AggregateRebuilder,
}

/// An accepted command: the next state and the fact to persist.
#[derive(Clone, Debug)]
pub struct Applied {
    pub form: Form,
    pub event: FormEvent,
}

/// Validates the command against current state, then executes it on a working
/// copy. The caller's `form` is never touched; the expected-version check and
/// the version increment stay with the runtime.
pub fn handle_command(
    form: &Form,
    envelope: &CommandEnvelope,
    ctx: HandlerContext<'_>,
) -> Result<Applied, HandleError> {
    if let Err(error) = validate(form, &envelope.command, ctx.registry) {
        let rejection = Rejection::new(&error, envelope);
        warn!(
            command = envelope.command.kind(),
            aggregate = %envelope.aggregate_id,
            code = rejection.code.as_str(),
            "command rejected: {}",
            rejection.message,
        );
        return Err(rejection.into());
    }

    let event = FormEvent::from_command(envelope);
    let next = execute(form.clone(), &event, ctx.rebuilder)?;
    debug!(
        command = envelope.command.kind(),
        aggregate = %envelope.aggregate_id,
        version = event.version,
        "{}",
        event.message(),
    );
    Ok(Applied { form: next, event })
}

/// Replays one recorded event onto the state. Used by runtimes that rebuild
/// aggregates from their history; identical semantics to the write path.
pub fn apply_event(
    form: Form,
    event: &FormEvent,
    rebuilder: &dyn AggregateRebuilder,
) -> Result<Form, ApplyError> {
    execute(form, event, rebuilder)
}

/// Checks every precondition for the command without mutating anything.
pub fn validate(
    form: &Form,
    command: &FormCommand,
    registry: &ItemKindRegistry,
) -> Result<(), CommandError> {
    match command {
        FormCommand::Create(settings) => {
            if form.version != 0 {
                return Err(CommandError::AggregateExists);
            }
            let titled = settings
                .title
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty());
            if !titled {
                return Err(CommandError::TitleMissing);
            }
            Ok(())
        }
        FormCommand::Edit(_) | FormCommand::Delete => Ok(()),
        FormCommand::AddItem(payload) => {
            let item_name = payload
                .item_name
                .as_deref()
                .ok_or(CommandError::ItemNameMissing)?;
            if payload.data.is_none() {
                return Err(CommandError::DataMissing);
            }
            if !registry.contains(item_name) {
                return Err(CommandError::ItemKindUnknown(item_name.to_owned()));
            }
            if let Some(parent) = payload.parent {
                let parent_item = form
                    .item(parent)
                    .ok_or(CommandError::ItemNotFound { uuid: parent })?;
                let container = registry
                    .get(&parent_item.item_name)
                    .is_some_and(|d| d.accepts_children);
                if !container {
                    return Err(CommandError::ChildrenNotAccepted(
                        parent_item.item_name.clone(),
                    ));
                }
            }
            Ok(())
        }
        FormCommand::EditItem(payload) => {
            let uuid = payload
                .uuid
                .ok_or(CommandError::TargetMissing { action: "edit" })?;
            if payload.data.is_none() {
                return Err(CommandError::DataMissing);
            }
            if !form.has_item(uuid) {
                return Err(CommandError::ItemNotFound { uuid });
            }
            Ok(())
        }
        FormCommand::RemoveItem(payload) => {
            let uuid = payload
                .uuid
                .ok_or(CommandError::TargetMissing { action: "remove" })?;
            if !form.has_item(uuid) {
                return Err(CommandError::ItemNotFound { uuid });
            }
            Ok(())
        }
        FormCommand::ShiftItem(payload) => {
            let uuid = payload
                .uuid
                .ok_or(CommandError::TargetMissing { action: "shift" })?;
            if !form.has_item(uuid) {
                return Err(CommandError::ItemNotFound { uuid });
            }
            let direction = payload
                .direction
                .as_deref()
                .ok_or(CommandError::DirectionMissing)?;
            ShiftDirection::parse(direction)?;
            Ok(())
        }
        FormCommand::Clone(payload) => {
            if form.version != 0 {
                return Err(CommandError::AggregateExists);
            }
            if payload.original_uuid.is_none() || payload.original_version.is_none() {
                return Err(CommandError::CloneSourceMissing);
            }
            Ok(())
        }
    }
}

fn execute(
    mut form: Form,
    event: &FormEvent,
    rebuilder: &dyn AggregateRebuilder,
) -> Result<Form, ApplyError> {
    match &event.payload {
        FormCommand::Create(settings) | FormCommand::Edit(settings) => {
            settings.apply_to(&mut form);
            Ok(form)
        }
        FormCommand::Delete => {
            form.deleted = true;
            Ok(form)
        }
        FormCommand::AddItem(payload) => exec_add_item(form, payload, event),
        FormCommand::EditItem(payload) => exec_edit_item(form, payload),
        FormCommand::RemoveItem(payload) => exec_remove_item(form, payload),
        FormCommand::ShiftItem(payload) => exec_shift_item(form, payload),
        FormCommand::Clone(payload) => exec_clone(form, payload, event, rebuilder),
    }
}

fn exec_add_item(
    mut form: Form,
    payload: &AddItemPayload,
    event: &FormEvent,
) -> Result<Form, ApplyError> {
    let item_name = payload.item_name.clone().ok_or(ApplyError::PayloadField {
        kind: "add_item",
        field: "itemName",
    })?;
    let mut data = payload.data.clone().ok_or(ApplyError::PayloadField {
        kind: "add_item",
        field: "data",
    })?;
    normalize_data_name(&mut data);

    // The command id becomes the new node's identity; replay allocates nothing.
    let new_item = Item::new(ItemId::from(event.command_id), item_name, data);

    match payload.parent {
        Some(parent) => {
            let mut located =
                locate_mut(&mut form.items, parent).ok_or(ApplyError::TargetVanished {
                    kind: "add_item",
                    uuid: parent,
                })?;
            located.item().children_mut().push(new_item);
        }
        None => form.items.push(new_item),
    }
    Ok(form)
}

fn exec_edit_item(mut form: Form, payload: &EditItemPayload) -> Result<Form, ApplyError> {
    let uuid = payload.uuid.ok_or(ApplyError::PayloadField {
        kind: "edit_item",
        field: "uuid",
    })?;
    let mut data = payload.data.clone().ok_or(ApplyError::PayloadField {
        kind: "edit_item",
        field: "data",
    })?;
    normalize_data_name(&mut data);

    let mut located = locate_mut(&mut form.items, uuid).ok_or(ApplyError::TargetVanished {
        kind: "edit_item",
        uuid,
    })?;
    // Shallow merge: payload keys override, everything else stays.
    let item = located.item();
    for (key, value) in data {
        item.data.insert(key, value);
    }
    Ok(form)
}

fn exec_remove_item(mut form: Form, payload: &RemoveItemPayload) -> Result<Form, ApplyError> {
    let uuid = payload.uuid.ok_or(ApplyError::PayloadField {
        kind: "remove_item",
        field: "uuid",
    })?;
    let located = locate_mut(&mut form.items, uuid).ok_or(ApplyError::TargetVanished {
        kind: "remove_item",
        uuid,
    })?;
    // Vec::remove keeps the remaining siblings dense and in order.
    located.siblings.remove(located.index);
    Ok(form)
}

fn exec_shift_item(mut form: Form, payload: &ShiftItemPayload) -> Result<Form, ApplyError> {
    let uuid = payload.uuid.ok_or(ApplyError::PayloadField {
        kind: "shift_item",
        field: "uuid",
    })?;
    let raw = payload.direction.as_deref().ok_or(ApplyError::PayloadField {
        kind: "shift_item",
        field: "direction",
    })?;
    let direction =
        ShiftDirection::parse(raw).map_err(|_| ApplyError::DirectionInvalid(raw.to_owned()))?;

    let located = locate_mut(&mut form.items, uuid).ok_or(ApplyError::TargetVanished {
        kind: "shift_item",
        uuid,
    })?;
    shift(located.siblings, located.index, direction);
    Ok(form)
}

fn exec_clone(
    form: Form,
    payload: &ClonePayload,
    event: &FormEvent,
    rebuilder: &dyn AggregateRebuilder,
) -> Result<Form, ApplyError> {
    let source_id = payload.original_uuid.ok_or(ApplyError::PayloadField {
        kind: "clone",
        field: "originalUuid",
    })?;
    let source_version = payload.original_version.ok_or(ApplyError::PayloadField {
        kind: "clone",
        field: "originalVersion",
    })?;

    // The source's historical state seeds the new aggregate wholesale.
    let mut seed = rebuilder.rebuild(source_id, source_version, &event.actor)?;
    seed.title = seed.title.map(|title| format!("{title} duplicate"));

    // Adopt the target's identity; version bookkeeping stays with the runtime.
    seed.uuid = event.aggregate_id;
    seed.version = form.version;
    let now = OffsetDateTime::now_utc();
    seed.created = now;
    seed.modified = now;
    Ok(seed)
}
