//! Minimal stand-in for the external event-sourcing runtime: serializes
//! commands per aggregate, enforces the expected-version check, performs the
//! version increment from the event fact, keeps the event log, and rebuilds
//! historical state by replay.

use std::collections::BTreeMap;

use serde_json::json;

use formloom::{
    apply_event, handle_command, AddItemPayload, AggregateRebuilder, ActorId, Applied,
    CommandEnvelope, CommandId, Form, FormCommand, FormEvent, FormId, FormSettings,
    HandleError, HandlerContext, ItemData, ItemId, ItemKindRegistry, RebuildError,
};

pub struct TestRuntime {
    registry: ItemKindRegistry,
    forms: BTreeMap<FormId, Form>,
    log: Vec<FormEvent>,
}

impl TestRuntime {
    pub fn new() -> Self {
        Self {
            registry: ItemKindRegistry::standard(),
            forms: BTreeMap::new(),
            log: Vec::new(),
        }
    }

    pub fn form(&self, id: FormId) -> &Form {
        self.forms.get(&id).expect("form not materialized")
    }

    pub fn version(&self, id: FormId) -> u64 {
        self.forms.get(&id).map_or(0, |form| form.version)
    }

    pub fn envelope(&self, aggregate_id: FormId, command: FormCommand) -> CommandEnvelope {
        CommandEnvelope {
            command_id: CommandId::generate(),
            actor: ActorId::new("editor".to_owned()).expect("actor"),
            aggregate_id,
            expected_version: self.version(aggregate_id),
            command,
        }
    }

    /// Full runtime round: expected-version check, handler, increment, log.
    pub fn dispatch(&mut self, envelope: CommandEnvelope) -> Result<FormEvent, HandleError> {
        let current = self
            .forms
            .get(&envelope.aggregate_id)
            .cloned()
            .unwrap_or_else(|| Form::new(envelope.aggregate_id));
        assert_eq!(
            envelope.expected_version, current.version,
            "version conflict must be caught before the handler runs"
        );

        let ctx = HandlerContext {
            registry: &self.registry,
            rebuilder: &*self,
        };
        let Applied { mut form, event } = handle_command(&current, &envelope, ctx)?;

        form.version = event.version;
        self.forms.insert(envelope.aggregate_id, form);
        self.log.push(event.clone());
        Ok(event)
    }

    pub fn send(&mut self, aggregate_id: FormId, command: FormCommand) -> FormEvent {
        let envelope = self.envelope(aggregate_id, command);
        self.dispatch(envelope).expect("command accepted")
    }

    pub fn send_err(&mut self, aggregate_id: FormId, command: FormCommand) -> HandleError {
        let envelope = self.envelope(aggregate_id, command);
        self.dispatch(envelope).expect_err("command rejected")
    }

    pub fn create(&mut self, title: &str) -> FormId {
        let id = FormId::generate();
        self.send(
            id,
            FormCommand::Create(FormSettings {
                title: Some(title.to_owned()),
                ..FormSettings::default()
            }),
        );
        id
    }

    /// Adds an item and returns its id (the command id, per the core's
    /// deterministic-identity rule).
    pub fn add_item(
        &mut self,
        form_id: FormId,
        kind: &str,
        name: &str,
        parent: Option<ItemId>,
    ) -> ItemId {
        let mut data = ItemData::new();
        data.insert("name".to_owned(), json!(name));
        let event = self.send(
            form_id,
            FormCommand::AddItem(AddItemPayload {
                item_name: Some(kind.to_owned()),
                data: Some(data),
                parent,
            }),
        );
        ItemId::from(event.command_id)
    }
}

impl AggregateRebuilder for TestRuntime {
    fn rebuild(
        &self,
        id: FormId,
        at_version: u64,
        _actor: &ActorId,
    ) -> Result<Form, RebuildError> {
        let history: Vec<&FormEvent> = self
            .log
            .iter()
            .filter(|event| event.aggregate_id == id && event.version <= at_version)
            .collect();
        if history.is_empty() {
            return Err(RebuildError {
                id,
                version: at_version,
                reason: "no events recorded".to_owned(),
            });
        }

        let mut form = Form::new(id);
        for event in history {
            form = apply_event(form, event, self).map_err(|err| RebuildError {
                id,
                version: at_version,
                reason: err.to_string(),
            })?;
            form.version = event.version;
        }
        Ok(form)
    }
}
