//! The outbound event fact.

use serde::{Deserialize, Serialize};

use crate::command::{CommandEnvelope, FormCommand};
use crate::identity::{ActorId, CommandId, FormId};

/// The recorded fact that a command was accepted.
///
/// Handed to the external event store; the core never persists it. `version`
/// is the aggregate version after this event (`expected_version + 1`), and
/// `payload` is the exact command payload that was applied, so replaying the
/// event log through [`crate::apply::apply_event`] reproduces the state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormEvent {
    pub aggregate_id: FormId,
    pub command_id: CommandId,
    pub version: u64,
    pub actor: ActorId,
    #[serde(flatten)]
    pub payload: FormCommand,
}

impl FormEvent {
    /// Derives the event fact for an accepted command.
    pub fn from_command(envelope: &CommandEnvelope) -> Self {
        Self {
            aggregate_id: envelope.aggregate_id,
            command_id: envelope.command_id,
            version: envelope.expected_version + 1,
            actor: envelope.actor.clone(),
            payload: envelope.command.clone(),
        }
    }

    /// Short human-readable log line for the history view.
    pub fn message(&self) -> &'static str {
        match self.payload {
            FormCommand::Create(_) => "Form created",
            FormCommand::Edit(_) => "Form edited",
            FormCommand::Delete => "Form deleted",
            FormCommand::AddItem(_) => "Item added to Form",
            FormCommand::EditItem(_) => "Item edited",
            FormCommand::RemoveItem(_) => "Item removed from Form",
            FormCommand::ShiftItem(_) => "Item reordered",
            FormCommand::Clone(_) => "Form duplicated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::FormSettings;

    fn envelope(command: FormCommand) -> CommandEnvelope {
        CommandEnvelope {
            command_id: CommandId::generate(),
            actor: ActorId::new_unchecked("editor"),
            aggregate_id: FormId::generate(),
            expected_version: 3,
            command,
        }
    }

    #[test]
    fn event_carries_the_next_version() {
        let env = envelope(FormCommand::Delete);
        let event = FormEvent::from_command(&env);
        assert_eq!(event.version, 4);
        assert_eq!(event.aggregate_id, env.aggregate_id);
        assert_eq!(event.command_id, env.command_id);
        assert_eq!(event.payload, FormCommand::Delete);
    }

    #[test]
    fn messages_name_the_operation() {
        let create = FormEvent::from_command(&envelope(FormCommand::Create(
            FormSettings::default(),
        )));
        assert_eq!(create.message(), "Form created");
        let delete = FormEvent::from_command(&envelope(FormCommand::Delete));
        assert_eq!(delete.message(), "Form deleted");
    }

    #[test]
    fn event_round_trips_through_json() {
        let event = FormEvent::from_command(&envelope(FormCommand::Delete));
        let json = serde_json::to_string(&event).unwrap();
        let back: FormEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
