//! Inbound command shapes.
//!
//! Payload fields are all optional: a command with a missing field must reach
//! validation so the caller gets a discrete, user-facing refusal ("no item
//! type set") rather than a deserialization error. Wire keys are camelCase,
//! matching the admin UI that produces them.

use serde::{Deserialize, Serialize};

use crate::aggregate::Form;
use crate::identity::{ActorId, CommandId, FormId, ItemId};
use crate::item::ItemData;

/// Form-level settings patch, used by both Create and Edit.
///
/// `Some` overwrites, `None` leaves the current value untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormSettings {
    pub title: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "emailCC")]
    pub email_cc: Option<String>,
    #[serde(rename = "emailBCC")]
    pub email_bcc: Option<String>,
    pub sender: Option<String>,
    pub time_limit: Option<u32>,
    pub time_limit_message: Option<String>,
    pub template: Option<String>,
    pub email_template: Option<String>,
    pub email_template_copy: Option<String>,
    pub html: Option<bool>,
    pub success_text: Option<String>,
    pub save_submissions: Option<bool>,
    pub track_submissions: Option<bool>,
    pub disable_csrf_protection: Option<bool>,
}

impl FormSettings {
    /// Overwrites every present field on the form; absent fields keep their
    /// current values.
    pub fn apply_to(&self, form: &mut Form) {
        macro_rules! patch {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = &self.$field {
                    form.$field = Some(value.clone());
                })*
            };
        }
        patch!(
            title,
            email,
            email_cc,
            email_bcc,
            sender,
            time_limit,
            time_limit_message,
            template,
            email_template,
            email_template_copy,
            html,
            success_text,
            save_submissions,
            track_submissions,
            disable_csrf_protection,
        );
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddItemPayload {
    /// Kind tag; must resolve in the injected item-kind registry.
    pub item_name: Option<String>,
    pub data: Option<ItemData>,
    /// Target parent; absent means append at the root.
    pub parent: Option<ItemId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditItemPayload {
    pub uuid: Option<ItemId>,
    pub data: Option<ItemData>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveItemPayload {
    pub uuid: Option<ItemId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftItemPayload {
    pub uuid: Option<ItemId>,
    /// Raw direction string; parsed (and refused) during validation so bad
    /// values surface as rejections, not decode errors.
    pub direction: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClonePayload {
    pub original_uuid: Option<FormId>,
    pub original_version: Option<u64>,
}

/// The closed set of operations a form aggregate understands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum FormCommand {
    Create(FormSettings),
    Edit(FormSettings),
    Delete,
    AddItem(AddItemPayload),
    EditItem(EditItemPayload),
    RemoveItem(RemoveItemPayload),
    ShiftItem(ShiftItemPayload),
    Clone(ClonePayload),
}

impl FormCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            FormCommand::Create(_) => "create",
            FormCommand::Edit(_) => "edit",
            FormCommand::Delete => "delete",
            FormCommand::AddItem(_) => "add_item",
            FormCommand::EditItem(_) => "edit_item",
            FormCommand::RemoveItem(_) => "remove_item",
            FormCommand::ShiftItem(_) => "shift_item",
            FormCommand::Clone(_) => "clone",
        }
    }
}

/// One requested state transition, fully addressed.
///
/// `command_id`, `actor`, and `expected_version` are populated by the
/// surrounding runtime; the core carries `expected_version` into the event
/// fact but leaves the optimistic-concurrency check to the runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEnvelope {
    pub command_id: CommandId,
    pub actor: ActorId,
    pub aggregate_id: FormId,
    pub expected_version: u64,
    #[serde(flatten)]
    pub command: FormCommand,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::FormId;
    use serde_json::json;

    #[test]
    fn settings_patch_overwrites_only_present_fields() {
        let mut form = Form::new(FormId::generate());
        form.title = Some("Contact".into());
        form.email = Some("old@example.com".into());

        let patch = FormSettings {
            email: Some("new@example.com".into()),
            html: Some(true),
            ..FormSettings::default()
        };
        patch.apply_to(&mut form);

        assert_eq!(form.title.as_deref(), Some("Contact"));
        assert_eq!(form.email.as_deref(), Some("new@example.com"));
        assert_eq!(form.html, Some(true));
    }

    #[test]
    fn commands_deserialize_from_tagged_json() {
        let value = json!({
            "kind": "shift_item",
            "payload": { "uuid": null, "direction": "sideways" }
        });
        let cmd: FormCommand = serde_json::from_value(value).unwrap();
        match cmd {
            FormCommand::ShiftItem(p) => {
                assert!(p.uuid.is_none());
                assert_eq!(p.direction.as_deref(), Some("sideways"));
            }
            other => panic!("wrong command: {other:?}"),
        }
    }

    #[test]
    fn missing_payload_fields_still_deserialize() {
        let value = json!({ "kind": "add_item", "payload": {} });
        let cmd: FormCommand = serde_json::from_value(value).unwrap();
        assert_eq!(cmd, FormCommand::AddItem(AddItemPayload::default()));
    }

    #[test]
    fn settings_use_wire_field_names() {
        let value = json!({
            "title": "Contact",
            "emailCC": "cc@example.com",
            "timeLimit": 5,
            "successText": "Thanks!"
        });
        let settings: FormSettings = serde_json::from_value(value).unwrap();
        assert_eq!(settings.email_cc.as_deref(), Some("cc@example.com"));
        assert_eq!(settings.time_limit, Some(5));
        assert_eq!(settings.success_text.as_deref(), Some("Thanks!"));
    }
}
