//! The Form aggregate state.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::identity::{FormId, ItemId};
use crate::item::Item;
use crate::tree;

/// Authoritative state for one form, rebuilt by the external runtime from its
/// event history.
///
/// Handlers treat a `Form` as a working copy: they never write `version`
/// (the runtime increments it from the event fact) and never remove history.
/// Deletion is the `deleted` flag, not physical removal, so the settings and
/// item tree stay inspectable in history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub uuid: FormId,
    /// Count of operations applied so far; 0 means the aggregate does not
    /// exist yet. Incremented by the runtime, one per accepted command.
    pub version: u64,

    pub title: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "emailCC")]
    pub email_cc: Option<String>,
    #[serde(rename = "emailBCC")]
    pub email_bcc: Option<String>,
    pub sender: Option<String>,
    /// Minimum seconds between render and submit; a spam tripwire enforced by
    /// the rendering layer.
    pub time_limit: Option<u32>,
    pub time_limit_message: Option<String>,
    pub template: Option<String>,
    pub email_template: Option<String>,
    pub email_template_copy: Option<String>,
    /// HTML mail when true, plain text otherwise.
    pub html: Option<bool>,
    pub success_text: Option<String>,
    pub save_submissions: Option<bool>,
    pub track_submissions: Option<bool>,
    pub disable_csrf_protection: Option<bool>,

    pub deleted: bool,
    /// Root item collection; sibling order is render order.
    pub items: Vec<Item>,

    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub modified: OffsetDateTime,
}

impl Form {
    /// Empty aggregate at version 0; everything else arrives via commands.
    pub fn new(uuid: FormId) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            uuid,
            version: 0,
            title: None,
            email: None,
            email_cc: None,
            email_bcc: None,
            sender: None,
            time_limit: None,
            time_limit_message: None,
            template: None,
            email_template: None,
            email_template_copy: None,
            html: None,
            success_text: None,
            save_submissions: None,
            track_submissions: None,
            disable_csrf_protection: None,
            deleted: false,
            items: Vec::new(),
            created: now,
            modified: now,
        }
    }

    /// Pre-order lookup across the whole item tree.
    pub fn item(&self, uuid: ItemId) -> Option<&Item> {
        tree::find(&self.items, uuid)
    }

    pub fn has_item(&self, uuid: ItemId) -> bool {
        self.item(uuid).is_some()
    }

    /// All item ids in the tree, pre-order.
    pub fn item_ids(&self) -> Vec<ItemId> {
        fn walk(items: &[Item], out: &mut Vec<ItemId>) {
            for item in items {
                out.push(item.uuid);
                walk(item.children(), out);
            }
        }
        let mut out = Vec::new();
        walk(&self.items, &mut out);
        out
    }
}
