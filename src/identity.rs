//! Identity atoms.
//!
//! FormId: aggregate identifier
//! ItemId: field-node identifier within a form's item tree
//! CommandId: one requested state transition; also seeds new item identity
//! ActorId: the acting user, named by the surrounding runtime

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InvalidId;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident, $variant:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new(id: Uuid) -> Self {
                Self(id)
            }

            /// Fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn parse_str(s: &str) -> Result<Self, InvalidId> {
                Uuid::parse_str(s).map(Self).map_err(|e| InvalidId::$variant {
                    raw: s.to_owned(),
                    reason: e.to_string(),
                })
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

uuid_id!(
    /// Aggregate identifier, assigned at creation and immutable.
    FormId,
    Form
);

uuid_id!(
    /// Field-node identifier, unique within one form's item tree.
    ItemId,
    Item
);

uuid_id!(
    /// Command identifier, populated by the surrounding runtime.
    CommandId,
    Command
);

// A new item adopts the identity of the command that created it, which keeps
// event replay deterministic without a second id allocation.
impl From<CommandId> for ItemId {
    fn from(id: CommandId) -> ItemId {
        ItemId(id.0)
    }
}

/// Acting user - non-empty string after trimming.
///
/// The runtime names actors; validation only rejects empty/whitespace values.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorId(String);

impl ActorId {
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidId> {
        let s = s.into();
        if s.trim().is_empty() {
            Err(InvalidId::Actor {
                raw: s,
                reason: "empty".into(),
            })
        } else {
            Ok(Self(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[cfg(test)]
    pub fn new_unchecked(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({:?})", self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ActorId {
    type Error = InvalidId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ActorId::new(s)
    }
}

impl From<ActorId> for String {
    fn from(id: ActorId) -> String {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_id_parse_round_trips() {
        let id = FormId::generate();
        let parsed = FormId::parse_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn form_id_parse_rejects_garbage() {
        let err = FormId::parse_str("not-a-uuid").unwrap_err();
        assert!(err.to_string().contains("form id"));
    }

    #[test]
    fn actor_id_rejects_blank() {
        assert!(ActorId::new("").is_err());
        assert!(ActorId::new("   ").is_err());
        assert_eq!(ActorId::new("editor").unwrap().as_str(), "editor");
    }

    #[test]
    fn item_id_inherits_command_id() {
        let cmd = CommandId::generate();
        assert_eq!(ItemId::from(cmd).as_uuid(), cmd.as_uuid());
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = ItemId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
