//! Tree locate/mutate primitives and sibling reordering.
//!
//! Every item-scoped command needs "find the node and get hold of the exact
//! collection it lives in": removal and reordering rewrite that specific
//! collection, not a copy. Instead of threading aliased mutable references
//! through a recursive callback, location happens in two phases: an immutable
//! pre-order [`find_path`], then a mutable descent along that path. The
//! result is the owning collection plus the node's index within it.

use serde::{Deserialize, Serialize};

use crate::error::CommandError;
use crate::identity::ItemId;
use crate::item::Item;

/// A located node: the ordered collection that directly contains it, and its
/// current index there.
#[derive(Debug)]
pub struct Located<'a> {
    pub siblings: &'a mut Vec<Item>,
    pub index: usize,
}

impl<'a> Located<'a> {
    pub fn item(&mut self) -> &mut Item {
        &mut self.siblings[self.index]
    }
}

/// Pre-order search for the node with the given id.
pub fn find<'a>(items: &'a [Item], uuid: ItemId) -> Option<&'a Item> {
    for item in items {
        if item.uuid == uuid {
            return Some(item);
        }
        if let Some(found) = find(item.children(), uuid) {
            return Some(found);
        }
    }
    None
}

/// Pre-order search returning the index path from the root collection to the
/// node: all elements but the last select a parent, the last is the node's
/// index in its owning collection.
pub fn find_path(items: &[Item], uuid: ItemId) -> Option<Vec<usize>> {
    for (index, item) in items.iter().enumerate() {
        if item.uuid == uuid {
            return Some(vec![index]);
        }
        if let Some(mut path) = find_path(item.children(), uuid) {
            path.insert(0, index);
            return Some(path);
        }
    }
    None
}

/// Locates the node and hands back its owning collection by mutable view.
///
/// Returns None when no node matches; ids are unique per tree, so the first
/// pre-order match is the only one.
pub fn locate_mut(items: &mut Vec<Item>, uuid: ItemId) -> Option<Located<'_>> {
    let path = find_path(items, uuid)?;
    let (&index, parents) = path.split_last()?;
    let mut siblings = items;
    for &parent in parents {
        siblings = siblings.get_mut(parent)?.items.as_mut()?;
    }
    Some(Located { siblings, index })
}

/// Which neighbor a node swaps with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftDirection {
    Up,
    Down,
}

impl ShiftDirection {
    pub fn parse(raw: &str) -> Result<Self, CommandError> {
        match raw {
            "up" => Ok(ShiftDirection::Up),
            "down" => Ok(ShiftDirection::Down),
            other => Err(CommandError::DirectionInvalid(other.to_owned())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftDirection::Up => "up",
            ShiftDirection::Down => "down",
        }
    }
}

/// Swaps the node at `index` with its predecessor (`Up`) or successor
/// (`Down`). Attempts past either end of the collection are silent no-ops;
/// both swapped nodes keep their identity, data, and children untouched.
pub fn shift(siblings: &mut [Item], index: usize, direction: ShiftDirection) {
    match direction {
        ShiftDirection::Up => {
            if index > 0 && index < siblings.len() {
                siblings.swap(index, index - 1);
            }
        }
        ShiftDirection::Down => {
            if index + 1 < siblings.len() {
                siblings.swap(index, index + 1);
            }
        }
    }
}
