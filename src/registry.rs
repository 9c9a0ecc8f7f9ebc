//! Item-kind registry.
//!
//! The set of field kinds a form may contain is configuration, not code: the
//! surrounding application decides which kinds exist and what widgets render
//! them. The core only needs the small behavioral slice that affects tree
//! mutation, so callers inject an explicit registry instead of the core
//! consulting ambient configuration.

use std::collections::BTreeMap;

/// Mutation-relevant behavior of one item kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemKindDescriptor {
    /// Icon hint for admin UIs; opaque here.
    pub icon: &'static str,
    /// Whether nodes of this kind may own a child collection.
    pub accepts_children: bool,
}

impl ItemKindDescriptor {
    pub fn leaf(icon: &'static str) -> Self {
        Self {
            icon,
            accepts_children: false,
        }
    }

    pub fn container(icon: &'static str) -> Self {
        Self {
            icon,
            accepts_children: true,
        }
    }
}

/// Injected mapping from item-kind tag to its descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemKindRegistry {
    kinds: BTreeMap<String, ItemKindDescriptor>,
}

impl ItemKindRegistry {
    /// Empty registry; every AddItem will be refused until kinds are added.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stock field kinds. Only `group` owns children.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register("text", ItemKindDescriptor::leaf("pencil"));
        registry.register("textarea", ItemKindDescriptor::leaf("align-left"));
        registry.register("email", ItemKindDescriptor::leaf("at"));
        registry.register("choice", ItemKindDescriptor::leaf("list"));
        registry.register("checkbox", ItemKindDescriptor::leaf("check-square"));
        registry.register("hidden", ItemKindDescriptor::leaf("eye-slash"));
        registry.register("entity", ItemKindDescriptor::leaf("database"));
        registry.register("group", ItemKindDescriptor::container("object-group"));
        registry.register("markup", ItemKindDescriptor::leaf("code"));
        registry.register("submit", ItemKindDescriptor::leaf("paper-plane"));
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, descriptor: ItemKindDescriptor) {
        self.kinds.insert(name.into(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&ItemKindDescriptor> {
        self.kinds.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }
}
