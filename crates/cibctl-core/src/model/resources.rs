//! Read-only view of the `<resources>` section

use std::collections::BTreeMap;

/// Resource element kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Primitive,
    Group,
    Clone,
    Master,
    Bundle,
}

impl ResourceKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "primitive" => Some(ResourceKind::Primitive),
            "group" => Some(ResourceKind::Group),
            "clone" => Some(ResourceKind::Clone),
            "master" => Some(ResourceKind::Master),
            "bundle" => Some(ResourceKind::Bundle),
            _ => None,
        }
    }

    /// Clone and master wrap other resources and are addressed by their own id
    pub fn is_clone_like(self) -> bool {
        matches!(self, ResourceKind::Clone | ResourceKind::Master)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub kind: ResourceKind,
    /// Id of the enclosing resource element, if any
    pub parent: Option<String>,
}

/// Resource ids with their kind and enclosing resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceIndex {
    entries: BTreeMap<String, ResourceEntry>,
}

impl ResourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, kind: ResourceKind, parent: Option<&str>) {
        self.entries.insert(
            id.into(),
            ResourceEntry {
                kind,
                parent: parent.map(str::to_string),
            },
        );
    }

    pub fn get(&self, id: &str) -> Option<&ResourceEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clone or master directly enclosing `id`, returned with its kind
    pub fn clone_like_parent(&self, id: &str) -> Option<(&str, ResourceKind)> {
        let parent_id = self.entries.get(id)?.parent.as_deref()?;
        let parent = self.entries.get(parent_id)?;
        parent
            .kind
            .is_clone_like()
            .then_some((parent_id, parent.kind))
    }

    /// Nearest clone or master ancestor of a primitive or group
    pub fn clone_like_ancestor(&self, id: &str) -> Option<&str> {
        let entry = self.entries.get(id)?;
        if !matches!(entry.kind, ResourceKind::Primitive | ResourceKind::Group) {
            return None;
        }
        let mut current = entry.parent.as_deref();
        while let Some(ancestor_id) = current {
            let ancestor = self.entries.get(ancestor_id)?;
            if ancestor.kind.is_clone_like() {
                return Some(ancestor_id);
            }
            current = ancestor.parent.as_deref();
        }
        None
    }
}
