//! Arena-backed constraint tree
//!
//! Every element of the `<constraints>` section is a node addressed by a
//! stable [`NodeId`]. Nodes carry explicit parent links and an ordered child
//! list; lookups by tag go through an index instead of walking the tree.
//! Removing a node frees its whole subtree; freed ids are never reused.

use std::collections::HashMap;

use crate::model::{
    ColocationConstraint, LocationConstraint, OrderConstraint, RawElement, ResourceRef,
    ResourceSet, Rule, TicketConstraint,
};

/// Handle to a node in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Element kinds the document indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Constraints,
    Location,
    Order,
    Colocation,
    Ticket,
    ResourceSet,
    ResourceRef,
    Rule,
    Other,
}

impl Tag {
    /// XML element name; `None` for raw elements, which keep their own
    pub fn element_name(self) -> Option<&'static str> {
        match self {
            Tag::Constraints => Some("constraints"),
            Tag::Location => Some("rsc_location"),
            Tag::Order => Some("rsc_order"),
            Tag::Colocation => Some("rsc_colocation"),
            Tag::Ticket => Some("rsc_ticket"),
            Tag::ResourceSet => Some("resource_set"),
            Tag::ResourceRef => Some("resource_ref"),
            Tag::Rule => Some("rule"),
            Tag::Other => None,
        }
    }

    pub fn from_element_name(name: &str) -> Tag {
        match name {
            "constraints" => Tag::Constraints,
            "rsc_location" => Tag::Location,
            "rsc_order" => Tag::Order,
            "rsc_colocation" => Tag::Colocation,
            "rsc_ticket" => Tag::Ticket,
            "resource_set" => Tag::ResourceSet,
            "resource_ref" => Tag::ResourceRef,
            "rule" => Tag::Rule,
            _ => Tag::Other,
        }
    }
}

/// Typed payload of a document node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Constraints,
    Location(LocationConstraint),
    Order(OrderConstraint),
    Colocation(ColocationConstraint),
    Ticket(TicketConstraint),
    ResourceSet(ResourceSet),
    ResourceRef(ResourceRef),
    Rule(Rule),
    Other(RawElement),
}

impl Element {
    pub fn tag(&self) -> Tag {
        match self {
            Element::Constraints => Tag::Constraints,
            Element::Location(_) => Tag::Location,
            Element::Order(_) => Tag::Order,
            Element::Colocation(_) => Tag::Colocation,
            Element::Ticket(_) => Tag::Ticket,
            Element::ResourceSet(_) => Tag::ResourceSet,
            Element::ResourceRef(_) => Tag::ResourceRef,
            Element::Rule(_) => Tag::Rule,
            Element::Other(_) => Tag::Other,
        }
    }

    /// The element's own identifier
    ///
    /// `resource_ref` ids point at a resource and are not reported here.
    pub fn id(&self) -> Option<&str> {
        match self {
            Element::Constraints | Element::ResourceRef(_) => None,
            Element::Location(c) => Some(c.id.as_str()),
            Element::Order(c) => Some(c.id.as_str()),
            Element::Colocation(c) => Some(c.id.as_str()),
            Element::Ticket(c) => Some(c.id.as_str()),
            Element::ResourceSet(s) => Some(s.id.as_str()),
            Element::Rule(r) => Some(r.id.as_str()),
            Element::Other(raw) => raw.id(),
        }
    }

    /// Read any attribute by wire name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Element::Constraints => None,
            Element::Location(c) => c.attribute(name),
            Element::Order(c) => c.attribute(name),
            Element::Colocation(c) => c.attribute(name),
            Element::Ticket(c) => c.attribute(name),
            Element::ResourceSet(s) => s.attribute(name),
            Element::ResourceRef(r) => (name == "id").then_some(r.id.as_str()),
            Element::Rule(r) => r.attribute(name),
            Element::Other(raw) => raw.attribute(name),
        }
    }

    /// Every id owned by the element, nested rule content included
    fn collect_ids(&self, out: &mut Vec<String>) {
        match self {
            Element::Rule(rule) => rule.collect_ids(out),
            Element::Other(raw) => raw.collect_ids(out),
            other => {
                if let Some(id) = other.id() {
                    out.push(id.to_string());
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// The constraint section as an arena tree rooted at `<constraints>`
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    by_tag: HashMap<Tag, Vec<NodeId>>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty `<constraints>` section
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            by_tag: HashMap::new(),
            root: NodeId(0),
        };
        doc.root = doc.insert(Element::Constraints, None);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn insert(&mut self, element: Element, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.by_tag.entry(element.tag()).or_default().push(id);
        self.nodes.push(Some(Node {
            element,
            parent,
            children: Vec::new(),
        }));
        id
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Append `element` as the last child of `parent`
    ///
    /// Returns `None` when `parent` has been removed.
    pub fn append_child(&mut self, parent: NodeId, element: Element) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.insert(element, Some(parent));
        self.node_mut(parent)?.children.push(id);
        Some(id)
    }

    /// Append a top-level constraint
    pub fn append_constraint(&mut self, element: Element) -> NodeId {
        let root = self.root;
        let id = self.insert(element, Some(root));
        if let Some(node) = self.node_mut(root) {
            node.children.push(id);
        }
        id
    }

    /// Detach `id` from its parent and free its subtree
    ///
    /// The root cannot be removed. Returns whether anything was removed.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.contains(id) {
            return false;
        }
        if let Some(parent) = self.parent(id) {
            if let Some(node) = self.node_mut(parent) {
                node.children.retain(|child| *child != id);
            }
        }
        self.free_subtree(id);
        true
    }

    fn free_subtree(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        if let Some(ids) = self.by_tag.get_mut(&node.element.tag()) {
            ids.retain(|other| *other != id);
        }
        for child in node.children {
            self.free_subtree(child);
        }
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).map(|n| &n.element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.node_mut(id).map(|n| &mut n.element)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Direct children of `id` with the given tag
    pub fn children_by_tag(&self, id: NodeId, tag: Tag) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.element(*child).map(Element::tag) == Some(tag))
            .collect()
    }

    /// Whether `id` has any descendant with the given tag
    pub fn has_descendant(&self, id: NodeId, tag: Tag) -> bool {
        self.children(id).iter().any(|child| {
            self.element(*child).map(Element::tag) == Some(tag)
                || self.has_descendant(*child, tag)
        })
    }

    /// Live nodes with the given tag, in insertion order
    pub fn elements_by_tag(&self, tag: Tag) -> Vec<NodeId> {
        self.by_tag.get(&tag).cloned().unwrap_or_default()
    }

    /// Top-level constraints, in document order
    pub fn constraints(&self) -> Vec<NodeId> {
        self.children(self.root).to_vec()
    }

    /// First top-level constraint of the tag with the id
    pub fn find_constraint(&self, tag: Tag, id: &str) -> Option<NodeId> {
        self.children(self.root).iter().copied().find(|child| {
            self.element(*child)
                .is_some_and(|el| el.tag() == tag && el.id() == Some(id))
        })
    }

    /// Top-level constraint owning `id` (the constraint itself for top-level nodes)
    pub fn owning_constraint(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let parent = self.parent(current)?;
            if parent == self.root {
                return Some(current);
            }
            current = parent;
        }
    }

    /// Whether any element in the tree carries `id`
    ///
    /// Nested rule, expression and raw element ids count; `resource_ref`
    /// ids do not.
    pub fn contains_id(&self, id: &str) -> bool {
        let mut ids = Vec::new();
        for node in self.nodes.iter().flatten() {
            ids.clear();
            node.element.collect_ids(&mut ids);
            if ids.iter().any(|candidate| candidate == id) {
                return true;
            }
        }
        false
    }

    /// Number of top-level constraints
    pub fn len(&self) -> usize {
        self.children(self.root).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove a `resource_ref`, then its set if empty, then the constraint if
    /// it has no set left
    pub fn remove_resource_ref(&mut self, ref_id: NodeId) -> RefRemoval {
        let set = self.parent(ref_id);
        self.remove(ref_id);
        let mut removal = RefRemoval::default();
        let Some(set) = set else {
            return removal;
        };
        removal.set_id = self.element(set).and_then(Element::id).map(str::to_string);
        if !self.children_by_tag(set, Tag::ResourceRef).is_empty() {
            return removal;
        }
        let constraint = self.parent(set);
        self.remove(set);
        removal.set_removed = true;
        if let Some(constraint) = constraint {
            if constraint != self.root && !self.has_descendant(constraint, Tag::ResourceSet) {
                removal.constraint_id = self
                    .element(constraint)
                    .and_then(Element::id)
                    .map(str::to_string);
                self.remove(constraint);
            }
        }
        removal
    }
}

/// What a `resource_ref` removal pruned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefRemoval {
    /// Id of the set the reference belonged to
    pub set_id: Option<String>,
    pub set_removed: bool,
    /// Id of the constraint removed because it lost its last set
    pub constraint_id: Option<String>,
}
