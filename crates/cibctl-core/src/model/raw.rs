//! Untyped XML elements kept verbatim

use super::Attributes;

/// Element the typed model does not interpret
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawElement {
    pub tag: String,
    pub attributes: Attributes,
    pub children: Vec<RawNode>,
}

/// Content of a raw element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawNode {
    Element(RawElement),
    Text(String),
}

impl RawElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &RawElement> {
        self.children.iter().filter_map(|child| match child {
            RawNode::Element(el) => Some(el),
            RawNode::Text(_) => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut RawElement> {
        self.children.iter_mut().filter_map(|child| match child {
            RawNode::Element(el) => Some(el),
            RawNode::Text(_) => None,
        })
    }

    /// First direct child with the tag
    pub fn child(&self, tag: &str) -> Option<&RawElement> {
        self.child_elements().find(|el| el.tag == tag)
    }

    /// First element with the tag in a depth-first search, self included
    pub fn find_descendant_mut(&mut self, tag: &str) -> Option<&mut RawElement> {
        if self.tag == tag {
            return Some(self);
        }
        self.child_elements_mut()
            .find_map(|child| child.find_descendant_mut(tag))
    }

    pub fn find_descendant(&self, tag: &str) -> Option<&RawElement> {
        if self.tag == tag {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find_descendant(tag))
    }

    /// Ids of this element and every descendant, `resource_ref` excluded
    pub fn collect_ids(&self, out: &mut Vec<String>) {
        if self.tag != "resource_ref" {
            if let Some(id) = self.id() {
                out.push(id.to_string());
            }
        }
        for child in self.child_elements() {
            child.collect_ids(out);
        }
    }
}
