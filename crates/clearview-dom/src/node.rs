//! DOM Node
//!
//! Arena node with an ordered child list, attribute map, an expando property
//! table, and a kind tag fixed at construction. The kind tag is the identity
//! probe: it is never stored as a keyed property, so no named item can ever
//! shadow it.

use crate::attributes::NamedNodeMap;
use crate::value::PropertyDescriptor;
use crate::NodeId;

/// Node kind, set at construction and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Anything without named-item behavior (also used for placeholders)
    Generic,
    /// input/select/textarea/button-like listed element
    FormControl,
    Image,
    Embed,
    Object,
    Iframe,
    Form,
    Document,
}

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// Ordered children
    pub children: Vec<NodeId>,
    /// Construction-time kind tag
    kind: NodeKind,
    /// Attributes (`name`, `id`, `class`, `form`, ...)
    pub attrs: NamedNodeMap,
    /// Expando properties written directly on the node
    pub props: PropertyTable,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            parent: NodeId::NONE,
            children: Vec::new(),
            kind,
            attrs: NamedNodeMap::new(),
            props: PropertyTable::new(),
        }
    }

    /// The un-overridable kind tag
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub fn is_form(&self) -> bool {
        self.kind == NodeKind::Form
    }

    #[inline]
    pub fn is_document(&self) -> bool {
        self.kind == NodeKind::Document
    }

    /// Non-empty `name` attribute, if any
    pub fn name_attr(&self) -> Option<&str> {
        self.attrs.get("name").filter(|v| !v.is_empty())
    }

    /// Non-empty `id` attribute, if any
    pub fn id_attr(&self) -> Option<&str> {
        self.attrs.get("id").filter(|v| !v.is_empty())
    }
}

/// Expando property table.
///
/// Insertion-ordered so reflective key enumeration is deterministic, matching
/// the host convention that own keys enumerate in definition order.
#[derive(Debug, Default)]
pub struct PropertyTable {
    entries: Vec<(String, PropertyDescriptor)>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&PropertyDescriptor> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, d)| d)
    }

    pub fn set(&mut self, key: &str, desc: PropertyDescriptor) {
        for (k, d) in self.entries.iter_mut() {
            if k == key {
                *d = desc;
                return;
            }
        }
        self.entries.push((key.to_string(), desc));
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyDescriptor> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_kind_is_fixed() {
        let node = Node::new(NodeKind::Form);
        assert!(node.is_form());
        assert!(!node.is_document());
    }

    #[test]
    fn test_empty_attrs_yield_no_name() {
        let mut node = Node::new(NodeKind::FormControl);
        assert_eq!(node.name_attr(), None);

        node.attrs.set("name", "");
        assert_eq!(node.name_attr(), None, "empty name must not participate");

        node.attrs.set("name", "login");
        assert_eq!(node.name_attr(), Some("login"));
    }

    #[test]
    fn test_property_table_order() {
        let mut props = PropertyTable::new();
        props.set("b", PropertyDescriptor::data(Value::Int(1)));
        props.set("a", PropertyDescriptor::data(Value::Int(2)));
        props.set("b", PropertyDescriptor::data(Value::Int(3)));

        let keys: Vec<&str> = props.keys().collect();
        assert_eq!(keys, vec!["b", "a"], "overwrite keeps insertion order");
    }
}
