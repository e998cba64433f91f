//! Live collections
//!
//! The form controls collection and the per-document named-association
//! lookup. Both are recomputed from current tree structure on every
//! construction; there is no cache to invalidate, so an evicted node simply
//! stops appearing.

use crate::node::NodeKind;
use crate::tree::DomTree;
use crate::value::Value;
use crate::NodeId;

/// Result of a name-or-id lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum NamedLookup {
    None,
    Single(NodeId),
    /// Two or more matches, in tree order
    Group(Vec<NodeId>),
}

impl NamedLookup {
    fn from_matches(matches: Vec<NodeId>) -> Self {
        match matches.len() {
            0 => NamedLookup::None,
            1 => NamedLookup::Single(matches[0]),
            _ => NamedLookup::Group(matches),
        }
    }
}

/// Ordered view of the controls associated with one form.
///
/// Membership is derived at construction time from the live tree: controls
/// in the form's tree (in tree order) that either sit inside the form with
/// no reassociating `form` attribute, or carry a `form` attribute naming
/// this form's `id`.
pub struct ControlsCollection {
    form: NodeId,
    members: Vec<NodeId>,
}

impl ControlsCollection {
    pub fn new(tree: &DomTree, form: NodeId) -> Self {
        let mut members = Vec::new();
        let top = tree.top(form);
        for node in tree.descendants(top) {
            if tree.kind(node) == Some(NodeKind::FormControl) && Self::associated(tree, node, form)
            {
                members.push(node);
            }
        }
        Self { form, members }
    }

    fn associated(tree: &DomTree, control: NodeId, form: NodeId) -> bool {
        match tree.attr(control, "form").filter(|v| !v.is_empty()) {
            Some(form_ref) => tree.attr(form, "id") == Some(form_ref),
            None => tree.containing_form(control) == Some(form),
        }
    }

    /// The owning form
    pub fn form(&self) -> NodeId {
        self.form
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Lookup by index
    pub fn item(&self, index: usize) -> Option<NodeId> {
        self.members.get(index).copied()
    }

    /// Lookup by name or id
    pub fn named_item(&self, tree: &DomTree, key: &str) -> NamedLookup {
        let matches: Vec<NodeId> = self
            .members
            .iter()
            .copied()
            .filter(|&m| key_matches(tree, m, key))
            .collect();
        NamedLookup::from_matches(matches)
    }

    /// Own keys induced by this collection's exposure rule: every index as a
    /// decimal string, then every member's non-empty name and id.
    pub fn exposure_keys(&self, tree: &DomTree) -> Vec<String> {
        let mut keys: Vec<String> = (0..self.members.len()).map(|i| i.to_string()).collect();
        for &member in &self.members {
            if let Some(node) = tree.get(member) {
                for key in [node.name_attr(), node.id_attr()].into_iter().flatten() {
                    if !keys.iter().any(|k| k == key) {
                        keys.push(key.to_string());
                    }
                }
            }
        }
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.members.iter().copied()
    }
}

fn key_matches(tree: &DomTree, node: NodeId, key: &str) -> bool {
    let Some(node) = tree.get(node) else {
        return false;
    };
    node.name_attr() == Some(key) || node.id_attr() == Some(key)
}

/// Whether `node` participates in `doc`'s named associations under `key`.
///
/// Per-kind rules: embeds, forms and iframes expose their name; objects
/// expose name and id; images expose their name, and their id only while
/// their name is non-empty. The node must be rooted at `doc`.
pub fn document_key_matches(tree: &DomTree, doc: NodeId, node: NodeId, key: &str) -> bool {
    if tree.root_document(node) != Some(doc) {
        return false;
    }
    let Some(n) = tree.get(node) else {
        return false;
    };
    match n.kind() {
        NodeKind::Embed | NodeKind::Form | NodeKind::Iframe => n.name_attr() == Some(key),
        NodeKind::Object => n.name_attr() == Some(key) || n.id_attr() == Some(key),
        NodeKind::Image => {
            n.name_attr() == Some(key)
                || (n.name_attr().is_some() && n.id_attr() == Some(key))
        }
        _ => false,
    }
}

/// The document's named-item lookup: the value the platform would expose
/// under `key`, or `None` when nothing matches.
///
/// A lone iframe match is exposed as its window, not the element itself.
pub fn document_named_items(tree: &DomTree, doc: NodeId, key: &str) -> Option<Value> {
    let matches: Vec<NodeId> = tree
        .descendants(doc)
        .into_iter()
        .filter(|&n| document_key_matches(tree, doc, n, key))
        .collect();
    match matches.as_slice() {
        [] => None,
        [only] if tree.kind(*only) == Some(NodeKind::Iframe) => Some(Value::Window(*only)),
        [only] => Some(Value::Node(*only)),
        _ => Some(Value::Group(matches)),
    }
}

/// Every key the document's named associations currently expose, tree order,
/// deduplicated.
pub fn document_exposure_keys(tree: &DomTree, doc: NodeId) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    let mut push = |key: &str| {
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    };
    for id in tree.descendants(doc) {
        if tree.root_document(id) != Some(doc) {
            continue;
        }
        let Some(node) = tree.get(id) else { continue };
        match node.kind() {
            NodeKind::Embed | NodeKind::Form | NodeKind::Iframe => {
                if let Some(name) = node.name_attr() {
                    push(name);
                }
            }
            NodeKind::Object => {
                for key in [node.name_attr(), node.id_attr()].into_iter().flatten() {
                    push(key);
                }
            }
            NodeKind::Image => {
                if let Some(name) = node.name_attr() {
                    push(name);
                    if let Some(id_attr) = node.id_attr() {
                        push(id_attr);
                    }
                }
            }
            _ => {}
        }
    }
    keys
}
