//! DOM Tree (arena-based allocation)
//!
//! Structural operations: append, remove, and the positional replace that
//! the substitution protocol uses as its eviction primitive. Node identity
//! is the arena slot; moving a node never changes its ID, attributes, or
//! children.

use tracing::trace;

use crate::node::{Node, NodeKind};
use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node not found")]
    NotFound,
    #[error("hierarchy request error")]
    HierarchyRequest,
    #[error("node is not a child of the given parent")]
    NotAChild,
    #[error("property is not writable")]
    ReadOnly,
    #[error("property is not configurable")]
    NotConfigurable,
}

/// Arena-based DOM tree
#[derive(Debug, Default)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new empty DOM tree
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Create a detached node of the given kind
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        assert!(id.is_valid(), "arena exhausted");
        self.nodes.push(Node::new(kind));
        id
    }

    /// Create a detached document node
    pub fn create_document(&mut self) -> NodeId {
        self.create_node(NodeKind::Document)
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_valid() {
            self.nodes.get(id.index())
        } else {
            None
        }
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_valid() {
            self.nodes.get_mut(id.index())
        } else {
            None
        }
    }

    /// Number of nodes in the arena (detached nodes included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Kind tag of a node
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(|n| n.kind())
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get(id)?.parent;
        parent.is_valid().then_some(parent)
    }

    /// Ordered children of a node
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Attribute value on a node
    pub fn attr<'a>(&'a self, id: NodeId, name: &str) -> Option<&'a str> {
        self.get(id)?.attrs.get(name)
    }

    /// Set an attribute on a node
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.get_mut(id).ok_or(DomError::NotFound)?.attrs.set(name, value);
        Ok(())
    }

    /// Append a child to a parent, detaching it from any previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return Err(DomError::NotFound);
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        self.detach(child)?;
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = parent;
        trace!(?parent, ?child, "appended child");
        Ok(())
    }

    /// Remove a child from its parent
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let pos = self
            .children(parent)
            .iter()
            .position(|&c| c == child)
            .ok_or(DomError::NotAChild)?;
        self.nodes[parent.index()].children.remove(pos);
        self.nodes[child.index()].parent = NodeId::NONE;
        trace!(?parent, ?child, "removed child");
        Ok(())
    }

    /// Swap `old` for `new` at `old`'s exact position under `parent`.
    ///
    /// This is the structural primitive of eviction and restoration: the
    /// child list keeps its length and order, only the occupant of one slot
    /// changes. `new` must be detached.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> DomResult<()> {
        if self.get(new).is_none() {
            return Err(DomError::NotFound);
        }
        if self.nodes[new.index()].parent.is_valid() {
            return Err(DomError::HierarchyRequest);
        }
        let pos = self
            .children(parent)
            .iter()
            .position(|&c| c == old)
            .ok_or(DomError::NotAChild)?;
        self.nodes[parent.index()].children[pos] = new;
        self.nodes[old.index()].parent = NodeId::NONE;
        self.nodes[new.index()].parent = parent;
        trace!(?parent, ?old, ?new, "replaced child in place");
        Ok(())
    }

    /// Pre-order descendants of `root`, excluding `root` itself
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(root, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.children(id) {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// Nearest document-kind ancestor (the rootedness probe)
    pub fn root_document(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id)?;
        loop {
            if self.kind(current) == Some(NodeKind::Document) {
                return Some(current);
            }
            current = self.parent(current)?;
        }
    }

    /// Nearest form-kind ancestor (the unshadowed containment probe)
    pub fn containing_form(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id)?;
        loop {
            if self.kind(current) == Some(NodeKind::Form) {
                return Some(current);
            }
            current = self.parent(current)?;
        }
    }

    /// Topmost ancestor (the node itself if detached)
    pub fn top(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    fn is_ancestor(&self, maybe_ancestor: NodeId, of: NodeId) -> bool {
        let mut current = self.parent(of);
        while let Some(node) = current {
            if node == maybe_ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    fn detach(&mut self, child: NodeId) -> DomResult<()> {
        if let Some(parent) = self.parent(child) {
            self.remove_child(parent, child)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_children() {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let form = tree.create_node(NodeKind::Form);
        let input = tree.create_node(NodeKind::FormControl);

        tree.append_child(doc, form).unwrap();
        tree.append_child(form, input).unwrap();

        assert_eq!(tree.children(doc), &[form]);
        assert_eq!(tree.parent(input), Some(form));
        assert_eq!(tree.root_document(input), Some(doc));
        assert_eq!(tree.containing_form(input), Some(form));
    }

    #[test]
    fn test_replace_child_keeps_position() {
        let mut tree = DomTree::new();
        let parent = tree.create_node(NodeKind::Generic);
        let a = tree.create_node(NodeKind::Generic);
        let b = tree.create_node(NodeKind::Generic);
        let c = tree.create_node(NodeKind::Generic);
        let stand_in = tree.create_node(NodeKind::Generic);

        tree.append_child(parent, a).unwrap();
        tree.append_child(parent, b).unwrap();
        tree.append_child(parent, c).unwrap();

        tree.replace_child(parent, b, stand_in).unwrap();
        assert_eq!(tree.children(parent), &[a, stand_in, c]);
        assert_eq!(tree.parent(b), None);

        tree.replace_child(parent, stand_in, b).unwrap();
        assert_eq!(tree.children(parent), &[a, b, c]);
    }

    #[test]
    fn test_replace_rejects_attached_replacement() {
        let mut tree = DomTree::new();
        let parent = tree.create_node(NodeKind::Generic);
        let a = tree.create_node(NodeKind::Generic);
        let b = tree.create_node(NodeKind::Generic);
        tree.append_child(parent, a).unwrap();
        tree.append_child(parent, b).unwrap();

        assert_eq!(
            tree.replace_child(parent, a, b),
            Err(DomError::HierarchyRequest)
        );
    }

    #[test]
    fn test_append_rejects_cycle() {
        let mut tree = DomTree::new();
        let a = tree.create_node(NodeKind::Generic);
        let b = tree.create_node(NodeKind::Generic);
        tree.append_child(a, b).unwrap();

        assert_eq!(tree.append_child(b, a), Err(DomError::HierarchyRequest));
        assert_eq!(tree.append_child(a, a), Err(DomError::HierarchyRequest));
    }

    #[test]
    fn test_identity_survives_moves() {
        let mut tree = DomTree::new();
        let p1 = tree.create_node(NodeKind::Generic);
        let p2 = tree.create_node(NodeKind::Generic);
        let node = tree.create_node(NodeKind::Image);
        tree.set_attr(node, "name", "logo").unwrap();

        tree.append_child(p1, node).unwrap();
        tree.append_child(p2, node).unwrap();

        assert_eq!(tree.children(p1), &[] as &[NodeId]);
        assert_eq!(tree.parent(node), Some(p2));
        assert_eq!(tree.attr(node, "name"), Some("logo"));
    }

    #[test]
    fn test_nested_document_rootedness() {
        let mut tree = DomTree::new();
        let outer = tree.create_document();
        let iframe = tree.create_node(NodeKind::Iframe);
        let inner = tree.create_document();
        let img = tree.create_node(NodeKind::Image);

        tree.append_child(outer, iframe).unwrap();
        tree.append_child(iframe, inner).unwrap();
        tree.append_child(inner, img).unwrap();

        assert_eq!(tree.root_document(img), Some(inner));
        assert_eq!(tree.root_document(inner), Some(outer));
        assert_eq!(tree.root_document(iframe), Some(outer));
    }
}
