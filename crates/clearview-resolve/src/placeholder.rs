//! Placeholder stand-ins
//!
//! Inert nodes used to hold a structural slot while its real occupant is
//! evicted. Generic kind, no attributes, no children: nothing about a
//! placeholder can match a name/id lookup, join a controls collection, or
//! participate in document named associations.

use clearview_dom::{DomTree, NodeId, NodeKind};

pub struct PlaceholderFactory;

impl PlaceholderFactory {
    /// Create a fresh detached placeholder.
    pub fn create(tree: &mut DomTree) -> NodeId {
        tree.create_node(NodeKind::Generic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clearview_dom::{native_own_keys, ControlsCollection};

    #[test]
    fn test_placeholder_is_inert() {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let form = tree.create_node(NodeKind::Form);
        tree.append_child(doc, form).unwrap();

        let placeholder = PlaceholderFactory::create(&mut tree);
        tree.append_child(form, placeholder).unwrap();

        let node = tree.get(placeholder).unwrap();
        assert_eq!(node.kind(), NodeKind::Generic);
        assert!(node.attrs.is_empty());

        assert!(ControlsCollection::new(&tree, form).is_empty());
        assert!(native_own_keys(&tree, form).is_empty());
        assert!(native_own_keys(&tree, doc).is_empty());
    }
}
