//! Transient substitution
//!
//! Computes the concrete set of interfering nodes behind a shadowed key and
//! provides the evict/restore primitives. Every eviction swaps the node for
//! a fresh placeholder at its exact structural position, so child-list
//! length and order are preserved while the node is out of the tree.
//! Restoration unwinds the eviction stack, which yields forward structural
//! order for groups and reverse index order for index prefixes.

use std::collections::HashSet;

use clearview_dom::{
    native_get, parse_index, ControlsCollection, DomError, DomResult, DomTree, NamedLookup,
    NodeId, Value,
};
use tracing::trace;

use crate::placeholder::PlaceholderFactory;

/// The interfering node set behind one shadowed key. Recomputed per
/// operation, never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum Override {
    None,
    Single(NodeId),
    /// Members share the key; tree order
    Group(Vec<NodeId>),
    /// Evict the controls collection from index 0 through this index
    IndexPrefix(usize),
}

/// Interferers for a shadowed form key.
///
/// Numeric keys always take the index strategy: removing only the control at
/// the requested index would renumber every later control mid-operation.
pub fn form_interferers(tree: &DomTree, form: NodeId, key: &str) -> Override {
    if let Some(index) = parse_index(key) {
        return Override::IndexPrefix(index);
    }
    let col = ControlsCollection::new(tree, form);
    match col.named_item(tree, key) {
        NamedLookup::Single(node) => return Override::Single(node),
        NamedLookup::Group(group) => return Override::Group(group),
        NamedLookup::None => {}
    }
    match native_get(tree, form, key) {
        Value::Node(node) => Override::Single(node),
        Value::Group(group) => Override::Group(group),
        _ => Override::None,
    }
}

/// Interferers for a shadowed document key. A window-like value redirects to
/// its frame element, which is the actual tree node to displace.
pub fn document_interferers(tree: &DomTree, doc: NodeId, key: &str) -> Override {
    match native_get(tree, doc, key) {
        Value::Node(node) => Override::Single(node),
        Value::Group(group) => Override::Group(group),
        Value::Window(frame) => Override::Single(frame),
        _ => Override::None,
    }
}

/// One displaced node: where it was and which placeholder holds its slot.
#[derive(Debug)]
pub struct Eviction {
    pub node: NodeId,
    pub placeholder: NodeId,
    pub parent: NodeId,
}

/// Outcome of the eviction phase. `failure` is set when a structural swap
/// failed partway; already-performed evictions are still in the stack so the
/// caller can unwind them.
#[derive(Debug)]
pub struct EvictionSet {
    /// Eviction order; unwind by popping
    pub evictions: Vec<Eviction>,
    pub failure: Option<DomError>,
}

pub struct SubstitutionEngine;

impl SubstitutionEngine {
    /// Displace one node behind a fresh placeholder.
    pub fn evict(tree: &mut DomTree, node: NodeId) -> DomResult<Eviction> {
        let parent = tree.parent(node).ok_or(DomError::NotFound)?;
        let placeholder = PlaceholderFactory::create(tree);
        tree.replace_child(parent, node, placeholder)?;
        trace!(?node, ?placeholder, "evicted interfering node");
        Ok(Eviction {
            node,
            placeholder,
            parent,
        })
    }

    /// Swap the placeholder back for the original node.
    pub fn restore(tree: &mut DomTree, eviction: Eviction) -> DomResult<()> {
        tree.replace_child(eviction.parent, eviction.placeholder, eviction.node)?;
        trace!(node = ?eviction.node, "restored evicted node");
        Ok(())
    }

    /// Evict the nodes named by an override record. The guard holds every
    /// node already displaced in the current call chain; a guarded node is
    /// skipped rather than evicted twice.
    pub fn evict_record(
        tree: &mut DomTree,
        container: NodeId,
        record: Override,
        guard: &mut HashSet<NodeId>,
    ) -> EvictionSet {
        let mut set = EvictionSet {
            evictions: Vec::new(),
            failure: None,
        };
        match record {
            Override::None => {}
            Override::Single(node) => {
                Self::evict_guarded(tree, node, guard, &mut set);
            }
            Override::Group(nodes) => {
                // Reverse structural order, so no sibling shifts while
                // members are mid-removal.
                for &node in nodes.iter().rev() {
                    if !Self::evict_guarded(tree, node, guard, &mut set) {
                        break;
                    }
                }
            }
            Override::IndexPrefix(index) => {
                // Each eviction shifts the remaining controls down, so the
                // target is always the current item at index 0.
                for _ in 0..=index {
                    let col = ControlsCollection::new(tree, container);
                    let Some(first) = col.item(0) else { break };
                    if guard.contains(&first) {
                        break;
                    }
                    if !Self::evict_guarded(tree, first, guard, &mut set) {
                        break;
                    }
                }
            }
        }
        set
    }

    fn evict_guarded(
        tree: &mut DomTree,
        node: NodeId,
        guard: &mut HashSet<NodeId>,
        set: &mut EvictionSet,
    ) -> bool {
        if !guard.insert(node) {
            return true;
        }
        match Self::evict(tree, node) {
            Ok(eviction) => {
                set.evictions.push(eviction);
                true
            }
            Err(e) => {
                set.failure = Some(e);
                false
            }
        }
    }

    /// Unwind an eviction stack. Runs to the end even if a swap fails and
    /// reports the first failure.
    pub fn restore_all(tree: &mut DomTree, mut evictions: Vec<Eviction>) -> Option<DomError> {
        let mut failure = None;
        while let Some(eviction) = evictions.pop() {
            if let Err(e) = Self::restore(tree, eviction) {
                failure.get_or_insert(e);
            }
        }
        failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clearview_dom::NodeKind;

    fn form_with_named_controls(names: &[&str]) -> (DomTree, NodeId, Vec<NodeId>) {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let form = tree.create_node(NodeKind::Form);
        tree.append_child(doc, form).unwrap();
        let mut controls = Vec::new();
        for name in names {
            let control = tree.create_node(NodeKind::FormControl);
            tree.set_attr(control, "name", name).unwrap();
            tree.append_child(form, control).unwrap();
            controls.push(control);
        }
        (tree, form, controls)
    }

    #[test]
    fn test_single_evict_restore() {
        let (mut tree, form, controls) = form_with_named_controls(&["a", "b"]);
        let before = tree.children(form).to_vec();

        let eviction = SubstitutionEngine::evict(&mut tree, controls[0]).unwrap();
        assert_eq!(tree.parent(controls[0]), None);
        assert_eq!(tree.children(form).len(), 2, "slot count preserved");
        assert_eq!(tree.children(form)[1], controls[1]);

        SubstitutionEngine::restore(&mut tree, eviction).unwrap();
        assert_eq!(tree.children(form), before.as_slice());
    }

    #[test]
    fn test_index_prefix_evicts_inclusive_prefix() {
        let (mut tree, form, controls) = form_with_named_controls(&["a", "b", "c"]);
        let before = tree.children(form).to_vec();

        let mut guard = HashSet::new();
        let set = SubstitutionEngine::evict_record(
            &mut tree,
            form,
            Override::IndexPrefix(1),
            &mut guard,
        );
        assert!(set.failure.is_none());
        assert_eq!(set.evictions.len(), 2);
        assert_eq!(set.evictions[0].node, controls[0]);
        assert_eq!(set.evictions[1].node, controls[1]);

        let col = ControlsCollection::new(&tree, form);
        assert_eq!(col.len(), 1);
        assert_eq!(col.item(0), Some(controls[2]));

        assert!(SubstitutionEngine::restore_all(&mut tree, set.evictions).is_none());
        assert_eq!(tree.children(form), before.as_slice());
    }

    #[test]
    fn test_index_prefix_bounded_by_length() {
        let (mut tree, form, _) = form_with_named_controls(&["a"]);
        let mut guard = HashSet::new();
        let set = SubstitutionEngine::evict_record(
            &mut tree,
            form,
            Override::IndexPrefix(5),
            &mut guard,
        );
        assert_eq!(set.evictions.len(), 1);
        assert!(set.failure.is_none());
        SubstitutionEngine::restore_all(&mut tree, set.evictions);
    }

    #[test]
    fn test_group_reverse_evict_forward_restore() {
        let (mut tree, form, controls) = form_with_named_controls(&["x", "x", "x"]);
        let mut guard = HashSet::new();
        let set = SubstitutionEngine::evict_record(
            &mut tree,
            form,
            Override::Group(controls.clone()),
            &mut guard,
        );
        // Reverse structural order.
        let order: Vec<NodeId> = set.evictions.iter().map(|e| e.node).collect();
        assert_eq!(order, vec![controls[2], controls[1], controls[0]]);

        assert!(SubstitutionEngine::restore_all(&mut tree, set.evictions).is_none());
        assert_eq!(tree.children(form), controls.as_slice());
    }

    #[test]
    fn test_guard_blocks_double_eviction() {
        let (mut tree, form, controls) = form_with_named_controls(&["a"]);
        let mut guard = HashSet::new();
        guard.insert(controls[0]);

        let set = SubstitutionEngine::evict_record(
            &mut tree,
            form,
            Override::Single(controls[0]),
            &mut guard,
        );
        assert!(set.evictions.is_empty());
        assert!(set.failure.is_none());
        assert_eq!(tree.parent(controls[0]), Some(form));
    }

    #[test]
    fn test_partial_group_failure_keeps_stack() {
        let (mut tree, form, controls) = form_with_named_controls(&["a"]);
        let detached = tree.create_node(NodeKind::FormControl);

        let mut guard = HashSet::new();
        // Reverse iteration evicts the attached control first, then fails
        // on the detached one.
        let set = SubstitutionEngine::evict_record(
            &mut tree,
            form,
            Override::Group(vec![detached, controls[0]]),
            &mut guard,
        );
        assert_eq!(set.failure, Some(DomError::NotFound));
        assert_eq!(set.evictions.len(), 1);

        assert!(SubstitutionEngine::restore_all(&mut tree, set.evictions).is_none());
        assert_eq!(tree.parent(controls[0]), Some(form));
    }

    #[test]
    fn test_form_interferers_classification() {
        let (mut tree, form, controls) = form_with_named_controls(&["a", "dup", "dup"]);
        assert_eq!(
            form_interferers(&tree, form, "a"),
            Override::Single(controls[0])
        );
        assert_eq!(
            form_interferers(&tree, form, "dup"),
            Override::Group(vec![controls[1], controls[2]])
        );
        assert_eq!(form_interferers(&tree, form, "2"), Override::IndexPrefix(2));

        let img = tree.create_node(NodeKind::Image);
        tree.set_attr(img, "name", "pic").unwrap();
        tree.append_child(form, img).unwrap();
        assert_eq!(form_interferers(&tree, form, "pic"), Override::Single(img));
        assert_eq!(form_interferers(&tree, form, "nope"), Override::None);
    }
}
