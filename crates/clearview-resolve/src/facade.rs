//! Reflective facades
//!
//! One facade per container kind, each wiring its detector to the
//! substitution engine. Every operation follows the same shape: if the key
//! is not shadowed, run the native operation directly; otherwise evict the
//! interferers, re-enter the same resolution (the next layer of shadowing,
//! if any, surfaces once the first is displaced), and restore before
//! returning. Restoration runs on the error path too.

use std::collections::HashSet;

use clearview_dom::{
    native_define, native_delete, native_get, native_get_descriptor, native_has,
    native_own_keys, native_set, DomResult, DomTree, NodeId, PropertyDescriptor, Value,
};
use tracing::debug;

use crate::detect::{DocumentDetector, FormDetector};
use crate::substitute::{
    document_interferers, form_interferers, Override, SubstitutionEngine,
};

/// The six reflective operations plus key enumeration, with named-item
/// shadowing eliminated. Side effects of the underlying operation still
/// occur; only the shadowing is gone.
pub trait ReflectiveFacade {
    fn read(&self, tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<Value>;
    fn write(&self, tree: &mut DomTree, node: NodeId, key: &str, value: Value) -> DomResult<()>;
    fn has(&self, tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<bool>;
    fn get_descriptor(
        &self,
        tree: &mut DomTree,
        node: NodeId,
        key: &str,
    ) -> DomResult<Option<PropertyDescriptor>>;
    fn define_descriptor(
        &self,
        tree: &mut DomTree,
        node: NodeId,
        key: &str,
        desc: PropertyDescriptor,
    ) -> DomResult<()>;
    fn delete(&self, tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<bool>;
    fn own_keys(&self, tree: &DomTree, node: NodeId) -> DomResult<Vec<String>>;
}

type DetectFn = fn(&DomTree, NodeId, &str) -> bool;
type InterfererFn = fn(&DomTree, NodeId, &str) -> Override;

/// Detect, evict, re-enter, restore. The guard carries every node displaced
/// in this call chain so reentry can never evict one twice; recursion depth
/// is bounded by the number of nodes in the tree.
fn resolve<R>(
    detect: DetectFn,
    interferers: InterfererFn,
    tree: &mut DomTree,
    container: NodeId,
    key: &str,
    guard: &mut HashSet<NodeId>,
    op: &mut dyn FnMut(&mut DomTree) -> DomResult<R>,
) -> DomResult<R> {
    if !detect(tree, container, key) {
        return op(tree);
    }
    let record = interferers(tree, container, key);
    if record == Override::None {
        return op(tree);
    }
    debug!(?container, key, ?record, "resolving shadowed key");

    let set = SubstitutionEngine::evict_record(tree, container, record, guard);
    if set.failure.is_none() && set.evictions.is_empty() {
        // Everything was already displaced by an outer layer.
        return op(tree);
    }

    // Re-enter through the same detection path: evicting one layer can
    // expose the next (a form-owned image behind a control, a shifted
    // index), and the guard bounds the recursion.
    let result = match set.failure {
        Some(e) => Err(e),
        None => resolve(detect, interferers, tree, container, key, guard, op),
    };
    let restore_failure = SubstitutionEngine::restore_all(tree, set.evictions);
    match (result, restore_failure) {
        (Err(e), _) => Err(e),
        (Ok(_), Some(e)) => Err(e),
        (ok, None) => ok,
    }
}

fn run<R>(
    detect: DetectFn,
    interferers: InterfererFn,
    tree: &mut DomTree,
    container: NodeId,
    key: &str,
    mut op: impl FnMut(&mut DomTree) -> DomResult<R>,
) -> DomResult<R> {
    let mut guard = HashSet::new();
    resolve(detect, interferers, tree, container, key, &mut guard, &mut op)
}

/// Facade for form-kind containers.
pub struct FormFacade;

impl FormFacade {
    fn run<R>(
        &self,
        tree: &mut DomTree,
        form: NodeId,
        key: &str,
        op: impl FnMut(&mut DomTree) -> DomResult<R>,
    ) -> DomResult<R> {
        run(FormDetector::is_shadowed, form_interferers, tree, form, key, op)
    }
}

impl ReflectiveFacade for FormFacade {
    fn read(&self, tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<Value> {
        self.run(tree, node, key, |t| Ok(native_get(t, node, key)))
    }

    fn write(&self, tree: &mut DomTree, node: NodeId, key: &str, value: Value) -> DomResult<()> {
        self.run(tree, node, key, |t| native_set(t, node, key, value.clone()))
    }

    fn has(&self, tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<bool> {
        self.run(tree, node, key, |t| Ok(native_has(t, node, key)))
    }

    fn get_descriptor(
        &self,
        tree: &mut DomTree,
        node: NodeId,
        key: &str,
    ) -> DomResult<Option<PropertyDescriptor>> {
        self.run(tree, node, key, |t| Ok(native_get_descriptor(t, node, key)))
    }

    fn define_descriptor(
        &self,
        tree: &mut DomTree,
        node: NodeId,
        key: &str,
        desc: PropertyDescriptor,
    ) -> DomResult<()> {
        self.run(tree, node, key, |t| native_define(t, node, key, desc.clone()))
    }

    fn delete(&self, tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<bool> {
        self.run(tree, node, key, |t| native_delete(t, node, key))
    }

    fn own_keys(&self, tree: &DomTree, node: NodeId) -> DomResult<Vec<String>> {
        Ok(native_own_keys(tree, node)
            .into_iter()
            .filter(|key| !FormDetector::is_shadowed(tree, node, key))
            .collect())
    }
}

/// Facade for document-kind containers.
pub struct DocumentFacade;

impl DocumentFacade {
    fn run<R>(
        &self,
        tree: &mut DomTree,
        doc: NodeId,
        key: &str,
        op: impl FnMut(&mut DomTree) -> DomResult<R>,
    ) -> DomResult<R> {
        run(
            DocumentDetector::is_shadowed,
            document_interferers,
            tree,
            doc,
            key,
            op,
        )
    }
}

impl ReflectiveFacade for DocumentFacade {
    fn read(&self, tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<Value> {
        self.run(tree, node, key, |t| Ok(native_get(t, node, key)))
    }

    fn write(&self, tree: &mut DomTree, node: NodeId, key: &str, value: Value) -> DomResult<()> {
        self.run(tree, node, key, |t| native_set(t, node, key, value.clone()))
    }

    fn has(&self, tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<bool> {
        self.run(tree, node, key, |t| Ok(native_has(t, node, key)))
    }

    fn get_descriptor(
        &self,
        tree: &mut DomTree,
        node: NodeId,
        key: &str,
    ) -> DomResult<Option<PropertyDescriptor>> {
        self.run(tree, node, key, |t| Ok(native_get_descriptor(t, node, key)))
    }

    fn define_descriptor(
        &self,
        tree: &mut DomTree,
        node: NodeId,
        key: &str,
        desc: PropertyDescriptor,
    ) -> DomResult<()> {
        self.run(tree, node, key, |t| native_define(t, node, key, desc.clone()))
    }

    fn delete(&self, tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<bool> {
        self.run(tree, node, key, |t| native_delete(t, node, key))
    }

    /// Direct construction: enumerate own keys, drop the shadowed ones. No
    /// eviction round-trip needed.
    fn own_keys(&self, tree: &DomTree, node: NodeId) -> DomResult<Vec<String>> {
        Ok(native_own_keys(tree, node)
            .into_iter()
            .filter(|key| !DocumentDetector::is_shadowed(tree, node, key))
            .collect())
    }
}

/// Pass-through for nodes without named-item behavior.
pub struct IdentityFacade;

impl ReflectiveFacade for IdentityFacade {
    fn read(&self, tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<Value> {
        Ok(native_get(tree, node, key))
    }

    fn write(&self, tree: &mut DomTree, node: NodeId, key: &str, value: Value) -> DomResult<()> {
        native_set(tree, node, key, value)
    }

    fn has(&self, tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<bool> {
        Ok(native_has(tree, node, key))
    }

    fn get_descriptor(
        &self,
        tree: &mut DomTree,
        node: NodeId,
        key: &str,
    ) -> DomResult<Option<PropertyDescriptor>> {
        Ok(native_get_descriptor(tree, node, key))
    }

    fn define_descriptor(
        &self,
        tree: &mut DomTree,
        node: NodeId,
        key: &str,
        desc: PropertyDescriptor,
    ) -> DomResult<()> {
        native_define(tree, node, key, desc)
    }

    fn delete(&self, tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<bool> {
        native_delete(tree, node, key)
    }

    fn own_keys(&self, tree: &DomTree, node: NodeId) -> DomResult<Vec<String>> {
        Ok(native_own_keys(tree, node))
    }
}
