//! clearview resolve - Named-item shadow resolution
//!
//! Legacy containers (forms, documents) expose descendant nodes carrying a
//! `name` or `id` as live properties that take precedence over the
//! container's own built-ins: a control named `action` hides the form's real
//! `action`. This crate detects such shadowing per key and resolves it by
//! briefly evicting the interfering nodes behind placeholders, running the
//! requested operation against the unshadowed container, and restoring the
//! tree before returning. The tree is bit-for-bit identical afterwards; only
//! the shadowing is eliminated.

mod detect;
mod dispatch;
mod facade;
mod placeholder;
mod substitute;
mod view;

pub use detect::{DocumentDetector, FormDetector};
pub use dispatch::Dispatcher;
pub use facade::{DocumentFacade, FormFacade, IdentityFacade, ReflectiveFacade};
pub use placeholder::PlaceholderFactory;
pub use substitute::{
    document_interferers, form_interferers, Eviction, EvictionSet, Override, SubstitutionEngine,
};
pub use view::{CleanView, ViewFactory};

use clearview_dom::{DomResult, DomTree, NodeId, PropertyDescriptor, Value};

/// Unshadowed property read.
pub fn read(tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<Value> {
    Dispatcher::for_node(tree, node).read(tree, node, key)
}

/// Unshadowed property write.
pub fn write(tree: &mut DomTree, node: NodeId, key: &str, value: Value) -> DomResult<()> {
    Dispatcher::for_node(tree, node).write(tree, node, key, value)
}

/// Unshadowed existence check.
pub fn has(tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<bool> {
    Dispatcher::for_node(tree, node).has(tree, node, key)
}

/// Unshadowed own-descriptor read.
pub fn get_descriptor(
    tree: &mut DomTree,
    node: NodeId,
    key: &str,
) -> DomResult<Option<PropertyDescriptor>> {
    Dispatcher::for_node(tree, node).get_descriptor(tree, node, key)
}

/// Unshadowed descriptor definition.
pub fn define_descriptor(
    tree: &mut DomTree,
    node: NodeId,
    key: &str,
    desc: PropertyDescriptor,
) -> DomResult<()> {
    Dispatcher::for_node(tree, node).define_descriptor(tree, node, key, desc)
}

/// Unshadowed key deletion.
pub fn delete_key(tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<bool> {
    Dispatcher::for_node(tree, node).delete(tree, node, key)
}

/// Own keys with shadowed entries filtered out.
pub fn own_keys(tree: &DomTree, node: NodeId) -> DomResult<Vec<String>> {
    Dispatcher::for_node(tree, node).own_keys(tree, node)
}
