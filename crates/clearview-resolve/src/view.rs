//! Clean views
//!
//! A view wraps a node behind the dispatcher: operations on the view observe
//! unshadowed semantics, operations on the raw node keep native (shadowed)
//! behavior. The view exposes only the reflective surface, no tree
//! manipulation.

use std::cell::RefCell;
use std::rc::Rc;

use clearview_dom::{DomResult, DomTree, NodeId, PropertyDescriptor, Value};

use crate::dispatch::Dispatcher;

pub struct ViewFactory;

impl ViewFactory {
    /// Wrap a node in a clean view over a shared tree handle.
    pub fn wrap(tree: Rc<RefCell<DomTree>>, node: NodeId) -> CleanView {
        CleanView { tree, node }
    }
}

/// Shadow-free handle to one node.
#[derive(Clone)]
pub struct CleanView {
    tree: Rc<RefCell<DomTree>>,
    node: NodeId,
}

impl CleanView {
    /// The wrapped node
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn read(&self, key: &str) -> DomResult<Value> {
        let mut tree = self.tree.borrow_mut();
        let facade = Dispatcher::for_node(&tree, self.node);
        facade.read(&mut tree, self.node, key)
    }

    pub fn write(&self, key: &str, value: Value) -> DomResult<()> {
        let mut tree = self.tree.borrow_mut();
        let facade = Dispatcher::for_node(&tree, self.node);
        facade.write(&mut tree, self.node, key, value)
    }

    pub fn has(&self, key: &str) -> DomResult<bool> {
        let mut tree = self.tree.borrow_mut();
        let facade = Dispatcher::for_node(&tree, self.node);
        facade.has(&mut tree, self.node, key)
    }

    pub fn get_descriptor(&self, key: &str) -> DomResult<Option<PropertyDescriptor>> {
        let mut tree = self.tree.borrow_mut();
        let facade = Dispatcher::for_node(&tree, self.node);
        facade.get_descriptor(&mut tree, self.node, key)
    }

    pub fn define_descriptor(&self, key: &str, desc: PropertyDescriptor) -> DomResult<()> {
        let mut tree = self.tree.borrow_mut();
        let facade = Dispatcher::for_node(&tree, self.node);
        facade.define_descriptor(&mut tree, self.node, key, desc)
    }

    pub fn delete(&self, key: &str) -> DomResult<bool> {
        let mut tree = self.tree.borrow_mut();
        let facade = Dispatcher::for_node(&tree, self.node);
        facade.delete(&mut tree, self.node, key)
    }

    pub fn own_keys(&self) -> DomResult<Vec<String>> {
        let tree = self.tree.borrow();
        let facade = Dispatcher::for_node(&tree, self.node);
        facade.own_keys(&tree, self.node)
    }
}
