//! clearview DOM - Host tree collaborator
//!
//! Compact arena DOM with the platform behaviors the shadow-resolution core
//! consumes: structural replace-in-place, attribute storage, kind probing,
//! live form-controls collections, document named associations, and the
//! native reflective operations (get/set/has/descriptors/delete/ownKeys)
//! including the legacy named-item exposure algorithm.

mod attributes;
mod collections;
mod node;
mod reflect;
mod tree;
mod value;

pub use attributes::{Attr, NamedNodeMap};
pub use collections::{document_named_items, document_exposure_keys, ControlsCollection, NamedLookup};
pub use node::{Node, NodeKind, PropertyTable};
pub use reflect::{
    native_define, native_delete, native_get, native_get_descriptor, native_has,
    native_own_keys, native_set, parse_index,
};
pub use tree::{DomError, DomResult, DomTree};
pub use value::{PropertyDescriptor, Value};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check whether this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
