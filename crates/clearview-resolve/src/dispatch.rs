//! Operation routing
//!
//! Routes each reflective operation to the facade matching the node's kind
//! tag. The probe is the construction-time tag, never a keyed property, so
//! routing itself cannot be misled by shadowing.

use clearview_dom::{DomTree, NodeId, NodeKind};

use crate::facade::{DocumentFacade, FormFacade, IdentityFacade, ReflectiveFacade};

pub struct Dispatcher;

impl Dispatcher {
    /// Select the facade for a node: form, document, or pass-through.
    pub fn for_node(tree: &DomTree, node: NodeId) -> &'static dyn ReflectiveFacade {
        match tree.kind(node) {
            Some(NodeKind::Form) => &FormFacade,
            Some(NodeKind::Document) => &DocumentFacade,
            _ => &IdentityFacade,
        }
    }
}
