//! Observable property values
//!
//! What a reflective read of a node property can yield: primitives, single
//! nodes, the platform's multi-match group container, a form's live controls
//! collection, or a window-like value exposed for a named iframe.

use crate::NodeId;

/// A value observable under a property key.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Bool(bool),
    Int(i64),
    Str(String),
    /// A single tree node
    Node(NodeId),
    /// Ordered group of nodes sharing one key (platform multi-match container)
    Group(Vec<NodeId>),
    /// The live controls collection of the carried form node
    Elements(NodeId),
    /// Window-like value; the carried node is its `frameElement`
    Window(NodeId),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// The single node carried by this value, if any
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Value::Node(id) => Some(*id),
            _ => None,
        }
    }

    /// The iframe node behind a window-like value
    pub fn frame_element(&self) -> Option<NodeId> {
        match self {
            Value::Window(frame) => Some(*frame),
            _ => None,
        }
    }
}

/// Property descriptor for the reflective descriptor operations.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub value: Value,
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
}

impl PropertyDescriptor {
    /// Plain data descriptor (writable, enumerable, configurable)
    pub fn data(value: Value) -> Self {
        Self {
            value,
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }
}
