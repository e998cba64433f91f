//! Native reflective operations
//!
//! The host half of the reflective surface: property lookup with the legacy
//! named-item exposure algorithm baked in. Lookup precedence on a container
//! is own expando property, then named-item exposure, then built-in
//! (prototype-level) property. Named items therefore shadow every built-in
//! of the same key, which is exactly the behavior the resolution core exists
//! to see through.

use crate::collections::{
    document_exposure_keys, document_named_items, ControlsCollection, NamedLookup,
};
use crate::node::NodeKind;
use crate::tree::{DomError, DomResult, DomTree};
use crate::value::{PropertyDescriptor, Value};
use crate::NodeId;

/// Parse a pure-decimal key (`^\d+$`) as a collection index.
pub fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Native property read.
pub fn native_get(tree: &DomTree, node: NodeId, key: &str) -> Value {
    let Some(n) = tree.get(node) else {
        return Value::Undefined;
    };
    if let Some(desc) = n.props.get(key) {
        return desc.value.clone();
    }
    if let Some(value) = named_exposure(tree, node, key) {
        return value;
    }
    builtin_get(tree, node, key).unwrap_or(Value::Undefined)
}

/// Native property write. Writes an own expando property; named items and
/// built-ins are not touched, the expando shadows them from then on.
pub fn native_set(tree: &mut DomTree, node: NodeId, key: &str, value: Value) -> DomResult<()> {
    let n = tree.get_mut(node).ok_or(DomError::NotFound)?;
    if let Some(existing) = n.props.get(key) {
        if !existing.writable {
            return Err(DomError::ReadOnly);
        }
        let mut desc = existing.clone();
        desc.value = value;
        n.props.set(key, desc);
    } else {
        n.props.set(key, PropertyDescriptor::data(value));
    }
    Ok(())
}

/// Native existence check (own expando, named item, or built-in).
pub fn native_has(tree: &DomTree, node: NodeId, key: &str) -> bool {
    let Some(n) = tree.get(node) else {
        return false;
    };
    n.props.has(key)
        || named_exposure(tree, node, key).is_some()
        || builtin_get(tree, node, key).is_some()
}

/// Native own-descriptor read. Named items synthesize a read-only data
/// descriptor; built-ins are prototype-level and never own.
pub fn native_get_descriptor(
    tree: &DomTree,
    node: NodeId,
    key: &str,
) -> Option<PropertyDescriptor> {
    let n = tree.get(node)?;
    if let Some(desc) = n.props.get(key) {
        return Some(desc.clone());
    }
    named_exposure(tree, node, key).map(|value| PropertyDescriptor {
        value,
        writable: false,
        enumerable: true,
        configurable: true,
    })
}

/// Native descriptor definition on the expando table.
pub fn native_define(
    tree: &mut DomTree,
    node: NodeId,
    key: &str,
    desc: PropertyDescriptor,
) -> DomResult<()> {
    let n = tree.get_mut(node).ok_or(DomError::NotFound)?;
    if let Some(existing) = n.props.get(key) {
        if !existing.configurable && *existing != desc {
            return Err(DomError::NotConfigurable);
        }
    }
    n.props.set(key, desc);
    Ok(())
}

/// Native key deletion. Absence is not an error: deleting a key with no own
/// expando reports `true` and has no effect (named items are untouched).
pub fn native_delete(tree: &mut DomTree, node: NodeId, key: &str) -> DomResult<bool> {
    let n = tree.get_mut(node).ok_or(DomError::NotFound)?;
    match n.props.get(key) {
        Some(desc) if !desc.configurable => Ok(false),
        Some(_) => {
            n.props.remove(key);
            Ok(true)
        }
        None => Ok(true),
    }
}

/// Native own-key enumeration: named-item exposure keys in tree order, then
/// expando keys in definition order, deduplicated.
pub fn native_own_keys(tree: &DomTree, node: NodeId) -> Vec<String> {
    let Some(n) = tree.get(node) else {
        return Vec::new();
    };
    let mut keys: Vec<String> = match n.kind() {
        NodeKind::Form => {
            let mut keys = ControlsCollection::new(tree, node).exposure_keys(tree);
            for image in form_owned_images(tree, node) {
                let Some(img) = tree.get(image) else { continue };
                for key in [img.name_attr(), img.id_attr()].into_iter().flatten() {
                    if !keys.iter().any(|k| k == key) {
                        keys.push(key.to_string());
                    }
                }
            }
            keys
        }
        NodeKind::Document => document_exposure_keys(tree, node),
        _ => Vec::new(),
    };
    for key in n.props.keys() {
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}

/// The value named-item exposure produces for `key`, if any.
fn named_exposure(tree: &DomTree, node: NodeId, key: &str) -> Option<Value> {
    match tree.kind(node)? {
        NodeKind::Form => form_named_exposure(tree, node, key),
        NodeKind::Document => document_named_items(tree, node, key),
        _ => None,
    }
}

/// Form named getter: index access, then controls by name/id, then
/// form-owned images by name/id. Controls take precedence over images.
fn form_named_exposure(tree: &DomTree, form: NodeId, key: &str) -> Option<Value> {
    let col = ControlsCollection::new(tree, form);
    if let Some(index) = parse_index(key) {
        return col.item(index).map(Value::Node);
    }
    match col.named_item(tree, key) {
        NamedLookup::Single(n) => return Some(Value::Node(n)),
        NamedLookup::Group(g) => return Some(Value::Group(g)),
        NamedLookup::None => {}
    }
    let matches: Vec<NodeId> = form_owned_images(tree, form)
        .into_iter()
        .filter(|&img| {
            tree.get(img)
                .map(|node| node.name_attr() == Some(key) || node.id_attr() == Some(key))
                .unwrap_or(false)
        })
        .collect();
    match matches.as_slice() {
        [] => None,
        [only] => Some(Value::Node(*only)),
        _ => Some(Value::Group(matches)),
    }
}

/// Images whose nearest form ancestor is `form`, tree order.
fn form_owned_images(tree: &DomTree, form: NodeId) -> Vec<NodeId> {
    tree.descendants(form)
        .into_iter()
        .filter(|&n| {
            tree.kind(n) == Some(NodeKind::Image) && tree.containing_form(n) == Some(form)
        })
        .collect()
}

/// Built-in (prototype-level) properties that named items shadow.
fn builtin_get(tree: &DomTree, node: NodeId, key: &str) -> Option<Value> {
    let n = tree.get(node)?;
    let attr_str = |name: &str| Value::str(n.attrs.get(name).unwrap_or(""));
    match n.kind() {
        NodeKind::Document => match key {
            "title" => Some(attr_str("title")),
            "url" => Some(Value::str(n.attrs.get("url").unwrap_or("about:blank"))),
            "documentElement" => Some(
                n.children
                    .first()
                    .map(|&c| Value::Node(c))
                    .unwrap_or(Value::Undefined),
            ),
            "className" => Some(attr_str("class")),
            _ => None,
        },
        NodeKind::Form => match key {
            "elements" => Some(Value::Elements(node)),
            "length" => Some(Value::Int(ControlsCollection::new(tree, node).len() as i64)),
            "className" => Some(attr_str("class")),
            "action" | "method" | "title" | "name" => Some(attr_str(key)),
            _ => None,
        },
        _ => match key {
            "className" => Some(attr_str("class")),
            "title" | "name" | "id" => Some(attr_str(key)),
            _ => None,
        },
    }
}
