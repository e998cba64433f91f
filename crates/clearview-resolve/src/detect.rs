//! Shadow detection
//!
//! Pure predicates deciding whether the value currently observable under a
//! key on a container is an artifact of named-item exposure, as opposed to a
//! built-in or a custom property the caller defined. The rules mirror the
//! platform's exposure algorithm branch for branch; containment and
//! rootedness always go through the primitive tree probes, never through a
//! property that could itself be shadowed.

use clearview_dom::{
    native_get, native_own_keys, parse_index, ControlsCollection, DomTree, NamedLookup, NodeId,
    NodeKind, Value,
};

/// Detector for form-kind containers.
pub struct FormDetector;

impl FormDetector {
    /// Is the value observable under `key` on `form` a named-item shadow?
    ///
    /// Rule order:
    /// 1. the `elements` gate: anything other than the real controls
    ///    collection under that key is a shadow;
    /// 2. keys outside the collection's exposure rule can only be image
    ///    shadows;
    /// 3. exposure keys are shadowed when the observed value matches what
    ///    the collection lookup would produce;
    /// 4. otherwise check for a form-owned image (or homogeneous image
    ///    group) carrying the key.
    pub fn is_shadowed(tree: &DomTree, form: NodeId, key: &str) -> bool {
        if key == "elements" {
            return native_get(tree, form, "elements") != Value::Elements(form);
        }

        let col = ControlsCollection::new(tree, form);
        if col.exposure_keys(tree).iter().any(|k| k == key) {
            let observed = native_get(tree, form, key);
            let mut candidates = Vec::new();
            if let Some(index) = parse_index(key) {
                if let Some(member) = col.item(index) {
                    candidates.push(Value::Node(member));
                }
            }
            match col.named_item(tree, key) {
                NamedLookup::Single(n) => candidates.push(Value::Node(n)),
                NamedLookup::Group(g) => candidates.push(Value::Group(g)),
                NamedLookup::None => {}
            }
            return candidates.iter().any(|c| *c == observed);
        }

        match native_get(tree, form, key) {
            Value::Node(node) => Self::is_owned_image(tree, form, node, key),
            Value::Group(group) => {
                !group.is_empty()
                    && group
                        .iter()
                        .all(|&node| Self::is_owned_image(tree, form, node, key))
            }
            _ => false,
        }
    }

    fn is_owned_image(tree: &DomTree, form: NodeId, node: NodeId, key: &str) -> bool {
        let Some(n) = tree.get(node) else {
            return false;
        };
        n.kind() == NodeKind::Image
            && (n.name_attr() == Some(key) || n.id_attr() == Some(key))
            && tree.containing_form(node) == Some(form)
    }
}

/// Detector for document-kind containers.
pub struct DocumentDetector;

impl DocumentDetector {
    /// Is the value observable under `key` on `doc` a named-item shadow?
    ///
    /// Applies only to keys that are currently reflectively-own on the
    /// document. Collection-typed values are always shadows; a window-like
    /// value is a shadow when its frame element carries the key and is
    /// rooted here; single nodes follow the per-kind name/id rules.
    pub fn is_shadowed(tree: &DomTree, doc: NodeId, key: &str) -> bool {
        if !native_own_keys(tree, doc).iter().any(|k| k == key) {
            return false;
        }
        match native_get(tree, doc, key) {
            Value::Group(_) => true,
            Value::Window(frame) => {
                tree.get(frame)
                    .map(|n| n.name_attr() == Some(key))
                    .unwrap_or(false)
                    && tree.root_document(frame) == Some(doc)
            }
            Value::Node(node) => Self::node_shadows(tree, doc, node, key),
            _ => false,
        }
    }

    fn node_shadows(tree: &DomTree, doc: NodeId, node: NodeId, key: &str) -> bool {
        let Some(n) = tree.get(node) else {
            return false;
        };
        if tree.root_document(node) != Some(doc) {
            return false;
        }
        match n.kind() {
            NodeKind::Form | NodeKind::Embed => n.name_attr() == Some(key),
            NodeKind::Object => n.name_attr() == Some(key) || n.id_attr() == Some(key),
            // An image with an empty name never shadows via its id.
            NodeKind::Image => {
                n.name_attr() == Some(key)
                    || (n.name_attr().is_some() && n.id_attr() == Some(key))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clearview_dom::native_set;

    fn doc_and_form() -> (DomTree, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let form = tree.create_node(NodeKind::Form);
        tree.set_attr(form, "class", "hello").unwrap();
        tree.append_child(doc, form).unwrap();
        (tree, doc, form)
    }

    #[test]
    fn test_control_shadow_detected() {
        let (mut tree, _, form) = doc_and_form();
        let control = tree.create_node(NodeKind::FormControl);
        tree.set_attr(control, "name", "className").unwrap();
        tree.append_child(form, control).unwrap();

        assert!(FormDetector::is_shadowed(&tree, form, "className"));
        assert!(FormDetector::is_shadowed(&tree, form, "0"));
        assert!(!FormDetector::is_shadowed(&tree, form, "action"));
        assert!(!FormDetector::is_shadowed(&tree, form, "1"));
    }

    #[test]
    fn test_elements_gate() {
        let (mut tree, _, form) = doc_and_form();
        assert!(!FormDetector::is_shadowed(&tree, form, "elements"));

        let control = tree.create_node(NodeKind::FormControl);
        tree.set_attr(control, "name", "elements").unwrap();
        tree.append_child(form, control).unwrap();
        assert!(FormDetector::is_shadowed(&tree, form, "elements"));
    }

    #[test]
    fn test_custom_property_is_not_a_shadow() {
        let (mut tree, _, form) = doc_and_form();
        let img = tree.create_node(NodeKind::Image);
        tree.set_attr(img, "name", "other").unwrap();
        tree.append_child(form, img).unwrap();

        native_set(&mut tree, form, "logo", Value::Node(img)).unwrap();
        assert!(!FormDetector::is_shadowed(&tree, form, "logo"));
        // The same image under its real name is a shadow.
        assert!(FormDetector::is_shadowed(&tree, form, "other"));
    }

    #[test]
    fn test_image_owned_by_other_form_is_not_a_shadow() {
        let (mut tree, _, form) = doc_and_form();
        let inner_form = tree.create_node(NodeKind::Form);
        let img = tree.create_node(NodeKind::Image);
        tree.set_attr(img, "name", "pic").unwrap();
        tree.append_child(form, inner_form).unwrap();
        tree.append_child(inner_form, img).unwrap();

        // Nearest form ancestor is the inner form, so the outer form's
        // observable value (if any) is not its own image shadow.
        assert!(!FormDetector::is_shadowed(&tree, form, "pic"));
        assert!(FormDetector::is_shadowed(&tree, inner_form, "pic"));
    }

    #[test]
    fn test_document_kind_rules() {
        let (mut tree, doc, form) = doc_and_form();
        tree.set_attr(form, "name", "login").unwrap();
        assert!(DocumentDetector::is_shadowed(&tree, doc, "login"));

        let object = tree.create_node(NodeKind::Object);
        tree.set_attr(object, "id", "player").unwrap();
        tree.append_child(doc, object).unwrap();
        assert!(DocumentDetector::is_shadowed(&tree, doc, "player"));

        // Image id is only active alongside a non-empty name.
        let img = tree.create_node(NodeKind::Image);
        tree.set_attr(img, "id", "banner").unwrap();
        tree.append_child(doc, img).unwrap();
        assert!(!DocumentDetector::is_shadowed(&tree, doc, "banner"));
        tree.set_attr(img, "name", "hero").unwrap();
        assert!(DocumentDetector::is_shadowed(&tree, doc, "banner"));
        assert!(DocumentDetector::is_shadowed(&tree, doc, "hero"));
    }

    #[test]
    fn test_document_window_shadow() {
        let (mut tree, doc, _) = doc_and_form();
        let iframe = tree.create_node(NodeKind::Iframe);
        tree.set_attr(iframe, "name", "child").unwrap();
        tree.append_child(doc, iframe).unwrap();

        assert!(DocumentDetector::is_shadowed(&tree, doc, "child"));
        assert!(!DocumentDetector::is_shadowed(&tree, doc, "other"));
    }

    #[test]
    fn test_document_group_always_shadowed() {
        let (mut tree, doc, form) = doc_and_form();
        tree.set_attr(form, "name", "dup").unwrap();
        let embed = tree.create_node(NodeKind::Embed);
        tree.set_attr(embed, "name", "dup").unwrap();
        tree.append_child(doc, embed).unwrap();

        assert!(DocumentDetector::is_shadowed(&tree, doc, "dup"));
    }
}
