//! Seed documents: the YAML form a session starts from, its validation, and
//! the default starter tree.

use crate::error::{TreeError, TreeResult};
use crate::node::{AttrMap, ElementNode, Node, NodeId, TextNode};
use crate::tags::{allows_text, is_void, valid_child_tags, Tag};
use std::collections::HashSet;

/// Starter css template for the default document's root.
pub const DEFAULT_CSS: &str = "$ {
  background: #efefef;
  width: 200px;
  height: 200px;
  border-radius: 15px;
  border: 1px solid #000;
}

$ > p {
  color: #a3a3a3;
  font-size: 24px;
  line-height: 1.15;
}";

/// The default starter tree: a styled div holding a paragraph with a
/// greeting. Fresh ids on every call.
pub fn default_document() -> ElementNode {
    ElementNode {
        id: NodeId::fresh(),
        tag: Tag::Div,
        css: DEFAULT_CSS.to_string(),
        attrs: AttrMap::new(),
        children: vec![Node::Element(ElementNode {
            id: NodeId::fresh(),
            tag: Tag::P,
            css: String::new(),
            attrs: AttrMap::new(),
            children: vec![Node::Text(TextNode {
                id: NodeId::fresh(),
                text: "Hello world!".to_string(),
            })],
        })],
    }
}

/// Parse and validate a YAML seed document. The root must be an element
/// node, ids must be unique, and every nesting must be legal under the tag
/// schema.
pub fn parse_document(yaml: &str) -> TreeResult<ElementNode> {
    let node: Node = serde_yaml::from_str(yaml)?;
    let root = match node {
        Node::Element(el) => el,
        Node::Text(_) => return Err(TreeError::TextRoot),
    };
    validate_document(&root)?;
    Ok(root)
}

/// Serialize a tree back to the YAML seed form.
pub fn to_yaml(root: &ElementNode) -> TreeResult<String> {
    Ok(serde_yaml::to_string(&Node::Element(root.clone()))?)
}

/// Validate a denormalized tree: id uniqueness plus recursive nesting
/// legality.
pub fn validate_document(root: &ElementNode) -> TreeResult<()> {
    let mut seen = HashSet::new();
    collect_ids(&Node::Element(root.clone()), &mut seen)?;
    validate_nesting(root)
}

fn collect_ids(node: &Node, seen: &mut HashSet<NodeId>) -> TreeResult<()> {
    // The literal id `root` is the store's alias key; a node carrying it
    // would overwrite the root record when the tree is flattened.
    if node.id() == &NodeId::root() {
        return Err(TreeError::ReservedId);
    }
    if !seen.insert(node.id().clone()) {
        return Err(TreeError::DuplicateId {
            id: node.id().clone(),
        });
    }
    if let Node::Element(el) = node {
        for child in &el.children {
            collect_ids(child, seen)?;
        }
    }
    Ok(())
}

fn validate_nesting(el: &ElementNode) -> TreeResult<()> {
    if is_void(el.tag) && !el.children.is_empty() {
        return Err(TreeError::ValidationError(format!(
            "Void tag '{}' cannot have children",
            el.tag
        )));
    }
    for child in &el.children {
        match child {
            Node::Element(child_el) => {
                if !valid_child_tags(el.tag).contains(&child_el.tag) {
                    return Err(TreeError::InvalidChildTag {
                        parent: el.tag,
                        child: child_el.tag,
                    });
                }
                validate_nesting(child_el)?;
            }
            Node::Text(_) => {
                if !allows_text(el.tag) {
                    return Err(TreeError::TextNotPermitted { parent: el.tag });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_is_valid() {
        let doc = default_document();
        assert!(validate_document(&doc).is_ok());
        assert_eq!(doc.tag, Tag::Div);
        assert_eq!(doc.css, DEFAULT_CSS);
    }

    #[test]
    fn test_default_document_ids_are_fresh() {
        assert_ne!(default_document().id, default_document().id);
    }

    #[test]
    fn test_parse_rejects_text_root() {
        let yaml = "type: text\nid: loose\ntext: floating";
        assert!(matches!(parse_document(yaml), Err(TreeError::TextRoot)));
    }

    #[test]
    fn test_parse_rejects_duplicate_ids() {
        let yaml = "
type: element
id: twin
tag: div
children:
  - type: element
    id: twin
    tag: p
";
        assert!(matches!(
            parse_document(yaml),
            Err(TreeError::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_reserved_root_id() {
        // A node named after the alias key would shadow the root record in
        // the normalized map.
        let yaml = "
type: element
id: page
tag: div
children:
  - type: text
    id: root
    text: shadow
";
        assert!(matches!(parse_document(yaml), Err(TreeError::ReservedId)));

        // The root itself may not claim the alias either; the alias key
        // stays distinct from the root's own id.
        let yaml = "type: element\nid: root\ntag: div";
        assert!(matches!(parse_document(yaml), Err(TreeError::ReservedId)));
    }

    #[test]
    fn test_parse_rejects_illegal_nesting() {
        let yaml = "
type: element
id: outer
tag: a
children:
  - type: element
    id: inner
    tag: button
";
        assert!(matches!(
            parse_document(yaml),
            Err(TreeError::InvalidChildTag { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_children_under_void_tag() {
        let yaml = "
type: element
id: pic
tag: img
children:
  - type: text
    id: caption
    text: nope
";
        assert!(parse_document(yaml).is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let doc = default_document();
        let yaml = to_yaml(&doc).unwrap();
        let parsed = parse_document(&yaml).unwrap();
        assert_eq!(parsed, doc);
    }
}
