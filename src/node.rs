//! Denormalized node model: the nested tree shape used for seeding,
//! rendering, and serialized documents.

use crate::tags::Tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Opaque node identifier. Freshly created nodes get a v4 uuid; seed
/// documents may use any unique string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Stable alias under which the root record lives in the normalized map,
    /// distinct from the root's own id.
    pub fn root() -> NodeId {
        NodeId("root".to_string())
    }

    /// Mint a new unique id for a freshly created node.
    pub fn fresh() -> NodeId {
        NodeId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

/// Open attribute map: string keys to arbitrary YAML values. A BTreeMap keeps
/// serialization and rendering order deterministic.
pub type AttrMap = BTreeMap<String, serde_yaml::Value>;

/// A node in the denormalized tree — either a markup element or literal text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
}

impl Node {
    pub fn id(&self) -> &NodeId {
        match self {
            Node::Element(el) => &el.id,
            Node::Text(text) => &text.id,
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }
}

/// A markup element instance: tag, raw scoped-css template, open attributes,
/// and nested children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    pub id: NodeId,
    pub tag: Tag,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub css: String,
    #[serde(default, skip_serializing_if = "AttrMap::is_empty")]
    pub attrs: AttrMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl ElementNode {
    /// An empty element leaf with a fresh id, as created by an editor insert.
    pub fn empty(tag: Tag) -> ElementNode {
        ElementNode {
            id: NodeId::fresh(),
            tag,
            css: String::new(),
            attrs: AttrMap::new(),
            children: Vec::new(),
        }
    }
}

/// Literal text content. Text nodes never carry children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub id: NodeId,
    #[serde(default)]
    pub text: String,
}

impl TextNode {
    /// An empty text leaf with a fresh id, as created by an editor insert.
    pub fn empty() -> TextNode {
        TextNode {
            id: NodeId::fresh(),
            text: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_are_unique() {
        assert_ne!(NodeId::fresh(), NodeId::fresh());
    }

    #[test]
    fn test_node_yaml_shape() {
        let yaml = "
type: element
id: outer
tag: div
children:
  - type: text
    id: greeting
    text: hi
";
        let node: Node = serde_yaml::from_str(yaml).unwrap();
        let el = node.as_element().unwrap();
        assert_eq!(el.tag, Tag::Div);
        assert_eq!(el.children.len(), 1);
        assert_eq!(el.children[0].id(), &NodeId::from("greeting"));
    }

    #[test]
    fn test_empty_fields_are_defaulted() {
        let yaml = "type: element\nid: bare\ntag: p";
        let node: Node = serde_yaml::from_str(yaml).unwrap();
        let el = node.as_element().unwrap();
        assert!(el.css.is_empty());
        assert!(el.attrs.is_empty());
        assert!(el.children.is_empty());
    }
}
