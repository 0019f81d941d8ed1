//! Typed deep-partial patches for the update operation.
//!
//! Only the fields present in a patch are applied. The attribute map merges
//! key-by-key; the children array, when present, replaces wholesale but may
//! only reorder the ids already there. Node identity (`id`, `parent`, the
//! element/text kind) is not expressible in a patch at all.

use crate::node::{AttrMap, NodeId};
use crate::tags::Tag;
use serde::{Deserialize, Serialize};

/// A partial update for a single node. The variant must match the kind of the
/// node being patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodePatch {
    Element(ElementPatch),
    Text(TextPatch),
}

/// Partial update for an element node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<AttrMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeId>>,
}

/// Partial update for a text node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl NodePatch {
    /// Patch that replaces an element's raw css template.
    pub fn css(css: impl Into<String>) -> NodePatch {
        NodePatch::Element(ElementPatch {
            css: Some(css.into()),
            ..ElementPatch::default()
        })
    }

    /// Patch that replaces a text node's content.
    pub fn text(text: impl Into<String>) -> NodePatch {
        NodePatch::Text(TextPatch {
            text: Some(text.into()),
        })
    }

    /// Patch that reorders an element's children.
    pub fn children(children: Vec<NodeId>) -> NodePatch {
        NodePatch::Element(ElementPatch {
            children: Some(children),
            ..ElementPatch::default()
        })
    }
}
