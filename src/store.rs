//! The normalized component-tree store.
//!
//! The editable tree lives here as a flat map from node id to record, with
//! explicit parent back-references. The root record is aliased under the
//! stable `root` key (keeping its own id in the record), so the editor can
//! address the root without knowing its id. Mutations validate everything
//! up front and only then touch the map, so a failed operation leaves the
//! store exactly as it was.

use crate::error::{TreeError, TreeResult};
use crate::node::{AttrMap, ElementNode, Node, NodeId, TextNode};
use crate::patch::NodePatch;
use crate::tags::{allows_text, is_void, valid_child_tags, Tag};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Normalized record for an element node: children as ids, parent as a
/// back-reference (`None` only for the root).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredElement {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub tag: Tag,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub css: String,
    #[serde(default, skip_serializing_if = "AttrMap::is_empty")]
    pub attrs: AttrMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,
}

/// Normalized record for a text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredText {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub text: String,
}

/// A record in the flat map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoredNode {
    Element(StoredElement),
    Text(StoredText),
}

impl StoredNode {
    pub fn id(&self) -> &NodeId {
        match self {
            StoredNode::Element(el) => &el.id,
            StoredNode::Text(text) => &text.id,
        }
    }

    pub fn parent(&self) -> Option<&NodeId> {
        match self {
            StoredNode::Element(el) => el.parent.as_ref(),
            StoredNode::Text(text) => text.parent.as_ref(),
        }
    }

    pub fn as_element(&self) -> Option<&StoredElement> {
        match self {
            StoredNode::Element(el) => Some(el),
            StoredNode::Text(_) => None,
        }
    }
}

/// What to insert: an empty element of a given tag, or an empty text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTemplate {
    Element(Tag),
    Text,
}

/// The flat, normalized forest holding one editing session's tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeStore {
    nodes: HashMap<NodeId, StoredNode>,
}

impl TreeStore {
    // ─── Normalize / denormalize ─────────────────────────────────────────

    /// Flatten a denormalized tree into the store. Runs in O(n) over node
    /// count. Assumes ids are unique; seed documents are validated before
    /// they get here.
    pub fn normalize(root: &ElementNode) -> TreeStore {
        let mut nodes = HashMap::new();
        flatten_element(&mut nodes, root, None);
        TreeStore { nodes }
    }

    /// Rebuild the nested tree from the flat map, starting at the root
    /// record. Child ids missing from the map are skipped; recursion stops
    /// at text nodes and void tags.
    pub fn denormalize(&self) -> TreeResult<ElementNode> {
        let root = self.root_record()?;
        Ok(self.denormalize_element(root))
    }

    fn denormalize_element(&self, el: &StoredElement) -> ElementNode {
        let children = if is_void(el.tag) {
            Vec::new()
        } else {
            el.children
                .iter()
                .filter_map(|child_id| match self.nodes.get(child_id) {
                    Some(StoredNode::Element(child)) => {
                        Some(Node::Element(self.denormalize_element(child)))
                    }
                    Some(StoredNode::Text(text)) => Some(Node::Text(TextNode {
                        id: text.id.clone(),
                        text: text.text.clone(),
                    })),
                    None => None,
                })
                .collect()
        };

        ElementNode {
            id: el.id.clone(),
            tag: el.tag,
            css: el.css.clone(),
            attrs: el.attrs.clone(),
            children,
        }
    }

    // ─── Lookup ──────────────────────────────────────────────────────────

    /// Look up a record. Both the `root` alias and the root's own id resolve
    /// to the root record.
    pub fn get(&self, id: &NodeId) -> Option<&StoredNode> {
        self.nodes.get(&self.key_for(id))
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of records, the root counted once.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root element record.
    pub fn root_record(&self) -> TreeResult<&StoredElement> {
        match self.nodes.get(&NodeId::root()) {
            Some(StoredNode::Element(el)) => Ok(el),
            _ => Err(TreeError::NotFound { id: NodeId::root() }),
        }
    }

    /// The root's own id (distinct from the `root` alias key).
    pub fn root_id(&self) -> TreeResult<&NodeId> {
        Ok(&self.root_record()?.id)
    }

    /// Map key for a node: the root's own id is aliased to the `root` key,
    /// everything else is keyed by its id.
    fn key_for(&self, id: &NodeId) -> NodeId {
        if *id == NodeId::root() {
            return NodeId::root();
        }
        match self.nodes.get(&NodeId::root()) {
            Some(StoredNode::Element(root)) if root.id == *id => NodeId::root(),
            _ => id.clone(),
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Deep-merge a patch into the node at `id`. The patch kind must match
    /// the node kind; a children patch may only reorder the existing child
    /// ids; a tag patch is re-checked against the schema for both the node's
    /// parent and its current children.
    pub fn update(&mut self, id: &NodeId, patch: NodePatch) -> TreeResult<()> {
        let key = self.key_for(id);
        let node = self.nodes.get(&key).ok_or_else(|| TreeError::NotFound {
            id: id.clone(),
        })?;

        match (node, &patch) {
            (StoredNode::Element(el), NodePatch::Element(p)) => {
                if let Some(new_children) = &p.children {
                    if !is_permutation(&el.children, new_children) {
                        return Err(TreeError::ChildrenMismatch { id: el.id.clone() });
                    }
                }
                if let Some(new_tag) = p.tag {
                    if new_tag != el.tag {
                        self.check_retag(el, new_tag)?;
                    }
                }
            }
            (StoredNode::Text(_), NodePatch::Text(_)) => {}
            _ => {
                return Err(TreeError::PatchKindMismatch {
                    id: node.id().clone(),
                })
            }
        }

        match (self.nodes.get_mut(&key), patch) {
            (Some(StoredNode::Element(el)), NodePatch::Element(p)) => {
                if let Some(tag) = p.tag {
                    el.tag = tag;
                }
                if let Some(css) = p.css {
                    el.css = css;
                }
                if let Some(attrs) = p.attrs {
                    // Key-by-key merge; present keys replace, absent keys stay.
                    for (key, value) in attrs {
                        el.attrs.insert(key, value);
                    }
                }
                if let Some(children) = p.children {
                    el.children = children;
                }
            }
            (Some(StoredNode::Text(text)), NodePatch::Text(p)) => {
                if let Some(content) = p.text {
                    text.text = content;
                }
            }
            _ => unreachable!("patch was validated against the record kind"),
        }

        Ok(())
    }

    /// Validate that retagging `el` keeps both its position under its parent
    /// and its current children legal.
    fn check_retag(&self, el: &StoredElement, new_tag: Tag) -> TreeResult<()> {
        if let Some(parent_id) = &el.parent {
            if let Some(StoredNode::Element(parent)) = self.get(parent_id) {
                if !valid_child_tags(parent.tag).contains(&new_tag) {
                    return Err(TreeError::InvalidChildTag {
                        parent: parent.tag,
                        child: new_tag,
                    });
                }
            }
        }
        for child_id in &el.children {
            match self.nodes.get(child_id) {
                Some(StoredNode::Element(child)) => {
                    if !valid_child_tags(new_tag).contains(&child.tag) {
                        return Err(TreeError::InvalidChildTag {
                            parent: new_tag,
                            child: child.tag,
                        });
                    }
                }
                Some(StoredNode::Text(_)) => {
                    if !allows_text(new_tag) {
                        return Err(TreeError::TextNotPermitted { parent: new_tag });
                    }
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Create an empty leaf under `parent_id` and return its fresh id. The
    /// template is checked against the nesting schema before anything is
    /// touched.
    pub fn insert_node(
        &mut self,
        parent_id: &NodeId,
        template: NodeTemplate,
    ) -> TreeResult<NodeId> {
        let parent_key = self.key_for(parent_id);
        let parent = match self.nodes.get(&parent_key) {
            None => {
                return Err(TreeError::NotFound {
                    id: parent_id.clone(),
                })
            }
            Some(StoredNode::Text(text)) => {
                return Err(TreeError::NotAnElement {
                    id: text.id.clone(),
                })
            }
            Some(StoredNode::Element(el)) => el,
        };

        match template {
            NodeTemplate::Element(tag) => {
                if !valid_child_tags(parent.tag).contains(&tag) {
                    return Err(TreeError::InvalidChildTag {
                        parent: parent.tag,
                        child: tag,
                    });
                }
            }
            NodeTemplate::Text => {
                if !allows_text(parent.tag) {
                    return Err(TreeError::TextNotPermitted { parent: parent.tag });
                }
            }
        }

        let parent_real_id = parent.id.clone();
        let id = NodeId::fresh();
        let record = match template {
            NodeTemplate::Element(tag) => StoredNode::Element(StoredElement {
                id: id.clone(),
                parent: Some(parent_real_id),
                tag,
                css: String::new(),
                attrs: AttrMap::new(),
                children: Vec::new(),
            }),
            NodeTemplate::Text => StoredNode::Text(StoredText {
                id: id.clone(),
                parent: Some(parent_real_id),
                text: String::new(),
            }),
        };

        self.nodes.insert(id.clone(), record);
        if let Some(StoredNode::Element(parent)) = self.nodes.get_mut(&parent_key) {
            parent.children.push(id.clone());
        }

        Ok(id)
    }

    /// Remove a node and its entire subtree, and detach it from its former
    /// parent's children. The root cannot be deleted.
    pub fn delete_node(&mut self, id: &NodeId) -> TreeResult<()> {
        let key = self.key_for(id);
        if key == NodeId::root() {
            return Err(TreeError::RootImmutable);
        }
        let node = self.nodes.get(&key).ok_or_else(|| TreeError::NotFound {
            id: id.clone(),
        })?;
        let parent_id = node.parent().cloned();

        let mut doomed = Vec::new();
        self.collect_subtree(&key, &mut doomed);
        for victim in &doomed {
            self.nodes.remove(victim);
        }

        if let Some(parent_id) = parent_id {
            let parent_key = self.key_for(&parent_id);
            if let Some(StoredNode::Element(parent)) = self.nodes.get_mut(&parent_key) {
                parent.children.retain(|child| *child != key);
            }
        }

        Ok(())
    }

    /// Move a node to the end of another element's children. Rejected for
    /// the root, for self-reparenting, for cycles (moving into one's own
    /// descendant), and for schema-illegal placements.
    pub fn reparent_node(&mut self, id: &NodeId, new_parent_id: &NodeId) -> TreeResult<()> {
        let key = self.key_for(id);
        if key == NodeId::root() {
            return Err(TreeError::RootImmutable);
        }
        let node = self.nodes.get(&key).ok_or_else(|| TreeError::NotFound {
            id: id.clone(),
        })?;

        let parent_key = self.key_for(new_parent_id);
        let new_parent = match self.nodes.get(&parent_key) {
            None => {
                return Err(TreeError::NotFound {
                    id: new_parent_id.clone(),
                })
            }
            Some(StoredNode::Text(text)) => {
                return Err(TreeError::NotAnElement {
                    id: text.id.clone(),
                })
            }
            Some(StoredNode::Element(el)) => el,
        };

        if new_parent.id == *node.id() {
            return Err(TreeError::SelfParent { id: key });
        }
        if self.is_descendant(&new_parent.id.clone(), &key) {
            return Err(TreeError::CycleDetected {
                id: key,
                descendant: new_parent_id.clone(),
            });
        }
        match node {
            StoredNode::Element(el) => {
                if !valid_child_tags(new_parent.tag).contains(&el.tag) {
                    return Err(TreeError::InvalidChildTag {
                        parent: new_parent.tag,
                        child: el.tag,
                    });
                }
            }
            StoredNode::Text(_) => {
                if !allows_text(new_parent.tag) {
                    return Err(TreeError::TextNotPermitted {
                        parent: new_parent.tag,
                    });
                }
            }
        }

        let new_parent_real_id = new_parent.id.clone();
        let old_parent_id = node.parent().cloned();

        if let Some(old_parent_id) = old_parent_id {
            let old_key = self.key_for(&old_parent_id);
            if let Some(StoredNode::Element(old_parent)) = self.nodes.get_mut(&old_key) {
                old_parent.children.retain(|child| *child != key);
            }
        }
        if let Some(StoredNode::Element(new_parent)) = self.nodes.get_mut(&parent_key) {
            new_parent.children.push(key.clone());
        }
        match self.nodes.get_mut(&key) {
            Some(StoredNode::Element(el)) => el.parent = Some(new_parent_real_id),
            Some(StoredNode::Text(text)) => text.parent = Some(new_parent_real_id),
            None => {}
        }

        Ok(())
    }

    // ─── Walk helpers ────────────────────────────────────────────────────

    fn collect_subtree(&self, key: &NodeId, out: &mut Vec<NodeId>) {
        out.push(key.clone());
        if let Some(StoredNode::Element(el)) = self.nodes.get(key) {
            for child in &el.children {
                self.collect_subtree(child, out);
            }
        }
    }

    /// Whether `candidate` sits inside the subtree rooted at `ancestor_key`
    /// (strictly below it).
    fn is_descendant(&self, candidate: &NodeId, ancestor_key: &NodeId) -> bool {
        if let Some(StoredNode::Element(el)) = self.nodes.get(ancestor_key) {
            for child in &el.children {
                if child == candidate || self.is_descendant(candidate, child) {
                    return true;
                }
            }
        }
        false
    }
}

fn flatten_element(
    nodes: &mut HashMap<NodeId, StoredNode>,
    node: &ElementNode,
    parent: Option<&NodeId>,
) {
    let key = match parent {
        None => NodeId::root(),
        Some(_) => node.id.clone(),
    };
    nodes.insert(
        key,
        StoredNode::Element(StoredElement {
            id: node.id.clone(),
            parent: parent.cloned(),
            tag: node.tag,
            css: node.css.clone(),
            attrs: node.attrs.clone(),
            children: node.children.iter().map(|child| child.id().clone()).collect(),
        }),
    );

    for child in &node.children {
        match child {
            Node::Element(el) => flatten_element(nodes, el, Some(&node.id)),
            Node::Text(text) => {
                nodes.insert(
                    text.id.clone(),
                    StoredNode::Text(StoredText {
                        id: text.id.clone(),
                        parent: Some(node.id.clone()),
                        text: text.text.clone(),
                    }),
                );
            }
        }
    }
}

fn is_permutation(current: &[NodeId], proposed: &[NodeId]) -> bool {
    if current.len() != proposed.len() {
        return false;
    }
    let mut a: Vec<&NodeId> = current.iter().collect();
    let mut b: Vec<&NodeId> = proposed.iter().collect();
    a.sort();
    b.sort();
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::default_document;

    #[test]
    fn test_root_is_aliased_under_root_key() {
        let doc = default_document();
        let store = TreeStore::normalize(&doc);

        let by_alias = store.get(&NodeId::root()).unwrap();
        let by_id = store.get(&doc.id).unwrap();
        assert_eq!(by_alias, by_id);
        assert_eq!(by_alias.id(), &doc.id);
    }

    #[test]
    fn test_root_has_no_parent() {
        let doc = default_document();
        let store = TreeStore::normalize(&doc);
        assert!(store.root_record().unwrap().parent.is_none());
    }

    #[test]
    fn test_children_patch_must_be_permutation() {
        let doc = default_document();
        let mut store = TreeStore::normalize(&doc);
        let bogus = vec![NodeId::fresh()];
        let err = store
            .update(&NodeId::root(), NodePatch::children(bogus))
            .unwrap_err();
        assert!(matches!(err, TreeError::ChildrenMismatch { .. }));
    }

    #[test]
    fn test_patch_kind_must_match_node_kind() {
        let doc = default_document();
        let mut store = TreeStore::normalize(&doc);
        let err = store
            .update(&NodeId::root(), NodePatch::text("nope"))
            .unwrap_err();
        assert!(matches!(err, TreeError::PatchKindMismatch { .. }));
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let doc = default_document();
        let mut store = TreeStore::normalize(&doc);
        let ghost = NodeId::fresh();
        assert!(matches!(
            store.update(&ghost, NodePatch::css("")),
            Err(TreeError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete_node(&ghost),
            Err(TreeError::NotFound { .. })
        ));
        assert!(matches!(
            store.reparent_node(&ghost, &NodeId::root()),
            Err(TreeError::NotFound { .. })
        ));
    }
}
