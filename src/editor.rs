//! Tree editor view model.
//!
//! The editor is a pure recursive projection of the normalized store: each
//! node becomes a row carrying exactly what an inspector panel needs — the
//! tag label, the css field binding, the schema-filtered insert menu, and the
//! delete affordance (hidden for the root). A host window manager owns the
//! transient concerns (expand/collapse, hover), keyed by node id so they
//! naturally reset when a node is deleted, and drives all mutations through
//! [`apply_action`] on the engine handle it was given.

use crate::error::TreeResult;
use crate::node::NodeId;
use crate::patch::NodePatch;
use crate::store::{NodeTemplate, StoredElement, StoredNode, TreeStore};
use crate::tags::{allows_text, valid_child_tags, Tag};

/// Input placeholder for the css field of an element row.
pub const CSS_PLACEHOLDER: &str = "write css rules for this element here";
/// Input placeholder for the content field of a text row.
pub const TEXT_PLACEHOLDER: &str = "write something!";

/// The whole editor pane: one row tree rooted at the store's root.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorView {
    pub root: ElementRow,
}

/// One row per node.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorRow {
    Element(ElementRow),
    Text(TextRow),
}

impl EditorRow {
    pub fn id(&self) -> &NodeId {
        match self {
            EditorRow::Element(row) => &row.id,
            EditorRow::Text(row) => &row.id,
        }
    }
}

/// Inspector row for an element node.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRow {
    pub id: NodeId,
    pub tag: Tag,
    /// Toggle-button label, e.g. `<div>`.
    pub label: String,
    pub is_root: bool,
    /// Current raw css template, bound to the css input.
    pub css: String,
    /// Stable input name for the css field, `<id>-css`.
    pub css_input_id: String,
    pub children: Vec<EditorRow>,
    /// Insert actions the schema permits under this element.
    pub insert_options: Vec<InsertOption>,
    /// False only for the root, which exposes no delete affordance.
    pub deletable: bool,
}

/// Inspector row for a text node.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRow {
    pub id: NodeId,
    /// Current content, bound to the text input.
    pub text: String,
    /// Stable input name for the text field, `<id>-text`.
    pub text_input_id: String,
    pub placeholder: &'static str,
}

/// An entry in the "add child" menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOption {
    Tag(Tag),
    Text,
}

impl InsertOption {
    /// Menu label for the option.
    pub fn label(&self) -> &'static str {
        match self {
            InsertOption::Tag(tag) => tag.name(),
            InsertOption::Text => "text",
        }
    }

    /// The store template this option inserts.
    pub fn template(&self) -> NodeTemplate {
        match self {
            InsertOption::Tag(tag) => NodeTemplate::Element(*tag),
            InsertOption::Text => NodeTemplate::Text,
        }
    }
}

/// A mutation requested by an editor affordance, dispatched to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    Insert {
        parent: NodeId,
        template: NodeTemplate,
    },
    Patch {
        node: NodeId,
        patch: NodePatch,
    },
    Delete {
        node: NodeId,
    },
    Reparent {
        node: NodeId,
        new_parent: NodeId,
    },
}

/// Apply one editor action to the store. Returns the new node's id for
/// inserts, `None` otherwise. A rejected action leaves the store untouched.
pub fn apply_action(store: &mut TreeStore, action: EditorAction) -> TreeResult<Option<NodeId>> {
    match action {
        EditorAction::Insert { parent, template } => {
            store.insert_node(&parent, template).map(Some)
        }
        EditorAction::Patch { node, patch } => store.update(&node, patch).map(|_| None),
        EditorAction::Delete { node } => store.delete_node(&node).map(|_| None),
        EditorAction::Reparent { node, new_parent } => {
            store.reparent_node(&node, &new_parent).map(|_| None)
        }
    }
}

/// Project the current store snapshot into the editor row tree.
pub fn editor_view(store: &TreeStore) -> TreeResult<EditorView> {
    let root = store.root_record()?;
    Ok(EditorView {
        root: element_row(store, root, true),
    })
}

/// The insert options the schema permits under `tag`, element tags first,
/// text last — the order the original menu lists them.
pub fn insert_options(tag: Tag) -> Vec<InsertOption> {
    let mut options: Vec<InsertOption> = valid_child_tags(tag)
        .iter()
        .copied()
        .map(InsertOption::Tag)
        .collect();
    if allows_text(tag) {
        options.push(InsertOption::Text);
    }
    options
}

fn element_row(store: &TreeStore, el: &StoredElement, is_root: bool) -> ElementRow {
    let children = el
        .children
        .iter()
        .filter_map(|child_id| match store.get(child_id) {
            Some(StoredNode::Element(child)) => {
                Some(EditorRow::Element(element_row(store, child, false)))
            }
            Some(StoredNode::Text(text)) => Some(EditorRow::Text(TextRow {
                id: text.id.clone(),
                text: text.text.clone(),
                text_input_id: format!("{}-text", text.id),
                placeholder: TEXT_PLACEHOLDER,
            })),
            None => None,
        })
        .collect();

    ElementRow {
        id: el.id.clone(),
        tag: el.tag,
        label: format!("<{}>", el.tag),
        is_root,
        css: el.css.clone(),
        css_input_id: format!("{}-css", el.id),
        children,
        insert_options: insert_options(el.tag),
        deletable: !is_root,
    }
}
