//! # Rapid Tree — editable component-tree engine
//!
//! The engine behind a visual page builder: a tree of markup elements and
//! text nodes, held in a normalized flat store, mutated by insert / update /
//! delete / reparent operations, and projected into an editor view model and
//! a live markup preview with per-node scoped css.
//!
//! ## Features
//! - Normalized arena store with parent back-references and a stable `root`
//!   alias; normalize/denormalize are lossless inverses
//! - Tag-nesting schema enforced at the store boundary
//! - Typed deep-partial patches (no reflection, no generic merge)
//! - `$`-token css scoping into node-unique class selectors
//! - Pure editor/preview projections driven through an explicit engine handle
//!
//! ## Example
//! ```
//! use rapid_tree::{default_document, editor_view, render_preview, NodeTemplate, Tag, TreeStore};
//!
//! let mut store = TreeStore::normalize(&default_document());
//! store.insert_node(&rapid_tree::NodeId::root(), NodeTemplate::Element(Tag::H1)).unwrap();
//!
//! let view = editor_view(&store).unwrap();
//! assert_eq!(view.root.children.len(), 2);
//!
//! let preview = render_preview(&store.denormalize().unwrap());
//! assert!(preview.starts_with("<style>"));
//! ```

pub mod document;
pub mod editor;
pub mod error;
pub mod node;
pub mod patch;
pub mod render;
pub mod scope;
pub mod store;
pub mod tags;

// --- Core types ---
pub use error::{TreeError, TreeResult};
pub use node::{AttrMap, ElementNode, Node, NodeId, TextNode};
pub use patch::{ElementPatch, NodePatch, TextPatch};
pub use store::{NodeTemplate, StoredElement, StoredNode, StoredText, TreeStore};
pub use tags::Tag;

// --- Projections ---
pub use editor::{apply_action, editor_view, EditorAction, EditorRow, EditorView, InsertOption};
pub use render::{render_markup, render_preview};
pub use scope::{scope_class, scoped_css};

// --- Documents ---
pub use document::{default_document, parse_document, to_yaml, validate_document, DEFAULT_CSS};
