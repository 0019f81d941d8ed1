//! Per-node CSS scoping.
//!
//! Every element carries a raw css template in which the `$` token stands for
//! "this node". Scoping rewrites the token into a node-unique class selector
//! and concatenates the subtree's rewritten templates into one stylesheet
//! string, so each node's rules stay isolated and live-editable without
//! selector collisions.

use crate::node::{ElementNode, Node, NodeId};
use regex::{NoExpand, Regex};
use std::sync::OnceLock;

/// The placeholder token in raw css templates.
pub const SCOPE_TOKEN: &str = "$";

fn scope_token_re() -> &'static Regex {
    static SCOPE_TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    SCOPE_TOKEN_RE.get_or_init(|| Regex::new(r"\$").unwrap())
}

/// The class name a scoped node renders with.
pub fn scope_class(id: &NodeId) -> String {
    format!("rapid-{}", id)
}

/// The selector the `$` token rewrites to.
pub fn scope_selector(id: &NodeId) -> String {
    format!(".{}", scope_class(id))
}

/// Whether the rendered node should carry the scope class at all. Nodes with
/// an empty template get no class, so the markup stays free of meaningless
/// attributes.
pub fn has_scope_class(node: &ElementNode) -> bool {
    !node.css.trim().is_empty()
}

/// Compute the aggregate scoped stylesheet for a subtree: the node's own
/// template with every `$` rewritten to its class selector, followed by each
/// element child's output in child order, newline-separated. Text children
/// contribute nothing. Pure and deterministic for a given subtree.
pub fn scoped_css(node: &ElementNode) -> String {
    let selector = scope_selector(&node.id);
    let own = scope_token_re()
        .replace_all(&node.css, NoExpand(&selector))
        .into_owned();

    node.children.iter().fold(own, |css, child| match child {
        Node::Element(el) => css + "\n" + &scoped_css(el),
        Node::Text(_) => css,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{AttrMap, TextNode};
    use crate::tags::Tag;
    use pretty_assertions::assert_eq;

    fn element(id: &str, tag: Tag, css: &str, children: Vec<Node>) -> ElementNode {
        ElementNode {
            id: NodeId::from(id),
            tag,
            css: css.to_string(),
            attrs: AttrMap::new(),
            children,
        }
    }

    #[test]
    fn test_token_rewrites_to_class_selector() {
        let node = element("card", Tag::Div, "$ { color: red; }\n$ > p { margin: 0; }", vec![]);
        assert_eq!(
            scoped_css(&node),
            ".rapid-card { color: red; }\n.rapid-card > p { margin: 0; }"
        );
    }

    #[test]
    fn test_children_concatenate_in_order_after_parent() {
        let node = element(
            "outer",
            Tag::Div,
            "$ { display: flex; }",
            vec![
                Node::Element(element("first", Tag::P, "$ { color: blue; }", vec![])),
                Node::Element(element("second", Tag::P, "$ { color: green; }", vec![])),
            ],
        );
        assert_eq!(
            scoped_css(&node),
            ".rapid-outer { display: flex; }\n.rapid-first { color: blue; }\n.rapid-second { color: green; }"
        );
    }

    #[test]
    fn test_text_children_contribute_nothing() {
        let node = element(
            "wrap",
            Tag::P,
            "$ { margin: 0; }",
            vec![Node::Text(TextNode {
                id: NodeId::from("inner-text"),
                text: "hello".to_string(),
            })],
        );
        assert_eq!(scoped_css(&node), ".rapid-wrap { margin: 0; }");
    }

    #[test]
    fn test_output_is_deterministic() {
        let node = element(
            "a",
            Tag::Div,
            "$ { padding: 4px; }",
            vec![Node::Element(element("b", Tag::P, "$ {}", vec![]))],
        );
        assert_eq!(scoped_css(&node), scoped_css(&node));
    }

    #[test]
    fn test_malformed_css_passes_through_untouched() {
        let node = element("junk", Tag::Div, "not css at all }{", vec![]);
        assert_eq!(scoped_css(&node), "not css at all }{");
    }

    #[test]
    fn test_empty_css_gets_no_scope_class() {
        let styled = element("styled", Tag::Div, "$ {}", vec![]);
        let bare = element("bare", Tag::Div, "   ", vec![]);
        assert!(has_scope_class(&styled));
        assert!(!has_scope_class(&bare));
    }
}
