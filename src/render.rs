//! Live preview rendering: a deterministic projection of the denormalized
//! tree into markup text, with the subtree's scoped stylesheet injected
//! alongside it.

use crate::node::{ElementNode, Node};
use crate::scope::{has_scope_class, scope_class, scoped_css};
use crate::tags::{is_void, Tag};

/// Render a full preview fragment for a subtree: one `<style>` block holding
/// the aggregate scoped css, followed by the subtree's markup.
pub fn render_preview(root: &ElementNode) -> String {
    let mut out = String::new();
    out.push_str("<style>\n");
    out.push_str(&scoped_css(root));
    out.push_str("\n</style>\n");
    render_element(&mut out, root);
    out
}

/// Render a node subtree to markup without the style block.
pub fn render_markup(node: &Node) -> String {
    let mut out = String::new();
    render_node(&mut out, node);
    out
}

fn render_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(el) => render_element(out, el),
        Node::Text(text) => out.push_str(&escape_html(&text.text)),
    }
}

fn render_element(out: &mut String, el: &ElementNode) {
    out.push('<');
    out.push_str(el.tag.name());

    // The scope class joins any author-supplied class attribute.
    let mut class = String::new();
    if has_scope_class(el) {
        class.push_str(&scope_class(&el.id));
    }
    if let Some(extra) = el.attrs.get("class").map(attr_value_text) {
        if !extra.is_empty() {
            if !class.is_empty() {
                class.push(' ');
            }
            class.push_str(&extra);
        }
    }
    if !class.is_empty() {
        out.push_str(" class=\"");
        out.push_str(&escape_html(&class));
        out.push('"');
    }

    for (key, value) in &el.attrs {
        if key == "class" {
            continue;
        }
        out.push(' ');
        out.push_str(&escape_html(key));
        out.push_str("=\"");
        out.push_str(&escape_html(&attr_value_text(value)));
        out.push('"');
    }

    // img stands alone; video keeps its end tag but, like every void tag,
    // renders no children.
    if el.tag == Tag::Img {
        out.push('>');
        return;
    }
    out.push('>');
    if !is_void(el.tag) {
        for child in &el.children {
            render_node(out, child);
        }
    }
    out.push_str("</");
    out.push_str(el.tag.name());
    out.push('>');
}

fn attr_value_text(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{AttrMap, NodeId, TextNode};
    use pretty_assertions::assert_eq;

    fn text(id: &str, content: &str) -> Node {
        Node::Text(TextNode {
            id: NodeId::from(id),
            text: content.to_string(),
        })
    }

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
    fn test_styled_element_carries_scope_class() {
        let el = element("hero", Tag::Div, "$ { color: red; }", vec![]);
        assert_eq!(
            render_markup(&Node::Element(el)),
            "<div class=\"rapid-hero\"></div>"
        );
    }

    #[test]
    fn test_unstyled_element_has_no_class_attribute() {
        let el = element("plain", Tag::P, "", vec![text("t", "hi")]);
        assert_eq!(render_markup(&Node::Element(el)), "<p>hi</p>");
    }

    #[test]
    fn test_text_is_escaped() {
        let el = element("holder", Tag::P, "", vec![text("t", "a < b & c")]);
        assert_eq!(render_markup(&Node::Element(el)), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_img_renders_without_end_tag_or_children() {
        let mut attrs = AttrMap::new();
        attrs.insert(
            "src".to_string(),
            serde_yaml::Value::String("pic.png".to_string()),
        );
        let el = ElementNode {
            id: NodeId::from("photo"),
            tag: Tag::Img,
            css: String::new(),
            attrs,
            children: Vec::new(),
        };
        assert_eq!(render_markup(&Node::Element(el)), "<img src=\"pic.png\">");
    }

    #[test]
    fn test_video_keeps_end_tag_but_no_children() {
        let el = element("clip", Tag::Video, "", vec![text("t", "ignored")]);
        assert_eq!(render_markup(&Node::Element(el)), "<video></video>");
    }

    #[test]
    fn test_preview_injects_style_block_before_markup() {
        let el = element(
            "card",
            Tag::Div,
            "$ { border: none; }",
            vec![text("t", "x")],
        );
        assert_eq!(
            render_preview(&el),
            "<style>\n.rapid-card { border: none; }\n</style>\n<div class=\"rapid-card\">x</div>"
        );
    }

    #[test]
    fn test_attribute_keys_are_escaped() {
        let mut attrs = AttrMap::new();
        attrs.insert(
            "data-x\"><script".to_string(),
            serde_yaml::Value::String("v".to_string()),
        );
        let el = ElementNode {
            id: NodeId::from("field"),
            tag: Tag::Div,
            css: String::new(),
            attrs,
            children: Vec::new(),
        };
        assert_eq!(
            render_markup(&Node::Element(el)),
            "<div data-x&quot;&gt;&lt;script=\"v\"></div>"
        );
    }

    #[test]
    fn test_scope_class_joins_author_class() {
        let mut attrs = AttrMap::new();
        attrs.insert(
            "class".to_string(),
            serde_yaml::Value::String("wide".to_string()),
        );
        let el = ElementNode {
            id: NodeId::from("box"),
            tag: Tag::Div,
            css: "$ {}".to_string(),
            attrs,
            children: Vec::new(),
        };
        assert_eq!(
            render_markup(&Node::Element(el)),
            "<div class=\"rapid-box wide\"></div>"
        );
    }
}
