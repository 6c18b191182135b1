//! In-memory document tree.
//!
//! [`MemoryDom`] is a flat arena of nodes addressed by [`NodeId`]. Markup is
//! parsed with `scraper` (html5ever) and copied into the arena, so later
//! mutations such as detaching the loader trigger or rewriting a container's
//! inner HTML behave the way they do in a browser. Layout is not computed:
//! offsets are whatever [`MemoryDom::set_layout`] assigned.

use super::{Dom, Lookup, NodeId};
use scraper::Html;
use tracing::trace;

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text children are serialized unescaped.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    Doctype(String),
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct ElementData {
    name: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Layout {
    top: f64,
    left: f64,
    offset_parent: Option<NodeId>,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
    layout: Layout,
}

/// Arena-backed mutable HTML document.
///
/// Nodes are never freed. Children replaced by [`Dom::set_inner_html`] or
/// removed by [`Dom::detach`] stay in the arena, unlinked, so their ids remain
/// valid for the life of the document. A document is meant to live for one
/// page session; memory grows with every replaced subtree until it is dropped.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// An empty document with no children.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
                layout: Layout::default(),
            }],
            root: NodeId(0),
        }
    }

    /// Parse a full HTML document.
    pub fn parse_document(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut dom = Self::new();
        let root = dom.root;
        dom.import(&parsed, false, root);
        trace!(nodes = dom.nodes.len(), "Parsed document");
        dom
    }

    /// The document node itself.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Lowercase tag name, or `None` for non-element nodes.
    pub fn element_name(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element(element) => Some(element.name.as_str()),
            _ => None,
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element(element) => element.attr(name),
            _ => None,
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let NodeKind::Text(text) = &self.nodes[current.0].kind {
                out.push_str(text);
            }
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        out
    }

    /// Serialized markup of the node including its own tag.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.serialize_node(node, false, &mut out);
        out
    }

    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        self.inner_html(self.root)
    }

    /// Assign the offsets and offset parent a layout pass would produce.
    ///
    /// Offset parents are not checked for cycles; [`crate::utils::y_pos`] and
    /// [`crate::utils::x_pos`] count each node on a looping chain once.
    pub fn set_layout(&mut self, node: NodeId, top: f64, left: f64, offset_parent: Option<NodeId>) {
        self.nodes[node.0].layout = Layout {
            top,
            left,
            offset_parent,
        };
    }

    fn push_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            kind,
            layout: Layout::default(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Copy the parsed tree under `parent`. Fragment parses are wrapped in an
    /// `<html>` element whose children are the fragment's top-level nodes.
    fn import(&mut self, parsed: &Html, fragment: bool, parent: NodeId) {
        let source = if fragment {
            *parsed.root_element()
        } else {
            parsed.tree.root()
        };
        let mut stack = vec![(source, parent)];
        while let Some((from, into)) = stack.pop() {
            for child in from.children() {
                let kind = match child.value() {
                    scraper::Node::Element(element) => NodeKind::Element(ElementData {
                        name: element.name().to_string(),
                        attrs: element
                            .attrs()
                            .map(|(key, value)| (key.to_string(), value.to_string()))
                            .collect(),
                    }),
                    scraper::Node::Text(text) => NodeKind::Text(String::from(&*text.text)),
                    scraper::Node::Comment(comment) => {
                        NodeKind::Comment(String::from(&*comment.comment))
                    }
                    scraper::Node::Doctype(doctype) => NodeKind::Doctype(doctype.name().to_string()),
                    _ => continue,
                };
                let id = self.push_node(Some(into), kind);
                if child.has_children() {
                    stack.push((child, id));
                }
            }
        }
    }

    fn find_first<P>(&self, scope: Option<NodeId>, predicate: P) -> Lookup<NodeId>
    where
        P: Fn(&ElementData) -> bool,
    {
        let start = scope.unwrap_or(self.root);
        let mut stack: Vec<NodeId> = self.nodes[start.0].children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if let NodeKind::Element(element) = &self.nodes[current.0].kind {
                if predicate(element) {
                    return Lookup::Found(current);
                }
            }
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        Lookup::NotFound
    }

    fn serialize_node(&self, node: NodeId, raw_text: bool, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Document => self.serialize_children(node, false, out),
            NodeKind::Doctype(name) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
            NodeKind::Text(text) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    escape_into(text, false, out);
                }
            }
            NodeKind::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.name);
                for (key, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.name.as_str()) {
                    return;
                }
                let raw = RAW_TEXT_ELEMENTS.contains(&element.name.as_str());
                self.serialize_children(node, raw, out);
                out.push_str("</");
                out.push_str(&element.name);
                out.push('>');
            }
        }
    }

    fn serialize_children(&self, node: NodeId, raw_text: bool, out: &mut String) {
        for child in &self.nodes[node.0].children {
            self.serialize_node(*child, raw_text, out);
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

impl Dom for MemoryDom {
    fn document_element(&self) -> Lookup<NodeId> {
        self.nodes[self.root.0]
            .children
            .iter()
            .copied()
            .find(|child| matches!(self.nodes[child.0].kind, NodeKind::Element(_)))
            .into()
    }

    fn find_by_class(&self, class: &str, scope: Option<NodeId>) -> Lookup<NodeId> {
        self.find_first(scope, |element| element.has_class(class))
    }

    fn find_by_id(&self, id: &str, scope: Option<NodeId>) -> Lookup<NodeId> {
        self.find_first(scope, |element| element.attr("id") == Some(id))
    }

    fn find_by_tag(&self, tag: &str, scope: Option<NodeId>) -> Lookup<NodeId> {
        self.find_first(scope, |element| element.name.eq_ignore_ascii_case(tag))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn inner_html(&self, node: NodeId) -> String {
        let raw = self
            .element_name(node)
            .is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name));
        let mut out = String::new();
        self.serialize_children(node, raw, &mut out);
        out
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) {
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
        }
        self.append_html(node, html);
    }

    fn append_html(&mut self, node: NodeId, html: &str) {
        let parsed = Html::parse_fragment(html);
        self.import(&parsed, true, node);
    }

    fn detach(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return false;
        };
        self.nodes[parent.0].children.retain(|child| *child != node);
        true
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].layout.offset_parent
    }

    fn offset_top(&self, node: NodeId) -> f64 {
        self.nodes[node.0].layout.top
    }

    fn offset_left(&self, node: NodeId) -> f64 {
        self.nodes[node.0].layout.left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>News</title></head>
<body>
<div class="wrap user_content"><p id="first">One</p><p class="item">Two</p></div>
<div class="news_links"><span class="listing_link"><a href="../news.html">News</a></span></div>
</body></html>"#;

    #[test]
    fn test_document_element_is_html() {
        let dom = MemoryDom::parse_document(PAGE);
        let html = dom.document_element().into_option().unwrap();
        assert_eq!(dom.element_name(html), Some("html"));
    }

    #[test]
    fn test_find_by_class_matches_any_listed_class() {
        let dom = MemoryDom::parse_document(PAGE);
        let container = dom.find_by_class("user_content", None).into_option().unwrap();
        assert_eq!(dom.element_name(container), Some("div"));
        assert_eq!(dom.find_by_class("missing", None), Lookup::NotFound);
    }

    #[test]
    fn test_lookup_respects_scope() {
        let dom = MemoryDom::parse_document(PAGE);
        let links = dom.find_by_class("news_links", None).into_option().unwrap();
        let container = dom.find_by_class("user_content", None).into_option().unwrap();
        assert!(dom.find_by_tag("a", Some(links)).is_found());
        assert_eq!(dom.find_by_tag("a", Some(container)), Lookup::NotFound);
        assert!(dom.find_by_id("first", Some(container)).is_found());
        assert_eq!(dom.find_by_id("first", Some(links)), Lookup::NotFound);
    }

    #[test]
    fn test_find_by_tag_returns_first_in_document_order() {
        let dom = MemoryDom::parse_document(PAGE);
        let p = dom.find_by_tag("P", None).into_option().unwrap();
        assert_eq!(dom.attr(p, "id"), Some("first"));
    }

    #[test]
    fn test_inner_html_round_trips_markup() {
        let dom = MemoryDom::parse_document(PAGE);
        let links = dom.find_by_class("news_links", None).into_option().unwrap();
        assert_eq!(
            dom.inner_html(links),
            r#"<span class="listing_link"><a href="../news.html">News</a></span>"#
        );
    }

    #[test]
    fn test_set_inner_html_replaces_children() {
        let mut dom = MemoryDom::parse_document(PAGE);
        let container = dom.find_by_class("user_content", None).into_option().unwrap();
        dom.set_inner_html(container, "<b>bold</b> &amp; text");
        assert_eq!(dom.inner_html(container), "<b>bold</b> &amp; text");
        assert_eq!(dom.find_by_id("first", None), Lookup::NotFound);
    }

    #[test]
    fn test_replaced_children_stay_addressable_but_unlinked() {
        let mut dom = MemoryDom::parse_document(PAGE);
        let container = dom.find_by_class("user_content", None).into_option().unwrap();
        let first = dom.find_by_id("first", None).into_option().unwrap();
        dom.set_inner_html(container, "<p>new</p>");
        assert_eq!(dom.parent(first), None);
        assert_eq!(dom.attr(first, "id"), Some("first"));
        assert!(!dom.children(container).contains(&first));
    }

    #[test]
    fn test_append_html_keeps_existing_children() {
        let mut dom = MemoryDom::parse_document(PAGE);
        let container = dom.find_by_class("user_content", None).into_option().unwrap();
        dom.append_html(container, "<p>Three</p>");
        assert_eq!(
            dom.inner_html(container),
            r#"<p id="first">One</p><p class="item">Two</p><p>Three</p>"#
        );
    }

    #[test]
    fn test_entities_are_decoded_then_reescaped() {
        let mut dom = MemoryDom::parse_document(PAGE);
        let links = dom.find_by_class("news_links", None).into_option().unwrap();
        dom.set_inner_html(links, "<a href=\"a.html\">&lt; Older</a>");
        let a = dom.find_by_tag("a", Some(links)).into_option().unwrap();
        assert_eq!(dom.text_content(a), "< Older");
        assert_eq!(dom.inner_html(links), "<a href=\"a.html\">&lt; Older</a>");
    }

    #[test]
    fn test_detach_and_reattach_moves_node_to_end() {
        let mut dom = MemoryDom::parse_document(PAGE);
        let container = dom.find_by_class("user_content", None).into_option().unwrap();
        let first = dom.find_by_id("first", None).into_option().unwrap();
        assert!(dom.detach(first));
        assert!(!dom.detach(first));
        assert_eq!(dom.find_by_id("first", None), Lookup::NotFound);
        dom.append_child(container, first);
        assert_eq!(dom.parent(first), Some(container));
        assert_eq!(
            dom.inner_html(container),
            r#"<p class="item">Two</p><p id="first">One</p>"#
        );
    }

    #[test]
    fn test_void_elements_and_comments_serialize() {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        dom.append_html(root, "<!-- note --><img src=\"a.png\"><br>");
        assert_eq!(dom.to_html(), "<!-- note --><img src=\"a.png\"><br>");
    }

    #[test]
    fn test_layout_defaults_to_zero() {
        let mut dom = MemoryDom::parse_document(PAGE);
        let p = dom.find_by_id("first", None).into_option().unwrap();
        assert_eq!(dom.offset_top(p), 0.0);
        assert_eq!(dom.offset_parent(p), None);
        let body = dom.find_by_tag("body", None).into_option().unwrap();
        dom.set_layout(p, 12.0, 4.0, Some(body));
        assert_eq!(dom.offset_top(p), 12.0);
        assert_eq!(dom.offset_left(p), 4.0);
        assert_eq!(dom.offset_parent(p), Some(body));
    }
}
