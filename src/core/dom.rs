// src/core/dom.rs
//! Thin, query-only view over a parsed HTML document.
//!
//! The page specs only ever need "find elements by tag/attribute/text" plus
//! document-order traversal, so that is all this exposes. Nothing outside
//! this file touches `scraper`/`ego_tree` node types.

use scraper::{ElementRef, Html, Node};

use super::sanitize::normalize_ws;

/// Elements whose text never counts as visible content.
const HIDDEN: &[&str] = &["style", "script", "noscript", "template"];

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self { html: Html::parse_document(markup) }
    }

    pub fn root(&self) -> Element<'_> {
        Element(self.html.root_element())
    }

    /// Every element in document (pre-)order, root included.
    pub fn elements(&self) -> impl Iterator<Item = Element<'_>> {
        self.root().descendants_inclusive()
    }

    /// Elements with the given tag name, in document order.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = Element<'a>> + 'a {
        self.elements().filter(move |e| e.is(tag))
    }

    pub fn find_first<P>(&self, pred: P) -> Option<Element<'_>>
    where
        P: Fn(&Element<'_>) -> bool,
    {
        self.elements().find(|e| pred(e))
    }
}

#[derive(Clone, Copy)]
pub struct Element<'a>(ElementRef<'a>);

impl<'a> Element<'a> {
    pub fn tag(&self) -> &'a str {
        self.0.value().name()
    }

    /// Tag name check, ASCII case-insensitive.
    pub fn is(&self, tag: &str) -> bool {
        self.tag().eq_ignore_ascii_case(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// True when `class` lists the given class (tolerant to order and case).
    pub fn has_class(&self, class: &str) -> bool {
        self.0.value().classes().any(|c| c.eq_ignore_ascii_case(class))
    }

    /// `colspan`, defaulting to 1 for missing/garbage values.
    pub fn colspan(&self) -> usize {
        self.attr("colspan")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(1)
    }

    /// Visible text: text nodes outside style/script, `<br>` as a space,
    /// whitespace collapsed.
    pub fn text(&self) -> String {
        let me = *self.0;
        let mut out = s!();
        for node in me.descendants() {
            let hidden = || {
                node.ancestors()
                    .take_while(|a| a.id() != me.id())
                    .chain(std::iter::once(me))
                    .any(|a| matches!(a.value(), Node::Element(e) if HIDDEN.contains(&e.name())))
            };
            match node.value() {
                Node::Text(t) if !hidden() => out.push_str(t),
                Node::Element(e) if e.name() == "br" => out.push(' '),
                _ => {}
            }
        }
        normalize_ws(&out)
    }

    /// Direct element children.
    pub fn children(&self) -> impl Iterator<Item = Element<'a>> + use<'a> {
        let node = *self.0;
        node.children().filter_map(ElementRef::wrap).map(Element)
    }

    /// Descendant elements in document order, excluding `self`.
    pub fn descendants(&self) -> impl Iterator<Item = Element<'a>> + use<'a> {
        self.descendants_inclusive().skip(1)
    }

    fn descendants_inclusive(&self) -> impl Iterator<Item = Element<'a>> + use<'a> {
        let node = *self.0;
        node.descendants().filter_map(ElementRef::wrap).map(Element)
    }

    /// Descendant elements with the given tag name.
    pub fn find_all<'t>(&self, tag: &'t str) -> impl Iterator<Item = Element<'a>> + use<'a, 't> {
        self.descendants().filter(move |e| e.is(tag))
    }

    /// Nearest ancestor with the given tag name.
    pub fn closest(&self, tag: &str) -> Option<Element<'a>> {
        let node = *self.0;
        node.ancestors()
            .filter_map(ElementRef::wrap)
            .map(Element)
            .find(|e| e.is(tag))
    }

    /// True when `other` sits somewhere inside `self`.
    pub fn contains(&self, other: &Element<'_>) -> bool {
        let (me, other) = (*self.0, *other.0);
        other.ancestors().any(|a| a.id() == me.id())
    }

    pub fn same(&self, other: &Element<'_>) -> bool {
        (*self.0).id() == (*other.0).id()
    }
}

impl std::fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.tag())
    }
}
