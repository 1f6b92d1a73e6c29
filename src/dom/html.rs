//! Markup serialization for [`Document`] subtrees.
//!
//! Elements print their class first, then properties in key order.
//! Listeners are not serialized.

use std::borrow::Cow;
use std::fmt::Write;

use super::{Document, NodeData, NodeId};

impl Document {
    /// Compact markup for `id` and its subtree. Stale ids serialize to "".
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_compact(id, &mut out);
        out
    }

    /// Compact markup for the children of `id`.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_compact(child, &mut out);
        }
        out
    }

    /// One node per line, indented by two spaces per level.
    pub fn to_pretty_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_pretty(id, 0, &mut out);
        out
    }

    /// Pretty markup for the children of `id`, starting at column zero.
    pub fn inner_pretty_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_pretty(child, 0, &mut out);
        }
        out
    }

    fn write_compact(&self, id: NodeId, out: &mut String) {
        let Ok(node) = self.node(id) else {
            return;
        };
        match &node.data {
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Element(_) => {
                self.write_open_tag(id, out);
                for &child in &node.children {
                    self.write_compact(child, out);
                }
                self.write_close_tag(id, out);
            }
        }
    }

    fn write_pretty(&self, id: NodeId, depth: usize, out: &mut String) {
        let Ok(node) = self.node(id) else {
            return;
        };
        let indent = "  ".repeat(depth);
        match &node.data {
            NodeData::Text(text) => {
                let _ = writeln!(out, "{indent}{}", escape_text(text));
            }
            NodeData::Element(_) if node.children.is_empty() => {
                out.push_str(&indent);
                self.write_open_tag(id, out);
                self.write_close_tag(id, out);
                out.push('\n');
            }
            NodeData::Element(_) => {
                out.push_str(&indent);
                self.write_open_tag(id, out);
                out.push('\n');
                for &child in &node.children {
                    self.write_pretty(child, depth + 1, out);
                }
                out.push_str(&indent);
                self.write_close_tag(id, out);
                out.push('\n');
            }
        }
    }

    fn write_open_tag(&self, id: NodeId, out: &mut String) {
        let Ok(NodeData::Element(element)) = self.node(id).map(|n| &n.data) else {
            return;
        };
        out.push('<');
        out.push_str(&element.tag);
        if !element.class_name.is_empty() {
            let _ = write!(out, r#" class="{}""#, escape_attr(&element.class_name));
        }
        for (key, value) in &element.properties {
            let _ = write!(out, r#" {key}="{}""#, escape_attr(&value.to_string()));
        }
        out.push('>');
    }

    fn write_close_tag(&self, id: NodeId, out: &mut String) {
        if let Some(tag) = self.tag_name(id) {
            let _ = write!(out, "</{tag}>");
        }
    }
}

fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
