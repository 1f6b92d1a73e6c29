//! Virtual node descriptors.
//!
//! A [`VNode`] describes a desired presentation node: its type, its
//! properties and its ordered children. Trees are immutable once built;
//! the renderer and differ only ever borrow them.

use std::fmt;

use crate::into_child::IntoChild;
use crate::props::{Props, Value};

/// String form of the text node sentinel type.
pub const TEXT_ELEMENT: &str = "TEXT_ELEMENT";

/// Property under which a text node stores its content.
pub const NODE_VALUE: &str = "nodeValue";

/// Type of a virtual node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// An element with the given tag name
    Element(String),
    /// Raw text content
    Text,
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Element(tag) => tag,
            NodeType::Text => TEXT_ELEMENT,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeType::Text)
    }
}

impl From<&str> for NodeType {
    fn from(tag: &str) -> Self {
        if tag == TEXT_ELEMENT {
            NodeType::Text
        } else {
            NodeType::Element(tag.to_string())
        }
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        if tag == TEXT_ELEMENT {
            NodeType::Text
        } else {
            NodeType::Element(tag)
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A virtual node.
#[derive(Debug, Clone, PartialEq)]
pub struct VNode {
    node_type: NodeType,
    props: Props,
    children: Vec<VNode>,
}

impl VNode {
    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn children(&self) -> &[VNode] {
        &self.children
    }

    pub fn is_text(&self) -> bool {
        self.node_type.is_text()
    }

    /// Content of a text node, `None` for elements.
    pub fn node_value(&self) -> Option<&Value> {
        if self.is_text() {
            self.props.value(NODE_VALUE)
        } else {
            None
        }
    }
}

/// Build an element descriptor.
///
/// Children go through [`IntoChild`], so raw strings and numbers are wrapped
/// into text nodes and never reach the renderer or differ unwrapped. Use the
/// [`h!`](crate::h) macro for children of mixed types.
pub fn create_element<C: IntoChild>(
    node_type: impl Into<NodeType>,
    props: impl Into<Props>,
    children: impl IntoIterator<Item = C>,
) -> VNode {
    VNode {
        node_type: node_type.into(),
        props: props.into(),
        children: children.into_iter().map(IntoChild::into_child).collect(),
    }
}

/// Build a text node holding `value` as its `nodeValue`.
pub fn create_text_element(value: impl Into<Value>) -> VNode {
    VNode {
        node_type: NodeType::Text,
        props: Props::new().set(NODE_VALUE, value),
        children: Vec::new(),
    }
}

#[doc(hidden)]
pub fn element_with_children(
    node_type: impl Into<NodeType>,
    props: impl Into<Props>,
    children: Vec<VNode>,
) -> VNode {
    VNode {
        node_type: node_type.into(),
        props: props.into(),
        children,
    }
}

/// Build an element with children of mixed types.
///
/// ```ignore
/// let view = h!("div", (),
///     h!("h1", Props::new().class("title"), "Hello"),
///     h!("p", (), "Count: ", 3),
/// );
/// ```
#[macro_export]
macro_rules! h {
    ($node_type:expr $(,)?) => {
        $crate::vnode::element_with_children($node_type, (), ::std::vec::Vec::new())
    };
    ($node_type:expr, $props:expr $(, $child:expr)* $(,)?) => {
        $crate::vnode::element_with_children(
            $node_type,
            $props,
            ::std::vec![$($crate::into_child::IntoChild::into_child($child)),*],
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::Prop;

    #[test]
    fn test_primitive_children_are_wrapped() {
        let node = h!("p", (), "text", 7, 2.5, true, 'c');

        assert_eq!(node.children().len(), 5);
        for child in node.children() {
            assert!(child.is_text());
            assert!(child.children().is_empty());
        }
        assert_eq!(node.children()[0].node_value(), Some(&Value::from("text")));
        assert_eq!(node.children()[1].node_value(), Some(&Value::Int(7)));
        assert_eq!(node.children()[2].node_value(), Some(&Value::Float(2.5)));
        assert_eq!(node.children()[3].node_value(), Some(&Value::Bool(true)));
        assert_eq!(node.children()[4].node_value(), Some(&Value::from("c")));
    }

    #[test]
    fn test_node_children_pass_through() {
        let inner = h!("span", Props::new().class("x"), "hi");
        let outer = h!("div", (), inner.clone());
        assert_eq!(outer.children(), &[inner]);
    }

    #[test]
    fn test_text_element_shape() {
        let text = create_text_element("Hi");
        assert_eq!(text.node_type().as_str(), TEXT_ELEMENT);
        assert_eq!(text.props().len(), 1);
        assert_eq!(
            text.props().iter().next(),
            Some(&Prop::attr(NODE_VALUE, "Hi"))
        );
    }

    #[test]
    fn test_create_element_defaults() {
        let node = h!("br");
        assert_eq!(node.node_type(), &NodeType::Element("br".into()));
        assert!(node.props().is_empty());
        assert!(node.children().is_empty());
        assert_eq!(node.node_value(), None);
    }

    #[test]
    fn test_sentinel_type_string() {
        assert_eq!(NodeType::from(TEXT_ELEMENT), NodeType::Text);
        assert_eq!(NodeType::from("div").to_string(), "div");
    }

    #[test]
    fn test_create_element_from_iterator() {
        let items = ["a", "b", "c"];
        let list = create_element("ul", (), items.iter().map(|item| h!("li", (), *item)));
        assert_eq!(list.children().len(), 3);
        assert_eq!(
            list.children()[2].children()[0].node_value(),
            Some(&Value::from("c"))
        );
    }
}
