//! Mounting virtual trees into a host.

use crate::attr::set_attribute;
use crate::host::Host;
use crate::vnode::{NodeType, VNode};

/// Mount `node` into `container` and return the created concrete node.
///
/// Children are rendered depth-first in list order, each one fully attached
/// to its parent before the parent is appended to `container`. Every call
/// appends one more subtree; nothing already in `container` is touched.
///
/// Host errors propagate unchanged. There is no rollback: on failure the
/// partially built subtree is left where it was.
pub fn render<H: Host>(host: &mut H, node: &VNode, container: &H::Node) -> Result<H::Node, H::Error> {
    let dom = create(host, node)?;
    host.append_child(container, &dom)?;
    Ok(dom)
}

/// Build the concrete subtree for `node` without attaching it anywhere.
pub fn create<H: Host>(host: &mut H, node: &VNode) -> Result<H::Node, H::Error> {
    let dom = match node.node_type() {
        NodeType::Text => host.create_text_node("")?,
        NodeType::Element(tag) => host.create_element(tag)?,
    };
    log::trace!("mount <{}> {:?}", node.node_type(), dom);

    for prop in node.props().iter() {
        set_attribute(host, &dom, prop)?;
    }

    for child in node.children() {
        render(host, child, &dom)?;
    }

    Ok(dom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, DomError};
    use crate::h;
    use crate::props::Props;

    #[test]
    fn test_render_appends_subtree() {
        let mut doc = Document::new();
        let root = doc.create_root("root");
        let view = h!("div", (), h!("h1", Props::new().class("x"), "Hi"));

        let div = render(&mut doc, &view, &root).unwrap();

        assert_eq!(doc.child_nodes(&root).unwrap(), vec![div]);
        assert_eq!(doc.inner_html(root), r#"<div><h1 class="x">Hi</h1></div>"#);
    }

    #[test]
    fn test_render_twice_appends_twice() {
        let mut doc = Document::new();
        let root = doc.create_root("root");
        let view = h!("span", (), "a");

        render(&mut doc, &view, &root).unwrap();
        render(&mut doc, &view, &root).unwrap();

        assert_eq!(doc.inner_html(root), "<span>a</span><span>a</span>");
    }

    #[test]
    fn test_children_keep_list_order() {
        let mut doc = Document::new();
        let root = doc.create_root("root");
        let view = h!("ol", (), h!("li", (), 1), h!("li", (), 2), h!("li", (), 3));

        render(&mut doc, &view, &root).unwrap();

        assert_eq!(
            doc.inner_html(root),
            "<ol><li>1</li><li>2</li><li>3</li></ol>"
        );
    }

    #[test]
    fn test_create_leaves_node_detached() {
        let mut doc = Document::new();
        let node = create(&mut doc, &h!("p", (), "x")).unwrap();
        assert_eq!(doc.parent(node), None);
        assert_eq!(doc.text_content(node), "x");
    }

    #[test]
    fn test_host_errors_propagate() {
        let mut doc = Document::new();
        let text = doc.create_text_node("leaf").unwrap();

        let result = render(&mut doc, &h!("div"), &text);

        assert!(matches!(result, Err(DomError::NotAnElement(_))));
    }
}
