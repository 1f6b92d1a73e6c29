//! In-memory presentation tree.
//!
//! [`Document`] implements [`Host`] on top of arena storage, so the engine can
//! be driven, inspected and tested without a real display.
//!
//! ## Key Features
//!
//! - **Generational Indices**: a [`NodeId`] contains index + generation, so a
//!   handle to a removed node is detected instead of silently pointing at
//!   whatever reused its slot.
//!
//! - **Dense Storage**: nodes are stored contiguously; a sparse map gives O(1)
//!   lookup from a stable `NodeId` to its dense slot.
//!
//! - **Swap-Remove**: O(1) removal without holes in dense storage.
//!
//! - **Ownership**: a node removed from its parent (or cleared out of it) is
//!   released together with its whole subtree.

mod html;

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::host::Host;
use crate::props::{Event, Handler, Value};
use crate::vnode::NODE_VALUE;

/// Handle to a node in a [`Document`].
///
/// Uses a generational index design:
/// - `index`: position in the sparse array (reusable after removal)
/// - `generation`: version counter that increments when a slot is reused
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Combines generation (high bits) with index (low bits).
    pub fn as_u64(self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomError {
    #[error("node {0} does not exist")]
    StaleNode(NodeId),
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("cannot insert {child} into {parent}: a node cannot contain its own ancestor")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    #[error("text node {node} has no property `{key}`")]
    UnsupportedProperty { node: NodeId, key: String },
}

/// Entry in the sparse map, pointing to a dense array slot.
struct SparseEntry {
    dense_index: usize,
    generation: u32,
}

struct ElementData {
    tag: String,
    class_name: String,
    properties: BTreeMap<String, Value>,
    listeners: Vec<(String, Handler)>,
}

enum NodeData {
    Element(ElementData),
    Text(String),
}

struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Back-pointer to sparse array index (for swap-remove fixup)
    sparse_index: u32,
}

/// Arena-backed presentation tree.
#[derive(Default)]
pub struct Document {
    dense: Vec<Node>,
    sparse: Vec<Option<SparseEntry>>,
    free_indices: Vec<u32>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached `<div>` whose `id` property is `id`, for use as a
    /// mount container.
    pub fn create_root(&mut self, id: &str) -> NodeId {
        let mut properties = BTreeMap::new();
        properties.insert("id".to_string(), Value::from(id));
        self.register(NodeData::Element(ElementData {
            tag: "div".to_string(),
            class_name: String::new(),
            properties,
            listeners: Vec::new(),
        }))
    }

    fn register(&mut self, data: NodeData) -> NodeId {
        // Reuse a freed slot with a bumped generation, or grow
        let (sparse_index, generation) = if let Some(idx) = self.free_indices.pop() {
            let old_gen = self.sparse[idx as usize]
                .as_ref()
                .map(|e| e.generation)
                .unwrap_or(0);
            (idx, old_gen)
        } else {
            let idx = self.sparse.len() as u32;
            self.sparse.push(None);
            (idx, 0)
        };

        let dense_index = self.dense.len();
        self.dense.push(Node {
            data,
            parent: None,
            children: Vec::new(),
            sparse_index,
        });
        self.sparse[sparse_index as usize] = Some(SparseEntry {
            dense_index,
            generation,
        });

        NodeId::new(sparse_index, generation)
    }

    /// Remove a single node from storage.
    ///
    /// The sparse entry keeps the next generation so the freed slot hands
    /// out a fresh id when reused.
    fn unregister(&mut self, id: NodeId) {
        let Some(dense_index) = self.get_dense_index(id) else {
            return;
        };

        if let Some(parent_id) = self.dense[dense_index].parent
            && let Some(parent_dense) = self.get_dense_index(parent_id)
        {
            self.dense[parent_dense].children.retain(|&c| c != id);
        }

        let last_dense_index = self.dense.len() - 1;
        self.dense.swap_remove(dense_index);

        // Fix up the moved node's sparse entry
        if dense_index != last_dense_index {
            let moved_sparse_idx = self.dense[dense_index].sparse_index;
            if let Some(ref mut entry) = self.sparse[moved_sparse_idx as usize] {
                entry.dense_index = dense_index;
            }
        }

        self.sparse[id.index as usize] = Some(SparseEntry {
            dense_index: usize::MAX,
            generation: id.generation.wrapping_add(1),
        });
        self.free_indices.push(id.index);
    }

    fn get_dense_index(&self, id: NodeId) -> Option<usize> {
        self.sparse
            .get(id.index as usize)
            .and_then(|e| e.as_ref())
            .filter(|e| e.generation == id.generation && e.dense_index != usize::MAX)
            .map(|e| e.dense_index)
    }

    fn id_at(&self, dense_index: usize) -> NodeId {
        let sparse_index = self.dense[dense_index].sparse_index;
        let generation = self.sparse[sparse_index as usize]
            .as_ref()
            .map(|e| e.generation)
            .unwrap_or(0);
        NodeId::new(sparse_index, generation)
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.get_dense_index(id)
            .map(|idx| &self.dense[idx])
            .ok_or(DomError::StaleNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        match self.get_dense_index(id) {
            Some(idx) => Ok(&mut self.dense[idx]),
            None => Err(DomError::StaleNode(id)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(element) => Ok(element),
            NodeData::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    fn ensure_element(&self, id: NodeId) -> Result<(), DomError> {
        match self.node(id)?.data {
            NodeData::Element(_) => Ok(()),
            NodeData::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    /// `true` if `ancestor` is `node` or lies on its parent chain.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Unlink `id` from its parent, keeping it alive.
    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Ok(parent) = self.node_mut(parent) {
            parent.children.retain(|&c| c != id);
        }
        if let Ok(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Detach `id` and free it along with its whole subtree.
    fn release(&mut self, id: NodeId) {
        self.detach(id);

        let mut stack = vec![id];
        let mut subtree = Vec::new();
        while let Some(current) = stack.pop() {
            subtree.push(current);
            stack.extend(self.children(current).iter().copied());
        }
        for node in subtree {
            self.unregister(node);
        }
    }

    /// Pre-order search of the subtree under `root`.
    fn find_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            if let Ok(NodeData::Element(element)) = self.node(current).map(|n| &n.data)
                && element.properties.get("id").and_then(Value::as_str) == Some(id)
            {
                return Some(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        None
    }

    /// Check if a node is alive.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get_dense_index(id).is_some()
    }

    /// Number of live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.dense.len()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Tag name of an element, `None` for text nodes and stale ids.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).ok()?.data {
            NodeData::Element(element) => Some(&element.tag),
            NodeData::Text(_) => None,
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.node(id).map(|n| &n.data), Ok(NodeData::Text(_)))
    }

    /// Class name of an element, `None` when unset or empty.
    pub fn class_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).ok()?.data {
            NodeData::Element(element) if !element.class_name.is_empty() => {
                Some(&element.class_name)
            }
            _ => None,
        }
    }

    pub fn property(&self, id: NodeId, key: &str) -> Option<&Value> {
        match &self.node(id).ok()?.data {
            NodeData::Element(element) => element.properties.get(key),
            NodeData::Text(_) => None,
        }
    }

    /// Concatenated text of `id` and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.node(id).map(|n| &n.data) {
            Ok(NodeData::Text(text)) => out.push_str(text),
            Ok(NodeData::Element(_)) => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
            Err(_) => {}
        }
    }

    /// Number of listeners registered on `id` for `event`.
    pub fn listener_count(&self, id: NodeId, event: &str) -> usize {
        match self.node(id).map(|n| &n.data) {
            Ok(NodeData::Element(element)) => element
                .listeners
                .iter()
                .filter(|(name, _)| name == event)
                .count(),
            _ => 0,
        }
    }

    /// Invoke the listeners registered on `id` for `event.name`, in
    /// registration order. Returns how many ran. Events do not bubble.
    pub fn dispatch(&self, id: NodeId, event: &Event) -> Result<usize, DomError> {
        let handlers: Vec<Handler> = match &self.node(id)?.data {
            NodeData::Element(element) => element
                .listeners
                .iter()
                .filter(|(name, _)| *name == event.name)
                .map(|(_, handler)| handler.clone())
                .collect(),
            NodeData::Text(_) => Vec::new(),
        };

        for handler in &handlers {
            handler.call(event);
        }
        Ok(handlers.len())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.dense.len())
            .field("free", &self.free_indices.len())
            .finish()
    }
}

impl Host for Document {
    type Node = NodeId;
    type Error = DomError;

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        Ok(self.register(NodeData::Element(ElementData {
            tag: tag.to_string(),
            class_name: String::new(),
            properties: BTreeMap::new(),
            listeners: Vec::new(),
        })))
    }

    fn create_text_node(&mut self, text: &str) -> Result<NodeId, DomError> {
        Ok(self.register(NodeData::Text(text.to_string())))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let (parent, child) = (*parent, *child);
        self.node(child)?;
        self.ensure_element(parent)?;
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn set_class_name(&mut self, node: &NodeId, value: &str) -> Result<(), DomError> {
        self.element_mut(*node)?.class_name = value.to_string();
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        handler: &Handler,
    ) -> Result<(), DomError> {
        let element = self.element_mut(*node)?;
        // Registering the same handler twice is a no-op
        if !element
            .listeners
            .iter()
            .any(|(name, h)| name == event && h == handler)
        {
            element.listeners.push((event.to_string(), handler.clone()));
        }
        Ok(())
    }

    fn set_property(&mut self, node: &NodeId, key: &str, value: &Value) -> Result<(), DomError> {
        let id = *node;
        match &mut self.node_mut(id)?.data {
            NodeData::Element(element) => {
                element.properties.insert(key.to_string(), value.clone());
                Ok(())
            }
            NodeData::Text(text) if key == NODE_VALUE => {
                *text = value.to_string();
                Ok(())
            }
            NodeData::Text(_) => Err(DomError::UnsupportedProperty {
                node: id,
                key: key.to_string(),
            }),
        }
    }

    fn clear_children(&mut self, node: &NodeId) -> Result<(), DomError> {
        let children = self.node(*node)?.children.clone();
        for child in children {
            self.release(child);
        }
        Ok(())
    }

    /// First element with a matching `id` property in document order.
    /// Separate trees are searched in `NodeId` order.
    fn lookup_by_id(&self, id: &str) -> Option<NodeId> {
        let mut roots: Vec<NodeId> = (0..self.dense.len())
            .filter(|&idx| self.dense[idx].parent.is_none())
            .map(|idx| self.id_at(idx))
            .collect();
        roots.sort();
        roots
            .into_iter()
            .find_map(|root| self.find_by_id(root, id))
    }

    fn remove_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        handler: &Handler,
    ) -> Result<(), DomError> {
        self.element_mut(*node)?
            .listeners
            .retain(|(name, h)| !(name == event && h == handler));
        Ok(())
    }

    fn remove_property(&mut self, node: &NodeId, key: &str) -> Result<(), DomError> {
        let id = *node;
        match &mut self.node_mut(id)?.data {
            NodeData::Element(element) => {
                element.properties.remove(key);
                Ok(())
            }
            NodeData::Text(text) if key == NODE_VALUE => {
                text.clear();
                Ok(())
            }
            NodeData::Text(_) => Err(DomError::UnsupportedProperty {
                node: id,
                key: key.to_string(),
            }),
        }
    }

    fn child_nodes(&self, node: &NodeId) -> Result<Vec<NodeId>, DomError> {
        Ok(self.node(*node)?.children.clone())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let (parent, child) = (*parent, *child);
        self.node(parent)?;
        if self.node(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.release(child);
        Ok(())
    }

    fn replace_child(&mut self, parent: &NodeId, new: &NodeId, old: &NodeId) -> Result<(), DomError> {
        let (parent, new, old) = (*parent, *new, *old);
        if new == old {
            return Ok(());
        }
        self.node(new)?;
        if self.node(old)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child: old });
        }
        if self.is_inclusive_ancestor(new, parent) {
            return Err(DomError::HierarchyRequest { parent, child: new });
        }

        self.detach(new);
        let siblings = &mut self.node_mut(parent)?.children;
        if let Some(slot) = siblings.iter_mut().find(|c| **c == old) {
            *slot = new;
        }
        self.node_mut(new)?.parent = Some(parent);
        self.node_mut(old)?.parent = None;
        self.release(old);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_release() {
        let mut doc = Document::new();
        let root = doc.create_root("root");
        let div = doc.create_element("div").unwrap();
        let text = doc.create_text_node("hi").unwrap();
        doc.append_child(&div, &text).unwrap();
        doc.append_child(&root, &div).unwrap();
        assert_eq!(doc.node_count(), 3);

        doc.clear_children(&root).unwrap();

        assert_eq!(doc.node_count(), 1);
        assert!(!doc.contains(div));
        assert!(!doc.contains(text));
        assert!(doc.children(root).is_empty());
    }

    #[test]
    fn test_generational_index() {
        let mut doc = Document::new();
        let root = doc.create_root("root");
        let first = doc.create_element("p").unwrap();
        doc.append_child(&root, &first).unwrap();
        doc.remove_child(&root, &first).unwrap();

        // Reuses the slot with a new generation
        let second = doc.create_element("p").unwrap();
        assert_eq!(first.index, second.index);
        assert_ne!(first.generation, second.generation);
        assert!(!doc.contains(first));
        assert!(doc.contains(second));
        assert_eq!(
            doc.set_class_name(&first, "x"),
            Err(DomError::StaleNode(first))
        );
    }

    #[test]
    fn test_swap_remove_fixup() {
        let mut doc = Document::new();
        let root = doc.create_root("root");
        let a = doc.create_element("a").unwrap();
        let b = doc.create_element("b").unwrap();
        let c = doc.create_element("c").unwrap();
        for id in [a, b, c] {
            doc.append_child(&root, &id).unwrap();
        }

        doc.remove_child(&root, &a).unwrap();

        assert!(!doc.contains(a));
        assert_eq!(doc.tag_name(b), Some("b"));
        assert_eq!(doc.tag_name(c), Some("c"));
        assert_eq!(doc.children(root), &[b, c]);
    }

    #[test]
    fn test_append_moves_attached_child() {
        let mut doc = Document::new();
        let left = doc.create_element("div").unwrap();
        let right = doc.create_element("div").unwrap();
        let item = doc.create_element("span").unwrap();

        doc.append_child(&left, &item).unwrap();
        doc.append_child(&right, &item).unwrap();

        assert!(doc.children(left).is_empty());
        assert_eq!(doc.children(right), &[item]);
        assert_eq!(doc.parent(item), Some(right));
    }

    #[test]
    fn test_hierarchy_checks() {
        let mut doc = Document::new();
        let outer = doc.create_element("div").unwrap();
        let inner = doc.create_element("div").unwrap();
        doc.append_child(&outer, &inner).unwrap();

        assert_eq!(
            doc.append_child(&inner, &outer),
            Err(DomError::HierarchyRequest {
                parent: inner,
                child: outer
            })
        );
        assert!(matches!(
            doc.append_child(&outer, &outer),
            Err(DomError::HierarchyRequest { .. })
        ));

        let text = doc.create_text_node("t").unwrap();
        assert_eq!(
            doc.append_child(&text, &inner),
            Err(DomError::NotAnElement(text))
        );
    }

    #[test]
    fn test_text_node_value() {
        let mut doc = Document::new();
        let text = doc.create_text_node("").unwrap();
        doc.set_property(&text, NODE_VALUE, &Value::from(12)).unwrap();
        assert_eq!(doc.text_content(text), "12");

        assert_eq!(
            doc.set_property(&text, "title", &Value::from("x")),
            Err(DomError::UnsupportedProperty {
                node: text,
                key: "title".into()
            })
        );
    }

    #[test]
    fn test_lookup_by_id() {
        let mut doc = Document::new();
        let root = doc.create_root("root");
        let other = doc.create_element("section").unwrap();
        doc.set_property(&other, "id", &Value::from("side")).unwrap();

        assert_eq!(doc.lookup_by_id("root"), Some(root));
        assert_eq!(doc.lookup_by_id("side"), Some(other));
        assert_eq!(doc.lookup_by_id("missing"), None);
    }

    #[test]
    fn test_lookup_by_id_follows_document_order() {
        let mut doc = Document::new();
        let root = doc.create_root("root");
        let later = doc.create_element("p").unwrap();
        doc.set_property(&later, "id", &Value::from("dup")).unwrap();
        let scratch = doc.create_element("span").unwrap();
        let earlier = doc.create_element("p").unwrap();
        doc.set_property(&earlier, "id", &Value::from("dup")).unwrap();

        doc.append_child(&root, &earlier).unwrap();
        doc.append_child(&root, &later).unwrap();
        doc.append_child(&root, &scratch).unwrap();
        // Swap-removes `scratch`, moving `earlier` in dense storage
        doc.remove_child(&root, &scratch).unwrap();

        assert_eq!(doc.lookup_by_id("dup"), Some(earlier));
    }

    #[test]
    fn test_replace_child_keeps_position() {
        let mut doc = Document::new();
        let root = doc.create_root("root");
        let a = doc.create_element("a").unwrap();
        let b = doc.create_element("b").unwrap();
        let c = doc.create_element("c").unwrap();
        doc.append_child(&root, &a).unwrap();
        doc.append_child(&root, &b).unwrap();

        doc.replace_child(&root, &c, &a).unwrap();

        assert_eq!(doc.children(root), &[c, b]);
        assert!(!doc.contains(a));
        assert_eq!(doc.parent(c), Some(root));
    }

    #[test]
    fn test_remove_child_requires_parent() {
        let mut doc = Document::new();
        let root = doc.create_root("root");
        let stray = doc.create_element("p").unwrap();
        assert_eq!(
            doc.remove_child(&root, &stray),
            Err(DomError::NotAChild {
                parent: root,
                child: stray
            })
        );
    }

    #[test]
    fn test_listeners_deduplicate_and_dispatch() {
        use std::cell::Cell;
        use std::rc::Rc;

        let mut doc = Document::new();
        let button = doc.create_element("button").unwrap();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let handler = Handler::new(move |_| h.set(h.get() + 1));

        doc.add_event_listener(&button, "click", &handler).unwrap();
        doc.add_event_listener(&button, "click", &handler).unwrap();
        assert_eq!(doc.listener_count(button, "click"), 1);

        assert_eq!(doc.dispatch(button, &Event::new("click")).unwrap(), 1);
        assert_eq!(doc.dispatch(button, &Event::new("keydown")).unwrap(), 0);
        assert_eq!(hits.get(), 1);

        doc.remove_event_listener(&button, "click", &handler).unwrap();
        assert_eq!(doc.listener_count(button, "click"), 0);
    }
}
