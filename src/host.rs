//! The presentation-tree API the engine drives.
//!
//! The renderer and reconciler never touch concrete nodes directly; every
//! node creation, attribute assignment and tree mutation goes through a
//! [`Host`]. Failures are reported through [`Host::Error`] and propagated to
//! the caller unmodified.

use std::fmt;

use crate::props::{Handler, Value};

pub trait Host {
    /// Handle to a concrete node owned by the host
    type Node: Clone + PartialEq + fmt::Debug;
    /// Error raised by any host operation
    type Error: std::error::Error + 'static;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node, Self::Error>;

    fn create_text_node(&mut self, text: &str) -> Result<Self::Node, Self::Error>;

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node)
    -> Result<(), Self::Error>;

    fn set_class_name(&mut self, node: &Self::Node, value: &str) -> Result<(), Self::Error>;

    fn add_event_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &Handler,
    ) -> Result<(), Self::Error>;

    fn set_property(
        &mut self,
        node: &Self::Node,
        key: &str,
        value: &Value,
    ) -> Result<(), Self::Error>;

    /// Remove and release every child of `node`.
    fn clear_children(&mut self, node: &Self::Node) -> Result<(), Self::Error>;

    /// Find an element by its `id` property.
    fn lookup_by_id(&self, id: &str) -> Option<Self::Node>;

    // In-place patching

    fn remove_event_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &Handler,
    ) -> Result<(), Self::Error>;

    fn remove_property(&mut self, node: &Self::Node, key: &str) -> Result<(), Self::Error>;

    /// Current children of `node`, in order.
    fn child_nodes(&self, node: &Self::Node) -> Result<Vec<Self::Node>, Self::Error>;

    /// Detach and release `child`.
    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node)
    -> Result<(), Self::Error>;

    /// Put `new` where `old` is and release `old`.
    fn replace_child(
        &mut self,
        parent: &Self::Node,
        new: &Self::Node,
        old: &Self::Node,
    ) -> Result<(), Self::Error>;
}
