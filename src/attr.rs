//! Attribute-setting rule.
//!
//! - `Prop::Class` sets the class name.
//! - `Prop::On` registers a listener for its event, lower-cased here as
//!   well since the variant can be built without `Prop::on`.
//! - `Prop::Attr` sets a direct property.

use crate::diff::PropChange;
use crate::host::Host;
use crate::props::Prop;

/// Apply a single prop to a concrete node.
pub fn set_attribute<H: Host>(host: &mut H, node: &H::Node, prop: &Prop) -> Result<(), H::Error> {
    match prop {
        Prop::Class(value) => host.set_class_name(node, value),
        Prop::On { event, handler } => {
            host.add_event_listener(node, &event.to_lowercase(), handler)
        }
        Prop::Attr { name, value } => host.set_property(node, name, value),
    }
}

/// Undo a prop that was previously applied with [`set_attribute`].
pub fn remove_attribute<H: Host>(
    host: &mut H,
    node: &H::Node,
    prop: &Prop,
) -> Result<(), H::Error> {
    match prop {
        Prop::Class(_) => host.set_class_name(node, ""),
        Prop::On { event, handler } => {
            host.remove_event_listener(node, &event.to_lowercase(), handler)
        }
        Prop::Attr { name, .. } => host.remove_property(node, name),
    }
}

/// Apply a set of prop changes to a mounted node in place.
///
/// A listener that is being replaced is detached before the new one is
/// attached, so a node never carries both.
pub fn apply_changes<H: Host>(
    host: &mut H,
    node: &H::Node,
    changes: &[PropChange],
) -> Result<(), H::Error> {
    for change in changes {
        match (&change.old, &change.new) {
            (Some(old @ Prop::On { .. }), Some(new)) => {
                remove_attribute(host, node, old)?;
                set_attribute(host, node, new)?;
            }
            (_, Some(new)) => set_attribute(host, node, new)?,
            (Some(old), None) => remove_attribute(host, node, old)?,
            (None, None) => {}
        }
        log::trace!("patched prop `{}`", change.key);
    }
    Ok(())
}
