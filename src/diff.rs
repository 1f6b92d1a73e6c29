//! Comparing virtual trees.
//!
//! [`diff`] compares two nodes one level deep: their types, their top-level
//! props, and their child lists taken as a whole. [`diff_tree`] applies the
//! same rules recursively to each child position, so a type change only
//! replaces the mismatched subtree.
//!
//! Both are pure functions; applying the result is the reconciler's job.

use std::collections::BTreeSet;

use crate::props::{Prop, PropKey};
use crate::vnode::{NodeType, VNode};

/// Result of comparing an old and a new node.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// No old node: mount the new one
    Insert(VNode),
    /// No new node: remove the old one
    Remove,
    /// Types differ: replace the old subtree with the new one
    Replace(VNode),
    /// Same type: update the mounted node in place
    Update(NodeUpdate),
}

impl Patch {
    /// `true` if applying this patch would change nothing.
    pub fn is_noop(&self) -> bool {
        match self {
            Patch::Update(update) => update.is_noop(),
            _ => false,
        }
    }
}

/// In-place update for a node whose type did not change.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeUpdate {
    pub node_type: NodeType,
    /// One entry per changed key, in key order
    pub props: Vec<PropChange>,
    pub children: ChildrenPatch,
}

impl NodeUpdate {
    pub fn is_noop(&self) -> bool {
        self.props.is_empty() && matches!(self.children, ChildrenPatch::Unchanged)
    }
}

/// A changed prop key.
///
/// `new` is `None` when the key is gone from the new node; `old` is `None`
/// when the key is new.
#[derive(Debug, Clone, PartialEq)]
pub struct PropChange {
    pub key: PropKey,
    pub old: Option<Prop>,
    pub new: Option<Prop>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChildrenPatch {
    Unchanged,
    /// Child lists differ; re-mount all of these (shallow diff)
    Replace(Vec<VNode>),
    /// One patch per child position (recursive diff)
    Each(Vec<Patch>),
}

/// Compare two nodes one level deep.
///
/// - old absent: `Insert(new)`
/// - new absent (or both absent): `Remove`
/// - types differ: `Replace(new)`, whatever the props look like
/// - otherwise: `Update` with the changed props, and the new children as a
///   whole if they differ in any way
pub fn diff(old: Option<&VNode>, new: Option<&VNode>) -> Patch {
    let (old, new) = match compare_roots(old, new) {
        Ok(pair) => pair,
        Err(patch) => return patch,
    };

    let children = if old.children() == new.children() {
        ChildrenPatch::Unchanged
    } else {
        ChildrenPatch::Replace(new.children().to_vec())
    };

    Patch::Update(NodeUpdate {
        node_type: new.node_type().clone(),
        props: diff_props(old, new),
        children,
    })
}

/// Compare two trees recursively, child position by child position.
///
/// Children are matched by index. Positions past the end of the old list
/// become `Insert`, positions past the end of the new list become `Remove`.
pub fn diff_tree(old: Option<&VNode>, new: Option<&VNode>) -> Patch {
    let (old, new) = match compare_roots(old, new) {
        Ok(pair) => pair,
        Err(patch) => return patch,
    };

    let len = old.children().len().max(new.children().len());
    let patches: Vec<Patch> = (0..len)
        .map(|i| diff_tree(old.children().get(i), new.children().get(i)))
        .collect();

    let children = if old.children().len() == new.children().len()
        && patches.iter().all(Patch::is_noop)
    {
        ChildrenPatch::Unchanged
    } else {
        ChildrenPatch::Each(patches)
    };

    Patch::Update(NodeUpdate {
        node_type: new.node_type().clone(),
        props: diff_props(old, new),
        children,
    })
}

/// Steps shared by both diffs. `Err` carries a patch that settles the
/// comparison before any props are looked at.
fn compare_roots<'a>(
    old: Option<&'a VNode>,
    new: Option<&'a VNode>,
) -> Result<(&'a VNode, &'a VNode), Patch> {
    match (old, new) {
        (None, Some(new)) => Err(Patch::Insert(new.clone())),
        (_, None) => Err(Patch::Remove),
        (Some(old), Some(new)) if old.node_type() != new.node_type() => {
            Err(Patch::Replace(new.clone()))
        }
        (Some(old), Some(new)) => Ok((old, new)),
    }
}

/// Changed keys over the union of both prop bags.
fn diff_props(old: &VNode, new: &VNode) -> Vec<PropChange> {
    let keys: BTreeSet<&PropKey> = old.props().keys().chain(new.props().keys()).collect();

    keys.into_iter()
        .filter_map(|key| {
            let before = old.props().get(key);
            let after = new.props().get(key);
            (before != after).then(|| PropChange {
                key: key.clone(),
                old: before.cloned(),
                new: after.cloned(),
            })
        })
        .collect()
}
