//! Applying diffs to a live container.
//!
//! Two strategies are available:
//!
//! - [`Strategy::Remount`] clears the container and mounts the new tree on
//!   every update, whatever the diff says. Only the remove signal is honored.
//! - [`Strategy::Patch`] (the default) leaves unchanged nodes alone, sets and
//!   removes only the props that changed, and replaces only the subtrees
//!   whose type changed.
//!
//! Either way, once an update returns `Ok` the container holds exactly one
//! subtree matching the new tree, or nothing if there is no new tree. A
//! container that does not hold exactly one subtree when an in-place update
//! is due is mounted from scratch.

use bitflags::bitflags;

use crate::attr::apply_changes;
use crate::diff::{ChildrenPatch, NodeUpdate, Patch, diff, diff_tree};
use crate::host::Host;
use crate::render::{create, render};
use crate::stats;
use crate::vnode::VNode;

bitflags! {
    /// What an update did to the container.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ChangeFlags: u8 {
        /// A tree was mounted where there was none
        const INSERTED  = 0b00001;
        /// The container was emptied
        const REMOVED   = 0b00010;
        /// The root node changed type and was replaced
        const REPLACED  = 0b00100;
        /// The container was cleared and mounted again
        const REMOUNTED = 0b01000;
        /// The mounted tree was updated in place
        const PATCHED   = 0b10000;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Clear and re-mount on every update
    Remount,
    /// Patch the mounted tree in place
    #[default]
    Patch,
}

/// How far the differ looks when patching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DiffDepth {
    /// Top-level props only; a changed child list is re-mounted as a whole
    Shallow,
    /// Every child position is diffed on its own
    #[default]
    Recursive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ReconcileConfig {
    pub strategy: Strategy,
    pub depth: DiffDepth,
}

impl ReconcileConfig {
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn depth(mut self, depth: DiffDepth) -> Self {
        self.depth = depth;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Reconciler {
    config: ReconcileConfig,
}

impl Reconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> ReconcileConfig {
        self.config
    }

    /// Diff two trees at the configured depth.
    pub fn diff(&self, old: Option<&VNode>, new: Option<&VNode>) -> Patch {
        match self.config.depth {
            DiffDepth::Shallow => diff(old, new),
            DiffDepth::Recursive => diff_tree(old, new),
        }
    }

    /// Bring `container`, currently holding `old`, in line with `new`.
    ///
    /// Host errors propagate unchanged; the container may then be left
    /// partially updated.
    pub fn update_element<H: Host>(
        &self,
        host: &mut H,
        container: &H::Node,
        old: Option<&VNode>,
        new: Option<&VNode>,
    ) -> Result<ChangeFlags, H::Error> {
        let flags = match self.config.strategy {
            Strategy::Remount => remount(host, container, old, new)?,
            Strategy::Patch => self.patch(host, container, old, new)?,
        };
        log::debug!("update {:?}: {:?}", container, flags);
        Ok(flags)
    }

    fn patch<H: Host>(
        &self,
        host: &mut H,
        container: &H::Node,
        old: Option<&VNode>,
        new: Option<&VNode>,
    ) -> Result<ChangeFlags, H::Error> {
        match self.diff(old, new) {
            Patch::Remove => {
                host.clear_children(container)?;
                stats::record_removal();
                Ok(ChangeFlags::REMOVED)
            }
            Patch::Insert(node) => {
                mount_fresh(host, container, &node)?;
                Ok(ChangeFlags::INSERTED)
            }
            Patch::Replace(node) => {
                mount_fresh(host, container, &node)?;
                Ok(ChangeFlags::REPLACED)
            }
            Patch::Update(update) if update.is_noop() => {
                stats::record_noop();
                Ok(ChangeFlags::empty())
            }
            Patch::Update(update) => {
                let mounted = host.child_nodes(container)?;
                match (mounted.as_slice(), new) {
                    ([dom], _) => {
                        let touched = apply_update(host, dom, &update)?;
                        stats::record_patch(touched);
                        Ok(ChangeFlags::PATCHED)
                    }
                    (_, Some(node)) => {
                        log::warn!(
                            "container {:?} holds {} subtrees instead of one, mounting from scratch",
                            container,
                            mounted.len()
                        );
                        mount_fresh(host, container, node)?;
                        Ok(ChangeFlags::REMOUNTED)
                    }
                    // An update always has a new node
                    (_, None) => Ok(ChangeFlags::empty()),
                }
            }
        }
    }
}

/// Reconcile with the default configuration (in-place, recursive).
pub fn update_element<H: Host>(
    host: &mut H,
    container: &H::Node,
    old: Option<&VNode>,
    new: Option<&VNode>,
) -> Result<ChangeFlags, H::Error> {
    Reconciler::default().update_element(host, container, old, new)
}

fn remount<H: Host>(
    host: &mut H,
    container: &H::Node,
    old: Option<&VNode>,
    new: Option<&VNode>,
) -> Result<ChangeFlags, H::Error> {
    let patch = diff(old, new);
    host.clear_children(container)?;

    let Some(new) = new else {
        stats::record_removal();
        return Ok(ChangeFlags::REMOVED);
    };

    render(host, new, container)?;
    stats::record_remount();

    let kind = match patch {
        Patch::Insert(_) => ChangeFlags::INSERTED,
        Patch::Replace(_) => ChangeFlags::REPLACED,
        _ => ChangeFlags::empty(),
    };
    Ok(ChangeFlags::REMOUNTED | kind)
}

fn mount_fresh<H: Host>(host: &mut H, container: &H::Node, node: &VNode) -> Result<(), H::Error> {
    host.clear_children(container)?;
    render(host, node, container)?;
    stats::record_mount();
    Ok(())
}

/// Apply `update` to the mounted node `dom`. Returns the number of props
/// touched in the whole subtree.
fn apply_update<H: Host>(host: &mut H, dom: &H::Node, update: &NodeUpdate) -> Result<usize, H::Error> {
    apply_changes(host, dom, &update.props)?;
    let mut touched = update.props.len();

    match &update.children {
        ChildrenPatch::Unchanged => {}
        ChildrenPatch::Replace(children) => {
            host.clear_children(dom)?;
            for child in children {
                render(host, child, dom)?;
            }
        }
        ChildrenPatch::Each(patches) => {
            // Handles are captured up front; inserts only ever append past
            // the old end and removals only hit positions past the new end.
            let existing = host.child_nodes(dom)?;
            for (i, patch) in patches.iter().enumerate() {
                match (patch, existing.get(i)) {
                    (Patch::Insert(node), _) => {
                        render(host, node, dom)?;
                    }
                    (Patch::Update(child_update), Some(_)) if child_update.is_noop() => {}
                    (Patch::Update(child_update), Some(child)) => {
                        touched += apply_update(host, child, child_update)?;
                    }
                    (Patch::Replace(node), Some(child)) => {
                        let fresh = create(host, node)?;
                        host.replace_child(dom, &fresh, child)?;
                    }
                    (Patch::Remove, Some(child)) => host.remove_child(dom, child)?,
                    (_, None) => {
                        log::warn!("{:?} has no child at index {}, skipping its patch", dom, i);
                    }
                }
            }
        }
    }

    Ok(touched)
}

/// Observable state of a [`Root`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RootState<'a> {
    Empty,
    Mounted(&'a VNode),
}

/// A container together with the tree currently mounted in it.
///
/// Owning both keeps the "previous tree" for the next update next to the
/// container it describes, instead of in caller-side globals.
pub struct Root<H: Host> {
    container: H::Node,
    reconciler: Reconciler,
    current: Option<VNode>,
}

impl<H: Host> Root<H> {
    pub fn new(container: H::Node) -> Self {
        Self::with_config(container, ReconcileConfig::default())
    }

    pub fn with_config(container: H::Node, config: ReconcileConfig) -> Self {
        Self {
            container,
            reconciler: Reconciler::new(config),
            current: None,
        }
    }

    pub fn container(&self) -> &H::Node {
        &self.container
    }

    pub fn current(&self) -> Option<&VNode> {
        self.current.as_ref()
    }

    pub fn state(&self) -> RootState<'_> {
        match &self.current {
            Some(tree) => RootState::Mounted(tree),
            None => RootState::Empty,
        }
    }

    /// Mount `tree`. On a root that is already mounted this reconciles
    /// instead of mounting a second copy.
    pub fn render(&mut self, host: &mut H, tree: VNode) -> Result<ChangeFlags, H::Error> {
        if self.current.is_some() {
            return self.update(host, tree);
        }
        render(host, &tree, &self.container)?;
        stats::record_mount();
        self.current = Some(tree);
        Ok(ChangeFlags::INSERTED)
    }

    /// Reconcile the mounted tree against `tree`.
    ///
    /// On error the previous tree is kept as the current one.
    pub fn update(&mut self, host: &mut H, tree: VNode) -> Result<ChangeFlags, H::Error> {
        let flags =
            self.reconciler
                .update_element(host, &self.container, self.current.as_ref(), Some(&tree))?;
        self.current = Some(tree);
        Ok(flags)
    }

    pub fn unmount(&mut self, host: &mut H) -> Result<ChangeFlags, H::Error> {
        let flags =
            self.reconciler
                .update_element(host, &self.container, self.current.as_ref(), None)?;
        self.current = None;
        Ok(flags)
    }
}
