//! A minimal virtual-node rendering engine.
//!
//! Trees of [`VNode`] descriptors are mounted into a [`Host`] presentation
//! tree, and later trees are reconciled against the mounted one.
//!
//! ```
//! use sprout::prelude::*;
//!
//! let mut doc = Document::new();
//! let container = doc.create_root("root");
//! let mut root: Root<Document> = Root::new(container);
//!
//! root.render(&mut doc, h!("p", Props::new().class("x"), "Hi")).unwrap();
//! root.update(&mut doc, h!("p", Props::new().class("x"), "Bye")).unwrap();
//! assert_eq!(doc.inner_html(container), r#"<p class="x">Bye</p>"#);
//! ```

extern crate self as sprout;

pub mod attr;
pub mod diff;
pub mod dom;
pub mod host;
pub mod into_child;
pub mod props;
pub mod reconcile;
pub mod render;
pub mod stats;
pub mod vnode;

use std::time::{Duration, Instant};

use host::Host;
use reconcile::{ChangeFlags, ReconcileConfig, Root, RootState};
use vnode::VNode;

pub use sprout_macros::Props;

pub mod prelude {
    pub use crate::diff::{ChildrenPatch, NodeUpdate, Patch, PropChange, diff, diff_tree};
    pub use crate::dom::{Document, DomError, NodeId};
    pub use crate::host::Host;
    pub use crate::into_child::IntoChild;
    pub use crate::props::{Event, Handler, Prop, PropKey, Props, Value};
    pub use crate::reconcile::{
        ChangeFlags, DiffDepth, ReconcileConfig, Reconciler, Root, RootState, Strategy,
        update_element,
    };
    pub use crate::render::render;
    pub use crate::vnode::{NodeType, TEXT_ELEMENT, VNode, create_element, create_text_element};
    pub use crate::{App, AppConfig, AppError, h};
}

#[derive(Debug, thiserror::Error)]
pub enum AppError<E: std::error::Error + 'static> {
    #[error("no node with id `{0}`")]
    RootNotFound(String),
    #[error(transparent)]
    Host(E),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Id of the container the app mounts into
    pub root_id: String,
    pub reconcile: ReconcileConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_id: "root".to_string(),
            reconcile: ReconcileConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn root_id(mut self, id: impl Into<String>) -> Self {
        self.root_id = id.into();
        self
    }

    pub fn reconcile(mut self, config: ReconcileConfig) -> Self {
        self.reconcile = config;
        self
    }
}

struct ScheduledUpdate {
    after: Duration,
    view: VNode,
}

/// Owns a host and the root mounted in it, plus a queue of timed updates.
pub struct App<H: Host> {
    host: H,
    root: Root<H>,
    scheduled: Vec<ScheduledUpdate>,
}

impl<H: Host> App<H> {
    /// Look up the container named by `config.root_id` in `host`.
    pub fn new(host: H, config: AppConfig) -> Result<Self, AppError<H::Error>> {
        let container = host
            .lookup_by_id(&config.root_id)
            .ok_or_else(|| AppError::RootNotFound(config.root_id.clone()))?;

        Ok(Self {
            host,
            root: Root::with_config(container, config.reconcile),
            scheduled: Vec::new(),
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn container(&self) -> &H::Node {
        self.root.container()
    }

    pub fn state(&self) -> RootState<'_> {
        self.root.state()
    }

    pub fn render(&mut self, view: VNode) -> Result<ChangeFlags, AppError<H::Error>> {
        self.root.render(&mut self.host, view).map_err(AppError::Host)
    }

    pub fn update(&mut self, view: VNode) -> Result<ChangeFlags, AppError<H::Error>> {
        self.root.update(&mut self.host, view).map_err(AppError::Host)
    }

    pub fn unmount(&mut self) -> Result<ChangeFlags, AppError<H::Error>> {
        self.root.unmount(&mut self.host).map_err(AppError::Host)
    }

    /// Queue `view` to replace the mounted tree `after` the start of [`App::run`].
    pub fn schedule(&mut self, after: Duration, view: VNode) -> &mut Self {
        self.scheduled.push(ScheduledUpdate { after, view });
        self
    }

    /// Number of updates still waiting for [`App::run`].
    pub fn pending(&self) -> usize {
        self.scheduled.len()
    }

    /// Apply every scheduled update in deadline order, sleeping until each
    /// is due. Updates with equal deadlines run in the order they were queued.
    ///
    /// Stops at the first host error; updates after it stay queued.
    pub fn run(&mut self) -> Result<(), AppError<H::Error>> {
        let _ = env_logger::try_init();

        let start = Instant::now();
        let mut queue = std::mem::take(&mut self.scheduled);
        queue.sort_by_key(|update| update.after);
        let mut queue = queue.into_iter();

        while let Some(ScheduledUpdate { after, view }) = queue.next() {
            let elapsed = start.elapsed();
            if after > elapsed {
                std::thread::sleep(after - elapsed);
            }

            let result = if matches!(self.root.state(), RootState::Empty) {
                self.root.render(&mut self.host, view)
            } else {
                self.root.update(&mut self.host, view)
            };

            match result {
                Ok(flags) => log::info!("Applied update scheduled at {:?}: {:?}", after, flags),
                Err(err) => {
                    self.scheduled = queue.collect();
                    return Err(AppError::Host(err));
                }
            }
        }

        stats::log_summary();
        Ok(())
    }
}
