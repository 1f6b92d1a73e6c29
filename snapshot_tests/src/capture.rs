use crate::{Result, SnapshotTestError};
use sprout::prelude::*;
use std::path::PathBuf;

/// Configuration for capturing a scene
pub struct CaptureConfig {
    pub scene_name: String,
    /// Path where the markup will be written
    pub output_path: PathBuf,
}

/// Every scene [`render_scene`] knows about
pub const SCENES: &[&str] = &[
    "greeting_initial",
    "greeting_updated",
    "greeting_remounted",
    "todo_list_updated",
    "unmounted",
];

fn greeting(title: &str, body: &str) -> VNode {
    h!(
        "div",
        (),
        h!("h1", Props::new().class("myDiv"), title),
        h!("p", (), body)
    )
}

fn initial_greeting() -> VNode {
    greeting("Salom!", "Bu mening birinchi React klonim.")
}

fn updated_greeting() -> VNode {
    greeting("Salom, dunyo!", "Bu yangilangan React klonim.")
}

fn todo_list(items: &[(&str, bool)]) -> VNode {
    let children = items.iter().map(|&(label, done)| {
        let props = if done {
            Props::new().set("data-done", true)
        } else {
            Props::new()
        };
        h!("li", props, label)
    });
    create_element("ul", Props::new().class("todos"), children)
}

/// Mount the first tree, then reconcile against the rest in order.
fn mount_sequence(config: ReconcileConfig, trees: Vec<Option<VNode>>) -> std::result::Result<String, DomError> {
    let mut doc = Document::new();
    let container = doc.create_root("root");
    let reconciler = Reconciler::new(config);

    let mut current: Option<VNode> = None;
    for tree in trees {
        reconciler.update_element(&mut doc, &container, current.as_ref(), tree.as_ref())?;
        current = tree;
    }

    Ok(doc.inner_pretty_html(container))
}

/// Render a named scene to pretty markup
pub fn render_scene(scene_name: &str) -> Result<String> {
    let patch = ReconcileConfig::default();
    let remount = ReconcileConfig::default().strategy(Strategy::Remount);

    let markup = match scene_name {
        "greeting_initial" => mount_sequence(patch, vec![Some(initial_greeting())])?,
        "greeting_updated" => mount_sequence(
            patch,
            vec![Some(initial_greeting()), Some(updated_greeting())],
        )?,
        "greeting_remounted" => mount_sequence(
            remount,
            vec![Some(initial_greeting()), Some(updated_greeting())],
        )?,
        "todo_list_updated" => mount_sequence(
            patch,
            vec![
                Some(todo_list(&[("milk", false), ("bread", false), ("eggs", false)])),
                Some(todo_list(&[("milk", true), ("butter", false)])),
            ],
        )?,
        "unmounted" => mount_sequence(patch, vec![Some(initial_greeting()), None])?,
        other => return Err(SnapshotTestError::UnknownScene(other.to_string())),
    };

    Ok(markup)
}

/// Render a scene and write its markup to `config.output_path`
pub fn capture_scene(config: &CaptureConfig) -> Result<()> {
    let markup = render_scene(&config.scene_name)?;
    std::fs::write(&config.output_path, markup)?;
    Ok(())
}
