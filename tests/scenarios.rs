use std::cell::Cell;
use std::rc::Rc;

use sprout::prelude::*;

fn greeting(title: &str, body: &str) -> VNode {
    h!(
        "div",
        (),
        h!("h1", Props::new().class("myDiv"), title),
        h!("p", (), body)
    )
}

fn counter() -> (Rc<Cell<u32>>, Handler) {
    let count = Rc::new(Cell::new(0));
    let handler = {
        let count = count.clone();
        Handler::new(move |_: &Event| count.set(count.get() + 1))
    };
    (count, handler)
}

#[test]
fn test_mount_into_empty_container() {
    let mut doc = Document::new();
    let root = doc.create_root("root");

    let tree = h!("div", (), h!("h1", Props::new().class("x"), "Hi"));
    let div = render(&mut doc, &tree, &root).unwrap();

    assert_eq!(doc.children(root), &[div]);
    let h1 = doc.children(div)[0];
    assert_eq!(doc.tag_name(h1), Some("h1"));
    assert_eq!(doc.class_name(h1), Some("x"));
    let text = doc.children(h1)[0];
    assert!(doc.is_text(text));
    assert_eq!(doc.text_content(text), "Hi");
}

#[test]
fn test_greeting_update_under_both_strategies() {
    for strategy in [Strategy::Remount, Strategy::Patch] {
        let mut doc = Document::new();
        let container = doc.create_root("root");
        let mut root: Root<Document> =
            Root::with_config(container, ReconcileConfig::default().strategy(strategy));

        root.render(&mut doc, greeting("Salom!", "Bu mening birinchi React klonim."))
            .unwrap();
        root.update(&mut doc, greeting("Salom, dunyo!", "Bu yangilangan React klonim."))
            .unwrap();

        let div = doc.children(container)[0];
        let h1 = doc.children(div)[0];
        let p = doc.children(div)[1];
        assert_eq!(doc.children(container).len(), 1);
        assert_eq!(doc.class_name(h1), Some("myDiv"));
        assert_eq!(doc.text_content(h1), "Salom, dunyo!");
        assert_eq!(doc.text_content(p), "Bu yangilangan React klonim.");
    }
}

#[test]
fn test_update_with_same_tree_is_idempotent() {
    for strategy in [Strategy::Remount, Strategy::Patch] {
        let mut doc = Document::new();
        let container = doc.create_root("root");
        let tree = greeting("a", "b");
        render(&mut doc, &tree, &container).unwrap();
        let once = doc.inner_html(container);

        let reconciler = Reconciler::new(ReconcileConfig::default().strategy(strategy));
        reconciler
            .update_element(&mut doc, &container, Some(&tree), Some(&tree))
            .unwrap();

        assert_eq!(doc.inner_html(container), once);
    }
}

#[test]
fn test_update_to_nothing_empties_container() {
    let mut doc = Document::new();
    let container = doc.create_root("root");
    let tree = greeting("a", "b");
    render(&mut doc, &tree, &container).unwrap();

    let flags = update_element(&mut doc, &container, Some(&tree), None).unwrap();

    assert_eq!(flags, ChangeFlags::REMOVED);
    assert_eq!(doc.inner_html(container), "");
}

#[test]
fn test_listener_names_are_case_insensitive() {
    let mut doc = Document::new();
    let container = doc.create_root("root");
    let (count, handler) = counter();

    let button = render(
        &mut doc,
        &h!("button", Props::new().on("Click", handler), "+"),
        &container,
    )
    .unwrap();

    assert_eq!(doc.listener_count(button, "click"), 1);
    assert_eq!(doc.dispatch(button, &Event::new("click")).unwrap(), 1);
    assert_eq!(count.get(), 1);
}

#[test]
fn test_replaced_handler_is_detached() {
    let mut doc = Document::new();
    let container = doc.create_root("root");
    let (old_count, old_handler) = counter();
    let (new_count, new_handler) = counter();

    let old = h!("button", Props::new().on("click", old_handler));
    let new = h!("button", Props::new().on("click", new_handler));
    let button = render(&mut doc, &old, &container).unwrap();

    let flags = update_element(&mut doc, &container, Some(&old), Some(&new)).unwrap();
    assert_eq!(flags, ChangeFlags::PATCHED);

    doc.dispatch(button, &Event::new("click")).unwrap();
    assert_eq!(doc.listener_count(button, "click"), 1);
    assert_eq!(old_count.get(), 0);
    assert_eq!(new_count.get(), 1);
}

#[test]
fn test_dropped_listener_is_removed() {
    let mut doc = Document::new();
    let container = doc.create_root("root");
    let (count, handler) = counter();

    let old = h!("button", Props::new().class("btn").on("click", handler));
    let new = h!("button", Props::new().class("btn"));
    let button = render(&mut doc, &old, &container).unwrap();

    update_element(&mut doc, &container, Some(&old), Some(&new)).unwrap();

    assert_eq!(doc.dispatch(button, &Event::new("click")).unwrap(), 0);
    assert_eq!(count.get(), 0);
}

#[test]
fn test_removed_props_leave_live_node() {
    let mut doc = Document::new();
    let container = doc.create_root("root");

    let old = h!("input", Props::new().class("field").set("value", "hi").set("disabled", true));
    let new = h!("input", Props::new().set("value", "hi"));
    let input = render(&mut doc, &old, &container).unwrap();

    update_element(&mut doc, &container, Some(&old), Some(&new)).unwrap();

    assert_eq!(doc.class_name(input), None);
    assert_eq!(doc.property(input, "disabled"), None);
    assert_eq!(doc.property(input, "value"), Some(&Value::from("hi")));
}

#[test]
fn test_app_drives_the_greeting() {
    let mut doc = Document::new();
    let container = doc.create_root("root");
    let mut app = App::new(doc, AppConfig::default()).unwrap();

    app.render(greeting("Salom!", "Bu mening birinchi React klonim."))
        .unwrap();
    app.schedule(
        std::time::Duration::from_millis(1),
        greeting("Salom, dunyo!", "Bu yangilangan React klonim."),
    );
    app.run().unwrap();

    assert_eq!(
        app.host().inner_html(container),
        r#"<div><h1 class="myDiv">Salom, dunyo!</h1><p>Bu yangilangan React klonim.</p></div>"#
    );
}
