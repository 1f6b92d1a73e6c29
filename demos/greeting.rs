//! Mounts a greeting, then swaps in an updated one after a delay.
//!
//! ```bash
//! RUST_LOG=debug SPROUT_DELAY_MS=500 cargo run --example greeting
//! ```

use std::time::Duration;

use sprout::prelude::*;

const DEFAULT_DELAY_MS: u64 = 3000;

fn greeting(title: &str, body: &str) -> VNode {
    h!(
        "div",
        (),
        h!("h1", Props::new().class("myDiv"), title),
        h!("p", (), body)
    )
}

fn delay() -> Duration {
    let ms = std::env::var("SPROUT_DELAY_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DELAY_MS);
    Duration::from_millis(ms)
}

fn main() -> Result<(), AppError<DomError>> {
    let mut doc = Document::new();
    let container = doc.create_root("root");

    let mut app = App::new(doc, AppConfig::default())?;
    app.render(greeting("Salom!", "Bu mening birinchi React klonim."))?;
    println!("before:\n{}", app.host().inner_pretty_html(container));

    let after = delay();
    println!("updating in {:?}...", after);
    app.schedule(
        after,
        greeting("Salom, dunyo!", "Bu yangilangan React klonim."),
    );
    app.run()?;

    println!("after:\n{}", app.host().inner_pretty_html(container));
    Ok(())
}
