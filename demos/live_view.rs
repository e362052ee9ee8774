//! Live view against a running backend: polls every 250 ms and reprints the
//! table whenever the data changes. Stop with Ctrl-C.
//!
//!     cargo run --example live_view -- http://127.0.0.1:8080/post 7 teacher

use examtable::render::{render_text, ViewRole};
use examtable::runner::{Options, Runner};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    let mut args = std::env::args().skip(1);
    let endpoint = args.next().unwrap_or_else(|| {
        eprintln!("usage: live_view <endpoint> [viewer-id] [role]");
        std::process::exit(1);
    });
    let viewer_id: i64 = args
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    let role = args
        .next()
        .and_then(|v| ViewRole::parse(&v))
        .unwrap_or(ViewRole::Student);

    let runner = Runner::new(Options {
        endpoint,
        viewer_id,
        role,
        ..Options::default()
    })
    .unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });

    // Keep the sender alive so the poller's event channel stays open; a real
    // host would feed search, page clicks, and row actions through it.
    let (_events_tx, events_rx) = mpsc::channel(16);
    let live = runner.run_live(events_rx, |view| {
        println!();
        print!("{}", render_text(&view, false));
    });

    tokio::select! {
        result = live => {
            if let Err(e) = result {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => println!("\nstopped"),
    }
}
