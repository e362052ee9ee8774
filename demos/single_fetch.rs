//! Fetch the dashboard once and print it.
//!
//!     cargo run --example single_fetch -- http://127.0.0.1:8080/post 7 student

use examtable::render::{render_text, ViewRole};
use examtable::runner::{Options, Runner};

#[tokio::main]
async fn main() {
    let mut args = std::env::args().skip(1);
    let endpoint = args.next().unwrap_or_else(|| {
        eprintln!("usage: single_fetch <endpoint> [viewer-id] [role]");
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

    match runner.fetch_once().await {
        Ok(view) => print!("{}", render_text(&view, false)),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
