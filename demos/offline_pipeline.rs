//! Run the whole view pipeline against an in-memory record set, no backend
//! required: filter, paginate, diff-suppress, render.

use examtable::model::ExamRecord;
use examtable::paginator::LegendSlot;
use examtable::poller::{ViewController, ViewEvent};
use examtable::render::{render_text, ViewProfile, ViewRole};
use examtable::source::FetchOutcome;

fn sample_records() -> Vec<ExamRecord> {
    let titles = [
        "Algebra",
        "Geometry",
        "Calculus",
        "Statistics",
        "Linear Algebra",
        "Number Theory",
        "Topology",
        "Combinatorics",
        "Real Analysis",
        "Set Theory",
        "Graph Theory",
        "Logic",
    ];
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| ExamRecord {
            exam_id: i as i64 + 1,
            name: "Prof. Stone".to_string(),
            title: title.to_string(),
            score: match i % 3 {
                0 => -1,
                1 => -2,
                _ => 70 + i as i64,
            },
            points: 100,
            date: "2024-03-07 14:30:00".to_string(),
            user_id: 42,
        })
        .collect()
}

fn main() {
    let mut controller = ViewController::new(ViewProfile::for_role(ViewRole::Student), 5);
    let records = sample_records();

    println!("--- initial render (page 1) ---");
    if let Some(view) = controller.apply_poll(1, FetchOutcome::Records(records.clone()), false) {
        print!("{}", render_text(&view, false));
    }

    println!("\n--- identical poll: suppressed ---");
    match controller.apply_poll(2, FetchOutcome::Records(records.clone()), false) {
        Some(_) => println!("unexpected render"),
        None => println!("(no redraw, data unchanged)"),
    }

    println!("\n--- click Next ---");
    controller.apply_event(&ViewEvent::PageClick(LegendSlot::Next));
    if let Some(view) = controller.apply_poll(3, FetchOutcome::Records(records.clone()), true) {
        print!("{}", render_text(&view, false));
    }

    println!("\n--- search \"algebra\" ---");
    controller.apply_event(&ViewEvent::Search("algebra".to_string()));
    if let Some(view) = controller.apply_poll(4, FetchOutcome::Records(records), false) {
        print!("{}", render_text(&view, false));
    }
}
