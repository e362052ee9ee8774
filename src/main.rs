use std::process::exit;

fn main() {
    if let Err(e) = examtable::app::run_cli() {
        examtable::utils::error(&e);
        exit(1);
    }
}
