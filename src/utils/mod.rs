use colored::Colorize;

use crate::paginator::PAGE_LENGTH_ALL;

pub fn info(message: &str) {
    println!(
        "{}{}{} {}",
        "[".bold().white(),
        "INF".bold().green(),
        "]".bold().white(),
        message
    );
}

pub fn warn(message: &str) {
    println!(
        "{}{}{} {}",
        "[".bold().white(),
        "WRN".bold().yellow(),
        "]".bold().white(),
        message
    );
}

pub fn error(message: &str) {
    eprintln!(
        "{}{}{} {}",
        "[".bold().white(),
        "ERR".bold().red(),
        "]".bold().white(),
        message
    );
}

pub fn validate_page_length(value: i64) -> Result<i64, String> {
    if value == PAGE_LENGTH_ALL || value > 0 {
        Ok(value)
    } else {
        Err(format!(
            "invalid page length {value}, expected a positive amount or -1 for all"
        ))
    }
}

pub fn validate_poll_interval(value: u64) -> Result<u64, String> {
    if value >= 50 {
        Ok(value)
    } else {
        Err(format!(
            "invalid poll interval {value}ms, expected at least 50ms"
        ))
    }
}
