use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

use crate::config;

/// The record a "take" action selected, handed off to the exam-taking flow
/// through viewer-session-scoped storage.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SelectedExam {
    pub exam_id: i64,
    pub counterpart_id: i64,
}

pub fn default_session_path() -> Option<PathBuf> {
    Some(config::home_dir()?.join(".examtable").join("session.json"))
}

pub fn store_selected_exam(path: &Path, selected: &SelectedExam) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            format!(
                "failed to create session directory '{}': {e}",
                parent.display()
            )
        })?;
    }
    let contents = serde_json::to_string(selected)
        .map_err(|e| format!("failed to encode session: {e}"))?;
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write session file '{}': {e}", path.display()))
}

pub fn load_selected_exam(path: &Path) -> Result<Option<SelectedExam>, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| format!("failed to parse session file '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(format!(
            "failed to read session file '{}': {e}",
            path.display()
        )),
    }
}
