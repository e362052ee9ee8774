use std::ops::Range;

use colored::Colorize;

use crate::model::{ExamRecord, ScoreState};
use crate::paginator::{LegendSlot, PageState};

/// Which side of the exam relationship is looking at the table. Selected
/// once at setup; every role-dependent decision (header labels, request
/// code, per-row actions) hangs off the profile instead of being re-derived
/// from a request-code switch on every render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewRole {
    Student,
    Teacher,
}

impl ViewRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "student" => Some(Self::Student),
            "teacher" => Some(Self::Teacher),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }
}

/// Request code the dispatcher expects for this role's dashboard query.
pub const REQUEST_STUDENT_TABLE: u8 = 1;
pub const REQUEST_TEACHER_TABLE: u8 = 2;

/// Request code for a role-scoped removal of one record.
pub const REQUEST_DELETE: u8 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewProfile {
    pub role: ViewRole,
}

impl ViewProfile {
    pub fn for_role(role: ViewRole) -> Self {
        Self { role }
    }

    pub fn request_code(&self) -> u8 {
        match self.role {
            ViewRole::Student => REQUEST_STUDENT_TABLE,
            ViewRole::Teacher => REQUEST_TEACHER_TABLE,
        }
    }

    pub fn headers(&self) -> [&'static str; 6] {
        match self.role {
            ViewRole::Student => ["ID", "Professor", "Title", "Score", "Date", "Action"],
            ViewRole::Teacher => ["ID", "Student", "Title", "Score", "Date", "Action"],
        }
    }

    /// Action controls for one row. A review control pointing at an
    /// ungraded record exists but is inert, consistent across roles.
    pub fn actions(&self, state: ScoreState) -> Vec<RowAction> {
        match (self.role, state) {
            (ViewRole::Student, ScoreState::NotTaken) => vec![RowAction::Take],
            (ViewRole::Student, ScoreState::Ungraded) => {
                vec![RowAction::Review { enabled: false }]
            }
            (ViewRole::Student, ScoreState::Graded) => vec![RowAction::Review { enabled: true }],
            (ViewRole::Teacher, ScoreState::NotTaken) | (ViewRole::Teacher, ScoreState::Ungraded) => {
                vec![RowAction::Grade, RowAction::Delete]
            }
            (ViewRole::Teacher, ScoreState::Graded) => {
                vec![RowAction::Review { enabled: true }, RowAction::Delete]
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowAction {
    Take,
    Review { enabled: bool },
    Grade,
    Delete,
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Take => "take",
            Self::Review { .. } => "review",
            Self::Grade => "grade",
            Self::Delete => "delete",
        }
    }
}

/// Row striping alternates by displayed position, not absolute data index,
/// so the pattern stays stable across pagination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stripe {
    Light,
    Dark,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub exam_id: i64,
    pub counterpart_id: i64,
    pub cells: [String; 5],
    pub stripe: Stripe,
    pub actions: Vec<RowAction>,
}

/// The fully materialized view of one render pass. This is the contract
/// with the hosting surface: any UI toolkit can display a `TableView`
/// without knowing about polling, filtering, or pagination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableView {
    pub headers: [&'static str; 6],
    pub rows: Vec<TableRow>,
    pub summary: String,
    pub legend: Option<Vec<LegendSlot>>,
    pub active_page: usize,
    pub total: usize,
}

impl TableView {
    /// The cleared view shown when the source reports no records at all.
    pub fn empty(profile: &ViewProfile) -> Self {
        Self {
            headers: profile.headers(),
            rows: Vec::new(),
            summary: summary_line(0..0, 0),
            legend: None,
            active_page: 1,
            total: 0,
        }
    }
}

fn summary_line(window: Range<usize>, total: usize) -> String {
    let shown_from = if window.end == 0 { 0 } else { window.start + 1 };
    format!(
        "Showing {} to {} of {} entries",
        shown_from, window.end, total
    )
}

/// Materialize the visible window into header, rows, and action controls.
/// Pure with respect to state: reads the reconciled `PageState`, owns
/// nothing.
pub fn render_table(
    filtered: &[ExamRecord],
    window: Range<usize>,
    profile: &ViewProfile,
    state: &PageState,
    legend: Option<Vec<LegendSlot>>,
) -> TableView {
    let mut rows: Vec<TableRow> = Vec::new();
    for (displayed, record) in filtered[window.clone()].iter().enumerate() {
        // 1-indexed display position drives the stripe parity.
        let stripe = if (displayed + 1) % 2 == 0 {
            Stripe::Light
        } else {
            Stripe::Dark
        };
        rows.push(TableRow {
            exam_id: record.exam_id,
            counterpart_id: record.user_id,
            cells: record.display_fields(),
            stripe,
            actions: profile.actions(record.score_state()),
        });
    }

    TableView {
        headers: profile.headers(),
        rows,
        summary: summary_line(window, filtered.len()),
        legend,
        active_page: state.active_page,
        total: filtered.len(),
    }
}

fn legend_label(slot: &LegendSlot) -> String {
    match slot {
        LegendSlot::Previous => "Previous".to_string(),
        LegendSlot::Page(page) => page.to_string(),
        LegendSlot::Next => "Next".to_string(),
    }
}

/// Render a `TableView` for the terminal host.
pub fn render_text(view: &TableView, no_color: bool) -> String {
    let mut widths: Vec<usize> = view.headers.iter().map(|h| h.len()).collect();
    for row in view.rows.iter() {
        for (i, cell) in row.cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
        let actions = row
            .actions
            .iter()
            .map(|a| a.label())
            .collect::<Vec<_>>()
            .join(" ");
        widths[5] = widths[5].max(actions.len());
    }

    let mut out = String::new();
    for (i, header) in view.headers.iter().enumerate() {
        let padded = format!("{:<width$}  ", header, width = widths[i]);
        if no_color {
            out.push_str(&padded);
        } else {
            out.push_str(&padded.bold().white().to_string());
        }
    }
    out.push('\n');

    if view.rows.is_empty() {
        let line = "No records found.";
        if no_color {
            out.push_str(line);
        } else {
            out.push_str(&line.yellow().to_string());
        }
        out.push('\n');
    }

    for row in view.rows.iter() {
        for (i, cell) in row.cells.iter().enumerate() {
            out.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
        }
        let mut actions: Vec<String> = Vec::new();
        for action in row.actions.iter() {
            let label = action.label();
            let rendered = match action {
                RowAction::Review { enabled: false } if !no_color => {
                    label.dimmed().to_string()
                }
                _ if no_color => label.to_string(),
                _ => label.cyan().to_string(),
            };
            actions.push(rendered);
        }
        out.push_str(&actions.join(" "));
        out.push('\n');
    }

    out.push_str(&view.summary);
    out.push('\n');

    if let Some(legend) = view.legend.as_ref() {
        let mut parts: Vec<String> = Vec::new();
        for slot in legend.iter() {
            let label = legend_label(slot);
            let active = matches!(slot, LegendSlot::Page(page) if *page == view.active_page);
            let rendered = if active && !no_color {
                format!("[{}]", label).bold().cyan().to_string()
            } else if active {
                format!("[{}]", label)
            } else {
                label
            };
            parts.push(rendered);
        }
        out.push_str(&parts.join(" "));
        out.push('\n');
    }

    out
}
