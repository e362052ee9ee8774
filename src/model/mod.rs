use chrono::Datelike;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;

/// Score sentinel for an exam the student has not attempted yet.
pub const SCORE_NOT_TAKEN: i64 = -1;

/// Score sentinel for an exam that was submitted but not graded.
pub const SCORE_UNGRADED: i64 = -2;

/// One row of tabular exam/submission data as returned by the backend
/// dispatcher. Records are immutable value objects: the view never mutates
/// one, it only re-fetches the whole set.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ExamRecord {
    pub exam_id: i64,
    pub name: String,
    pub title: String,
    pub score: i64,
    pub points: i64,
    pub date: String,
    pub user_id: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreState {
    NotTaken,
    Ungraded,
    Graded,
}

impl ExamRecord {
    pub fn score_state(&self) -> ScoreState {
        match self.score {
            SCORE_NOT_TAKEN => ScoreState::NotTaken,
            SCORE_UNGRADED => ScoreState::Ungraded,
            _ => ScoreState::Graded,
        }
    }

    /// The ordered projection shown in the table. Search filtering matches
    /// against exactly these elements, so a record is findable by anything
    /// the viewer can see in its row.
    pub fn display_fields(&self) -> [String; 5] {
        [
            self.exam_id.to_string(),
            self.name.clone(),
            self.title.clone(),
            format_score(self.score, self.points),
            format_date(&self.date),
        ]
    }
}

/// Percentage earned on an exam, truncated to an integer. The two negative
/// sentinels render as their state labels instead of a number.
pub fn format_score(score: i64, points: i64) -> String {
    if score == SCORE_NOT_TAKEN {
        return "None".to_string();
    }
    if score == SCORE_UNGRADED {
        return "Ungraded".to_string();
    }
    if points <= 0 {
        return "0%".to_string();
    }
    // Integer division truncates, matching floor for non-negative scores.
    format!("{}%", score * 100 / points)
}

/// Render a `YYYY-MM-DD HH:MM:SS` datetime as a short date, dropping the
/// time-of-day. Input that does not parse is passed through untouched.
pub fn format_date(datetime: &str) -> String {
    let trimmed = datetime.trim();
    let parsed = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .or_else(|_| chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"));
    match parsed {
        Ok(date) => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        Err(_) => datetime.to_string(),
    }
}
