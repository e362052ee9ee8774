use crate::model::ExamRecord;

/// Structural comparison between the newly filtered response and the last
/// one seen. Identical data (same length, same field values, same order)
/// suppresses a table rebuild even though a poll occurred, which avoids
/// flicker and loss of transient focus in the hosting surface.
pub fn is_same(current: &[ExamRecord], previous: &[ExamRecord]) -> bool {
    if current.len() != previous.len() {
        return false;
    }

    for (a, b) in current.iter().zip(previous.iter()) {
        if a.exam_id != b.exam_id
            || a.name != b.name
            || a.title != b.title
            || a.score != b.score
            || a.points != b.points
            || a.date != b.date
            || a.user_id != b.user_id
        {
            return false;
        }
    }
    true
}
