use crate::model::{format_date, format_score, ExamRecord, ScoreState};
use crate::paginator::{
    build_legend, page_count, LegendSlot, PageEvent, PageState, PAGE_LENGTH_ALL, PAGE_LIMIT,
};
use crate::poller::{ViewController, ViewEvent};
use crate::render::{render_table, render_text, RowAction, Stripe, ViewProfile, ViewRole};
use crate::runner::{Options, Runner, RunnerError};
use crate::source::FetchOutcome;

fn record(exam_id: i64, name: &str, title: &str, score: i64, points: i64) -> ExamRecord {
    ExamRecord {
        exam_id,
        name: name.to_string(),
        title: title.to_string(),
        score,
        points,
        date: "2024-03-07 14:30:00".to_string(),
        user_id: 100 + exam_id,
    }
}

fn records(count: i64) -> Vec<ExamRecord> {
    (1..=count)
        .map(|i| record(i, &format!("Teacher {i}"), &format!("Exam {i}"), 50, 100))
        .collect()
}

fn student_controller(page_length: i64) -> ViewController {
    ViewController::new(ViewProfile::for_role(ViewRole::Student), page_length)
}

#[test]
fn format_score_handles_sentinels_and_truncates() {
    assert_eq!(format_score(-1, 100), "None");
    assert_eq!(format_score(-2, 100), "Ungraded");
    assert_eq!(format_score(75, 100), "75%");
    assert_eq!(format_score(33, 50), "66%");
    assert_eq!(format_score(1, 3), "33%");
    assert_eq!(format_score(0, 100), "0%");
}

#[test]
fn format_score_guards_nonpositive_points() {
    assert_eq!(format_score(10, 0), "0%");
}

#[test]
fn format_date_drops_time_of_day() {
    assert_eq!(format_date("2024-03-07 14:30:00"), "3/7/2024");
    assert_eq!(format_date("2023-12-25 00:00:01"), "12/25/2023");
    assert_eq!(format_date("2024-03-07"), "3/7/2024");
}

#[test]
fn format_date_passes_through_unparseable_input() {
    assert_eq!(format_date("next tuesday"), "next tuesday");
}

#[test]
fn score_state_follows_sentinels() {
    assert_eq!(record(1, "a", "b", -1, 100).score_state(), ScoreState::NotTaken);
    assert_eq!(record(1, "a", "b", -2, 100).score_state(), ScoreState::Ungraded);
    assert_eq!(record(1, "a", "b", 0, 100).score_state(), ScoreState::Graded);
}

#[test]
fn filter_matches_title_case_insensitive() {
    let set = vec![
        record(1, "Alice", "Algebra", 50, 100),
        record(2, "Bob", "Geometry", 50, 100),
    ];
    let filtered = crate::filter::filter_records(&set, "alg");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].title, "Algebra");
}

#[test]
fn filter_empty_search_returns_everything() {
    let set = records(4);
    let filtered = crate::filter::filter_records(&set, "");
    assert_eq!(filtered, set);
}

#[test]
fn filter_matches_formatted_projection() {
    let set = vec![
        record(1, "Alice", "Algebra", -2, 100),
        record(2, "Bob", "Geometry", 50, 100),
    ];
    // "Ungraded" only exists in the formatted score cell, not the raw data.
    let filtered = crate::filter::filter_records(&set, "ungraded");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].exam_id, 1);
    // The short date form is also searchable.
    let by_date = crate::filter::filter_records(&set, "3/7/2024");
    assert_eq!(by_date.len(), 2);
}

#[test]
fn filter_matches_whitespace_verbatim() {
    let set = vec![
        record(1, "Alice", "Algebra I", 50, 100),
        record(2, "Bob", "Algebra", 50, 100),
    ];
    // A trailing space is part of the needle, not noise to strip.
    let filtered = crate::filter::filter_records(&set, "algebra ");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].exam_id, 1);
}

#[test]
fn filter_preserves_input_order() {
    let set = vec![
        record(3, "Cara", "Algebra II", 50, 100),
        record(1, "Alice", "Algebra", 50, 100),
        record(2, "Bob", "Algebra III", 50, 100),
    ];
    let filtered = crate::filter::filter_records(&set, "algebra");
    let ids: Vec<i64> = filtered.iter().map(|r| r.exam_id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[test]
fn is_same_detects_identity_and_change() {
    let a = records(3);
    assert!(crate::detector::is_same(&a, &a.clone()));

    let mut shorter = a.clone();
    shorter.pop();
    assert!(!crate::detector::is_same(&a, &shorter));

    let mut regraded = a.clone();
    regraded[1].score = 90;
    assert!(!crate::detector::is_same(&a, &regraded));

    let mut reordered = a.clone();
    reordered.swap(0, 2);
    assert!(!crate::detector::is_same(&a, &reordered));
}

#[test]
fn legend_never_exceeds_page_limit() {
    for len in [0usize, 1, 5, 12, 75, 1000] {
        for page_length in [1i64, 2, 5, 10] {
            let slots = build_legend(len, page_length).map_or(0, |l| l.len());
            assert!(slots <= PAGE_LIMIT, "len={len} page_length={page_length}");
        }
    }
    let legend = build_legend(1000, 5).unwrap();
    assert_eq!(legend.len(), PAGE_LIMIT);
}

#[test]
fn legend_suppressed_when_data_fits_one_page() {
    assert!(build_legend(5, 5).is_none());
    assert!(build_legend(3, 5).is_none());
    assert!(build_legend(0, 5).is_none());
    assert!(build_legend(100, PAGE_LENGTH_ALL).is_none());
}

#[test]
fn legend_layout_for_three_pages() {
    let legend = build_legend(12, 5).unwrap();
    assert_eq!(
        legend,
        vec![
            LegendSlot::Previous,
            LegendSlot::Page(1),
            LegendSlot::Page(2),
            LegendSlot::Page(3),
            LegendSlot::Next,
        ]
    );
}

#[test]
fn reconcile_clamps_page_start() {
    for len in [0usize, 1, 4, 5, 7, 12, 33] {
        for page_length in [1i64, 3, 5, 10] {
            for start in [0usize, 2, 5, 10, 50] {
                let state = PageState {
                    page_start: start,
                    page_length,
                    ..PageState::default()
                };
                let (next, window) = state.reconcile(len);
                assert_eq!(next.page_start, window.start);
                assert!(window.end <= len);
                if len == 0 {
                    assert_eq!(window, 0..0);
                } else {
                    // The window is never empty while data exists.
                    assert!(
                        window.start < window.end,
                        "len={len} page_length={page_length} start={start}"
                    );
                }
            }
        }
    }
}

#[test]
fn reconcile_recovers_stale_page_start() {
    let state = PageState {
        page_start: 10,
        page_length: 5,
        ..PageState::default()
    };
    let (next, window) = state.reconcile(7);
    assert_eq!(next.page_start, 2);
    assert_eq!(window, 2..7);
}

#[test]
fn reconcile_resets_start_on_empty_set() {
    let state = PageState {
        page_start: 20,
        page_length: 5,
        ..PageState::default()
    };
    let (next, window) = state.reconcile(0);
    assert_eq!(next.page_start, 0);
    assert_eq!(window, 0..0);
}

#[test]
fn reconcile_unbounded_shows_everything() {
    let state = PageState {
        page_start: 3,
        page_length: PAGE_LENGTH_ALL,
        active_page: 4,
        last_slot_count: 9,
    };
    let (next, window) = state.reconcile(12);
    assert_eq!(window, 0..12);
    assert_eq!(next.active_page, 1);
    assert!(build_legend(12, next.page_length).is_none());
}

#[test]
fn shrinking_legend_recovers_active_page() {
    // Active page 5 of 6 pages (30 records, 5 per page).
    let state = PageState {
        page_start: 20,
        page_length: 5,
        active_page: 5,
        last_slot_count: 0,
    };
    let (state, _) = state.reconcile(30);
    assert_eq!(state.last_slot_count, 8);
    assert_eq!(state.active_page, 5);

    // The set shrinks to 3 pages: 5 - 1 = 4, clamped to the last valid
    // page, 3.
    let (state, window) = state.reconcile(15);
    assert_eq!(state.active_page, 3);
    assert_eq!(state.page_start, 10);
    assert_eq!(window, 10..15);
}

#[test]
fn surviving_active_page_is_preserved() {
    let state = PageState {
        page_start: 5,
        page_length: 5,
        active_page: 2,
        last_slot_count: 0,
    };
    let (state, _) = state.reconcile(30);
    let (state, window) = state.reconcile(15);
    assert_eq!(state.active_page, 2);
    assert_eq!(window, 5..10);
}

#[test]
fn click_transitions_step_and_clamp() {
    let state = PageState {
        page_length: 5,
        ..PageState::default()
    };
    // Previous at the first page stays on the first page.
    let state = state.apply(&PageEvent::Click(LegendSlot::Previous), 12);
    assert_eq!(state.active_page, 1);
    assert_eq!(state.page_start, 0);

    let state = state.apply(&PageEvent::Click(LegendSlot::Next), 12);
    assert_eq!(state.active_page, 2);
    assert_eq!(state.page_start, 5);

    let state = state.apply(&PageEvent::Click(LegendSlot::Page(3)), 12);
    assert_eq!(state.active_page, 3);
    assert_eq!(state.page_start, 10);

    // Next at the last page stays on the last page.
    let state = state.apply(&PageEvent::Click(LegendSlot::Next), 12);
    assert_eq!(state.active_page, 3);

    // A numbered click past the end clamps to the last page.
    let state = state.apply(&PageEvent::Click(LegendSlot::Page(9)), 12);
    assert_eq!(state.active_page, 3);
}

#[test]
fn search_and_page_length_reset_to_first_page() {
    let state = PageState {
        page_start: 10,
        page_length: 5,
        active_page: 3,
        last_slot_count: 5,
    };
    let searched = state.apply(&PageEvent::Search, 12);
    assert_eq!(searched.active_page, 1);
    assert_eq!(searched.page_start, 0);

    let resized = state.apply(&PageEvent::PageLength(10), 12);
    assert_eq!(resized.page_length, 10);
    assert_eq!(resized.active_page, 1);
    assert_eq!(resized.page_start, 0);
}

#[test]
fn page_count_rounds_up() {
    assert_eq!(page_count(12, 5), 3);
    assert_eq!(page_count(10, 5), 2);
    assert_eq!(page_count(0, 5), 0);
    assert_eq!(page_count(12, PAGE_LENGTH_ALL), 1);
}

#[test]
fn identical_polls_render_once() {
    let mut controller = student_controller(5);
    let set = records(7);

    let first = controller.apply_poll(1, FetchOutcome::Records(set.clone()), false);
    assert!(first.is_some());

    let second = controller.apply_poll(2, FetchOutcome::Records(set.clone()), false);
    assert!(second.is_none());

    let forced = controller.apply_poll(3, FetchOutcome::Records(set), false);
    assert!(forced.is_none());
}

#[test]
fn forced_poll_rerenders_identical_data() {
    let mut controller = student_controller(5);
    let set = records(7);
    assert!(controller
        .apply_poll(1, FetchOutcome::Records(set.clone()), false)
        .is_some());
    assert!(controller
        .apply_poll(2, FetchOutcome::Records(set), true)
        .is_some());
}

#[test]
fn changed_poll_renders_after_suppressed_cycle() {
    let mut controller = student_controller(5);
    let set = records(7);
    assert!(controller
        .apply_poll(1, FetchOutcome::Records(set.clone()), false)
        .is_some());
    assert!(controller
        .apply_poll(2, FetchOutcome::Records(set.clone()), false)
        .is_none());

    let mut regraded = set;
    regraded[0].score = 99;
    assert!(controller
        .apply_poll(3, FetchOutcome::Records(regraded), false)
        .is_some());
}

#[test]
fn stale_response_is_discarded() {
    let mut controller = student_controller(5);
    let fresh = records(3);
    let stale = records(8);

    // The later poll (seq 2) completes first; the earlier one (seq 1)
    // arrives afterwards and must not be applied.
    let applied = controller.apply_poll(2, FetchOutcome::Records(fresh.clone()), false);
    assert!(applied.is_some());
    assert_eq!(applied.unwrap().total, 3);

    assert!(controller
        .apply_poll(1, FetchOutcome::Records(stale), false)
        .is_none());

    // The comparison baseline still reflects seq 2's data: an identical
    // follow-up poll is suppressed.
    assert!(controller
        .apply_poll(3, FetchOutcome::Records(fresh), false)
        .is_none());
}

#[test]
fn page_click_renders_even_if_forced_poll_loses_race() {
    let mut controller = student_controller(5);
    let set = records(12);
    assert!(controller
        .apply_poll(1, FetchOutcome::Records(set.clone()), false)
        .is_some());

    // Click Next; the forced refresh is issued as seq 2 but a timer poll
    // (seq 3) with unchanged data completes first.
    controller.apply_event(&ViewEvent::PageClick(LegendSlot::Next));
    let view = controller
        .apply_poll(3, FetchOutcome::Records(set.clone()), false)
        .unwrap();
    assert_eq!(view.active_page, 2);
    let ids: Vec<i64> = view.rows.iter().map(|r| r.exam_id).collect();
    assert_eq!(ids, vec![6, 7, 8, 9, 10]);

    // The overtaken forced poll arrives late and is still discarded.
    assert!(controller
        .apply_poll(2, FetchOutcome::Records(set.clone()), true)
        .is_none());

    // The interaction was consumed; the next unchanged poll is quiet again.
    assert!(controller
        .apply_poll(4, FetchOutcome::Records(set), false)
        .is_none());
}

#[test]
fn first_empty_poll_renders_cleared_view() {
    let mut controller = student_controller(5);
    let view = controller.apply_poll(1, FetchOutcome::Empty, false).unwrap();
    assert!(view.rows.is_empty());
    assert_eq!(view.summary, "Showing 0 to 0 of 0 entries");

    // Staying empty afterwards renders nothing.
    assert!(controller
        .apply_poll(2, FetchOutcome::Empty, false)
        .is_none());
}

#[test]
fn empty_outcome_resets_view_state() {
    let mut controller = student_controller(5);
    assert!(controller
        .apply_poll(1, FetchOutcome::Records(records(12)), false)
        .is_some());

    let cleared = controller.apply_poll(2, FetchOutcome::Empty, false).unwrap();
    assert!(cleared.rows.is_empty());
    assert_eq!(cleared.summary, "Showing 0 to 0 of 0 entries");
    assert!(cleared.legend.is_none());
    assert_eq!(controller.page().page_start, 0);
    assert_eq!(controller.page().active_page, 1);

    // Staying empty is not a change worth redrawing.
    assert!(controller
        .apply_poll(3, FetchOutcome::Empty, false)
        .is_none());
}

#[test]
fn twelve_records_five_per_page_end_to_end() {
    let mut controller = student_controller(5);
    let set = records(12);

    let view = controller
        .apply_poll(1, FetchOutcome::Records(set.clone()), false)
        .unwrap();
    assert_eq!(view.active_page, 1);
    assert_eq!(view.summary, "Showing 1 to 5 of 12 entries");
    let ids: Vec<i64> = view.rows.iter().map(|r| r.exam_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(
        view.legend.unwrap(),
        vec![
            LegendSlot::Previous,
            LegendSlot::Page(1),
            LegendSlot::Page(2),
            LegendSlot::Page(3),
            LegendSlot::Next,
        ]
    );

    controller.apply_event(&ViewEvent::PageClick(LegendSlot::Next));
    let view = controller
        .apply_poll(2, FetchOutcome::Records(set), true)
        .unwrap();
    assert_eq!(view.active_page, 2);
    assert_eq!(view.summary, "Showing 6 to 10 of 12 entries");
    let ids: Vec<i64> = view.rows.iter().map(|r| r.exam_id).collect();
    assert_eq!(ids, vec![6, 7, 8, 9, 10]);
}

#[test]
fn search_event_narrows_and_resets_paging() {
    let mut controller = student_controller(5);
    let mut set = records(12);
    set[7].title = "Linear Algebra".to_string();

    assert!(controller
        .apply_poll(1, FetchOutcome::Records(set.clone()), false)
        .is_some());
    controller.apply_event(&ViewEvent::PageClick(LegendSlot::Next));
    assert_eq!(controller.page().active_page, 2);

    controller.apply_event(&ViewEvent::Search("algebra".to_string()));
    assert_eq!(controller.page().active_page, 1);
    assert_eq!(controller.page().page_start, 0);

    let view = controller
        .apply_poll(2, FetchOutcome::Records(set), true)
        .unwrap();
    assert_eq!(view.total, 1);
    assert_eq!(view.rows[0].exam_id, 8);
    assert!(view.legend.is_none());
}

#[test]
fn student_actions_follow_score_state() {
    let profile = ViewProfile::for_role(ViewRole::Student);
    assert_eq!(profile.actions(ScoreState::NotTaken), vec![RowAction::Take]);
    assert_eq!(
        profile.actions(ScoreState::Ungraded),
        vec![RowAction::Review { enabled: false }]
    );
    assert_eq!(
        profile.actions(ScoreState::Graded),
        vec![RowAction::Review { enabled: true }]
    );
}

#[test]
fn teacher_actions_follow_score_state() {
    let profile = ViewProfile::for_role(ViewRole::Teacher);
    assert_eq!(
        profile.actions(ScoreState::Ungraded),
        vec![RowAction::Grade, RowAction::Delete]
    );
    assert_eq!(
        profile.actions(ScoreState::Graded),
        vec![RowAction::Review { enabled: true }, RowAction::Delete]
    );
}

#[test]
fn headers_depend_on_role() {
    let student = ViewProfile::for_role(ViewRole::Student);
    let teacher = ViewProfile::for_role(ViewRole::Teacher);
    assert_eq!(student.headers()[1], "Professor");
    assert_eq!(teacher.headers()[1], "Student");
}

#[test]
fn stripes_restart_on_every_page() {
    let set = records(12);
    let profile = ViewProfile::for_role(ViewRole::Student);
    let state = PageState {
        page_length: 5,
        ..PageState::default()
    };

    let first = render_table(&set, 0..5, &profile, &state, None);
    let second = render_table(&set, 5..10, &profile, &state, None);
    assert_eq!(first.rows[0].stripe, Stripe::Dark);
    assert_eq!(second.rows[0].stripe, Stripe::Dark);
    assert_eq!(first.rows[1].stripe, Stripe::Light);
    assert_eq!(second.rows[1].stripe, Stripe::Light);
}

#[test]
fn render_text_contains_rows_and_legend() {
    let mut controller = student_controller(5);
    let view = controller
        .apply_poll(1, FetchOutcome::Records(records(12)), false)
        .unwrap();
    let text = render_text(&view, true);
    assert!(text.contains("Professor"));
    assert!(text.contains("Exam 3"));
    assert!(text.contains("50%"));
    assert!(text.contains("Showing 1 to 5 of 12 entries"));
    assert!(text.contains("Previous"));
    assert!(text.contains("[1]"));
    assert!(text.contains("Next"));
}

#[test]
fn render_text_empty_view_mentions_no_records() {
    let profile = ViewProfile::for_role(ViewRole::Teacher);
    let text = render_text(&crate::render::TableView::empty(&profile), true);
    assert!(text.contains("No records found."));
    assert!(text.contains("Showing 0 to 0 of 0 entries"));
}

#[test]
fn view_role_parse() {
    assert_eq!(ViewRole::parse("student"), Some(ViewRole::Student));
    assert_eq!(ViewRole::parse("Teacher"), Some(ViewRole::Teacher));
    assert_eq!(ViewRole::parse("admin"), None);
}

#[test]
fn records_deserialize_from_dispatcher_json() {
    let body = r#"[
        {"exam_id": 4, "name": "Prof. Stone", "title": "Calculus", "score": -2,
         "points": 100, "date": "2024-05-01 09:00:00", "user_id": 11}
    ]"#;
    let set: Vec<ExamRecord> = serde_json::from_str(body).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set[0].exam_id, 4);
    assert_eq!(set[0].score_state(), ScoreState::Ungraded);
    assert_eq!(
        set[0].display_fields(),
        [
            "4".to_string(),
            "Prof. Stone".to_string(),
            "Calculus".to_string(),
            "Ungraded".to_string(),
            "5/1/2024".to_string(),
        ]
    );
}

#[test]
fn runner_rejects_invalid_options() {
    let valid = Options {
        endpoint: "http://127.0.0.1:8080/post".to_string(),
        viewer_id: 7,
        ..Options::default()
    };
    assert!(Runner::new(valid.clone()).is_ok());

    let missing = Options {
        endpoint: String::new(),
        ..valid.clone()
    };
    assert!(matches!(
        Runner::new(missing),
        Err(RunnerError::MissingEndpoint)
    ));

    let bad_url = Options {
        endpoint: "not a url".to_string(),
        ..valid.clone()
    };
    assert!(matches!(
        Runner::new(bad_url),
        Err(RunnerError::InvalidEndpoint { .. })
    ));

    let bad_viewer = Options {
        viewer_id: 0,
        ..valid.clone()
    };
    assert!(matches!(
        Runner::new(bad_viewer),
        Err(RunnerError::InvalidViewerId { .. })
    ));

    let bad_length = Options {
        page_length: 0,
        ..valid.clone()
    };
    assert!(matches!(
        Runner::new(bad_length),
        Err(RunnerError::InvalidPageLength { .. })
    ));

    let bad_interval = Options {
        poll_interval_ms: 10,
        ..valid
    };
    assert!(matches!(
        Runner::new(bad_interval),
        Err(RunnerError::InvalidPollInterval { .. })
    ));
}

#[test]
fn config_parses_yaml() {
    let cfg: crate::config::ConfigFile = serde_yaml::from_str(
        r#"
endpoint: http://10.0.0.5/post
viewer_id: 9
role: teacher
poll_interval: 500
page_length: -1
no_color: true
"#,
    )
    .unwrap();
    assert_eq!(cfg.endpoint.as_deref(), Some("http://10.0.0.5/post"));
    assert_eq!(cfg.viewer_id, Some(9));
    assert_eq!(cfg.role.as_deref(), Some("teacher"));
    assert_eq!(cfg.poll_interval, Some(500));
    assert_eq!(cfg.page_length, Some(-1));
    assert_eq!(cfg.no_color, Some(true));
}

#[test]
fn expand_tilde_leaves_plain_paths_alone() {
    let path = crate::config::expand_tilde_string("/tmp/examtable.yml");
    assert_eq!(path, "/tmp/examtable.yml");
}

#[test]
fn session_round_trips_selected_exam() {
    let path = std::env::temp_dir().join("examtable-session-test.json");
    let _ = std::fs::remove_file(&path);
    assert_eq!(crate::session::load_selected_exam(&path).unwrap(), None);

    let selected = crate::session::SelectedExam {
        exam_id: 12,
        counterpart_id: 34,
    };
    crate::session::store_selected_exam(&path, &selected).unwrap();
    assert_eq!(
        crate::session::load_selected_exam(&path).unwrap(),
        Some(selected)
    );
    let _ = std::fs::remove_file(&path);
}
