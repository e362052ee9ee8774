use std::future::Future;
use std::time::Duration;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::detector;
use crate::filter;
use crate::model::ExamRecord;
use crate::paginator::{build_legend, LegendSlot, PageEvent, PageState};
use crate::render::{render_table, TableView, ViewProfile, REQUEST_DELETE};
use crate::session::{self, SelectedExam};
use crate::source::{ExamApi, FetchOutcome, PollQuery, SourceError};
use crate::utils;

/// A user interaction delivered to the polling loop. Everything except
/// `Take` triggers an immediate forced refresh so interaction feels
/// instant instead of waiting out the timer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    /// The search input changed (fired per keystroke by the host).
    Search(String),
    /// A legend button was clicked.
    PageClick(LegendSlot),
    /// The rows-per-page selector changed.
    PageLength(i64),
    /// Delete one record through the dispatcher.
    Delete { exam_id: i64, student_id: i64 },
    /// Select a record for the exam-taking flow.
    Take { exam_id: i64, counterpart_id: i64 },
}

/// Owner of all view state: pagination, search text, the comparison
/// snapshot, and the latest-accepted poll sequence. Lives inside a single
/// task, so no locking is needed; every mutation happens on a tick or
/// event boundary.
#[derive(Clone, Debug)]
pub struct ViewController {
    profile: ViewProfile,
    search_text: String,
    page: PageState,
    last_seen: Option<Vec<ExamRecord>>,
    last_applied_seq: u64,
    render_pending: bool,
}

impl ViewController {
    pub fn new(profile: ViewProfile, page_length: i64) -> Self {
        Self {
            profile,
            search_text: String::new(),
            page: PageState {
                page_length,
                ..PageState::default()
            },
            last_seen: None,
            last_applied_seq: 0,
            render_pending: false,
        }
    }

    pub fn with_search(mut self, search_text: &str) -> Self {
        self.search_text = search_text.to_string();
        self
    }

    pub fn profile(&self) -> &ViewProfile {
        &self.profile
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// The poll query this view issues on every tick.
    pub fn query(&self, viewer_id: i64) -> PollQuery {
        PollQuery {
            viewer_id,
            request_code: self.profile.request_code(),
        }
    }

    fn last_len(&self) -> usize {
        self.last_seen.as_ref().map_or(0, |seen| seen.len())
    }

    /// Fold a pagination-affecting interaction into the state. The caller
    /// follows up with a forced refresh; `render_pending` stays set until a
    /// render actually happens, so the interaction survives even when the
    /// forced request loses a race against a timer poll.
    pub fn apply_event(&mut self, event: &ViewEvent) {
        match event {
            ViewEvent::Search(text) => {
                self.search_text = text.clone();
                self.page = self.page.apply(&PageEvent::Search, self.last_len());
                self.render_pending = true;
            }
            ViewEvent::PageClick(slot) => {
                self.page = self
                    .page
                    .apply(&PageEvent::Click(*slot), self.last_len());
                self.render_pending = true;
            }
            ViewEvent::PageLength(length) => {
                self.page = self
                    .page
                    .apply(&PageEvent::PageLength(*length), self.last_len());
                self.render_pending = true;
            }
            ViewEvent::Delete { .. } | ViewEvent::Take { .. } => {}
        }
    }

    /// Apply one completed poll. Returns the table to render, or `None`
    /// when nothing should be redrawn.
    ///
    /// The comparison snapshot is updated after every accepted poll whether
    /// or not a render happened: the baseline has to track the last
    /// *observed* response, not the last rendered one, or a change could
    /// slip through undetected after a suppressed cycle.
    pub fn apply_poll(
        &mut self,
        seq: u64,
        outcome: FetchOutcome,
        force: bool,
    ) -> Option<TableView> {
        // A slow poll finishing after a newer one carries stale data and is
        // discarded wholesale.
        if seq <= self.last_applied_seq {
            return None;
        }
        let first_poll = self.last_applied_seq == 0;
        self.last_applied_seq = seq;

        // A pending interaction upgrades whichever accepted poll lands next
        // to a forced render, so a forced request that lost the race to a
        // timer poll still takes effect.
        let force = force || self.render_pending;

        match outcome {
            FetchOutcome::Empty => {
                let was_empty = self.last_seen.is_none();
                self.page = PageState {
                    page_length: self.page.page_length,
                    ..PageState::default()
                };
                self.last_seen = None;
                // The first poll always renders, even when the backend is
                // empty from the start; only *staying* empty is suppressed.
                if was_empty && !force && !first_poll {
                    return None;
                }
                self.render_pending = false;
                Some(TableView::empty(&self.profile))
            }
            FetchOutcome::Records(records) => {
                let filtered = filter::filter_records(&records, &self.search_text);
                let changed = match self.last_seen.as_ref() {
                    Some(previous) => !detector::is_same(&filtered, previous),
                    None => true,
                };

                if !force && !changed {
                    self.last_seen = Some(filtered);
                    return None;
                }

                let (page, window) = self.page.reconcile(filtered.len());
                self.page = page;
                let legend = build_legend(filtered.len(), self.page.page_length);
                let view = render_table(&filtered, window, &self.profile, &self.page, legend);
                self.last_seen = Some(filtered);
                self.render_pending = false;
                Some(view)
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PollerOptions {
    pub interval_ms: u64,
    pub query: PollQuery,
}

fn next_poll(
    api: &ExamApi,
    query: PollQuery,
    seq: u64,
    force: bool,
) -> impl Future<Output = (u64, bool, Result<FetchOutcome, SourceError>)> {
    let api = api.clone();
    async move { (seq, force, api.fetch(&query).await) }
}

/// React to one user interaction. Returns whether a forced refresh should
/// follow.
async fn handle_event(api: &ExamApi, controller: &mut ViewController, event: &ViewEvent) -> bool {
    match event {
        ViewEvent::Search(_) | ViewEvent::PageClick(_) | ViewEvent::PageLength(_) => {
            controller.apply_event(event);
            true
        }
        ViewEvent::Take {
            exam_id,
            counterpart_id,
        } => {
            let selected = SelectedExam {
                exam_id: *exam_id,
                counterpart_id: *counterpart_id,
            };
            match session::default_session_path() {
                Some(path) => {
                    if let Err(e) = session::store_selected_exam(&path, &selected) {
                        utils::warn(&e);
                    }
                }
                None => utils::warn("could not resolve a session path for the selected exam"),
            }
            false
        }
        ViewEvent::Delete {
            exam_id,
            student_id,
        } => match api.submit_action(*exam_id, *student_id, REQUEST_DELETE).await {
            Ok(true) => true,
            Ok(false) => {
                utils::warn("delete was rejected by the backend, keeping the current view");
                false
            }
            Err(e) => {
                utils::warn(&format!("delete request failed: {e}"));
                false
            }
        },
    }
}

/// Drive the view: poll on a fixed interval, fold in user events, and hand
/// every accepted render to `on_render`. Polls overlap freely; the
/// sequence-number guard in `apply_poll` makes sure a stale response can
/// never overwrite a fresher one. Runs until the hosting task cancels it.
pub async fn run_view(
    api: ExamApi,
    controller: &mut ViewController,
    options: PollerOptions,
    mut events: mpsc::Receiver<ViewEvent>,
    mut on_render: impl FnMut(TableView),
) {
    let mut ticker = tokio::time::interval(Duration::from_millis(options.interval_ms.max(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut in_flight = FuturesUnordered::new();
    let mut next_seq: u64 = 0;
    let mut events_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                next_seq += 1;
                in_flight.push(next_poll(&api, options.query, next_seq, false));
            }
            event = events.recv(), if events_open => {
                match event {
                    Some(event) => {
                        if handle_event(&api, controller, &event).await {
                            next_seq += 1;
                            in_flight.push(next_poll(&api, options.query, next_seq, true));
                        }
                    }
                    None => events_open = false,
                }
            }
            Some((seq, force, result)) = in_flight.next(), if !in_flight.is_empty() => {
                match result {
                    Ok(outcome) => {
                        if let Some(view) = controller.apply_poll(seq, outcome, force) {
                            on_render(view);
                        }
                    }
                    // Transient failure: keep the last good view and let the
                    // next tick retry.
                    Err(e) => utils::warn(&format!("poll failed: {e}")),
                }
            }
        }
    }
}
